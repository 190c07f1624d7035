//! Sort and group-by column specifications.

/// Sort direction; ascending is the implicit default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One requested sort column, qualified by table alias.
///
/// `order` is the tie-break rank when several columns are requested: lower
/// sorts first regardless of declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortColumn {
    pub prefix: String,
    pub column: String,
    pub order: i32,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn ascending(order: i32) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn descending(order: i32) -> Self {
        Self {
            order,
            direction: SortDirection::Descending,
            ..Self::default()
        }
    }

    fn order_by(&self) -> String {
        let dir = match self.direction {
            SortDirection::Ascending => "",
            SortDirection::Descending => " desc",
        };
        format!("{}.{}{}", self.prefix, self.column, dir)
    }
}

/// Ordered set of sort columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortColumns(Vec<SortColumn>);

impl SortColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: SortColumn) {
        self.0.push(column);
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render the comma-joined column list, sorted by requested order.
    ///
    /// The trailing comma is deliberate; the assembler strips it after the
    /// last contributor has appended.
    pub fn order_by(&self) -> String {
        let mut columns = self.0.clone();
        columns.sort_by_key(|column| column.order);
        let mut rendered = String::new();
        for column in &columns {
            rendered.push_str(&column.order_by());
            rendered.push(',');
        }
        rendered
    }
}

impl FromIterator<SortColumn> for SortColumns {
    fn from_iter<I: IntoIterator<Item = SortColumn>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a request-style sort expression (`+name,-created_at`) into columns.
///
/// Position in the expression becomes the explicit order; a bare column name
/// sorts ascending. Prefixes are bound later by the owning descriptor.
pub fn parse_sort(sort: Option<&str>) -> SortColumns {
    let mut columns = SortColumns::new();
    let Some(sort) = sort else {
        return columns;
    };
    for (position, part) in sort.split(',').enumerate() {
        if part.is_empty() {
            continue;
        }
        let (direction, column) = if let Some(rest) = part.strip_prefix('+') {
            (SortDirection::Ascending, rest)
        } else if let Some(rest) = part.strip_prefix('-') {
            (SortDirection::Descending, rest)
        } else {
            (SortDirection::Ascending, part)
        };
        columns.push(SortColumn {
            prefix: String::new(),
            column: column.to_owned(),
            order: i32::try_from(position).unwrap_or(i32::MAX),
            direction,
        });
    }
    columns
}

/// One group-by column, qualified by table alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupColumn {
    pub prefix: String,
    pub column: String,
    pub order: i32,
}

impl GroupColumn {
    fn group_by(&self) -> String {
        format!("{}.{}", self.prefix, self.column)
    }
}

/// Ordered set of group-by columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupColumns(Vec<GroupColumn>);

impl GroupColumns {
    pub fn push(&mut self, column: GroupColumn) {
        self.0.push(column);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the comma-joined column list, trailing comma included for the
    /// assembler to strip.
    pub fn group_by(&self) -> String {
        let mut columns = self.0.clone();
        columns.sort_by_key(|column| column.order);
        let mut rendered = String::new();
        for column in &columns {
            rendered.push_str(&column.group_by());
            rendered.push(',');
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn column(prefix: &str, name: &str, order: i32, direction: SortDirection) -> SortColumn {
        SortColumn {
            prefix: prefix.to_owned(),
            column: name.to_owned(),
            order,
            direction,
        }
    }

    // Explicit orders {2,0,1} must emit in order 0,1,2 regardless of the
    // declaration sequence.
    #[rstest]
    fn order_by_sorts_by_explicit_order() {
        let columns: SortColumns = [
            column("co", "name", 2, SortDirection::Ascending),
            column("co", "city", 0, SortDirection::Descending),
            column("co", "sport", 1, SortDirection::Ascending),
        ]
        .into_iter()
        .collect();

        assert_eq!(columns.order_by(), "co.city desc,co.sport,co.name,");
    }

    #[rstest]
    fn empty_sort_renders_nothing() {
        assert_eq!(SortColumns::new().order_by(), "");
    }

    #[rstest]
    fn parse_sort_maps_position_to_order() {
        let columns = parse_sort(Some("+name,-created_at,city"));
        assert_eq!(
            columns,
            [
                column("", "name", 0, SortDirection::Ascending),
                column("", "created_at", 1, SortDirection::Descending),
                column("", "city", 2, SortDirection::Ascending),
            ]
            .into_iter()
            .collect()
        );
    }

    #[rstest]
    fn parse_sort_skips_empty_segments() {
        let columns = parse_sort(Some("name,,city"));
        assert_eq!(columns.len(), 2);
    }

    #[rstest]
    fn parse_sort_of_none_is_empty() {
        assert!(parse_sort(None).is_empty());
    }

    // Sort expressions arrive as request strings, so a multi-byte first
    // character must parse as a bare ascending column, not panic.
    #[rstest]
    fn parse_sort_accepts_multibyte_column_names() {
        let columns = parse_sort(Some("čas,-šport"));
        assert_eq!(
            columns,
            [
                column("", "čas", 0, SortDirection::Ascending),
                column("", "šport", 1, SortDirection::Descending),
            ]
            .into_iter()
            .collect()
        );
    }

    #[rstest]
    fn group_by_renders_qualified_columns() {
        let mut columns = GroupColumns::default();
        columns.push(GroupColumn {
            prefix: "co".to_owned(),
            column: "city".to_owned(),
            order: 0,
        });
        assert_eq!(columns.group_by(), "co.city,");
    }
}
