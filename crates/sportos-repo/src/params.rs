//! Ordered positional-parameter list backing assembled SQL.

use std::fmt;

use tokio_postgres::types::ToSql;

/// Boxed parameter value accepted by the driver.
pub type SqlValue = Box<dyn ToSql + Send + Sync>;

/// The ordered parameter list for one assembled statement.
///
/// Placeholder numbers are derived from the list length at push time, which
/// keeps `$n` contiguous and in emission order no matter how many optional
/// descriptor fields are actually present.
#[derive(Default)]
pub struct SqlParams {
    values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value and return its placeholder ordinal (1-based).
    pub fn push(&mut self, value: impl ToSql + Send + Sync + 'static) -> usize {
        self.values.push(Box::new(value));
        self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the values in the shape the driver expects.
    pub fn as_sql(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|value| value.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }
}

impl fmt::Debug for SqlParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn push_returns_running_ordinal() {
        let mut params = SqlParams::new();
        assert_eq!(params.push("a".to_owned()), 1);
        assert_eq!(params.push(7_i64), 2);
        assert_eq!(params.push("b".to_owned()), 3);
        assert_eq!(params.len(), 3);
    }

    #[rstest]
    fn as_sql_preserves_order_and_arity() {
        let mut params = SqlParams::new();
        params.push("x".to_owned());
        params.push(1_i64);

        assert_eq!(params.as_sql().len(), 2);
    }
}
