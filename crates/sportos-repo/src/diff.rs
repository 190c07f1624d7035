//! Column-keyed diffing of entity snapshots.
//!
//! Instead of reflecting over struct fields at runtime, every auditable
//! entity declares an explicit field table mapping column names to capture
//! closures. The diff and snapshot algorithms stay generic over that table;
//! fields without a declared column are simply never listed and therefore
//! never audit-visible.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::edit_info::{CreatedInfo, DeletedInfo, EditInfoCu, EditInfoCud, UpdatedInfo};
use crate::entity::Entity;

/// Column-keyed map of captured field values, stored as JSONB.
pub type ColumnMap = Map<String, Value>;

/// One audit-visible field of an entity: its column name and a capture
/// projecting the field into a JSON value.
pub struct AuditField<E> {
    column: &'static str,
    capture: Box<dyn Fn(&E) -> Value + Send + Sync>,
}

impl<E> AuditField<E> {
    pub fn new<T, F>(column: &'static str, accessor: F) -> Self
    where
        T: Serialize,
        F: Fn(&E) -> T + Send + Sync + 'static,
    {
        Self {
            column,
            capture: Box::new(move |entity| to_json(&accessor(entity))),
        }
    }

    pub const fn column(&self) -> &'static str {
        self.column
    }

    pub fn capture(&self, entity: &E) -> Value {
        (self.capture)(entity)
    }
}

/// An entity whose mutations are recorded in the audit log.
pub trait Auditable: Entity {
    /// The ordered field table; only listed fields are audit-visible.
    fn audit_fields() -> Vec<AuditField<Self>>
    where
        Self: Sized;
}

fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Unset fields are not captured: JSON null and the empty string both read
/// as "no value" for audit purposes.
fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Compare two same-typed snapshots field by field.
///
/// Unequal fields land in both maps under their column key; equal fields in
/// neither. Per-side zero values are omitted, so a transition from unset to
/// set records only the side that carries a value.
pub fn diff<E: Auditable>(old: &E, new: &E) -> (ColumnMap, ColumnMap) {
    let mut old_columns = ColumnMap::new();
    let mut new_columns = ColumnMap::new();
    for field in E::audit_fields() {
        let old_value = field.capture(old);
        let new_value = field.capture(new);
        if old_value == new_value {
            continue;
        }
        if !is_zero(&old_value) {
            old_columns.insert(field.column().to_owned(), old_value);
        }
        if !is_zero(&new_value) {
            new_columns.insert(field.column().to_owned(), new_value);
        }
    }
    (old_columns, new_columns)
}

/// Capture the full snapshot of an entity's non-zero tagged fields.
///
/// Used for the asymmetric create/delete audit records where only one side
/// exists.
pub fn snapshot<E: Auditable>(entity: &E) -> ColumnMap {
    let mut columns = ColumnMap::new();
    for field in E::audit_fields() {
        let value = field.capture(entity);
        if !is_zero(&value) {
            columns.insert(field.column().to_owned(), value);
        }
    }
    columns
}

/// Field table block for a creation pair reached through `project`.
pub fn created_fields<E: 'static>(
    project: impl Fn(&E) -> &CreatedInfo + Copy + Send + Sync + 'static,
) -> Vec<AuditField<E>> {
    vec![
        AuditField::new("created_at", move |entity| project(entity).created_at),
        AuditField::new("created_by", move |entity| {
            project(entity).created_by.clone()
        }),
    ]
}

/// Field table block for an update pair reached through `project`.
pub fn updated_fields<E: 'static>(
    project: impl Fn(&E) -> &UpdatedInfo + Copy + Send + Sync + 'static,
) -> Vec<AuditField<E>> {
    vec![
        AuditField::new("updated_at", move |entity| project(entity).updated_at),
        AuditField::new("updated_by", move |entity| {
            project(entity).updated_by.clone()
        }),
    ]
}

/// Field table block for a deletion pair reached through `project`.
pub fn deleted_fields<E: 'static>(
    project: impl Fn(&E) -> &DeletedInfo + Copy + Send + Sync + 'static,
) -> Vec<AuditField<E>> {
    vec![
        AuditField::new("deleted_at", move |entity| project(entity).deleted_at),
        AuditField::new("deleted_by", move |entity| {
            project(entity).deleted_by.clone()
        }),
    ]
}

/// Field table block for a full created/updated/deleted composite.
pub fn edit_info_cud_fields<E: 'static>(
    project: impl Fn(&E) -> &EditInfoCud + Copy + Send + Sync + 'static,
) -> Vec<AuditField<E>> {
    let mut fields = created_fields(move |entity: &E| &project(entity).created);
    fields.extend(updated_fields(move |entity: &E| &project(entity).updated));
    fields.extend(deleted_fields(move |entity: &E| &project(entity).deleted));
    fields
}

/// Field table block for a created/updated composite.
pub fn edit_info_cu_fields<E: 'static>(
    project: impl Fn(&E) -> &EditInfoCu + Copy + Send + Sync + 'static,
) -> Vec<AuditField<E>> {
    let mut fields = created_fields(move |entity: &E| &project(entity).created);
    fields.extend(updated_fields(move |entity: &E| &project(entity).updated));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[derive(Debug, Clone, Default)]
    struct Venue {
        id: String,
        name: String,
        city: String,
        capacity: Option<i64>,
        secret: String,
    }

    impl Entity for Venue {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> EntityKind {
            EntityKind::Place
        }
    }

    impl Auditable for Venue {
        fn audit_fields() -> Vec<AuditField<Self>> {
            // `secret` has no column on purpose: untagged fields stay out of
            // the audit log.
            vec![
                AuditField::new("place_id", |venue: &Self| venue.id.clone()),
                AuditField::new("name", |venue: &Self| venue.name.clone()),
                AuditField::new("city", |venue: &Self| venue.city.clone()),
                AuditField::new("capacity", |venue: &Self| venue.capacity),
            ]
        }
    }

    #[fixture]
    fn venue() -> Venue {
        Venue {
            id: "v1".to_owned(),
            name: "Court One".to_owned(),
            city: "NY".to_owned(),
            capacity: Some(120),
            secret: "internal".to_owned(),
        }
    }

    #[rstest]
    fn diff_records_only_the_changed_field(venue: Venue) {
        let mut changed = venue.clone();
        changed.city = "LA".to_owned();

        let (old_columns, new_columns) = diff(&venue, &changed);

        assert_eq!(old_columns.len(), 1);
        assert_eq!(old_columns.get("city"), Some(&json!("NY")));
        assert_eq!(new_columns.len(), 1);
        assert_eq!(new_columns.get("city"), Some(&json!("LA")));
    }

    #[rstest]
    fn identical_snapshots_diff_to_empty_maps(venue: Venue) {
        let (old_columns, new_columns) = diff(&venue, &venue.clone());
        assert!(old_columns.is_empty());
        assert!(new_columns.is_empty());
    }

    #[rstest]
    fn transition_from_unset_records_only_the_set_side(venue: Venue) {
        let mut unset = venue.clone();
        unset.capacity = None;

        let (old_columns, new_columns) = diff(&unset, &venue);

        assert!(!old_columns.contains_key("capacity"));
        assert_eq!(new_columns.get("capacity"), Some(&json!(120)));
    }

    #[rstest]
    fn snapshot_captures_tagged_nonzero_fields(venue: Venue) {
        let columns = snapshot(&venue);

        assert_eq!(columns.len(), 4);
        assert_eq!(columns.get("place_id"), Some(&json!("v1")));
        assert!(!columns.contains_key("secret"));
    }

    #[rstest]
    fn snapshot_skips_unset_fields(venue: Venue) {
        let mut sparse = venue;
        sparse.capacity = None;
        sparse.city = String::new();

        let columns = snapshot(&sparse);

        assert!(!columns.contains_key("capacity"));
        assert!(!columns.contains_key("city"));
    }

    #[derive(Debug, Clone, Default)]
    struct Stamped {
        id: String,
        edit_info: EditInfoCud,
    }

    impl Entity for Stamped {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> EntityKind {
            EntityKind::Event
        }
    }

    impl Auditable for Stamped {
        fn audit_fields() -> Vec<AuditField<Self>> {
            let mut fields = vec![AuditField::new("event_id", |e: &Self| e.id.clone())];
            fields.extend(edit_info_cud_fields(|e: &Self| &e.edit_info));
            fields
        }
    }

    #[rstest]
    fn cu_block_lists_creation_and_update_columns_in_order() {
        struct Draft {
            edit_info: EditInfoCu,
        }

        let fields = edit_info_cu_fields(|draft: &Draft| &draft.edit_info);
        let columns: Vec<_> = fields.iter().map(AuditField::column).collect();

        assert_eq!(
            columns,
            ["created_at", "created_by", "updated_at", "updated_by"]
        );

        let draft = Draft {
            edit_info: EditInfoCu::stamp(Some("amy")),
        };
        let captured: Vec<_> = fields.iter().map(|field| field.capture(&draft)).collect();
        assert_eq!(captured.get(1), Some(&json!("amy")));
    }

    #[rstest]
    fn edit_info_blocks_surface_lifecycle_columns() {
        let mut old = Stamped {
            id: "e1".to_owned(),
            edit_info: EditInfoCud::stamp(Some("alice")),
        };
        old.edit_info.created.created_at = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH;
        let mut new = old.clone();
        new.edit_info.updated.stamp_update(Some("bob"));

        let (old_columns, new_columns) = diff(&old, &new);

        assert!(old_columns.is_empty());
        assert_eq!(new_columns.get("updated_by"), Some(&json!("bob")));
        assert!(new_columns.contains_key("updated_at"));
        assert!(!new_columns.contains_key("created_by"));
    }
}
