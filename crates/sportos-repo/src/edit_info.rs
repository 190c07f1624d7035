//! Composable creation/update/deletion metadata blocks.
//!
//! Every entity embeds the blocks matching its lifecycle (created-only,
//! created+updated, the full triple, ...). Composition is explicit struct
//! fields rather than inheritance so each block stays independently
//! testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel actor recorded when a mutation carries no authenticated user.
pub const SYSTEM_ACTOR: &str = "system";

fn actor_or_system(by: Option<&str>) -> String {
    by.unwrap_or(SYSTEM_ACTOR).to_owned()
}

/// Creation metadata, set exactly once at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedInfo {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl CreatedInfo {
    /// Stamp the creation pair now, defaulting the actor to [`SYSTEM_ACTOR`].
    pub fn stamp(by: Option<&str>) -> Self {
        Self {
            created_at: Utc::now(),
            created_by: actor_or_system(by),
        }
    }
}

impl Default for CreatedInfo {
    fn default() -> Self {
        Self {
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            created_by: String::new(),
        }
    }
}

/// Update metadata, restamped on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatedInfo {
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl UpdatedInfo {
    /// Stamp the update pair now, defaulting the actor to [`SYSTEM_ACTOR`].
    pub fn stamp_update(&mut self, by: Option<&str>) {
        self.updated_at = Some(Utc::now());
        self.updated_by = Some(actor_or_system(by));
    }
}

/// Soft-deletion metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeletedInfo {
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl DeletedInfo {
    /// Stamp the deletion pair now, defaulting the actor to [`SYSTEM_ACTOR`].
    pub fn stamp_delete(&mut self, by: Option<&str>) {
        self.deleted_at = Some(Utc::now());
        self.deleted_by = Some(actor_or_system(by));
    }

    /// A record is deleted once its deletion timestamp is set.
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Created + updated lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditInfoCu {
    pub created: CreatedInfo,
    pub updated: UpdatedInfo,
}

impl EditInfoCu {
    pub fn stamp(by: Option<&str>) -> Self {
        Self {
            created: CreatedInfo::stamp(by),
            updated: UpdatedInfo::default(),
        }
    }
}

/// Created + deleted lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditInfoCd {
    pub created: CreatedInfo,
    pub deleted: DeletedInfo,
}

impl EditInfoCd {
    pub fn stamp(by: Option<&str>) -> Self {
        Self {
            created: CreatedInfo::stamp(by),
            deleted: DeletedInfo::default(),
        }
    }

    pub const fn is_deleted(&self) -> bool {
        self.deleted.is_deleted()
    }
}

/// Updated + deleted lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditInfoUd {
    pub updated: UpdatedInfo,
    pub deleted: DeletedInfo,
}

impl EditInfoUd {
    pub const fn is_deleted(&self) -> bool {
        self.deleted.is_deleted()
    }
}

/// Full created + updated + deleted lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditInfoCud {
    pub created: CreatedInfo,
    pub updated: UpdatedInfo,
    pub deleted: DeletedInfo,
}

impl EditInfoCud {
    pub fn stamp(by: Option<&str>) -> Self {
        Self {
            created: CreatedInfo::stamp(by),
            updated: UpdatedInfo::default(),
            deleted: DeletedInfo::default(),
        }
    }

    pub const fn is_deleted(&self) -> bool {
        self.deleted.is_deleted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn stamp_defaults_actor_to_system() {
        let info = CreatedInfo::stamp(None);
        assert_eq!(info.created_by, SYSTEM_ACTOR);

        let info = CreatedInfo::stamp(Some("alice"));
        assert_eq!(info.created_by, "alice");
    }

    #[rstest]
    fn update_stamp_populates_both_fields() {
        let mut info = UpdatedInfo::default();
        assert!(info.updated_at.is_none());

        info.stamp_update(Some("bob"));
        assert!(info.updated_at.is_some());
        assert_eq!(info.updated_by.as_deref(), Some("bob"));
    }

    // Pins the soft-delete convention: a set deletion timestamp means
    // deleted. The absent timestamp is the live record.
    #[rstest]
    fn deletion_timestamp_marks_record_deleted() {
        let mut info = DeletedInfo::default();
        assert!(!info.is_deleted());

        info.stamp_delete(None);
        assert!(info.is_deleted());
        assert_eq!(info.deleted_by.as_deref(), Some(SYSTEM_ACTOR));
    }

    #[rstest]
    fn composites_forward_deletion_state() {
        let mut edit = EditInfoCud::stamp(Some("carol"));
        assert_eq!(edit.created.created_by, "carol");
        assert!(!edit.is_deleted());

        edit.deleted.stamp_delete(Some("carol"));
        assert!(edit.is_deleted());
    }
}
