//! Descriptor blocks for the shared edit-info metadata columns.
//!
//! Entities embed these next to their own fields so creation/update/deletion
//! filtering, sorting and stamping stay uniform across every table.

use chrono::{DateTime, Utc};

use crate::edit_info::EditInfoUd;
use crate::error::RepoError;
use crate::params::SqlParams;

use super::sort::{SortColumn, SortColumns};

/// Filters over the creation metadata pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedSearchParams {
    pub created_from: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

impl CreatedSearchParams {
    pub const fn is_empty(&self) -> bool {
        self.created_from.is_none() && self.created_before.is_none() && self.created_by.is_none()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        Ok(())
    }

    pub fn predicate_clause(&self, prefix: &str, query: &mut String, params: &mut SqlParams) {
        if let Some(from) = self.created_from {
            let n = params.push(from);
            query.push_str(&format!(" and {prefix}.created_at>=${n}"));
        }
        if let Some(before) = self.created_before {
            let n = params.push(before);
            query.push_str(&format!(" and {prefix}.created_at<${n}"));
        }
        if let Some(by) = &self.created_by
            && !by.is_empty()
        {
            let n = params.push(by.clone());
            query.push_str(&format!(" and {prefix}.created_by=${n}"));
        }
    }
}

/// Filters over the update metadata pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatedSearchParams {
    pub updated_from: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl UpdatedSearchParams {
    pub const fn is_empty(&self) -> bool {
        self.updated_from.is_none() && self.updated_before.is_none() && self.updated_by.is_none()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        Ok(())
    }

    pub fn predicate_clause(&self, prefix: &str, query: &mut String, params: &mut SqlParams) {
        if let Some(from) = self.updated_from {
            let n = params.push(from);
            query.push_str(&format!(" and {prefix}.updated_at>=${n}"));
        }
        if let Some(before) = self.updated_before {
            let n = params.push(before);
            query.push_str(&format!(" and {prefix}.updated_at<${n}"));
        }
        if let Some(by) = &self.updated_by
            && !by.is_empty()
        {
            let n = params.push(by.clone());
            query.push_str(&format!(" and {prefix}.updated_by=${n}"));
        }
    }
}

/// Filters over the soft-deletion metadata pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletedSearchParams {
    pub deleted_from: Option<DateTime<Utc>>,
    pub deleted_before: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl DeletedSearchParams {
    pub const fn is_empty(&self) -> bool {
        self.deleted_from.is_none() && self.deleted_before.is_none() && self.deleted_by.is_none()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        Ok(())
    }

    pub fn predicate_clause(&self, prefix: &str, query: &mut String, params: &mut SqlParams) {
        if let Some(from) = self.deleted_from {
            let n = params.push(from);
            query.push_str(&format!(" and {prefix}.deleted_at>=${n}"));
        }
        if let Some(before) = self.deleted_before {
            let n = params.push(before);
            query.push_str(&format!(" and {prefix}.deleted_at<${n}"));
        }
        if let Some(by) = &self.deleted_by
            && !by.is_empty()
        {
            let n = params.push(by.clone());
            query.push_str(&format!(" and {prefix}.deleted_by=${n}"));
        }
    }
}

/// Created + updated filter composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditInfoCuSearchParams {
    pub created: CreatedSearchParams,
    pub updated: UpdatedSearchParams,
}

impl EditInfoCuSearchParams {
    pub const fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        self.created.validate()?;
        self.updated.validate()
    }

    pub fn predicate_clause(&self, prefix: &str, query: &mut String, params: &mut SqlParams) {
        self.created.predicate_clause(prefix, query, params);
        self.updated.predicate_clause(prefix, query, params);
    }
}

/// Full created + updated + deleted filter composite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditInfoCudSearchParams {
    pub created: CreatedSearchParams,
    pub updated: UpdatedSearchParams,
    pub deleted: DeletedSearchParams,
}

impl EditInfoCudSearchParams {
    pub const fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    pub fn validate(&self) -> Result<(), RepoError> {
        self.created.validate()?;
        self.updated.validate()?;
        self.deleted.validate()
    }

    pub fn predicate_clause(&self, prefix: &str, query: &mut String, params: &mut SqlParams) {
        self.created.predicate_clause(prefix, query, params);
        self.updated.predicate_clause(prefix, query, params);
        self.deleted.predicate_clause(prefix, query, params);
    }
}

/// Sort columns over the creation pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedSortParams {
    pub created_at: Option<SortColumn>,
    pub created_by: Option<SortColumn>,
}

impl CreatedSortParams {
    pub const fn is_empty(&self) -> bool {
        self.created_at.is_none() && self.created_by.is_none()
    }

    pub fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = SortColumns::new();
        if let Some(column) = &self.created_at {
            columns.push(bind(column, prefix, "created_at"));
        }
        if let Some(column) = &self.created_by {
            columns.push(bind(column, prefix, "created_by"));
        }
        columns
    }
}

/// Sort columns over the update pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatedSortParams {
    pub updated_at: Option<SortColumn>,
    pub updated_by: Option<SortColumn>,
}

impl UpdatedSortParams {
    pub const fn is_empty(&self) -> bool {
        self.updated_at.is_none() && self.updated_by.is_none()
    }

    pub fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = SortColumns::new();
        if let Some(column) = &self.updated_at {
            columns.push(bind(column, prefix, "updated_at"));
        }
        if let Some(column) = &self.updated_by {
            columns.push(bind(column, prefix, "updated_by"));
        }
        columns
    }
}

/// Sort columns over the deletion pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedSortParams {
    pub deleted_at: Option<SortColumn>,
    pub deleted_by: Option<SortColumn>,
}

impl DeletedSortParams {
    pub const fn is_empty(&self) -> bool {
        self.deleted_at.is_none() && self.deleted_by.is_none()
    }

    pub fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = SortColumns::new();
        if let Some(column) = &self.deleted_at {
            columns.push(bind(column, prefix, "deleted_at"));
        }
        if let Some(column) = &self.deleted_by {
            columns.push(bind(column, prefix, "deleted_by"));
        }
        columns
    }
}

/// Sort composite over all three metadata pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditInfoCudSortParams {
    pub created: CreatedSortParams,
    pub updated: UpdatedSortParams,
    pub deleted: DeletedSortParams,
}

impl EditInfoCudSortParams {
    pub const fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    pub fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = self.created.sort_columns(prefix);
        columns.extend(self.updated.sort_columns(prefix));
        columns.extend(self.deleted.sort_columns(prefix));
        columns
    }
}

fn bind(column: &SortColumn, prefix: &str, name: &str) -> SortColumn {
    SortColumn {
        prefix: prefix.to_owned(),
        column: name.to_owned(),
        ..column.clone()
    }
}

/// Update stamp emitting the update pair on every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditInfoUUpdateParams {
    pub edit_info: crate::edit_info::UpdatedInfo,
}

impl EditInfoUUpdateParams {
    /// Stamp the update pair, defaulting the actor to the system identity.
    pub fn populate_update(&mut self, by: Option<&str>) {
        self.edit_info.stamp_update(by);
    }

    pub fn update_clause(&self, query: &mut String, params: &mut SqlParams) {
        let n = params.push(self.edit_info.updated_at);
        query.push_str(&format!("updated_at = ${n}, "));
        let n = params.push(self.edit_info.updated_by.clone());
        query.push_str(&format!("updated_by = ${n} "));
    }
}

/// Update stamp that additionally emits the deletion pair once a deletion
/// timestamp is set on the descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditInfoUdUpdateParams {
    pub edit_info: EditInfoUd,
}

impl EditInfoUdUpdateParams {
    /// Stamp the update pair, defaulting the actor to the system identity.
    pub fn populate_update(&mut self, by: Option<&str>) {
        self.edit_info.updated.stamp_update(by);
    }

    /// Stamp the deletion pair, turning the update into a soft delete.
    pub fn populate_delete(&mut self, by: Option<&str>) {
        self.edit_info.deleted.stamp_delete(by);
    }

    pub fn update_clause(&self, query: &mut String, params: &mut SqlParams) {
        let n = params.push(self.edit_info.updated.updated_at);
        query.push_str(&format!("updated_at = ${n}, "));
        let n = params.push(self.edit_info.updated.updated_by.clone());
        query.push_str(&format!("updated_by = ${n} "));
        if self.edit_info.deleted.deleted_at.is_some() {
            let n = params.push(self.edit_info.deleted.deleted_at);
            query.push_str(&format!(", deleted_at = ${n}, "));
            let n = params.push(self.edit_info.deleted.deleted_by.clone());
            query.push_str(&format!("deleted_by = ${n} "));
        }
    }
}
