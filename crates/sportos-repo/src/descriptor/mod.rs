//! Descriptor model and the query assembly engine.
//!
//! A descriptor is a value object describing filter/sort/paging intent for
//! one query, independent of SQL text. The assembly functions here lower a
//! descriptor deterministically into SQL plus an ordered parameter list;
//! entity modules compose their descriptors from the shared edit-info,
//! sort and paging blocks in this module tree.

mod edit_info;
mod paging;
mod sort;

pub use edit_info::{
    CreatedSearchParams, CreatedSortParams, DeletedSearchParams, DeletedSortParams,
    EditInfoCuSearchParams, EditInfoCudSearchParams, EditInfoCudSortParams, EditInfoUUpdateParams,
    EditInfoUdUpdateParams, UpdatedSearchParams, UpdatedSortParams,
};
pub use paging::PagingParams;
pub use sort::{GroupColumn, GroupColumns, SortColumn, SortColumns, SortDirection, parse_sort};

use crate::error::RepoError;
use crate::params::SqlParams;

/// Contract for constructing select queries from a search descriptor.
///
/// A parent descriptor that embeds a joined entity's descriptor must forward
/// [`SearchDescriptor::set_table_prefix`] so the same entity type can be
/// joined from two different parents without alias collisions.
pub trait SearchDescriptor {
    /// Alias every emitted column reference is qualified with.
    fn table_prefix(&self) -> &str;

    /// Rebind the descriptor (and any nested descriptors) to a new alias.
    fn set_table_prefix(&mut self, prefix: &str);

    /// Check descriptor-internal consistency before any SQL is built.
    fn validate(&self) -> Result<(), RepoError>;

    /// Emit join clauses, recursively for nested descriptors.
    fn join_clauses(&self, query: &mut String);

    /// Emit the predicate clause; every fragment is alias-qualified.
    fn predicate_clause(&self, query: &mut String, params: &mut SqlParams);

    /// Emit the `order by` clause, trailing comma left for the assembler.
    fn order_clause(&self, query: &mut String);

    /// Emit the `group by` clause. Present for forward compatibility; no
    /// current entity groups.
    fn group_clause(&self, query: &mut String) {
        let _ = query;
    }

    /// Emit `limit`/`offset` for present, non-negative values.
    fn paging_clause(&self, query: &mut String, params: &mut SqlParams);
}

/// Contract for constructing sparse update statements.
pub trait UpdateDescriptor {
    /// Emit the full `update .. set .. where ..` statement. Only present
    /// optional fields may contribute a `set` fragment.
    fn update_clause(&self, query: &mut String, params: &mut SqlParams);
}

/// Ensure the query has a predicate base so fragments can prepend `and`.
pub(crate) fn ensure_where(query: &mut String) {
    if !query.contains("where") {
        query.push_str("where 1 = 1 ");
    }
}

/// Ensure the query has an `order by` keyword before sort columns.
pub(crate) fn ensure_order_by(query: &mut String) {
    if !query.contains("order by") {
        query.push_str(" order by ");
    }
}

fn strip_trailing_comma(query: &mut String) {
    if query.ends_with(',') {
        query.pop();
    }
}

/// Lower a search descriptor into the tail of a select statement.
///
/// Clause order is fixed: joins, predicates, sort, group-by, paging. Joins
/// precede filters because predicate fragments may reference joined aliases.
/// A `validate` failure aborts before any SQL is built.
pub fn append_search(
    descriptor: &impl SearchDescriptor,
    query: &mut String,
    params: &mut SqlParams,
) -> Result<(), RepoError> {
    descriptor.validate()?;
    descriptor.join_clauses(query);
    query.push('\n');
    descriptor.predicate_clause(query, params);
    query.push('\n');
    descriptor.order_clause(query);
    strip_trailing_comma(query);
    query.push('\n');
    descriptor.group_clause(query);
    strip_trailing_comma(query);
    query.push('\n');
    descriptor.paging_clause(query, params);
    Ok(())
}

/// Count-only variant: joins and predicates against a `count(*)` projection,
/// for pagination metadata distinct from the page returned.
pub fn append_count(
    descriptor: &impl SearchDescriptor,
    query: &mut String,
    params: &mut SqlParams,
) -> Result<(), RepoError> {
    descriptor.validate()?;
    descriptor.join_clauses(query);
    query.push('\n');
    descriptor.predicate_clause(query, params);
    Ok(())
}

/// Lower an update descriptor into a complete statement.
pub fn append_update(
    descriptor: &impl UpdateDescriptor,
    query: &mut String,
    params: &mut SqlParams,
) {
    descriptor.update_clause(query, params);
}
