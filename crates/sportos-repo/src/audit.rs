//! Append-only audit log of entity mutations.
//!
//! The writer derives the action from which snapshots are present, captures
//! the column-keyed diff, and persists the record through the same handle as
//! the mutation so a rollback discards both. A mutation that changed nothing
//! and a writer that is administratively disabled both skip persistence
//! without an error; callers never branch on whether auditing is on.

use serde_json::Value;
use tokio_postgres::Row;
use tracing::debug;

use crate::descriptor::{
    CreatedSearchParams, EditInfoCudSortParams, PagingParams, SearchDescriptor, SortColumn,
    SortColumns, append_count, append_search, ensure_order_by, ensure_where,
};
use crate::diff::{self, Auditable, ColumnMap};
use crate::edit_info::CreatedInfo;
use crate::entity::EntityKind;
use crate::error::RepoError;
use crate::params::SqlParams;
use crate::pool::DbPool;
use crate::queryable::{Queryable, StoreError};
use crate::repo::resolve;

/// The mutation kind an audit record captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudAction {
    Create,
    Update,
    Delete,
}

impl CrudAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            other => Err(StoreError::message(format!("unknown crud action: {other}"))),
        }
    }
}

/// One append-only audit entry: created once, never mutated, never deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub audit_id: String,
    pub entity: EntityKind,
    pub entity_id: String,
    pub crud_action: CrudAction,
    pub old: ColumnMap,
    pub new: ColumnMap,
    /// Correlation id linking back to the originating request journal.
    pub api_journal_id: Option<String>,
    pub edit_info: CreatedInfo,
}

/// Search descriptor for the back-office audit listing.
#[derive(Debug, Clone, Default)]
pub struct AuditSearchParams {
    pub entity: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub crud_action: Option<String>,
    pub created: CreatedSearchParams,
    pub sort: AuditSortParams,
    pub paging: PagingParams,
    /// Alias override; empty selects the default `aud`.
    pub prefix: String,
}

impl SearchDescriptor for AuditSearchParams {
    fn table_prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "aud"
        } else {
            &self.prefix
        }
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_owned();
    }

    fn validate(&self) -> Result<(), RepoError> {
        self.created.validate()?;
        self.paging.validate()
    }

    fn join_clauses(&self, _query: &mut String) {}

    fn predicate_clause(&self, query: &mut String, params: &mut SqlParams) {
        ensure_where(query);
        let prefix = self.table_prefix().to_owned();
        if let Some(entity) = self.entity {
            let n = params.push(entity.table_name());
            query.push_str(&format!(" and {prefix}.entity=${n}"));
        }
        if let Some(entity_id) = &self.entity_id
            && !entity_id.is_empty()
        {
            let n = params.push(entity_id.clone());
            query.push_str(&format!(" and {prefix}.entity_id=${n}"));
        }
        if let Some(action) = &self.crud_action
            && !action.is_empty()
        {
            let n = params.push(action.clone());
            query.push_str(&format!(" and {prefix}.crud_action=${n}"));
        }
        if !self.created.is_empty() {
            self.created.predicate_clause(&prefix, query, params);
        }
    }

    fn order_clause(&self, query: &mut String) {
        if !self.sort.is_empty() {
            ensure_order_by(query);
            query.push_str(&self.sort.order_by(self.table_prefix()));
        }
    }

    fn paging_clause(&self, query: &mut String, params: &mut SqlParams) {
        if !self.paging.is_empty() {
            self.paging.paging_clause(query, params);
        }
    }
}

/// Sort columns accepted by the audit listing.
#[derive(Debug, Clone, Default)]
pub struct AuditSortParams {
    pub entity_id: Option<SortColumn>,
    pub entity: Option<SortColumn>,
    pub edit_info: EditInfoCudSortParams,
}

impl AuditSortParams {
    pub const fn is_empty(&self) -> bool {
        self.entity_id.is_none() && self.entity.is_none() && self.edit_info.is_empty()
    }

    fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = SortColumns::new();
        if let Some(column) = &self.entity_id {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "entity_id".to_owned(),
                ..column.clone()
            });
        }
        if let Some(column) = &self.entity {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "entity".to_owned(),
                ..column.clone()
            });
        }
        if !self.edit_info.is_empty() {
            columns.extend(self.edit_info.sort_columns(prefix));
        }
        columns
    }

    fn order_by(&self, prefix: &str) -> String {
        self.sort_columns(prefix).order_by()
    }
}

const AUDIT_SELECT: &str = "\
select aud.audit_id, aud.entity, aud.entity_id, aud.crud_action, aud.old, aud.new, \
aud.api_journal_id, aud.created_at, aud.created_by
from audit aud
";
const AUDIT_COUNT: &str = "select count(*) from audit aud ";

/// Fully prepared, not yet persisted audit content.
#[derive(Debug)]
struct AuditDraft {
    action: CrudAction,
    entity: EntityKind,
    entity_id: String,
    old: ColumnMap,
    new: ColumnMap,
}

/// Writer and reader for the audit log.
pub struct AuditRepository {
    pool: DbPool,
    enabled: bool,
}

impl AuditRepository {
    /// The `enabled` flag is fixed at construction; a disabled writer skips
    /// persistence unconditionally and callers need not care.
    pub fn new(pool: DbPool, enabled: bool) -> Self {
        Self { pool, enabled }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Derive action, discriminator and diff maps from snapshot presence.
    ///
    /// Returns `None` when nothing changed. Both snapshots absent is a
    /// precondition violation.
    fn prepare<E: Auditable>(
        old: Option<&E>,
        new: Option<&E>,
    ) -> Result<Option<AuditDraft>, RepoError> {
        let (action, subject) = match (old, new) {
            (None, Some(created)) => (CrudAction::Create, created),
            (Some(_), Some(updated)) => (CrudAction::Update, updated),
            (Some(deleted), None) => (CrudAction::Delete, deleted),
            (None, None) => {
                return Err(RepoError::precondition(
                    "audit snapshot requires at least one of old or new",
                ));
            }
        };
        let (old_columns, new_columns) = match action {
            CrudAction::Create => (ColumnMap::new(), diff::snapshot(subject)),
            CrudAction::Delete => (diff::snapshot(subject), ColumnMap::new()),
            CrudAction::Update => match (old, new) {
                (Some(before), Some(after)) => diff::diff(before, after),
                _ => unreachable!("update action implies both snapshots"),
            },
        };
        if old_columns.is_empty() && new_columns.is_empty() {
            return Ok(None);
        }
        Ok(Some(AuditDraft {
            action,
            entity: subject.kind(),
            entity_id: subject.id().to_owned(),
            old: old_columns,
            new: new_columns,
        }))
    }

    /// Record the audit entry for one mutation.
    ///
    /// `Ok(None)` means nothing was persisted: auditing is disabled, or the
    /// old and new snapshots carry no difference. Persistence runs through
    /// `qa` so it shares the mutation's transaction.
    pub async fn record_mutation<E: Auditable>(
        &self,
        old: Option<&E>,
        new: Option<&E>,
        qa: Option<&dyn Queryable>,
        api_journal_id: Option<&str>,
        by: Option<&str>,
    ) -> Result<Option<AuditRecord>, RepoError> {
        if !self.enabled {
            return Ok(None);
        }
        let Some(draft) = Self::prepare(old, new)? else {
            return Ok(None);
        };
        let record = AuditRecord {
            audit_id: String::new(),
            entity: draft.entity,
            entity_id: draft.entity_id,
            crud_action: draft.action,
            old: draft.old,
            new: draft.new,
            api_journal_id: api_journal_id.map(str::to_owned),
            edit_info: CreatedInfo::stamp(by),
        };
        self.create(record, qa).await.map(Some)
    }

    /// Insert an audit row and return the persisted record.
    pub async fn create(
        &self,
        record: AuditRecord,
        qa: Option<&dyn Queryable>,
    ) -> Result<AuditRecord, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let query = "insert into audit (entity, entity_id, crud_action, old, new, \
                     api_journal_id, created_by, created_at) \
                     values ($1, $2, $3, $4, $5, $6, $7, $8) returning audit_id";
        let mut params = SqlParams::new();
        params.push(record.entity.table_name());
        params.push(record.entity_id.clone());
        params.push(record.crud_action.as_str());
        params.push(map_to_value(&record.old));
        params.push(map_to_value(&record.new));
        params.push(record.api_journal_id.clone());
        params.push(record.edit_info.created_by.clone());
        params.push(record.edit_info.created_at);

        debug!(query, params = ?params, "audit insert");

        let row = db
            .query_opt(query, &params.as_sql())
            .await?
            .ok_or_else(|| StoreError::message("audit insert returned no row"))?;
        let audit_id: String = row.try_get("audit_id").map_err(StoreError::from)?;

        self.get_by_id(&audit_id, qa).await
    }

    /// Fetch an audit record by id, locking the row when running inside an
    /// external transaction.
    pub async fn get_by_id(
        &self,
        id: &str,
        qa: Option<&dyn Queryable>,
    ) -> Result<AuditRecord, RepoError> {
        let locking = qa.is_some();
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let query = if locking {
            format!("{AUDIT_SELECT}where aud.audit_id=$1 for update")
        } else {
            format!("{AUDIT_SELECT}where aud.audit_id=$1")
        };
        let row = db
            .query_opt(&query, &[&id])
            .await?
            .ok_or_else(|| RepoError::not_found(EntityKind::Audit, id))?;

        row_to_record(&row)
    }

    /// Run the back-office audit listing.
    pub async fn search(
        &self,
        search: &AuditSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<Vec<AuditRecord>, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = AUDIT_SELECT.to_owned();
        let mut params = SqlParams::new();
        append_search(search, &mut query, &mut params)?;

        debug!(query, params = ?params, "audit search");

        let rows = db.query(&query, &params.as_sql()).await?;
        rows.iter().map(row_to_record).collect()
    }

    /// Total match count for the listing's pagination metadata.
    pub async fn count(
        &self,
        search: &AuditSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<i64, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = AUDIT_COUNT.to_owned();
        let mut params = SqlParams::new();
        append_count(search, &mut query, &mut params)?;

        let row = db
            .query_opt(&query, &params.as_sql())
            .await?
            .ok_or_else(|| StoreError::message("count returned no row"))?;
        row.try_get(0).map_err(|err| StoreError::from(err).into())
    }
}

fn map_to_value(columns: &ColumnMap) -> Option<Value> {
    if columns.is_empty() {
        None
    } else {
        Some(Value::Object(columns.clone()))
    }
}

fn value_to_map(value: Option<Value>) -> ColumnMap {
    match value {
        Some(Value::Object(columns)) => columns,
        _ => ColumnMap::new(),
    }
}

fn row_to_record(row: &Row) -> Result<AuditRecord, RepoError> {
    let entity_name: String = row.try_get("entity").map_err(StoreError::from)?;
    let entity = EntityKind::from_table_name(&entity_name)
        .ok_or_else(|| StoreError::message(format!("unknown audit entity: {entity_name}")))?;
    let action: String = row.try_get("crud_action").map_err(StoreError::from)?;
    let old: Option<Value> = row.try_get("old").map_err(StoreError::from)?;
    let new: Option<Value> = row.try_get("new").map_err(StoreError::from)?;

    Ok(AuditRecord {
        audit_id: row.try_get("audit_id").map_err(StoreError::from)?,
        entity,
        entity_id: row.try_get("entity_id").map_err(StoreError::from)?,
        crud_action: CrudAction::parse(&action)?,
        old: value_to_map(old),
        new: value_to_map(new),
        api_journal_id: row.try_get("api_journal_id").map_err(StoreError::from)?,
        edit_info: CreatedInfo {
            created_at: row.try_get("created_at").map_err(StoreError::from)?,
            created_by: row.try_get("created_by").map_err(StoreError::from)?,
        },
    })
}
