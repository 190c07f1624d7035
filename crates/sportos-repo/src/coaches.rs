//! The `coach` entity: profile, bookable time slots and collected reviews.
//!
//! Bookings and reviews live in JSONB columns as value objects; the coach
//! row itself carries the profile fields plus the full lifecycle metadata.
//! Mutations here are audited, and the audit record rides the caller's
//! handle so it commits or rolls back with the mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::Json;
use tracing::debug;

use crate::audit::AuditRepository;
use crate::descriptor::{
    EditInfoCudSearchParams, EditInfoCudSortParams, EditInfoUdUpdateParams, PagingParams,
    SearchDescriptor, SortColumn, SortColumns, UpdateDescriptor, append_count, append_search,
    append_update, ensure_order_by, ensure_where,
};
use crate::diff::{self, AuditField, Auditable};
use crate::edit_info::{CreatedInfo, DeletedInfo, EditInfoCud, UpdatedInfo};
use crate::entity::{Entity, EntityKind};
use crate::error::RepoError;
use crate::params::SqlParams;
use crate::pool::DbPool;
use crate::queryable::{Queryable, StoreError};
use crate::repo::resolve;
use crate::users::UserSearchParams;

/// One player's review of a coach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub grade: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default, rename = "userId")]
    pub user_id: String,
}

/// Collected reviews with their running average, stored as one JSONB value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reviews {
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub average: f64,
}

/// One requested or accepted practice slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "startTime")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTime")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub accepted: bool,
    #[serde(default, rename = "id")]
    pub practice_id: String,
}

/// The coach's appointment book, stored as one JSONB value.
pub type Booking = Vec<Appointment>;

/// One coach row. The username doubles as the primary key and the foreign
/// key into `"user"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coach {
    pub username: String,
    pub name: String,
    pub city: String,
    pub sport: String,
    pub booking: Option<Booking>,
    pub reviews: Option<Reviews>,
    pub edit_info: EditInfoCud,
}

impl Entity for Coach {
    fn id(&self) -> &str {
        &self.username
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Coach
    }
}

impl Auditable for Coach {
    fn audit_fields() -> Vec<AuditField<Self>> {
        let mut fields = vec![
            AuditField::new("user_id", |coach: &Self| coach.username.clone()),
            AuditField::new("name", |coach: &Self| coach.name.clone()),
            AuditField::new("city", |coach: &Self| coach.city.clone()),
            AuditField::new("sport", |coach: &Self| coach.sport.clone()),
            AuditField::new("booking", |coach: &Self| coach.booking.clone()),
            AuditField::new("reviews", |coach: &Self| coach.reviews.clone()),
        ];
        fields.extend(diff::edit_info_cud_fields(|coach: &Self| &coach.edit_info));
        fields
    }
}

/// Search descriptor for the coach listing.
///
/// Setting `user` joins the account table; the nested descriptor keeps its
/// own alias and can be rebound independently of this one.
#[derive(Debug, Clone, Default)]
pub struct CoachSearchParams {
    pub username: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub sport: Option<String>,
    pub edit_info: EditInfoCudSearchParams,
    pub sort: CoachSortParams,
    pub user: Option<Box<UserSearchParams>>,
    pub paging: PagingParams,
    /// Alias override; empty selects the default `co`.
    pub prefix: String,
}

impl SearchDescriptor for CoachSearchParams {
    fn table_prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "co"
        } else {
            &self.prefix
        }
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_owned();
    }

    fn validate(&self) -> Result<(), RepoError> {
        self.edit_info.validate()?;
        self.paging.validate()?;
        if let Some(user) = &self.user {
            user.validate()?;
        }
        Ok(())
    }

    fn join_clauses(&self, query: &mut String) {
        if let Some(user) = &self.user {
            query.push_str(&format!(
                "inner join \"user\" {child} on {child}.user_id = {parent}.user_id ",
                child = user.table_prefix(),
                parent = self.table_prefix(),
            ));
            user.join_clauses(query);
        }
    }

    fn predicate_clause(&self, query: &mut String, params: &mut SqlParams) {
        ensure_where(query);
        let prefix = self.table_prefix().to_owned();
        if let Some(username) = &self.username
            && !username.is_empty()
        {
            let n = params.push(username.clone());
            query.push_str(&format!(" and {prefix}.user_id=${n}"));
        }
        if let Some(name) = &self.name
            && !name.is_empty()
        {
            let n = params.push(name.clone());
            query.push_str(&format!(" and {prefix}.name=${n}"));
        }
        if let Some(city) = &self.city
            && !city.is_empty()
        {
            let n = params.push(city.clone());
            query.push_str(&format!(" and {prefix}.city=${n}"));
        }
        if let Some(sport) = &self.sport
            && !sport.is_empty()
        {
            let n = params.push(sport.clone());
            query.push_str(&format!(" and {prefix}.sport=${n}"));
        }
        if !self.edit_info.is_empty() {
            self.edit_info.predicate_clause(&prefix, query, params);
        }
        if let Some(user) = &self.user {
            user.predicate_clause(query, params);
        }
    }

    fn order_clause(&self, query: &mut String) {
        if !self.sort.is_empty() {
            ensure_order_by(query);
            query.push_str(&self.sort.order_by(self.table_prefix()));
        }
        if let Some(user) = &self.user {
            user.order_clause(query);
        }
    }

    fn paging_clause(&self, query: &mut String, params: &mut SqlParams) {
        if !self.paging.is_empty() {
            self.paging.paging_clause(query, params);
        }
    }
}

/// Sort columns accepted by the coach listing.
#[derive(Debug, Clone, Default)]
pub struct CoachSortParams {
    pub username: Option<SortColumn>,
    pub name: Option<SortColumn>,
    pub city: Option<SortColumn>,
    pub edit_info: EditInfoCudSortParams,
}

impl CoachSortParams {
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.name.is_none()
            && self.city.is_none()
            && self.edit_info.is_empty()
    }

    fn sort_columns(&self, prefix: &str) -> SortColumns {
        let mut columns = SortColumns::new();
        if let Some(column) = &self.username {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "user_id".to_owned(),
                ..column.clone()
            });
        }
        if let Some(column) = &self.name {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "name".to_owned(),
                ..column.clone()
            });
        }
        if let Some(column) = &self.city {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "city".to_owned(),
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

/// Sparse update descriptor: absent fields never reach the statement.
#[derive(Debug, Clone, Default)]
pub struct CoachUpdateParams {
    pub id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub booking: Option<Booking>,
    pub reviews: Option<Reviews>,
    pub stamp: EditInfoUdUpdateParams,
}

impl UpdateDescriptor for CoachUpdateParams {
    fn update_clause(&self, query: &mut String, params: &mut SqlParams) {
        query.push_str("update coach co set ");
        if let Some(name) = &self.name {
            let n = params.push(name.clone());
            query.push_str(&format!("name = ${n}, "));
        }
        if let Some(city) = &self.city {
            let n = params.push(city.clone());
            query.push_str(&format!("city = ${n}, "));
        }
        if let Some(booking) = &self.booking {
            let n = params.push(Json(booking.clone()));
            query.push_str(&format!("booking = ${n}, "));
        }
        if let Some(reviews) = &self.reviews {
            let n = params.push(Json(reviews.clone()));
            query.push_str(&format!("reviews = ${n}, "));
        }
        self.stamp.update_clause(query, params);
        let n = params.push(self.id.clone());
        query.push_str(&format!("where co.user_id = ${n}"));
    }
}

const COACH_SELECT: &str = "\
select co.user_id, co.name, co.city, co.sport, co.reviews, co.booking, \
co.created_at, co.created_by, co.updated_at, co.updated_by, co.deleted_at, co.deleted_by
from coach co
";
const COACH_COUNT: &str = "select count(*) from coach co ";

/// CRUD access to the `coach` table with audited mutations.
pub struct CoachRepository {
    pool: DbPool,
    audit: Arc<AuditRepository>,
}

impl CoachRepository {
    pub fn new(pool: DbPool, audit: Arc<AuditRepository>) -> Self {
        Self { pool, audit }
    }

    async fn exists(&self, id: &str, qa: Option<&dyn Queryable>) -> Result<bool, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let row = db
            .query_opt("select count(*) from coach where user_id=$1", &[&id])
            .await?
            .ok_or_else(|| StoreError::message("count returned no row"))?;
        let count: i64 = row.try_get(0).map_err(StoreError::from)?;
        Ok(count > 0)
    }

    /// Insert a coach and audit the creation through the same handle.
    ///
    /// The creation pair is stamped here unless the caller already did;
    /// inserting a taken username is a precondition violation.
    pub async fn create(
        &self,
        mut coach: Coach,
        qa: Option<&dyn Queryable>,
        by: Option<&str>,
    ) -> Result<Coach, RepoError> {
        if coach.edit_info.created.created_by.is_empty() {
            coach.edit_info.created = CreatedInfo::stamp(by);
        }
        if self.exists(&coach.username, qa).await? {
            return Err(RepoError::precondition(format!(
                "coach with username {} already exists",
                coach.username
            )));
        }

        let query = "insert into coach (user_id, name, city, sport, created_at, created_by) \
                     values ($1, $2, $3, $4, $5, $6) returning user_id";
        let mut params = SqlParams::new();
        params.push(coach.username.clone());
        params.push(coach.name.clone());
        params.push(coach.city.clone());
        params.push(coach.sport.clone());
        params.push(coach.edit_info.created.created_at);
        params.push(coach.edit_info.created.created_by.clone());

        debug!(query, params = ?params, "coach insert");

        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();
        db.query_opt(query, &params.as_sql())
            .await?
            .ok_or_else(|| StoreError::message("coach insert returned no row"))?;
        drop(handle);

        let persisted = self.get_by_id(&coach.username, qa).await?;
        self.audit
            .record_mutation(None, Some(&persisted), qa, None, by)
            .await?;
        Ok(persisted)
    }

    /// Fetch a coach by username, locking the row when running inside an
    /// external transaction.
    pub async fn get_by_id(
        &self,
        id: &str,
        qa: Option<&dyn Queryable>,
    ) -> Result<Coach, RepoError> {
        let locking = qa.is_some();
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let query = if locking {
            format!("{COACH_SELECT}where co.user_id=$1 for update")
        } else {
            format!("{COACH_SELECT}where co.user_id=$1")
        };
        let row = db
            .query_opt(&query, &[&id])
            .await?
            .ok_or_else(|| RepoError::not_found(EntityKind::Coach, id))?;

        row_to_coach(&row)
    }

    pub async fn search(
        &self,
        search: &CoachSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<Vec<Coach>, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = COACH_SELECT.to_owned();
        let mut params = SqlParams::new();
        append_search(search, &mut query, &mut params)?;

        debug!(query, params = ?params, "coach search");

        let rows = db.query(&query, &params.as_sql()).await?;
        rows.iter().map(row_to_coach).collect()
    }

    pub async fn count(
        &self,
        search: &CoachSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<i64, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = COACH_COUNT.to_owned();
        let mut params = SqlParams::new();
        append_count(search, &mut query, &mut params)?;

        let row = db
            .query_opt(&query, &params.as_sql())
            .await?
            .ok_or_else(|| StoreError::message("count returned no row"))?;
        row.try_get(0).map_err(|err| StoreError::from(err).into())
    }

    /// Apply a sparse update and audit the before/after diff.
    ///
    /// Zero affected rows means the primary key matched nothing and maps to
    /// the not-found error. Read-old, update, read-new and the audit write
    /// all run through the caller's handle.
    pub async fn update(
        &self,
        mut update: CoachUpdateParams,
        qa: Option<&dyn Queryable>,
        by: Option<&str>,
    ) -> Result<Coach, RepoError> {
        update.stamp.populate_update(by);

        let old = self.get_by_id(&update.id, qa).await?;

        let mut query = String::new();
        let mut params = SqlParams::new();
        append_update(&update, &mut query, &mut params);

        debug!(query, params = ?params, "coach update");

        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();
        let affected = db.execute(&query, &params.as_sql()).await?;
        drop(handle);
        if affected == 0 {
            return Err(RepoError::not_found(EntityKind::Coach, update.id));
        }

        let new = self.get_by_id(&update.id, qa).await?;
        self.audit
            .record_mutation(Some(&old), Some(&new), qa, None, by)
            .await?;
        Ok(new)
    }

    /// Soft-delete a coach by stamping the deletion pair.
    pub async fn delete(
        &self,
        id: &str,
        qa: Option<&dyn Queryable>,
        by: Option<&str>,
    ) -> Result<Coach, RepoError> {
        let mut update = CoachUpdateParams {
            id: id.to_owned(),
            ..CoachUpdateParams::default()
        };
        update.stamp.populate_delete(by);
        self.update(update, qa, by).await
    }
}

fn row_to_coach(row: &Row) -> Result<Coach, RepoError> {
    let reviews: Option<Json<Reviews>> = row.try_get("reviews").map_err(StoreError::from)?;
    let booking: Option<Json<Booking>> = row.try_get("booking").map_err(StoreError::from)?;
    Ok(Coach {
        username: row.try_get("user_id").map_err(StoreError::from)?,
        name: row.try_get("name").map_err(StoreError::from)?,
        city: row.try_get("city").map_err(StoreError::from)?,
        sport: row.try_get("sport").map_err(StoreError::from)?,
        booking: booking.map(|json| json.0),
        reviews: reviews.map(|json| json.0),
        edit_info: EditInfoCud {
            created: CreatedInfo {
                created_at: row.try_get("created_at").map_err(StoreError::from)?,
                created_by: row.try_get("created_by").map_err(StoreError::from)?,
            },
            updated: UpdatedInfo {
                updated_at: row.try_get("updated_at").map_err(StoreError::from)?,
                updated_by: row.try_get("updated_by").map_err(StoreError::from)?,
            },
            deleted: DeletedInfo {
                deleted_at: row.try_get("deleted_at").map_err(StoreError::from)?,
                deleted_by: row.try_get("deleted_by").map_err(StoreError::from)?,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn coach() -> Coach {
        Coach {
            username: "coach.mia".to_owned(),
            name: "Mia".to_owned(),
            city: "Oslo".to_owned(),
            sport: "tennis".to_owned(),
            booking: None,
            reviews: None,
            edit_info: EditInfoCud::stamp(Some("admin")),
        }
    }

    #[rstest]
    fn filters_emit_contiguous_placeholders() {
        let search = CoachSearchParams {
            city: Some("Oslo".to_owned()),
            sport: Some("tennis".to_owned()),
            paging: PagingParams {
                limit: Some(10),
                offset: Some(20),
            },
            ..CoachSearchParams::default()
        };
        let mut query = COACH_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("where 1 = 1 "));
        assert!(query.contains(" and co.city=$1"));
        assert!(query.contains(" and co.sport=$2"));
        assert!(query.contains(" limit $3 "));
        assert!(query.contains(" offset $4 "));
        assert_eq!(params.len(), 4);
    }

    #[rstest]
    fn empty_descriptor_passes_the_query_through() {
        let search = CoachSearchParams::default();
        let mut query = COACH_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("where 1 = 1 "));
        assert!(!query.contains("order by"));
        assert!(!query.contains("inner join"));
        assert!(!query.contains("limit"));
        assert!(params.is_empty());
    }

    #[rstest]
    fn nested_user_descriptor_joins_and_filters() {
        let search = CoachSearchParams {
            city: Some("Oslo".to_owned()),
            user: Some(Box::new(UserSearchParams {
                email: Some("mia@example.com".to_owned()),
                ..UserSearchParams::default()
            })),
            ..CoachSearchParams::default()
        };
        let mut query = COACH_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("inner join \"user\" usr on usr.user_id = co.user_id "));
        assert!(query.contains(" and co.city=$1"));
        assert!(query.contains(" and usr.email=$2"));
        assert_eq!(params.len(), 2);
    }

    #[rstest]
    fn rebound_child_prefix_flows_into_join_and_predicates() {
        let mut user = UserSearchParams {
            email: Some("mia@example.com".to_owned()),
            ..UserSearchParams::default()
        };
        user.set_table_prefix("u2");
        let search = CoachSearchParams {
            user: Some(Box::new(user)),
            ..CoachSearchParams::default()
        };
        let mut query = COACH_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("inner join \"user\" u2 on u2.user_id = co.user_id "));
        assert!(query.contains(" and u2.email=$1"));
    }

    // Explicit orders {2,0,1} must emit in order 0,1,2.
    #[rstest]
    fn sort_follows_explicit_order_not_declaration_order() {
        let search = CoachSearchParams {
            sort: CoachSortParams {
                name: Some(SortColumn::ascending(2)),
                city: Some(SortColumn::descending(0)),
                username: Some(SortColumn::ascending(1)),
                ..CoachSortParams::default()
            },
            ..CoachSearchParams::default()
        };
        let mut query = String::new();

        search.order_clause(&mut query);

        assert_eq!(query, " order by co.city desc,co.user_id,co.name,");
    }

    #[rstest]
    fn update_emits_only_present_fields_plus_stamp() {
        let mut update = CoachUpdateParams {
            id: "coach.mia".to_owned(),
            name: Some("Mia H.".to_owned()),
            ..CoachUpdateParams::default()
        };
        update.stamp.populate_update(Some("admin"));
        let mut query = String::new();
        let mut params = SqlParams::new();

        append_update(&update, &mut query, &mut params);

        assert_eq!(
            query,
            "update coach co set name = $1, updated_at = $2, updated_by = $3 \
             where co.user_id = $4"
        );
        assert_eq!(params.len(), 4);
        assert!(!query.contains("city"));
        assert!(!query.contains("deleted_at"));
    }

    #[rstest]
    fn delete_stamp_adds_the_deletion_pair() {
        let mut update = CoachUpdateParams {
            id: "coach.mia".to_owned(),
            ..CoachUpdateParams::default()
        };
        update.stamp.populate_update(None);
        update.stamp.populate_delete(None);
        let mut query = String::new();
        let mut params = SqlParams::new();

        append_update(&update, &mut query, &mut params);

        assert_eq!(
            query,
            "update coach co set updated_at = $1, updated_by = $2 , deleted_at = $3, \
             deleted_by = $4 where co.user_id = $5"
        );
        assert_eq!(params.len(), 5);
    }

    #[rstest]
    fn audit_diff_captures_only_the_changed_column(coach: Coach) {
        let mut moved = coach.clone();
        moved.city = "Bergen".to_owned();

        let (old_columns, new_columns) = diff::diff(&coach, &moved);

        assert_eq!(old_columns.len(), 1);
        assert_eq!(old_columns.get("city"), Some(&json!("Oslo")));
        assert_eq!(new_columns.get("city"), Some(&json!("Bergen")));
    }

    mod repository {
        use super::*;
        use async_trait::async_trait;
        use std::sync::Mutex;
        use tokio_postgres::types::ToSql;

        /// Test double that records every statement and fails them all.
        #[derive(Default)]
        struct FailingHandle {
            statements: Mutex<Vec<String>>,
        }

        impl FailingHandle {
            fn seen(&self) -> Vec<String> {
                self.statements.lock().expect("mutex poisoned").clone()
            }

            fn record(&self, statement: &str) -> StoreError {
                self.statements
                    .lock()
                    .expect("mutex poisoned")
                    .push(statement.to_owned());
                StoreError::message("injected failure")
            }
        }

        #[async_trait]
        impl Queryable for FailingHandle {
            async fn execute(
                &self,
                statement: &str,
                _params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, StoreError> {
                Err(self.record(statement))
            }

            async fn query(
                &self,
                statement: &str,
                _params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, StoreError> {
                Err(self.record(statement))
            }

            async fn query_opt(
                &self,
                statement: &str,
                _params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, StoreError> {
                Err(self.record(statement))
            }
        }

        async fn repository() -> CoachRepository {
            // Never connected; every call below passes an explicit handle.
            let pool = DbPool::new(
                crate::pool::PoolConfig::new("postgres://localhost/unreachable")
                    .with_min_idle(None),
            )
            .await
            .expect("pool construction is lazy");
            let audit = Arc::new(AuditRepository::new(pool.clone(), true));
            CoachRepository::new(pool, audit)
        }

        #[rstest]
        #[tokio::test]
        async fn failed_update_step_never_reaches_the_audit_log() {
            let repo = repository().await;
            let handle = FailingHandle::default();
            let update = CoachUpdateParams {
                id: "coach.mia".to_owned(),
                city: Some("Bergen".to_owned()),
                ..CoachUpdateParams::default()
            };

            let err = repo
                .update(update, Some(&handle), Some("admin"))
                .await
                .expect_err("store failure propagates");

            assert!(matches!(err, RepoError::Store(_)));
            let seen = handle.seen();
            assert_eq!(seen.len(), 1);
            assert!(!seen.iter().any(|s| s.contains("insert into audit")));
        }

        #[rstest]
        #[tokio::test]
        async fn failed_existence_check_aborts_create_before_any_write() {
            let repo = repository().await;
            let handle = FailingHandle::default();

            let err = repo
                .create(coach(), Some(&handle), Some("admin"))
                .await
                .expect_err("store failure propagates");

            assert!(matches!(err, RepoError::Store(_)));
            let seen = handle.seen();
            assert_eq!(seen.len(), 1);
            assert!(!seen.iter().any(|s| s.contains("insert into")));
        }
    }

    #[rstest]
    fn booking_serializes_in_storage_shape() {
        let booking: Booking = vec![Appointment {
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: DateTime::<Utc>::UNIX_EPOCH,
            accepted: true,
            practice_id: "p1".to_owned(),
        }];
        let value = serde_json::to_value(&booking).expect("serializes");

        assert_eq!(value[0]["accepted"], json!(true));
        assert_eq!(value[0]["id"], json!("p1"));
        assert!(value[0]["startTime"].is_string());
    }
}
