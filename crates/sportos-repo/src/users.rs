//! The `user` entity: account identity shared by every profile kind.
//!
//! Users are read-mostly from this crate's perspective; the module mainly
//! serves as the join partner other entities nest into their descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tracing::debug;

use crate::descriptor::{
    EditInfoCudSearchParams, EditInfoCudSortParams, PagingParams, SearchDescriptor, SortColumn,
    SortColumns, append_count, append_search, ensure_order_by, ensure_where,
};
use crate::edit_info::{CreatedInfo, DeletedInfo, EditInfoCud, UpdatedInfo};
use crate::entity::{Entity, EntityKind};
use crate::error::RepoError;
use crate::params::SqlParams;
use crate::pool::DbPool;
use crate::queryable::{Queryable, StoreError};
use crate::repo::resolve;

/// Role discriminator of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Player,
    Coach,
    Place,
    Admin,
}

impl UserType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Coach => "coach",
            Self::Place => "place",
            Self::Admin => "admin",
        }
    }

    fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "player" => Ok(Self::Player),
            "coach" => Ok(Self::Coach),
            "place" => Ok(Self::Place),
            "admin" => Ok(Self::Admin),
            other => Err(StoreError::message(format!("unknown user type: {other}"))),
        }
    }
}

/// One account row. The username is the primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub username: String,
    pub email: String,
    pub email_verified: i32,
    pub user_type: UserType,
    pub password_hash: String,
    pub token: Option<String>,
    pub token_valid_until: Option<DateTime<Utc>>,
    pub token_refresh_until: Option<DateTime<Utc>>,
    pub edit_info: EditInfoCud,
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.username
    }

    fn kind(&self) -> EntityKind {
        EntityKind::User
    }
}

/// Search descriptor for the user listing; also embedded by joining parents.
#[derive(Debug, Clone, Default)]
pub struct UserSearchParams {
    pub username: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
    pub token: Option<String>,
    pub edit_info: EditInfoCudSearchParams,
    pub sort: UserSortParams,
    pub paging: PagingParams,
    /// Alias override; empty selects the default `usr`.
    pub prefix: String,
}

impl SearchDescriptor for UserSearchParams {
    fn table_prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "usr"
        } else {
            &self.prefix
        }
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.prefix = prefix.to_owned();
    }

    fn validate(&self) -> Result<(), RepoError> {
        self.edit_info.validate()?;
        self.paging.validate()
    }

    fn join_clauses(&self, _query: &mut String) {}

    fn predicate_clause(&self, query: &mut String, params: &mut SqlParams) {
        ensure_where(query);
        let prefix = self.table_prefix().to_owned();
        if let Some(username) = &self.username
            && !username.is_empty()
        {
            let n = params.push(username.clone());
            query.push_str(&format!(" and {prefix}.user_id=${n}"));
        }
        if let Some(email) = &self.email
            && !email.is_empty()
        {
            let n = params.push(email.clone());
            query.push_str(&format!(" and {prefix}.email=${n}"));
        }
        if let Some(user_type) = self.user_type {
            let n = params.push(user_type.as_str());
            query.push_str(&format!(" and {prefix}.user_type=${n}"));
        }
        if let Some(token) = &self.token
            && !token.is_empty()
        {
            let n = params.push(token.clone());
            query.push_str(&format!(" and {prefix}.token=${n}"));
        }
        if !self.edit_info.is_empty() {
            self.edit_info.predicate_clause(&prefix, query, params);
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

/// Sort columns accepted by the user listing.
#[derive(Debug, Clone, Default)]
pub struct UserSortParams {
    pub username: Option<SortColumn>,
    pub user_type: Option<SortColumn>,
    pub edit_info: EditInfoCudSortParams,
}

impl UserSortParams {
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.user_type.is_none() && self.edit_info.is_empty()
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
        if let Some(column) = &self.user_type {
            columns.push(SortColumn {
                prefix: prefix.to_owned(),
                column: "user_type".to_owned(),
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

const USER_SELECT: &str = "\
select usr.user_id, usr.email, usr.email_verified, usr.user_type, usr.password_hash, \
usr.token, usr.token_valid_until, usr.token_refresh_until, usr.created_at, usr.created_by, \
usr.updated_at, usr.updated_by, usr.deleted_at, usr.deleted_by
from \"user\" usr
";
const USER_COUNT: &str = "select count(*) from \"user\" usr ";

/// Read access to the `user` table.
pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a user by username, locking the row when running inside an
    /// external transaction.
    pub async fn get_by_id(&self, id: &str, qa: Option<&dyn Queryable>) -> Result<User, RepoError> {
        let locking = qa.is_some();
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let query = if locking {
            format!("{USER_SELECT}where usr.user_id=$1 for update")
        } else {
            format!("{USER_SELECT}where usr.user_id=$1")
        };
        let row = db
            .query_opt(&query, &[&id])
            .await?
            .ok_or_else(|| RepoError::not_found(EntityKind::User, id))?;

        row_to_user(&row)
    }

    pub async fn search(
        &self,
        search: &UserSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<Vec<User>, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = USER_SELECT.to_owned();
        let mut params = SqlParams::new();
        append_search(search, &mut query, &mut params)?;

        debug!(query, params = ?params, "user search");

        let rows = db.query(&query, &params.as_sql()).await?;
        rows.iter().map(row_to_user).collect()
    }

    pub async fn count(
        &self,
        search: &UserSearchParams,
        qa: Option<&dyn Queryable>,
    ) -> Result<i64, RepoError> {
        let handle = resolve(&self.pool, qa).await?;
        let db = handle.queryable();

        let mut query = USER_COUNT.to_owned();
        let mut params = SqlParams::new();
        append_count(search, &mut query, &mut params)?;

        let row = db
            .query_opt(&query, &params.as_sql())
            .await?
            .ok_or_else(|| StoreError::message("count returned no row"))?;
        row.try_get(0).map_err(|err| StoreError::from(err).into())
    }
}

fn row_to_user(row: &Row) -> Result<User, RepoError> {
    let user_type: String = row.try_get("user_type").map_err(StoreError::from)?;
    Ok(User {
        username: row.try_get("user_id").map_err(StoreError::from)?,
        email: row.try_get("email").map_err(StoreError::from)?,
        email_verified: row.try_get("email_verified").map_err(StoreError::from)?,
        user_type: UserType::parse(&user_type)?,
        password_hash: row.try_get("password_hash").map_err(StoreError::from)?,
        token: row.try_get("token").map_err(StoreError::from)?,
        token_valid_until: row.try_get("token_valid_until").map_err(StoreError::from)?,
        token_refresh_until: row
            .try_get("token_refresh_until")
            .map_err(StoreError::from)?,
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
    use rstest::rstest;

    #[rstest]
    fn filters_emit_contiguous_placeholders() {
        let search = UserSearchParams {
            email: Some("coach@example.com".to_owned()),
            user_type: Some(UserType::Coach),
            ..UserSearchParams::default()
        };
        let mut query = USER_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("where 1 = 1 "));
        assert!(query.contains(" and usr.email=$1"));
        assert!(query.contains(" and usr.user_type=$2"));
        assert_eq!(params.len(), 2);
    }

    #[rstest]
    fn empty_descriptor_passes_the_query_through() {
        let search = UserSearchParams::default();
        let mut query = USER_SELECT.to_owned();
        let mut params = SqlParams::new();

        append_search(&search, &mut query, &mut params).expect("assembly succeeds");

        assert!(query.contains("where 1 = 1 "));
        assert!(!query.contains("order by"));
        assert!(!query.contains("limit"));
        assert!(params.is_empty());
    }

    #[rstest]
    fn rebound_prefix_qualifies_every_fragment() {
        let mut search = UserSearchParams {
            username: Some("dana".to_owned()),
            ..UserSearchParams::default()
        };
        search.set_table_prefix("u2");
        let mut query = String::new();
        let mut params = SqlParams::new();

        search.predicate_clause(&mut query, &mut params);

        assert!(query.contains(" and u2.user_id=$1"));
        assert!(!query.contains("usr."));
    }

    #[rstest]
    fn sort_renders_under_the_descriptor_prefix() {
        let search = UserSearchParams {
            sort: UserSortParams {
                user_type: Some(SortColumn::descending(0)),
                username: Some(SortColumn::ascending(1)),
                ..UserSortParams::default()
            },
            ..UserSearchParams::default()
        };
        let mut query = String::new();

        search.order_clause(&mut query);

        assert_eq!(query, " order by usr.user_type desc,usr.user_id,");
    }

    #[rstest]
    #[case(UserType::Player, "player")]
    #[case(UserType::Admin, "admin")]
    fn user_type_round_trips_through_storage_form(#[case] ut: UserType, #[case] stored: &str) {
        assert_eq!(ut.as_str(), stored);
        assert_eq!(UserType::parse(stored).expect("known type"), ut);
    }

    #[rstest]
    fn unknown_user_type_is_a_store_error() {
        let err = UserType::parse("referee").expect_err("unknown type");
        assert!(err.to_string().contains("referee"));
    }
}
