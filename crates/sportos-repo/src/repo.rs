//! Repository facade and handle resolution.
//!
//! Every repository method takes an optional [`Queryable`]. Passing an open
//! transaction pins the whole operation to it; passing `None` lets the
//! repository check a client out of the shared pool for the single call.
//! [`resolve`] implements that fallback in one place.

use std::sync::Arc;

use tracing::info;

use crate::audit::AuditRepository;
use crate::coaches::CoachRepository;
use crate::error::RepoError;
use crate::pool::{DbPool, PoolConfig, PooledClient};
use crate::queryable::Queryable;
use crate::users::UserRepository;

/// A resolved statement target: either the caller's handle or a client
/// checked out for the duration of this value.
pub(crate) enum Handle<'a> {
    External(&'a dyn Queryable),
    Pooled(PooledClient<'a>),
}

impl Handle<'_> {
    pub(crate) fn queryable(&self) -> &dyn Queryable {
        match self {
            Self::External(qa) => *qa,
            Self::Pooled(client) => &**client,
        }
    }
}

/// Use the caller's handle when one is given, otherwise check out a pooled
/// client. Checkout failure maps to [`RepoError::Connection`].
pub(crate) async fn resolve<'a>(
    pool: &'a DbPool,
    qa: Option<&'a dyn Queryable>,
) -> Result<Handle<'a>, RepoError> {
    match qa {
        Some(external) => Ok(Handle::External(external)),
        None => {
            let client = pool
                .get()
                .await
                .map_err(|err| RepoError::connection(err.to_string()))?;
            Ok(Handle::Pooled(client))
        }
    }
}

/// Entry point bundling every entity repository over one shared pool.
#[derive(Clone)]
pub struct Repo {
    pool: DbPool,
    audit: Arc<AuditRepository>,
    users: Arc<UserRepository>,
    coaches: Arc<CoachRepository>,
}

impl Repo {
    /// Build the facade over an existing pool.
    pub fn new(pool: DbPool, audit_enabled: bool) -> Self {
        let audit = Arc::new(AuditRepository::new(pool.clone(), audit_enabled));
        let users = Arc::new(UserRepository::new(pool.clone()));
        let coaches = Arc::new(CoachRepository::new(pool.clone(), Arc::clone(&audit)));
        Self {
            pool,
            audit,
            users,
            coaches,
        }
    }

    /// Connect a fresh pool from configuration and build the facade on it.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Connection`] when the pool cannot be built.
    pub async fn connect(config: PoolConfig, audit_enabled: bool) -> Result<Self, RepoError> {
        let pool = DbPool::new(config)
            .await
            .map_err(|err| RepoError::connection(err.to_string()))?;
        info!(audit_enabled, "repository facade connected");
        Ok(Self::new(pool, audit_enabled))
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn audit(&self) -> &AuditRepository {
        &self.audit
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    pub fn coaches(&self) -> &CoachRepository {
        &self.coaches
    }
}
