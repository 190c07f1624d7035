//! The queryable-handle port over the PostgreSQL driver.
//!
//! Repositories accept any [`Queryable`] so a multi-step operation (create +
//! audit, update + cascading update) can force every statement onto one
//! transaction. Both a plain client and an open transaction satisfy the
//! port.

use async_trait::async_trait;
use thiserror::Error;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Row, Transaction};
use tracing::{debug, error};

/// A driver failure with its diagnostics attached.
///
/// The SQLSTATE code and server message are captured for logging; the error
/// itself passes through to the caller verbatim, never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("database error: {message}")]
pub struct StoreError {
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            let code = db_error.code().code();
            error!(code, message = db_error.message(), "database error");
            Self {
                code: Some(code.to_owned()),
                message: db_error.message().to_owned(),
            }
        } else {
            debug!(error = %err, "driver error");
            Self {
                code: None,
                message: err.to_string(),
            }
        }
    }
}

/// Minimal parameterized statement capability set consumed by repositories.
#[async_trait]
pub trait Queryable: Send + Sync {
    /// Execute a statement and return the affected-row count.
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, StoreError>;

    /// Run a multi-row query.
    async fn query(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, StoreError>;

    /// Run a query expected to return at most one row.
    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, StoreError>;
}

#[async_trait]
impl Queryable for Client {
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, StoreError> {
        Client::execute(self, statement, params)
            .await
            .map_err(StoreError::from)
    }

    async fn query(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, StoreError> {
        Client::query(self, statement, params)
            .await
            .map_err(StoreError::from)
    }

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, StoreError> {
        Client::query_opt(self, statement, params)
            .await
            .map_err(StoreError::from)
    }
}

#[async_trait]
impl Queryable for Transaction<'_> {
    async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, StoreError> {
        Transaction::execute(self, statement, params)
            .await
            .map_err(StoreError::from)
    }

    async fn query(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, StoreError> {
        Transaction::query(self, statement, params)
            .await
            .map_err(StoreError::from)
    }

    async fn query_opt(
        &self,
        statement: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, StoreError> {
        Transaction::query_opt(self, statement, params)
            .await
            .map_err(StoreError::from)
    }
}
