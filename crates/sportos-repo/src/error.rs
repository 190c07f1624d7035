//! Framework error taxonomy.
//!
//! Every framework function returns an explicit `Result`; there is no
//! exception-style control flow. Store failures pass through verbatim with
//! their driver diagnostics attached, precondition violations surface as hard
//! errors, and a missed primary-key update maps to the distinguished
//! not-found variant.

use thiserror::Error;

use crate::entity::EntityKind;
use crate::queryable::StoreError;

/// Errors surfaced by repositories and the audit writer.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Contract violated by the caller; expected only from programmer error.
    #[error("precondition violated: {message}")]
    Precondition { message: String },

    /// No row exists for the requested primary key.
    #[error("{entity} does not exist for id: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// Pool checkout or build failure.
    #[error("connection unavailable: {message}")]
    Connection { message: String },

    /// Driver error passed through with its diagnostics.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepoError {
    /// Helper for precondition violations.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Helper for missing rows, keyed by entity kind and id.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Helper for connection-oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_names_entity_and_id() {
        let err = RepoError::not_found(EntityKind::Coach, "c1");
        assert_eq!(err.to_string(), "coach does not exist for id: c1");
    }

    #[rstest]
    fn precondition_carries_message() {
        let err = RepoError::precondition("both snapshots absent");
        assert!(err.to_string().contains("both snapshots absent"));
    }
}
