//! Entity persistence and audit framework for the sportos backend.
//!
//! The crate assembles parameterized PostgreSQL statements from typed
//! descriptor values instead of string-built SQL: a search descriptor
//! contributes joins, predicates, sorting and paging, an update descriptor
//! contributes a sparse `set` list, and the engine lowers either into SQL
//! text plus an ordered positional-parameter list.
//!
//! Entity mutations are audited. The diff engine captures column-keyed
//! before/after maps from explicit per-entity field tables and the audit
//! writer persists them through the same handle as the mutation, so an
//! audit record never outlives a rolled-back change.
//!
//! Repositories run over either a pooled connection or a caller-supplied
//! transaction via the [`queryable::Queryable`] port; [`repo::Repo`] is the
//! facade wiring the pool, the audit writer and the entity repositories
//! together.

pub mod audit;
pub mod coaches;
pub mod descriptor;
pub mod diff;
pub mod edit_info;
pub mod entity;
pub mod error;
pub mod params;
pub mod pool;
pub mod queryable;
pub mod repo;
pub mod users;

pub use audit::{AuditRecord, AuditRepository, AuditSearchParams, AuditSortParams, CrudAction};
pub use coaches::{
    Appointment, Booking, Coach, CoachRepository, CoachSearchParams, CoachSortParams,
    CoachUpdateParams, Review, Reviews,
};
pub use descriptor::{SearchDescriptor, UpdateDescriptor, append_count, append_search, append_update};
pub use diff::{AuditField, Auditable, ColumnMap};
pub use edit_info::{
    CreatedInfo, DeletedInfo, EditInfoCd, EditInfoCu, EditInfoCud, EditInfoUd, SYSTEM_ACTOR,
    UpdatedInfo,
};
pub use entity::{Entity, EntityKind};
pub use error::RepoError;
pub use params::SqlParams;
pub use pool::{DbPool, PoolConfig, PoolError, PooledClient};
pub use queryable::{Queryable, StoreError};
pub use repo::Repo;
pub use users::{User, UserRepository, UserSearchParams, UserSortParams, UserType};
