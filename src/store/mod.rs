// Typed data-store interface. The HTTP layer only ever sees these traits;
// the Postgres implementation backs deployments and the in-memory one backs
// tests and secret-free local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryStore;
pub use models::{
    Department, Employee, EmployeePatch, NewEmployee, NewUser, Session, User, UserPatch,
};
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Option<User>, StoreError>;
    /// List users, optionally scoped to one department.
    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<User>, StoreError>;
    async fn create(&self, data: NewUser) -> Result<User, StoreError>;
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Atomic single-row replace keyed by `user_id`: a new login supersedes
    /// any prior session for the same principal.
    async fn upsert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Remove exactly the session matching both user and token. A mismatched
    /// pair is `NotFound`, never a wildcard delete.
    async fn delete(&self, user_id: Uuid, token: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn create(&self, name: &str) -> Result<Department, StoreError>;
    async fn list(&self) -> Result<Vec<Department>, StoreError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, StoreError>;
    async fn count(&self) -> Result<i64, StoreError>;
    async fn create(&self, data: NewEmployee) -> Result<Employee, StoreError>;
    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Employee, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
