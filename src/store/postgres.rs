// Postgres-backed store. Queries are plain runtime sqlx; the session upsert
// relies on ON CONFLICT so two racing logins leave exactly one row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;
use super::{DepartmentStore, EmployeeStore, SessionStore, StoreError, UserStore};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx failure, translating unique-constraint violations into the
/// given conflict message and everything else into an opaque backend error.
fn map_db_err(err: sqlx::Error, conflict_message: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict(conflict_message.to_string());
        }
    }
    StoreError::Backend(err.to_string())
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, department_id, employee_id, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, department_id, employee_id, created_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, department_id, employee_id, created_at
             FROM users WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, password, role, department_id, employee_id, created_at
             FROM users
             WHERE $1::uuid IS NULL OR department_id = $1
             ORDER BY created_at",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn create(&self, data: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password, role, department_id, employee_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, email, password, role, department_id, employee_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.role)
        .bind(data.department_id)
        .bind(data.employee_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "User already exists"))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET
                 email = COALESCE($2, email),
                 role = COALESCE($3, role),
                 department_id = COALESCE($4, department_id)
             WHERE id = $1
             RETURNING id, email, password, role, department_id, employee_id, created_at",
        )
        .bind(id)
        .bind(patch.email)
        .bind(patch.role)
        .bind(patch.department_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "Email already in use"))?
        .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn upsert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id)
             DO UPDATE SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
             RETURNING user_id, token, expires_at",
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        sqlx::query_as::<_, Session>(
            "SELECT user_id, token, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn delete(&self, user_id: Uuid, token: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Session not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DepartmentStore for PgStore {
    async fn create(&self, name: &str) -> Result<Department, StoreError> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "Department already exists"))
    }

    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        sqlx::query_as::<_, Department>("SELECT id, name FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, department, salary, joining_date, created_at
             FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, department, salary, joining_date, created_at
             FROM employees WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, StoreError> {
        sqlx::query_as::<_, Employee>(
            "SELECT id, name, email, department, salary, joining_date, created_at
             FROM employees ORDER BY created_at OFFSET $1 LIMIT $2",
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)
    }

    async fn create(&self, data: NewEmployee) -> Result<Employee, StoreError> {
        sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (id, name, email, department, salary, joining_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, email, department, salary, joining_date, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.department)
        .bind(data.salary)
        .bind(data.joining_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "Email already exist"))
    }

    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Employee, StoreError> {
        sqlx::query_as::<_, Employee>(
            "UPDATE employees SET
                 name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 department = COALESCE($4, department),
                 salary = COALESCE($5, salary),
                 joining_date = COALESCE($6, joining_date)
             WHERE id = $1
             RETURNING id, name, email, department, salary, joining_date, created_at",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.department)
        .bind(patch.salary)
        .bind(patch.joining_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_err(e, "Email already in use"))?
        .ok_or_else(|| StoreError::NotFound("Employee not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Employee not found".to_string()));
        }
        Ok(())
    }
}
