// In-memory store used by the test suite and as a fallback when no
// DATABASE_URL is configured. A single RwLock guards each request's
// read-modify-write, so the session upsert is as atomic as the Postgres
// ON CONFLICT replace it stands in for.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::models::*;
use super::{DepartmentStore, EmployeeStore, SessionStore, StoreError, UserStore};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    sessions: HashMap<Uuid, Session>,
    departments: HashMap<Uuid, Department>,
    employees: HashMap<Uuid, Employee>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("state lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("state lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_employee(&self, employee_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.employee_id == Some(employee_id))
            .cloned())
    }

    async fn list(&self, department_id: Option<Uuid>) -> Result<Vec<User>, StoreError> {
        let inner = self.read()?;
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| department_id.is_none() || u.department_id == department_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn create(&self, data: NewUser) -> Result<User, StoreError> {
        let mut inner = self.write()?;
        if inner.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password: data.password,
            role: data.role,
            department_id: data.department_id,
            employee_id: data.employee_id,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, StoreError> {
        let mut inner = self.write()?;
        if let Some(email) = &patch.email {
            if inner.users.values().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Conflict("Email already in use".to_string()));
            }
        }
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))?;
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(department_id) = patch.department_id {
            user.department_id = Some(department_id);
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.write()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn upsert(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let session = Session {
            user_id,
            token: token.to_string(),
            expires_at,
        };
        self.write()?.sessions.insert(user_id, session.clone());
        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self
            .read()?
            .sessions
            .values()
            .find(|s| s.token == token)
            .cloned())
    }

    async fn delete(&self, user_id: Uuid, token: &str) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.sessions.get(&user_id) {
            Some(session) if session.token == token => {
                inner.sessions.remove(&user_id);
                Ok(())
            }
            _ => Err(StoreError::NotFound("Session not found".to_string())),
        }
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn create(&self, name: &str) -> Result<Department, StoreError> {
        let mut inner = self.write()?;
        if inner.departments.values().any(|d| d.name == name) {
            return Err(StoreError::Conflict("Department already exists".to_string()));
        }
        let department = Department {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        inner.departments.insert(department.id, department.clone());
        Ok(department)
    }

    async fn list(&self) -> Result<Vec<Department>, StoreError> {
        let mut departments: Vec<Department> =
            self.read()?.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>, StoreError> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .read()?
            .employees
            .values()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Employee>, StoreError> {
        let inner = self.read()?;
        let mut employees: Vec<Employee> = inner.employees.values().cloned().collect();
        employees.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(employees
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.read()?.employees.len() as i64)
    }

    async fn create(&self, data: NewEmployee) -> Result<Employee, StoreError> {
        let mut inner = self.write()?;
        if inner.employees.values().any(|e| e.email == data.email) {
            return Err(StoreError::Conflict("Email already exist".to_string()));
        }
        let employee = Employee {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            department: data.department,
            salary: data.salary,
            joining_date: data.joining_date,
            created_at: Utc::now(),
        };
        inner.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update(&self, id: Uuid, patch: EmployeePatch) -> Result<Employee, StoreError> {
        let mut inner = self.write()?;
        if let Some(email) = &patch.email {
            if inner.employees.values().any(|e| e.id != id && &e.email == email) {
                return Err(StoreError::Conflict("Email already in use".to_string()));
            }
        }
        let employee = inner
            .employees
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Employee not found".to_string()))?;
        if let Some(name) = patch.name {
            employee.name = name;
        }
        if let Some(email) = patch.email {
            employee.email = email;
        }
        if let Some(department) = patch.department {
            employee.department = department;
        }
        if let Some(salary) = patch.salary {
            employee.salary = salary;
        }
        if let Some(joining_date) = patch.joining_date {
            employee.joining_date = joining_date;
        }
        Ok(employee.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.write()?
            .employees
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound("Employee not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "digest".to_string(),
            role: "employee".to_string(),
            department_id: None,
            employee_id: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@mail.com")).await.unwrap();
        let err = UserStore::create(&store, new_user("a@mail.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn session_upsert_replaces_prior_session() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let expires = Utc::now() + Duration::days(7);

        store.upsert(user_id, "token-one", expires).await.unwrap();
        store.upsert(user_id, "token-two", expires).await.unwrap();

        assert!(store.find_by_token("token-one").await.unwrap().is_none());
        assert!(store.find_by_token("token-two").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn session_delete_requires_matching_pair() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let expires = Utc::now() + Duration::days(7);
        store.upsert(user_id, "token-one", expires).await.unwrap();

        // Wrong token: not a wildcard delete
        let err = SessionStore::delete(&store, user_id, "token-other")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.find_by_token("token-one").await.unwrap().is_some());

        SessionStore::delete(&store, user_id, "token-one").await.unwrap();
        assert!(store.find_by_token("token-one").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_absent_user_is_not_found() {
        let store = MemoryStore::new();
        let err = UserStore::delete(&store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn user_list_scopes_by_department() {
        let store = MemoryStore::new();
        let dept = Uuid::new_v4();
        let mut scoped = new_user("in@mail.com");
        scoped.department_id = Some(dept);
        UserStore::create(&store, scoped).await.unwrap();
        UserStore::create(&store, new_user("out@mail.com")).await.unwrap();

        let all = UserStore::list(&store, None).await.unwrap();
        assert_eq!(all.len(), 2);
        let in_dept = UserStore::list(&store, Some(dept)).await.unwrap();
        assert_eq!(in_dept.len(), 1);
        assert_eq!(in_dept[0].email, "in@mail.com");
    }
}
