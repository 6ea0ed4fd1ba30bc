use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{
    Employee, EmployeePatch, EmployeeStore, NewEmployee, User, UserPatch, UserStore,
};

/// Default password for accounts provisioned during onboarding; employees
/// are expected to change it on first login.
const DEFAULT_EMPLOYEE_PASSWORD: &str = "123456";

pub struct EmployeeService {
    employees: Arc<dyn EmployeeStore>,
    users: Arc<dyn UserStore>,
}

pub struct EmployeePage {
    pub employees: Vec<Employee>,
    pub total_pages: i64,
}

impl EmployeeService {
    pub fn new(state: &AppState) -> Self {
        Self {
            employees: state.employees.clone(),
            users: state.users.clone(),
        }
    }

    /// Onboard an employee and provision a linked login account for them.
    pub async fn add(
        &self,
        data: NewEmployee,
        role: String,
    ) -> Result<(Employee, User), ApiError> {
        if self.employees.find_by_email(&data.email).await?.is_some() {
            return Err(ApiError::conflict("Email already exist"));
        }

        let email = data.email.clone();
        let employee = self.employees.create(data).await?;

        let digest = password::hash(DEFAULT_EMPLOYEE_PASSWORD)?;
        let user = self
            .users
            .create(crate::store::NewUser {
                email,
                password: digest,
                role,
                department_id: None,
                employee_id: Some(employee.id),
            })
            .await?;

        Ok((employee, user))
    }

    pub async fn list(&self, page: i64, limit: i64) -> Result<EmployeePage, ApiError> {
        // page is client-supplied and only bounded below, so the offset
        // arithmetic must not overflow; a past-the-end page is an empty page.
        let offset = page.saturating_sub(1).saturating_mul(limit);
        let employees = self.employees.list(offset, limit).await?;
        let total = self.employees.count().await?;
        let total_pages = total.saturating_add(limit - 1) / limit;
        Ok(EmployeePage {
            employees,
            total_pages,
        })
    }

    /// Update an employee record, propagating email and role changes to the
    /// linked login account.
    pub async fn update(
        &self,
        employee_id: Uuid,
        patch: EmployeePatch,
        role: Option<String>,
    ) -> Result<Employee, ApiError> {
        let linked_user = self
            .users
            .find_by_employee(employee_id)
            .await?
            .ok_or_else(|| ApiError::resource_not_found("User not found"))?;

        if let Some(email) = &patch.email {
            if email != &linked_user.email
                && self.users.find_by_email(email).await?.is_some()
            {
                return Err(ApiError::conflict("Email is already in use by another user"));
            }
        }

        let employee = self.employees.update(employee_id, patch.clone()).await?;

        self.users
            .update(
                linked_user.id,
                UserPatch {
                    email: patch.email,
                    role,
                    department_id: None,
                },
            )
            .await?;

        Ok(employee)
    }

    /// Offboard: removes the login account and the employee record.
    pub async fn delete(&self, employee_id: Uuid) -> Result<(), ApiError> {
        let linked_user = self
            .users
            .find_by_employee(employee_id)
            .await?
            .ok_or_else(|| ApiError::resource_not_found("User not found"))?;

        self.users.delete(linked_user.id).await?;
        self.employees.delete(employee_id).await?;
        Ok(())
    }
}
