pub mod auth_service;
pub mod employee_service;

pub use auth_service::AuthService;
pub use employee_service::EmployeeService;
