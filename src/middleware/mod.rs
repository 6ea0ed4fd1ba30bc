pub mod auth;
pub mod guard;
pub mod response;

pub use auth::{authenticate, BearerToken, CurrentUser};
pub use guard::{require_department_role, require_role};
pub use response::{ApiResponse, ApiResult};
