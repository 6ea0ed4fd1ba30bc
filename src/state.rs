use std::sync::Arc;

use crate::auth::TokenService;
use crate::blob::BlobStore;
use crate::config::AppConfig;
use crate::store::{DepartmentStore, EmployeeStore, SessionStore, UserStore};

/// Shared application state. Everything here is constructed once in `main`
/// (or a test harness) and injected explicitly; there are no module-level
/// singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub departments: Arc<dyn DepartmentStore>,
    pub employees: Arc<dyn EmployeeStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Which storage backend is live, reported by the health route.
    pub store_backend: &'static str,
}
