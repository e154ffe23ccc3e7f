//! Shared types for the API layer.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::calendar::CalendarProvider;
use crate::config::AuthSettings;
use crate::gateway::ExtractionGateway;
use crate::store::RecordRepository;

/// Identity used when no valid bearer token accompanies a request.
pub const DEV_USER: &str = "local-dev";

/// Shared context for all API routes and middleware.
///
/// Collaborators are wired once at startup. The record mutex serializes
/// every read-modify-write of the aggregate, so concurrent mutating
/// requests cannot clobber each other's snapshots.
#[derive(Clone)]
pub struct ApiContext {
    pub repository: Arc<dyn RecordRepository>,
    pub gateway: Arc<ExtractionGateway>,
    pub calendar: Arc<dyn CalendarProvider>,
    pub auth: Option<AuthSettings>,
    record_lock: Arc<Mutex<()>>,
}

impl ApiContext {
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        gateway: Arc<ExtractionGateway>,
        calendar: Arc<dyn CalendarProvider>,
        auth: Option<AuthSettings>,
    ) -> Self {
        Self {
            repository,
            gateway,
            calendar,
            auth,
            record_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Take the record mutation lock. Hold the guard across the whole
    /// load → mutate → save of a mutating handler.
    pub async fn lock_record(&self) -> MutexGuard<'_, ()> {
        self.record_lock.lock().await
    }
}

/// Request identity, injected into request extensions by the auth
/// middleware.
///
/// `authenticated` is false for the development-identity fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user: String,
    pub authenticated: bool,
}

impl UserContext {
    /// The permissive fallback identity.
    pub fn development() -> Self {
        Self {
            user: DEV_USER.to_string(),
            authenticated: false,
        }
    }
}
