//! Shared state handed to every REST handler

use std::sync::Arc;

use chat_common::{AppConfig, JwtService};
use chat_service::ServiceContext;

/// Cheap to clone; everything behind it is shared
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service_context: Arc<ServiceContext>, config: AppConfig) -> Self {
        Self {
            service_context,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Verifies bearer tokens; same secret as the gateway
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.config.app.name)
            .field("env", &self.config.app.env)
            .finish_non_exhaustive()
    }
}
