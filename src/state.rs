//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::Store;
use crate::services::session_service::{JwtSessionProvider, SessionProvider};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: EnvironmentConfig,
    pub sessions: Arc<dyn SessionProvider>,
}

impl AppState {
    /// Estado con el proveedor de sesión JWT de la configuración
    pub fn new(store: Arc<dyn Store>, config: EnvironmentConfig) -> Self {
        let sessions = Arc::new(JwtSessionProvider::new(JwtConfig::from(&config)));
        Self {
            store,
            config,
            sessions,
        }
    }

    pub fn with_sessions(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = sessions;
        self
    }
}
