//! Servicio de sesión
//!
//! El núcleo no autentica a nadie: recibe un token y pregunta al proveedor
//! de identidad qué sesión representa. `SessionProvider` es esa costura.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::models::auth::Session;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Sesión asociada al token, o `None` si no es válido
    async fn current_session(&self, token: &str) -> Option<Session>;
}

/// Proveedor basado en JWT firmados con un secreto compartido
#[derive(Debug, Clone)]
pub struct JwtSessionProvider {
    config: JwtConfig,
}

impl JwtSessionProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn decode(&self, token: &str) -> Result<Session, AppError> {
        let claims = verify_token(token, &self.config)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Jwt("Subject is not a valid user id".to_string()))?;
        Ok(Session::new(user_id, claims.roles))
    }
}

#[async_trait]
impl SessionProvider for JwtSessionProvider {
    async fn current_session(&self, token: &str) -> Option<Session> {
        match self.decode(token) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("Sesión rechazada: {}", e);
                None
            }
        }
    }
}
