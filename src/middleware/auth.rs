//! Middleware de autenticación
//!
//! Resuelve el token `Bearer` con el proveedor de sesión del estado e
//! inyecta la [`Session`] en las extensions de la request. Sin token o con
//! un token que el proveedor no reconoce, la request termina en 401.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{
    models::auth::Session,
    state::AppState,
    utils::{errors::AppError, jwt::extract_token_from_header},
};

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_token_from_header(auth_header)
        .map_err(|_| AppError::Unauthorized("Malformed Authorization header".to_string()))?;

    let session: Session = state
        .sessions
        .current_session(token)
        .await
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    debug!("🔐 Sesión {} {:?}", session.user_id, session.roles);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
