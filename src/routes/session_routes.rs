use axum::{routing::get, Extension, Json, Router};

use crate::dto::common_dto::ApiResponse;
use crate::dto::session_dto::SessionView;
use crate::models::auth::Session;
use crate::state::AppState;

pub fn create_session_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

async fn me(Extension(session): Extension<Session>) -> Json<ApiResponse<SessionView>> {
    Json(ApiResponse::success(SessionView::from(&session)))
}
