// GET /content-moderation/status — liveness plus the tracked request rate.
//
// The rate is requests/second over the trailing minute, bounded by the
// tracker's 1000-entry cap.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "requests_per_second": state.service.request_rate(),
    }))
}
