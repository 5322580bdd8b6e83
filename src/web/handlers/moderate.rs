// POST /content-moderation/moderate — score a text against the moderation
// categories.
//
// Returns 200 with a category -> score map on success.
// A missing or wrong-typed `text` field is rejected by the Json extractor
// with a client-error status before the service is touched.
// Classifier failure maps to 500 — the request was still counted by the
// rate tracker.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::web::AppState;

#[derive(Deserialize)]
pub struct ModerationRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct ModerationResponse {
    pub scores: HashMap<String, f32>,
}

/// POST /content-moderation/moderate — run the classifier on `text`.
pub async fn moderate_text(
    State(state): State<AppState>,
    Json(request): Json<ModerationRequest>,
) -> impl IntoResponse {
    match state.service.moderate_text(&request.text).await {
        Ok(scores) => (StatusCode::OK, Json(ModerationResponse { scores })).into_response(),
        Err(err) => {
            error!("moderation request failed: {err:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "moderation failed" })),
            )
                .into_response()
        }
    }
}
