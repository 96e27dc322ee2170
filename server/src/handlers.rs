use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pixel_debate_shared::{AnalysisRequest, AnalysisResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::snapshot::InlineImage;
use crate::state::AppState;

pub async fn ping_handler() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Body problems are taken as a `Result` so that they end in the same
/// generic 500 as every other failure.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn analyze_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, AnalysisError> {
    let body = body.map_err(|rejection| AnalysisError::Body(rejection.body_text()))?;
    let request: AnalysisRequest = serde_json::from_slice(&body)?;
    let image = InlineImage::from_data_uri(&request.base64_image)?;
    let text = state
        .analyzer
        .analyze(&image, &request.topic_a, &request.topic_b)
        .await?;
    info!(
        topic_a = %request.topic_a,
        topic_b = %request.topic_b,
        chars = text.len(),
        "analysis complete"
    );
    Ok(Json(AnalysisResponse { text }))
}
