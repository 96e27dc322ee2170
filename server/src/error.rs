use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pixel_debate_shared::analysis::{DataUriError, ANALYSIS_FAILED_BODY};
use pixel_debate_shared::AnalysisFailure;
use thiserror::Error;
use tracing::error;

/// Everything that can go wrong while answering `POST /api/analyze`.
///
/// Callers only ever see one generic 500 body; the variant goes to the log.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read request body: {0}")]
    Body(String),
    #[error("malformed request: {0}")]
    Request(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    DataUri(#[from] DataUriError),
    #[error("snapshot is not a decodable PNG: {0}")]
    Image(#[from] image::ImageError),
    #[error("no Gemini API key configured")]
    MissingApiKey,
    #[error("Gemini request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Gemini API error {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        error!(error = %self, "analysis failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AnalysisFailure {
                error: ANALYSIS_FAILED_BODY.to_string(),
            }),
        )
            .into_response()
    }
}
