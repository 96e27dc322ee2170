use pixel_debate_shared::analysis::text_or_fallback;
use pixel_debate_shared::{AnalysisRequest, AnalysisResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("analysis service answered {0}")]
    Status(u16),
}

/// Talks to `POST /api/analyze` on the page's own origin.
#[derive(Clone)]
pub struct AnalysisClient {
    endpoint: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// One request per call, no retry. A missing or blank `text` comes back
    /// as the fallback sentence.
    pub async fn analyze(
        &self,
        image_data_uri: &str,
        topic_a: &str,
        topic_b: &str,
    ) -> Result<String, AnalysisError> {
        let request = AnalysisRequest {
            base64_image: image_data_uri.to_string(),
            topic_a: topic_a.to_string(),
            topic_b: topic_b.to_string(),
        };
        log::debug!(
            "requesting analysis from {} ({} bytes of image)",
            self.endpoint,
            request.base64_image.len()
        );
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(AnalysisError::Status(response.status().as_u16()));
        }
        let body: AnalysisResponse = response.json().await?;
        Ok(text_or_fallback(&body.text))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use pixel_debate_shared::analysis::ANALYSIS_FALLBACK_TEXT;

    use super::*;

    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route(
            "/api/analyze",
            post(move || async move {
                (status, [("content-type", "application/json")], body)
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}/api/analyze")
    }

    async fn analyze(endpoint: String) -> Result<String, AnalysisError> {
        AnalysisClient::new(endpoint)
            .analyze("data:image/png;base64,AAAA", "Cats", "Dogs")
            .await
    }

    #[tokio::test]
    async fn test_text_is_returned() {
        let endpoint = serve(StatusCode::OK, r###"{"text":"## Executive Summary"}"###).await;
        assert_eq!(analyze(endpoint).await.unwrap(), "## Executive Summary");
    }

    #[tokio::test]
    async fn test_server_error_is_a_status_failure() {
        let endpoint = serve(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"Analysis failed"}"#,
        )
        .await;
        assert!(matches!(
            analyze(endpoint).await,
            Err(AnalysisError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_request_failure() {
        let endpoint = serve(StatusCode::OK, "<html>oops</html>").await;
        assert!(matches!(
            analyze(endpoint).await,
            Err(AnalysisError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_text_becomes_the_fallback() {
        let endpoint = serve(StatusCode::OK, r#"{"text":""}"#).await;
        assert_eq!(analyze(endpoint).await.unwrap(), ANALYSIS_FALLBACK_TEXT);
    }
}
