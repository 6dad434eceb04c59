/// AI client — the single point of entry for calls to the AI resume-parsing backend.
///
/// Callers depend on the `ResumeAiBackend` trait, not on `AiParseClient`, so the
/// parse pipeline can run against a disabled or stubbed backend.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::resume::models::ParsedResumeData;

const PARSE_RESUME_PATH: &str = "/api/ai/parse-resume";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("AI backend reported failure: {0}")]
    Rejected(String),

    #[error("AI backend response is missing parsed data")]
    MissingData,

    #[error("AI backend is not configured")]
    Disabled,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseResumeRequest<'a> {
    file_content: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct ParseResumeResponse {
    success: bool,
    data: Option<ParsedResumeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Remote resume parser. Implement this to swap backends without touching
/// the pipeline or handlers.
///
/// Carried in `AppState` as `Arc<dyn ResumeAiBackend>`.
#[async_trait]
pub trait ResumeAiBackend: Send + Sync {
    async fn parse_resume(&self, text: &str) -> Result<ParsedResumeData, AiError>;
}

/// HTTP client for `POST {base_url}/api/ai/parse-resume`.
#[derive(Clone)]
pub struct AiParseClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl AiParseClient {
    pub fn new(base_url: &str, model: String, timeout: Duration) -> Result<Self, AiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: parse_resume_endpoint(base_url),
            model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ResumeAiBackend for AiParseClient {
    /// Single attempt, no retries: any failure is recovered by the caller's
    /// heuristic fallback.
    async fn parse_resume(&self, text: &str) -> Result<ParsedResumeData, AiError> {
        let request_body = ParseResumeRequest {
            file_content: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let data = interpret_response(status, body)?;

        debug!(
            "AI parse succeeded: model={}, confidence={:.2}",
            self.model, data.confidence
        );

        Ok(data)
    }
}

/// Stand-in used when no AI backend URL is configured. Always fails, so every
/// parse goes straight to the heuristic fallback.
pub struct DisabledBackend;

#[async_trait]
impl ResumeAiBackend for DisabledBackend {
    async fn parse_resume(&self, _text: &str) -> Result<ParsedResumeData, AiError> {
        Err(AiError::Disabled)
    }
}

fn parse_resume_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), PARSE_RESUME_PATH)
}

/// Non-2xx statuses become `AiError::Api`; anything else is decoded as a parse
/// response.
fn interpret_response(status: StatusCode, body: String) -> Result<ParsedResumeData, AiError> {
    if !status.is_success() {
        return Err(AiError::Api {
            status: status.as_u16(),
            message: error_message(body),
        });
    }
    decode_parse_response(&body)
}

/// Interprets a 2xx body: `{ success: true, data }` or `{ success: false, error }`.
fn decode_parse_response(body: &str) -> Result<ParsedResumeData, AiError> {
    let parsed: ParseResumeResponse = serde_json::from_str(body)?;

    if !parsed.success {
        return Err(AiError::Rejected(
            parsed.error.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    parsed.data.ok_or(AiError::MissingData)
}

/// Pulls `error` out of a JSON error body, falling back to the raw text.
fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.error)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::NO_PHONE;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        assert_eq!(
            parse_resume_endpoint("http://ai.internal:3001/"),
            "http://ai.internal:3001/api/ai/parse-resume"
        );
        assert_eq!(
            parse_resume_endpoint("http://ai.internal:3001"),
            "http://ai.internal:3001/api/ai/parse-resume"
        );
    }

    #[test]
    fn test_request_body_uses_camel_case() {
        let body = serde_json::to_value(ParseResumeRequest {
            file_content: "resume text",
            model: "gpt-4",
        })
        .unwrap();
        assert_eq!(body["fileContent"], "resume text");
        assert_eq!(body["model"], "gpt-4");
    }

    #[test]
    fn test_decode_success_response() {
        let body = r#"{
            "success": true,
            "data": {
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "grace@navy.mil",
                "skills": ["COBOL", "Compilers"],
                "confidence": 0.93
            }
        }"#;
        let data = decode_parse_response(body).unwrap();
        assert_eq!(data.first_name, "Grace");
        assert_eq!(data.skills, vec!["COBOL", "Compilers"]);
        assert_eq!(data.phone, NO_PHONE);
        assert!((data.confidence - 0.93).abs() < 1e-9);
    }

    #[test]
    fn test_decode_explicit_failure() {
        let body = r#"{ "success": false, "error": "model overloaded" }"#;
        match decode_parse_response(body) {
            Err(AiError::Rejected(message)) => assert_eq!(message, "model overloaded"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_without_message() {
        let body = r#"{ "success": false }"#;
        match decode_parse_response(body) {
            Err(AiError::Rejected(message)) => assert_eq!(message, "unknown error"),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_success_without_data() {
        let body = r#"{ "success": true }"#;
        assert!(matches!(
            decode_parse_response(body),
            Err(AiError::MissingData)
        ));
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(
            decode_parse_response("<html>bad gateway</html>"),
            Err(AiError::Parse(_))
        ));
    }

    #[test]
    fn test_error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(r#"{"error":"quota exceeded"}"#.to_string()),
            "quota exceeded"
        );
        assert_eq!(error_message("Bad Gateway".to_string()), "Bad Gateway");
    }

    #[test]
    fn test_non_success_status_is_api_error() {
        let result = interpret_response(
            StatusCode::BAD_GATEWAY,
            r#"{"error":"upstream model unavailable"}"#.to_string(),
        );
        match result {
            Err(AiError::Api { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream model unavailable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }

        // Error statuses are not decoded, even when the body looks like success.
        let result = interpret_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"success":true,"data":{}}"#.to_string(),
        );
        assert!(matches!(result, Err(AiError::Api { status: 500, .. })));
    }

    #[test]
    fn test_success_status_decodes_body() {
        let data = interpret_response(
            StatusCode::OK,
            r#"{"success":true,"data":{"firstName":"Ada","lastName":"Lovelace"}}"#.to_string(),
        )
        .unwrap();
        assert_eq!(data.first_name, "Ada");
        assert_eq!(data.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_disabled_backend_always_fails() {
        assert!(matches!(
            DisabledBackend.parse_resume("any text").await,
            Err(AiError::Disabled)
        ));
    }
}
