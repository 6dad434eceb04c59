//! Parse pipeline — validation guard, remote AI stage, heuristic fallback.
//!
//! The AI stage returns `Result<ParsedResumeData, AiError>`; an `Err` routes the
//! text to the local extractor. Which stage produced the record is carried in
//! `ParseSource` so callers never have to infer it from logs.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ai_client::ResumeAiBackend;
use crate::errors::AppError;
use crate::resume::extractor::extract_with_matches;
use crate::resume::models::{Extraction, ParsedResumeData, ResumeField};
use crate::resume::scoring::normalize_reported_confidence;

/// Inputs shorter than this (after trimming) are rejected before any parsing.
pub const MIN_RESUME_TEXT_CHARS: usize = 20;

/// Which stage produced a `ParseOutcome`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ParseSource {
    Ai,
    #[serde(rename_all = "camelCase")]
    Fallback {
        ai_error: String,
        missing_fields: Vec<ResumeField>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseOutcome {
    pub data: ParsedResumeData,
    #[serde(flatten)]
    pub source: ParseSource,
}

impl ParseOutcome {
    pub fn used_fallback(&self) -> bool {
        matches!(self.source, ParseSource::Fallback { .. })
    }
}

/// Rejects missing or too-short text.
pub fn validate_resume_text(text: &str) -> Result<(), AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Resume text is required".to_string()));
    }
    if trimmed.chars().count() < MIN_RESUME_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "Resume text must be at least {MIN_RESUME_TEXT_CHARS} characters"
        )));
    }
    Ok(())
}

/// Local-only extraction behind the same validation guard as `parse_resume`.
pub fn extract_local(text: &str) -> Result<Extraction, AppError> {
    validate_resume_text(text)?;
    Ok(extract_with_matches(text))
}

/// Parses resume text: AI backend first, heuristic extractor on any AI failure.
///
/// Only validation failures are returned as errors.
pub async fn parse_resume(
    text: &str,
    backend: &dyn ResumeAiBackend,
    parse_id: Uuid,
) -> Result<ParseOutcome, AppError> {
    validate_resume_text(text)?;

    match backend.parse_resume(text).await {
        Ok(mut data) => {
            data.confidence = normalize_reported_confidence(data.confidence);
            info!(
                "Resume parse {parse_id} completed by AI backend (confidence {:.2})",
                data.confidence
            );
            Ok(ParseOutcome {
                data,
                source: ParseSource::Ai,
            })
        }
        Err(ai_error) => {
            warn!("Resume parse {parse_id}: AI backend failed, using heuristic fallback: {ai_error}");
            let extraction = extract_with_matches(text);
            info!(
                "Resume parse {parse_id} completed by fallback (confidence {:.2}, {} fields missing)",
                extraction.data.confidence,
                extraction.missing_fields.len()
            );
            Ok(ParseOutcome {
                data: extraction.data,
                source: ParseSource::Fallback {
                    ai_error: ai_error.to_string(),
                    missing_fields: extraction.missing_fields,
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::ai_client::{AiError, DisabledBackend};

    const RESUME: &str = "Jane Q. Public\njane@example.com\nSkills: Python, Go, Rust\n";

    /// Returns a fixed record and counts calls.
    struct StubBackend {
        data: ParsedResumeData,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn returning(data: ParsedResumeData) -> Self {
            Self {
                data,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResumeAiBackend for StubBackend {
        async fn parse_resume(&self, _text: &str) -> Result<ParsedResumeData, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.data.clone())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ResumeAiBackend for FailingBackend {
        async fn parse_resume(&self, _text: &str) -> Result<ParsedResumeData, AiError> {
            Err(AiError::Api {
                status: 502,
                message: "Bad Gateway".to_string(),
            })
        }
    }

    #[test]
    fn test_validate_rejects_empty_and_short_text() {
        assert!(matches!(
            validate_resume_text(""),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_resume_text("   \n\t  "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_resume_text("too short to parse"),
            Err(AppError::Validation(_))
        ));
        assert!(validate_resume_text("exactly twenty chars").is_ok());
    }

    #[tokio::test]
    async fn test_short_text_never_reaches_backend() {
        let backend = StubBackend::returning(ParsedResumeData::default());
        let result = parse_resume("short", &backend, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ai_success_is_returned_as_is() {
        let ai_data = ParsedResumeData {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            confidence: 0.95,
            ..ParsedResumeData::default()
        };
        let backend = StubBackend::returning(ai_data.clone());

        let outcome = parse_resume(RESUME, &backend, Uuid::new_v4()).await.unwrap();

        assert_eq!(outcome.source, ParseSource::Ai);
        assert!(!outcome.used_fallback());
        assert_eq!(outcome.data, ai_data);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ai_confidence_is_clamped() {
        let backend = StubBackend::returning(ParsedResumeData {
            confidence: 3.0,
            ..ParsedResumeData::default()
        });

        let outcome = parse_resume(RESUME, &backend, Uuid::new_v4()).await.unwrap();
        assert_eq!(outcome.data.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_ai_failure_falls_back_to_heuristics() {
        let outcome = parse_resume(RESUME, &FailingBackend, Uuid::new_v4())
            .await
            .unwrap();

        assert!(outcome.used_fallback());
        assert_eq!(outcome.data.first_name, "Jane");
        assert_eq!(outcome.data.last_name, "Q. Public");
        assert_eq!(outcome.data.email, "jane@example.com");
        assert_eq!(outcome.data.skills, vec!["Python", "Go", "Rust"]);

        match outcome.source {
            ParseSource::Fallback {
                ai_error,
                missing_fields,
            } => {
                assert!(ai_error.contains("502"));
                assert_eq!(
                    missing_fields,
                    vec![
                        ResumeField::Phone,
                        ResumeField::Location,
                        ResumeField::Summary
                    ]
                );
            }
            ParseSource::Ai => panic!("expected fallback"),
        }
        assert!((outcome.data.confidence - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_disabled_backend_uses_fallback() {
        let outcome = parse_resume(RESUME, &DisabledBackend, Uuid::new_v4())
            .await
            .unwrap();
        assert!(outcome.used_fallback());
    }

    #[test]
    fn test_outcome_serializes_source_tag() {
        let outcome = ParseOutcome {
            data: ParsedResumeData::default(),
            source: ParseSource::Fallback {
                ai_error: "AI backend is not configured".to_string(),
                missing_fields: vec![ResumeField::Email],
            },
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["source"], "fallback");
        assert_eq!(value["aiError"], "AI backend is not configured");
        assert_eq!(value["missingFields"][0], "email");
        assert_eq!(value["data"]["firstName"], "Unknown");

        let ai = ParseOutcome {
            data: ParsedResumeData::default(),
            source: ParseSource::Ai,
        };
        let value = serde_json::to_value(&ai).unwrap();
        assert_eq!(value["source"], "ai");
        assert!(value.get("aiError").is_none());
    }

    #[test]
    fn test_extract_local_validates_first() {
        assert!(matches!(extract_local("tiny"), Err(AppError::Validation(_))));
        let extraction = extract_local(RESUME).unwrap();
        assert_eq!(extraction.data.email, "jane@example.com");
    }
}
