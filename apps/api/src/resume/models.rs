use serde::{Deserialize, Serialize};

pub const UNKNOWN_FIRST_NAME: &str = "Unknown";
pub const UNKNOWN_LAST_NAME: &str = "Person";
pub const NO_EMAIL: &str = "No email detected in resume";
pub const NO_PHONE: &str = "No phone number detected in resume";
pub const NO_LOCATION: &str = "No location detected in resume";
pub const NO_SUMMARY: &str = "No summary detected in resume";
pub const NO_EXPERIENCE: &str =
    "Experience details could not be parsed automatically. Please review the resume.";
pub const NO_EDUCATION: &str =
    "Education details could not be parsed automatically. Please review the resume.";

/// Structured candidate data produced by either the AI backend or the local
/// heuristic extractor.
///
/// Every field is always populated: a field that could not be matched carries
/// its sentinel placeholder. Deserializing a partial payload fills the gaps
/// with the same sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedResumeData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    /// 0.0 – 1.0
    pub confidence: f64,
}

impl Default for ParsedResumeData {
    fn default() -> Self {
        Self {
            first_name: UNKNOWN_FIRST_NAME.to_string(),
            last_name: UNKNOWN_LAST_NAME.to_string(),
            email: NO_EMAIL.to_string(),
            phone: NO_PHONE.to_string(),
            location: NO_LOCATION.to_string(),
            summary: NO_SUMMARY.to_string(),
            skills: Vec::new(),
            experience: NO_EXPERIENCE.to_string(),
            education: NO_EDUCATION.to_string(),
            confidence: 0.0,
        }
    }
}

/// The fields that count towards the fallback confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeField {
    Name,
    Email,
    Phone,
    Location,
    Skills,
    Summary,
}

impl ResumeField {
    pub const ALL: [ResumeField; 6] = [
        ResumeField::Name,
        ResumeField::Email,
        ResumeField::Phone,
        ResumeField::Location,
        ResumeField::Skills,
        ResumeField::Summary,
    ];
}

/// Output of the local extractor: the record plus the scored fields that no
/// strategy matched, in `ResumeField::ALL` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub data: ParsedResumeData,
    pub missing_fields: Vec<ResumeField>,
}

impl Extraction {
    pub fn fields_found(&self) -> usize {
        ResumeField::ALL.len() - self.missing_fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_sentinels() {
        let data = ParsedResumeData::default();
        assert_eq!(data.first_name, "Unknown");
        assert_eq!(data.last_name, "Person");
        assert_eq!(data.email, NO_EMAIL);
        assert!(data.skills.is_empty());
        assert_eq!(data.confidence, 0.0);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ParsedResumeData::default()).unwrap();
        assert!(value.get("firstName").is_some());
        assert!(value.get("lastName").is_some());
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn test_partial_payload_fills_missing_fields_with_sentinels() {
        let json = r#"{
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "skills": ["Mathematics", "Analytical Engines"],
            "confidence": 0.92
        }"#;
        let data: ParsedResumeData = serde_json::from_str(json).unwrap();
        assert_eq!(data.first_name, "Ada");
        assert_eq!(data.email, "ada@example.com");
        assert_eq!(data.phone, NO_PHONE);
        assert_eq!(data.location, NO_LOCATION);
        assert_eq!(data.education, NO_EDUCATION);
        assert_eq!(data.skills.len(), 2);
        assert!((data.confidence - 0.92).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resume_field_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&ResumeField::Location).unwrap(),
            r#""location""#
        );
        let field: ResumeField = serde_json::from_str(r#""skills""#).unwrap();
        assert_eq!(field, ResumeField::Skills);
    }
}
