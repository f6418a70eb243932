// src/llm/schema.rs

//! Issue input and triage decision shapes, their construction-time validation,
//! and the JSON schema the completion endpoint is constrained to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use super::taxonomy::{Category, Priority, Severity};

/// A structural constraint failed at construction time. Nothing is coerced or
/// defaulted; the offending field is named in the message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} '{value}' is not a recognized value")]
    UnknownVariant { field: &'static str, value: String },
    #[error("confidence {value} is outside the closed interval [0.0, 1.0]")]
    ConfidenceOutOfRange { value: f64 },
}

/// An incoming issue report, validated at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawIssueInput")]
pub struct IssueInput {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawIssueInput {
    title: String,
    body: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawIssueInput> for IssueInput {
    type Error = ValidationError;

    fn try_from(raw: RawIssueInput) -> Result<Self, Self::Error> {
        if raw.title.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "title" });
        }
        if raw.body.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "body" });
        }
        Ok(Self {
            title: raw.title,
            body: raw.body,
            labels: raw.labels,
            author: raw.author,
            created_at: raw.created_at,
        })
    }
}

impl IssueInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ValidationError> {
        RawIssueInput {
            title: title.into(),
            body: body.into(),
            labels: Vec::new(),
            author: None,
            created_at: None,
        }
        .try_into()
    }
}

/// The structured classification produced by the completion endpoint.
/// Enum membership is enforced by the typed fields; the confidence range is
/// enforced on every construction path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawDecision")]
pub struct TriageDecision {
    pub severity: Severity,
    pub category: Category,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
struct RawDecision {
    severity: String,
    category: String,
    priority: String,
    labels: Vec<String>,
    reasoning: String,
    confidence: f64,
}

impl TryFrom<RawDecision> for TriageDecision {
    type Error = ValidationError;

    fn try_from(raw: RawDecision) -> Result<Self, Self::Error> {
        let severity = raw
            .severity
            .parse::<Severity>()
            .map_err(|_| ValidationError::UnknownVariant {
                field: "severity",
                value: raw.severity.clone(),
            })?;
        let category = raw
            .category
            .parse::<Category>()
            .map_err(|_| ValidationError::UnknownVariant {
                field: "category",
                value: raw.category.clone(),
            })?;
        let priority = raw
            .priority
            .parse::<Priority>()
            .map_err(|_| ValidationError::UnknownVariant {
                field: "priority",
                value: raw.priority.clone(),
            })?;

        TriageDecision::new(
            severity,
            category,
            priority,
            raw.labels,
            raw.reasoning,
            raw.confidence,
        )
    }
}

impl TriageDecision {
    pub fn new(
        severity: Severity,
        category: Category,
        priority: Priority,
        labels: Vec<String>,
        reasoning: String,
        confidence: f64,
    ) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::ConfidenceOutOfRange { value: confidence });
        }
        Ok(Self {
            severity,
            category,
            priority,
            labels,
            reasoning,
            confidence,
        })
    }

    /// Strict parse of a model response body. Any field failing its
    /// type/enum/range constraint fails the whole parse; a partial decision
    /// is never returned.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// JSON schema for the schema-constrained response format. Enum value lists
/// come from the taxonomy constants, same source the prompt guidelines use.
pub fn decision_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "severity": {
                "type": "string",
                "enum": Severity::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
                "description": "Impact severity of the issue"
            },
            "category": {
                "type": "string",
                "enum": Category::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
                "description": "Kind of work the issue calls for"
            },
            "priority": {
                "type": "string",
                "enum": Priority::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
                "description": "Scheduling priority"
            },
            "labels": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Suggested repository labels"
            },
            "reasoning": {
                "type": "string",
                "description": "Brief explanation of the classification"
            },
            "confidence": {
                "type": "number",
                "minimum": 0.0,
                "maximum": 1.0,
                "description": "Classifier confidence in [0, 1]"
            }
        },
        "required": ["severity", "category", "priority", "labels", "reasoning", "confidence"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_input_accepts_required_fields() {
        let issue = IssueInput::new("Test Title", "Test Body").unwrap();

        assert_eq!(issue.title, "Test Title");
        assert_eq!(issue.body, "Test Body");
        assert!(issue.labels.is_empty());
    }

    #[test]
    fn test_issue_input_rejects_missing_title() {
        let err = serde_json::from_str::<IssueInput>(r#"{"body": "Test Body"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("title"), "error should name the field: {err}");
    }

    #[test]
    fn test_issue_input_rejects_missing_body() {
        let err = serde_json::from_str::<IssueInput>(r#"{"title": "Test Title"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("body"), "error should name the field: {err}");
    }

    #[test]
    fn test_issue_input_rejects_empty_fields() {
        let err = IssueInput::new("", "Test Body").unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "title" });

        let err = IssueInput::new("Test Title", "   ").unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "body" });
    }

    #[test]
    fn test_issue_input_optional_metadata() {
        let issue: IssueInput = serde_json::from_str(
            r#"{"title": "T", "body": "B", "labels": ["bug"], "author": "octocat"}"#,
        )
        .unwrap();
        assert_eq!(issue.labels, vec!["bug"]);
        assert_eq!(issue.author.as_deref(), Some("octocat"));
        assert!(issue.created_at.is_none());
    }

    #[test]
    fn test_decision_parses_canonical_response() {
        let content = r#"{"severity":"low","category":"feature","priority":"P0","labels":["test","test2"],"reasoning":"Test reasoning","confidence":0.95}"#;

        let decision = TriageDecision::from_json(content).unwrap();
        assert_eq!(decision.severity, Severity::Low);
        assert_eq!(decision.category, Category::Feature);
        assert_eq!(decision.priority, Priority::P0);
        assert_eq!(decision.labels, vec!["test", "test2"]);
        assert_eq!(decision.reasoning, "Test reasoning");
        assert_eq!(decision.confidence, 0.95);
    }

    #[test]
    fn test_decision_rejects_unknown_severity() {
        let content = r#"{"severity":"urgent","category":"bug","priority":"P1","labels":[],"reasoning":"r","confidence":0.5}"#;
        let err = TriageDecision::from_json(content).unwrap_err().to_string();
        assert!(err.contains("severity"), "error should name the field: {err}");
    }

    #[test]
    fn test_decision_rejects_unknown_category_and_priority() {
        let content = r#"{"severity":"low","category":"question","priority":"P1","labels":[],"reasoning":"r","confidence":0.5}"#;
        let err = TriageDecision::from_json(content).unwrap_err().to_string();
        assert!(err.contains("category"), "{err}");

        let content = r#"{"severity":"low","category":"bug","priority":"P9","labels":[],"reasoning":"r","confidence":0.5}"#;
        let err = TriageDecision::from_json(content).unwrap_err().to_string();
        assert!(err.contains("priority"), "{err}");
    }

    #[test]
    fn test_decision_rejects_confidence_out_of_range() {
        let content = r#"{"severity":"low","category":"bug","priority":"P1","labels":[],"reasoning":"r","confidence":1.5}"#;
        let err = TriageDecision::from_json(content).unwrap_err().to_string();
        assert!(err.contains("confidence"), "{err}");

        let err = TriageDecision::new(
            Severity::Low,
            Category::Bug,
            Priority::P1,
            vec![],
            "r".into(),
            -0.1,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::ConfidenceOutOfRange { value: -0.1 });
    }

    #[test]
    fn test_decision_rejects_partial_object() {
        // No best-effort parse: a missing field fails the whole decision.
        let content = r#"{"severity":"low","category":"bug","priority":"P1"}"#;
        assert!(TriageDecision::from_json(content).is_err());
    }

    #[test]
    fn test_schema_enums_track_taxonomy() {
        let schema = decision_schema();

        let severities = schema["properties"]["severity"]["enum"].as_array().unwrap();
        assert_eq!(severities.len(), Severity::ALL.len());
        assert!(severities.contains(&json!("critical")));

        let priorities = schema["properties"]["priority"]["enum"].as_array().unwrap();
        assert_eq!(priorities.len(), Priority::ALL.len());
        assert!(priorities.contains(&json!("P0")));

        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("confidence")));
    }
}
