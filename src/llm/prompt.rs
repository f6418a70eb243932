// src/llm/prompt.rs

//! System instruction for the triage call. Guideline blocks are generated
//! from the taxonomy enums rather than written out, so the text the model
//! sees always matches what the validator accepts.

use std::fmt::Write;

use super::schema::IssueInput;
use super::taxonomy::{Category, Priority, Severity};

pub fn triage_system_prompt() -> String {
    let mut prompt = String::from(
        "You are an expert GitHub issue classifier. Analyze issues and categorize them.\n\n",
    );

    prompt.push_str("SEVERITY GUIDELINES:\n");
    for severity in Severity::ALL {
        let _ = writeln!(prompt, "- {}: {}", severity, severity.guideline());
    }

    prompt.push_str("\nCATEGORY GUIDELINES:\n");
    for category in Category::ALL {
        let _ = writeln!(prompt, "- {}: {}", category, category.guideline());
    }

    prompt.push_str("\nPRIORITY GUIDELINES:\n");
    for priority in Priority::ALL {
        let _ = writeln!(prompt, "- {}: {}", priority, priority.guideline());
    }

    let _ = write!(
        prompt,
        r#"
Return your analysis as JSON matching this exact structure:
{{
  "severity": "{}",
  "category": "{}",
  "priority": "{}",
  "labels": ["array", "of", "labels"],
  "reasoning": "Brief explanation of classification",
  "confidence": 0.95
}}
"#,
        Severity::ALL.map(|v| v.as_str()).join("|"),
        Category::ALL.map(|v| v.as_str()).join("|"),
        Priority::ALL.map(|v| v.as_str()).join("|"),
    );

    prompt
}

/// User message embedding the issue verbatim.
pub fn user_message(issue: &IssueInput) -> String {
    format!("Issue Title: {}\nIssue Body: {}", issue.title, issue.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_every_taxonomy_value() {
        let prompt = triage_system_prompt();

        for severity in Severity::ALL {
            assert!(prompt.contains(severity.as_str()));
            assert!(prompt.contains(severity.guideline()));
        }
        for category in Category::ALL {
            assert!(prompt.contains(category.guideline()));
        }
        for priority in Priority::ALL {
            assert!(prompt.contains(priority.as_str()));
        }
    }

    #[test]
    fn test_user_message_embeds_issue_verbatim() {
        let issue = IssueInput::new("Login broken", "500 on POST /login").unwrap();
        let message = user_message(&issue);

        assert_eq!(message, "Issue Title: Login broken\nIssue Body: 500 on POST /login");
    }
}
