//! JSON parsing helpers for model responses
//!
//! Models often wrap the JSON payload in prose or markdown fences. These
//! helpers locate the payload, check its shape, and for coaching salvage
//! what they can when the shape is wrong.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{CoachingAdvice, Habit, Milestone, Priority, ProgressAnalysis};

/// Advice shown when nothing usable could be salvaged from a coaching reply
pub const DEFAULT_ADVICE: &str =
    "Unable to parse AI response. Please try again for personalized coaching advice.";

/// `"advice": "..."` even when the surrounding JSON is broken
static ADVICE_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)advice["\s]*:["\s]*"([^"]+)""#).expect("valid advice field pattern")
});

/// First sentence after an advice-like word
static ADVICE_SENTENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:advice|guidance|recommendation)[\s\S]*?([A-Z][^.!?]*[.!?])")
        .expect("valid advice sentence pattern")
});

/// Truncate long model output for error messages
fn truncate(text: &str) -> String {
    if text.chars().count() > 200 {
        let head: String = text.chars().take(200).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// The outermost `{...}` span of `response`, if any
fn json_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| &response[start..=end])
}

/// Remove a surrounding markdown code fence (```json ... ``` or ``` ... ```)
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.trim().strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse a progress estimate
///
/// Text without a parseable JSON object is `MalformedResponse`; JSON whose
/// `overall_progress` or `progress_increase` is not a number is
/// `InvalidData`. The result is not yet normalized.
pub fn parse_progress_analysis(response: &str) -> Result<ProgressAnalysis> {
    let response = response.trim();
    let json_str = json_span(response).ok_or_else(|| {
        Error::MalformedResponse(format!("No JSON found | Raw: {}", truncate(response)))
    })?;

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::MalformedResponse(format!("{} | Raw: {}", e, truncate(json_str)))
    })?;

    let number = |field: &str| {
        value.get(field).and_then(Value::as_f64).ok_or_else(|| {
            Error::InvalidData(format!("Progress response has no numeric {}", field))
        })
    };
    let text = |field: &str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(ProgressAnalysis {
        overall_progress: number("overall_progress")?,
        progress_increase: number("progress_increase")?,
        reasoning: text("reasoning"),
        feedback: text("feedback"),
    })
}

/// Parse coaching advice strictly
///
/// Requires `milestones` and `habits` arrays and a non-empty `advice`.
pub fn parse_coaching_advice(response: &str) -> Result<CoachingAdvice> {
    let cleaned = strip_code_fence(response);
    let json_str = json_span(cleaned).unwrap_or(cleaned);

    let value: Value = serde_json::from_str(json_str).map_err(|e| {
        Error::MalformedResponse(format!("{} | Raw: {}", e, truncate(json_str)))
    })?;

    let has_array = |field: &str| value.get(field).is_some_and(Value::is_array);
    let has_advice = value
        .get("advice")
        .and_then(Value::as_str)
        .is_some_and(|a| !a.trim().is_empty());
    if !has_array("milestones") || !has_array("habits") || !has_advice {
        return Err(Error::InvalidData("Invalid coaching response structure".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::InvalidData(format!("Invalid coaching response: {}", e)))
}

/// Parse coaching advice, salvaging the advice text and filling default
/// milestones and habits when the reply is not well-formed
pub fn coaching_from_response(response: &str) -> CoachingAdvice {
    match parse_coaching_advice(response) {
        Ok(advice) => advice,
        Err(e) => {
            tracing::warn!(error = %e, raw = %truncate(response), "Failed to parse coaching response");
            fallback_coaching(extract_advice(response))
        }
    }
}

/// Best-effort advice text from a malformed coaching reply
pub fn extract_advice(response: &str) -> Option<String> {
    ADVICE_FIELD
        .captures(response)
        .or_else(|| ADVICE_SENTENCE.captures(response))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|advice| !advice.is_empty())
}

/// Generic coaching plan used when the model reply cannot be parsed
pub fn fallback_coaching(advice: Option<String>) -> CoachingAdvice {
    let milestone = |title: &str, description: &str, timeline: &str, priority| Milestone {
        title: title.to_string(),
        description: description.to_string(),
        timeline: timeline.to_string(),
        priority,
    };
    let habit = |name: &str, description: &str, frequency: &str, impact: &str| Habit {
        name: name.to_string(),
        description: description.to_string(),
        frequency: frequency.to_string(),
        impact: impact.to_string(),
    };

    CoachingAdvice {
        milestones: vec![
            milestone(
                "Break down your goal",
                "Divide your goal into smaller, manageable steps",
                "1 week",
                Priority::High,
            ),
            milestone(
                "Set weekly targets",
                "Create specific weekly objectives to track progress",
                "ongoing",
                Priority::High,
            ),
            milestone(
                "Track progress regularly",
                "Monitor and adjust your approach based on results",
                "ongoing",
                Priority::Medium,
            ),
        ],
        habits: vec![
            habit(
                "Daily practice",
                "Dedicate time each day to work toward your goal",
                "daily",
                "high",
            ),
            habit(
                "Weekly review",
                "Reflect on progress and adjust strategies",
                "weekly",
                "medium",
            ),
            habit(
                "Monthly assessment",
                "Evaluate overall progress and set new targets",
                "monthly",
                "high",
            ),
        ],
        advice: advice.unwrap_or_else(|| DEFAULT_ADVICE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_with_surrounding_text() {
        let response = r#"Here you go: {"overall_progress": 45, "progress_increase": 5, "reasoning": "Longer run", "feedback": "Nice"} Hope it helps"#;
        let analysis = parse_progress_analysis(response).unwrap();
        assert_eq!(analysis.overall_progress, 45.0);
        assert_eq!(analysis.progress_increase, 5.0);
        assert_eq!(analysis.reasoning, "Longer run");
        assert_eq!(analysis.feedback, "Nice");
    }

    #[test]
    fn test_parse_progress_missing_text_fields_default() {
        let analysis =
            parse_progress_analysis(r#"{"overall_progress": 12.5, "progress_increase": 2}"#)
                .unwrap();
        assert_eq!(analysis.overall_progress, 12.5);
        assert!(analysis.reasoning.is_empty());
    }

    #[test]
    fn test_parse_progress_not_json_is_malformed() {
        assert!(matches!(
            parse_progress_analysis("I think you made great progress!"),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_progress_analysis("{overall_progress: lots}"),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_progress_wrong_shape_is_invalid() {
        assert!(matches!(
            parse_progress_analysis(r#"{"overall_progress": "45%", "progress_increase": 5}"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            parse_progress_analysis(r#"{"progress_increase": 5}"#),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_coaching_in_code_fence() {
        let response = "```json\n{\"milestones\": [{\"title\": \"Run 15 miles\", \"description\": \"Long run\", \"timeline\": \"2 weeks\", \"priority\": \"high\"}], \"habits\": [{\"name\": \"Stretch\", \"description\": \"Daily\", \"frequency\": \"daily\", \"impact\": \"medium\"}], \"advice\": \"Build mileage slowly.\"}\n```";
        let advice = parse_coaching_advice(response).unwrap();
        assert_eq!(advice.milestones.len(), 1);
        assert_eq!(advice.milestones[0].priority, Priority::High);
        assert_eq!(advice.habits[0].name, "Stretch");
        assert_eq!(advice.advice, "Build mileage slowly.");
    }

    #[test]
    fn test_parse_coaching_requires_structure() {
        assert!(parse_coaching_advice(r#"{"milestones": [], "habits": []}"#).is_err());
        assert!(parse_coaching_advice(r#"{"milestones": [], "habits": [], "advice": ""}"#).is_err());
        // empty lists are acceptable when advice is present
        let advice =
            parse_coaching_advice(r#"{"milestones": [], "habits": [], "advice": "Rest."}"#)
                .unwrap();
        assert!(advice.milestones.is_empty());
    }

    #[test]
    fn test_extract_advice_from_truncated_json() {
        let response = r#"{"milestones": [{"title": "X"}], "advice": "Focus on consistency first", "habits": [{"name"#;
        assert_eq!(
            extract_advice(response).as_deref(),
            Some("Focus on consistency first")
        );
    }

    #[test]
    fn test_extract_advice_from_prose() {
        let response = "My recommendation: Start with three short runs a week. Then add distance.";
        assert_eq!(
            extract_advice(response).as_deref(),
            Some("Start with three short runs a week.")
        );
        assert_eq!(extract_advice("nothing useful here"), None);
    }

    #[test]
    fn test_coaching_from_response_falls_back() {
        let advice = coaching_from_response("Sorry, I can't help with that");
        assert_eq!(advice.milestones.len(), 3);
        assert_eq!(advice.habits.len(), 3);
        assert_eq!(advice.milestones[0].title, "Break down your goal");
        assert_eq!(advice.milestones[2].priority, Priority::Medium);
        assert_eq!(advice.habits[2].frequency, "monthly");
        assert_eq!(advice.advice, DEFAULT_ADVICE);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
