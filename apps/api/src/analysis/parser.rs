//! Response parser — turns a model reply into a typed scorecard or a raw fallback.
//!
//! The reply is expected to open with a fenced JSON block followed by Markdown
//! feedback under `###` headings. Malformed output is never an error here:
//! every failure becomes `ParseResult::Unparsed` carrying the reply verbatim,
//! so the caller always has something to render.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::analysis::feedback::{split_sections, QualitativeFeedback};
use crate::analysis::schema::{SchemaVariant, ScoreSet, SectionDistribution};

lazy_static! {
    /// Three backticks, `json`, newline, content (non-greedy, may span lines),
    /// newline, three backticks. Versioned together with
    /// `llm_client::prompts::FENCED_JSON_INSTRUCTION`.
    static ref JSON_FENCE: Regex =
        Regex::new(r"(?s)```json\n(.*?)\n```").expect("JSON fence pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailureKind {
    /// No fenced JSON block in the expected format.
    NoJsonBlockFound,
    /// A fenced block was found but its content is not valid JSON.
    JsonDecodeError,
    /// Valid JSON, but not shaped like the requested schema.
    UnexpectedShape,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseResult {
    Parsed {
        scores: ScoreSet,
        /// Present only for `SchemaVariant::WithSectionAnalysis`.
        #[serde(skip_serializing_if = "Option::is_none")]
        sections: Option<SectionDistribution>,
        feedback: QualitativeFeedback,
    },
    Unparsed {
        raw_text: String,
        reason: ParseFailureKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl ParseResult {
    pub fn failure_kind(&self) -> Option<ParseFailureKind> {
        match self {
            ParseResult::Parsed { .. } => None,
            ParseResult::Unparsed { reason, .. } => Some(*reason),
        }
    }
}

/// Parses a trimmed model reply against the schema the prompt asked for.
pub fn parse(raw_reply: &str, schema: SchemaVariant) -> ParseResult {
    let unparsed = |reason, detail| ParseResult::Unparsed {
        raw_text: raw_reply.to_string(),
        reason,
        detail,
    };

    let Some(captures) = JSON_FENCE.captures(raw_reply) else {
        return unparsed(ParseFailureKind::NoJsonBlockFound, None);
    };
    let (Some(block), Some(content)) = (captures.get(0), captures.get(1)) else {
        return unparsed(ParseFailureKind::NoJsonBlockFound, None);
    };

    let decoded: Value = match serde_json::from_str(content.as_str()) {
        Ok(value) => value,
        Err(e) => return unparsed(ParseFailureKind::JsonDecodeError, Some(e.to_string())),
    };

    let (scores, sections) = match extract_payload(decoded, schema) {
        Ok(payload) => payload,
        Err(detail) => return unparsed(ParseFailureKind::UnexpectedShape, Some(detail)),
    };

    let feedback = split_sections(raw_reply[block.end()..].trim());

    ParseResult::Parsed {
        scores,
        sections,
        feedback,
    }
}

fn extract_payload(
    decoded: Value,
    schema: SchemaVariant,
) -> Result<(ScoreSet, Option<SectionDistribution>), String> {
    let Value::Object(mut root) = decoded else {
        return Err(format!(
            "expected a JSON object, found {}",
            json_type_name(&decoded)
        ));
    };

    match schema {
        SchemaVariant::Simple => Ok((ScoreSet::from_map(root), None)),
        SchemaVariant::WithSectionAnalysis => {
            let scores = take_object(&mut root, "scores")?;
            let sections = take_object(&mut root, "section_analysis")?;
            Ok((
                ScoreSet::from_map(scores),
                Some(SectionDistribution::from_map(&sections)),
            ))
        }
    }
}

/// Removes `key` from `root`; absent or null reads as an empty object.
fn take_object(root: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>, String> {
    match root.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(format!(
            "expected '{key}' to be an object, found {}",
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::schema::ScoreName;

    const FULL_REPLY: &str = "```json\n{\"Clarity_and_Formatting\":8,\"Impact_and_Achievements\":6,\"ATS_Friendliness\":7,\"Job_Fit\":9}\n```\n### ✅ Key Strengths\nGood structure.\n### 💡 Areas for Improvement\nAdd metrics.\n### 🤖 ATS & Keyword Optimization\nAdd keyword X.";

    fn expect_parsed(
        result: ParseResult,
    ) -> (ScoreSet, Option<SectionDistribution>, QualitativeFeedback) {
        match result {
            ParseResult::Parsed {
                scores,
                sections,
                feedback,
            } => (scores, sections, feedback),
            other => panic!("expected Parsed, got {other:?}"),
        }
    }

    #[test]
    fn test_end_to_end_simple_reply() {
        let (scores, sections, feedback) = expect_parsed(parse(FULL_REPLY, SchemaVariant::Simple));

        assert_eq!(scores.get(ScoreName::ClarityAndFormatting), 8);
        assert_eq!(scores.get(ScoreName::ImpactAndAchievements), 6);
        assert_eq!(scores.get(ScoreName::AtsFriendliness), 7);
        assert_eq!(scores.get(ScoreName::JobFit), 9);
        assert_eq!(scores.len(), 4);
        assert!(sections.is_none());

        let titles: Vec<&str> = feedback
            .sections()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "✅ Key Strengths",
                "💡 Areas for Improvement",
                "🤖 ATS & Keyword Optimization"
            ]
        );
        assert_eq!(feedback.get("✅ Key Strengths"), Some("Good structure."));
        assert_eq!(feedback.get("💡 Areas for Improvement"), Some("Add metrics."));
        assert_eq!(
            feedback.get("🤖 ATS & Keyword Optimization"),
            Some("Add keyword X.")
        );
    }

    #[test]
    fn test_every_source_key_is_preserved() {
        let reply = "```json\n{\"Job_Fit\": 11, \"Extra_Metric\": 3, \"Clarity_and_Formatting\": 0}\n```";
        let (scores, _, feedback) = expect_parsed(parse(reply, SchemaVariant::Simple));

        assert_eq!(scores.len(), 3);
        assert_eq!(scores.get(ScoreName::JobFit), 11);
        assert_eq!(scores.raw("Extra_Metric"), Some(&Value::from(3)));
        assert_eq!(scores.get(ScoreName::ClarityAndFormatting), 0);
        assert_eq!(feedback.len(), 0);
    }

    #[test]
    fn test_no_fenced_block_returns_raw_text_unchanged() {
        let reply = "Here is my review.\n### ✅ Key Strengths\nNice.";
        match parse(reply, SchemaVariant::Simple) {
            ParseResult::Unparsed {
                raw_text,
                reason,
                detail,
            } => {
                assert_eq!(raw_text, reply);
                assert_eq!(reason, ParseFailureKind::NoJsonBlockFound);
                assert!(detail.is_none());
            }
            other => panic!("expected Unparsed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_reply_is_unparsed() {
        let result = parse("", SchemaVariant::WithSectionAnalysis);
        assert_eq!(
            result.failure_kind(),
            Some(ParseFailureKind::NoJsonBlockFound)
        );
    }

    #[test]
    fn test_untagged_fence_is_not_accepted() {
        let reply = "```\n{\"Job_Fit\": 5}\n```";
        assert_eq!(
            parse(reply, SchemaVariant::Simple).failure_kind(),
            Some(ParseFailureKind::NoJsonBlockFound)
        );
    }

    #[test]
    fn test_fence_requires_newlines_around_content() {
        let reply = "```json {\"Job_Fit\": 5} ```";
        assert_eq!(
            parse(reply, SchemaVariant::Simple).failure_kind(),
            Some(ParseFailureKind::NoJsonBlockFound)
        );
    }

    #[test]
    fn test_truncated_json_is_decode_error() {
        let reply = "```json\n{\"Clarity_and_Formatting\": 8, \"Job_Fit\": \n```\n### A\nfoo";
        match parse(reply, SchemaVariant::Simple) {
            ParseResult::Unparsed {
                raw_text,
                reason,
                detail,
            } => {
                assert_eq!(reason, ParseFailureKind::JsonDecodeError);
                assert_eq!(raw_text, reply);
                assert!(detail.is_some());
            }
            other => panic!("expected Unparsed, got {other:?}"),
        }
    }

    #[test]
    fn test_top_level_array_is_unexpected_shape() {
        let reply = "```json\n[8, 6, 7, 9]\n```";
        match parse(reply, SchemaVariant::Simple) {
            ParseResult::Unparsed { reason, detail, .. } => {
                assert_eq!(reason, ParseFailureKind::UnexpectedShape);
                assert!(detail.unwrap().contains("an array"));
            }
            other => panic!("expected Unparsed, got {other:?}"),
        }
    }

    #[test]
    fn test_scores_not_an_object_is_unexpected_shape() {
        let reply = "```json\n{\"scores\": [1, 2], \"section_analysis\": {}}\n```";
        assert_eq!(
            parse(reply, SchemaVariant::WithSectionAnalysis).failure_kind(),
            Some(ParseFailureKind::UnexpectedShape)
        );
    }

    #[test]
    fn test_missing_score_defaults_to_zero_with_section_analysis() {
        let reply = "```json\n{\"scores\": {\"Clarity_and_Formatting\": 7}, \"section_analysis\": {}}\n```";
        let (scores, sections, _) = expect_parsed(parse(reply, SchemaVariant::WithSectionAnalysis));

        assert_eq!(scores.get(ScoreName::ClarityAndFormatting), 7);
        assert_eq!(scores.get(ScoreName::AtsFriendliness), 0);
        assert!(sections.expect("section analysis requested").is_empty());
    }

    #[test]
    fn test_absent_nested_objects_default_to_empty() {
        let reply = "```json\n{}\n```\n### A\nfoo";
        let (scores, sections, feedback) =
            expect_parsed(parse(reply, SchemaVariant::WithSectionAnalysis));

        assert_eq!(scores.len(), 0);
        assert_eq!(sections, Some(SectionDistribution::default()));
        assert_eq!(feedback.get("A"), Some("foo"));
    }

    #[test]
    fn test_section_analysis_is_read_in_model_order() {
        let reply = "```json\n{\n  \"scores\": {\"Job_Fit\": 6},\n  \"section_analysis\": {\"Experience\": 50, \"Skills\": 30, \"Education\": 30}\n}\n```";
        let (scores, sections, _) = expect_parsed(parse(reply, SchemaVariant::WithSectionAnalysis));
        let sections = sections.unwrap();

        assert_eq!(scores.get(ScoreName::JobFit), 6);
        let labels: Vec<&str> = sections.shares().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Experience", "Skills", "Education"]);
        // 110 in total: reported as-is
        assert!((sections.total() - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_simple_schema_ignores_nested_layout() {
        // the caller picks the schema; a nested payload under Simple is just odd keys
        let reply = "```json\n{\"scores\": {\"Job_Fit\": 6}}\n```";
        let (scores, sections, _) = expect_parsed(parse(reply, SchemaVariant::Simple));
        assert_eq!(scores.get(ScoreName::JobFit), 0);
        assert!(scores.raw("scores").is_some());
        assert!(sections.is_none());
    }

    #[test]
    fn test_first_fenced_block_wins() {
        let reply = "```json\n{\"Job_Fit\": 3}\n```\n### Notes\nsee below\n```json\n{\"Job_Fit\": 9}\n```";
        let (scores, _, feedback) = expect_parsed(parse(reply, SchemaVariant::Simple));
        assert_eq!(scores.get(ScoreName::JobFit), 3);
        assert_eq!(
            feedback.get("Notes"),
            Some("see below\n```json\n{\"Job_Fit\": 9}\n```")
        );
    }

    #[test]
    fn test_multiline_json_and_preamble_before_fence() {
        let reply = "Sure! Here you go:\n```json\n{\n  \"Clarity_and_Formatting\": 5,\n  \"Job_Fit\": 4\n}\n```\n\n### 💡 Areas for Improvement\n- Quantify results";
        let (scores, _, feedback) = expect_parsed(parse(reply, SchemaVariant::Simple));
        assert_eq!(scores.get(ScoreName::ClarityAndFormatting), 5);
        assert_eq!(
            feedback.get("💡 Areas for Improvement"),
            Some("- Quantify results")
        );
        assert_eq!(feedback.len(), 1);
    }

    #[test]
    fn test_parse_is_idempotent() {
        for schema in [SchemaVariant::Simple, SchemaVariant::WithSectionAnalysis] {
            for reply in [FULL_REPLY, "no json here", "```json\n{oops\n```", ""] {
                assert_eq!(parse(reply, schema), parse(reply, schema));
            }
        }
    }

    #[test]
    fn test_parsed_result_serializes_with_status_tag() {
        let value = serde_json::to_value(parse(FULL_REPLY, SchemaVariant::Simple)).unwrap();
        assert_eq!(value["status"], "parsed");
        assert_eq!(value["scores"]["Job_Fit"], 9);
        assert_eq!(value["feedback"]["✅ Key Strengths"], "Good structure.");
        assert!(value.get("sections").is_none());

        let value = serde_json::to_value(parse("plain", SchemaVariant::Simple)).unwrap();
        assert_eq!(value["status"], "unparsed");
        assert_eq!(value["reason"], "no_json_block_found");
        assert_eq!(value["raw_text"], "plain");
    }
}
