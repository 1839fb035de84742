//! Presentation view model for an analysis: either a scorecard or the raw
//! reply with an explanatory notice. Always renderable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::parser::{ParseFailureKind, ParseResult};
use crate::analysis::schema::{SchemaVariant, ScoreName, ScoreSet};
use crate::analysis::service::AnalysisReport;
use crate::report::visuals::{build_visual_summary, VisualSummary};

/// Feedback panels in tab order: (section title, placeholder when absent).
pub const FEEDBACK_PANELS: [(&str, &str); 3] = [
    (
        "💡 Areas for Improvement",
        "No specific improvement areas identified.",
    ),
    ("✅ Key Strengths", "No specific strengths identified."),
    (
        "🤖 ATS & Keyword Optimization",
        "No specific ATS tips identified.",
    ),
];

const JOB_FIT_HELP: &str = "How well the resume matches the job description.";

#[derive(Debug, Clone, Serialize)]
pub struct MetricView {
    pub key: &'static str,
    pub label: &'static str,
    /// Raw model value, "0" when absent.
    pub value: String,
    /// `"{value}/10"`
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackPanel {
    pub title: String,
    pub body: String,
    /// True when the model produced no section with this title.
    pub is_placeholder: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorecardView {
    pub metrics: Vec<MetricView>,
    pub panels: Vec<FeedbackPanel>,
    /// Sections the model added beyond the three panels, in reply order.
    pub additional_sections: Vec<FeedbackPanel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visuals: Option<VisualSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawFallbackView {
    pub notice: String,
    pub reason: ParseFailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub raw_markdown: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Scorecard(ScorecardView),
    RawFallback(RawFallbackView),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub model: String,
    pub schema: SchemaVariant,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl AnalysisView {
    /// Builds the view. Visual summaries are included for the
    /// section-analysis schema only.
    pub fn from_report(
        report: AnalysisReport,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Self {
        let outcome = match report.result {
            ParseResult::Parsed {
                scores,
                sections,
                feedback,
            } => {
                let visuals = report.schema.includes_section_analysis().then(|| {
                    build_visual_summary(&scores, sections.as_ref(), resume_text, job_description)
                });

                let panels = FEEDBACK_PANELS
                    .iter()
                    .map(|(title, placeholder)| FeedbackPanel {
                        title: title.to_string(),
                        body: feedback.get_or(title, placeholder).to_string(),
                        is_placeholder: feedback.get(title).is_none(),
                    })
                    .collect();

                let additional_sections = feedback
                    .sections()
                    .iter()
                    .filter(|s| !FEEDBACK_PANELS.iter().any(|(title, _)| *title == s.title))
                    .map(|s| FeedbackPanel {
                        title: s.title.clone(),
                        body: s.body.clone(),
                        is_placeholder: false,
                    })
                    .collect();

                AnalysisOutcome::Scorecard(ScorecardView {
                    metrics: metrics(&scores),
                    panels,
                    additional_sections,
                    visuals,
                })
            }
            ParseResult::Unparsed {
                raw_text,
                reason,
                detail,
            } => AnalysisOutcome::RawFallback(RawFallbackView {
                notice: fallback_notice(reason).to_string(),
                reason,
                detail,
                raw_markdown: raw_text,
            }),
        };

        AnalysisView {
            analysis_id: report.analysis_id,
            analyzed_at: report.analyzed_at,
            model: report.model,
            schema: report.schema,
            outcome,
        }
    }
}

pub fn metrics(scores: &ScoreSet) -> Vec<MetricView> {
    ScoreName::ALL
        .iter()
        .map(|&name| {
            let value = scores.display(name);
            MetricView {
                key: name.key(),
                label: name.label(),
                display: format!("{value}/10"),
                value,
                help: (name == ScoreName::JobFit).then_some(JOB_FIT_HELP),
            }
        })
        .collect()
}

pub fn fallback_notice(reason: ParseFailureKind) -> &'static str {
    match reason {
        ParseFailureKind::NoJsonBlockFound => {
            "Could not parse the analysis scores. Displaying raw feedback."
        }
        ParseFailureKind::JsonDecodeError | ParseFailureKind::UnexpectedShape => {
            "Error parsing the AI's response. Displaying the full response instead."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parser::parse;

    fn report(reply: &str, schema: SchemaVariant) -> AnalysisReport {
        AnalysisReport {
            analysis_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            model: "stub-model".to_string(),
            schema,
            result: parse(reply, schema),
        }
    }

    fn scorecard(view: AnalysisView) -> ScorecardView {
        match view.outcome {
            AnalysisOutcome::Scorecard(card) => card,
            other => panic!("expected scorecard, got {other:?}"),
        }
    }

    #[test]
    fn test_metrics_render_out_of_ten_with_zero_default() {
        let reply = "```json\n{\"Clarity_and_Formatting\": 8, \"Job_Fit\": 9}\n```";
        let card = scorecard(AnalysisView::from_report(
            report(reply, SchemaVariant::Simple),
            "resume",
            None,
        ));

        let displays: Vec<&str> = card.metrics.iter().map(|m| m.display.as_str()).collect();
        assert_eq!(displays, vec!["8/10", "0/10", "0/10", "9/10"]);
        assert_eq!(card.metrics[3].help, Some(JOB_FIT_HELP));
        assert!(card.metrics[0].help.is_none());
    }

    #[test]
    fn test_panels_follow_tab_order_with_placeholders() {
        let reply = "```json\n{}\n```\n### ✅ Key Strengths\nClear layout.\n### Bonus Tips\nUse a summary.";
        let card = scorecard(AnalysisView::from_report(
            report(reply, SchemaVariant::Simple),
            "resume",
            None,
        ));

        let titles: Vec<&str> = card.panels.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "💡 Areas for Improvement",
                "✅ Key Strengths",
                "🤖 ATS & Keyword Optimization"
            ]
        );
        assert!(card.panels[0].is_placeholder);
        assert_eq!(card.panels[0].body, "No specific improvement areas identified.");
        assert!(!card.panels[1].is_placeholder);
        assert_eq!(card.panels[1].body, "Clear layout.");
        assert_eq!(card.panels[2].body, "No specific ATS tips identified.");

        assert_eq!(card.additional_sections.len(), 1);
        assert_eq!(card.additional_sections[0].title, "Bonus Tips");
    }

    #[test]
    fn test_simple_schema_has_no_visuals() {
        let card = scorecard(AnalysisView::from_report(
            report("```json\n{\"Job_Fit\": 5}\n```", SchemaVariant::Simple),
            "resume",
            None,
        ));
        assert!(card.visuals.is_none());
    }

    #[test]
    fn test_section_analysis_schema_includes_visuals() {
        let reply = "```json\n{\"scores\": {\"Job_Fit\": 8}, \"section_analysis\": {\"Experience\": 70, \"Skills\": 30}}\n```";
        let card = scorecard(AnalysisView::from_report(
            report(reply, SchemaVariant::WithSectionAnalysis),
            "Rust Rust Kafka",
            Some("Kafka engineer"),
        ));

        let visuals = card.visuals.expect("visuals for section analysis");
        assert_eq!(visuals.gauges[3].value, 8.0);
        let donut = visuals.content_distribution.expect("donut data");
        assert!(donut.sums_to_hundred);
        assert_eq!(visuals.resume_terms[0].term, "rust");
        assert!(visuals.job_description_terms.is_some());
    }

    #[test]
    fn test_unparsed_result_becomes_raw_fallback() {
        let view = AnalysisView::from_report(
            report("Just prose, no JSON.", SchemaVariant::Simple),
            "resume",
            None,
        );
        match view.outcome {
            AnalysisOutcome::RawFallback(raw) => {
                assert_eq!(raw.reason, ParseFailureKind::NoJsonBlockFound);
                assert_eq!(raw.raw_markdown, "Just prose, no JSON.");
                assert!(raw.notice.starts_with("Could not parse"));
            }
            other => panic!("expected raw fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_notice() {
        assert!(fallback_notice(ParseFailureKind::JsonDecodeError).starts_with("Error parsing"));
        assert!(fallback_notice(ParseFailureKind::UnexpectedShape).starts_with("Error parsing"));
    }

    #[test]
    fn test_view_serializes_with_outcome_tag() {
        let view = AnalysisView::from_report(
            report("no json", SchemaVariant::Simple),
            "resume",
            None,
        );
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["outcome"], "raw_fallback");
        assert_eq!(value["schema"], "simple");
        assert_eq!(value["reason"], "no_json_block_found");
        assert_eq!(value["raw_markdown"], "no json");
    }
}
