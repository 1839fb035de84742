//! Chart data for the visual scorecard: score gauges, a content-distribution
//! donut and word-cloud term frequencies. Rendering is left to the client.

use std::collections::HashMap;

use serde::Serialize;

use crate::analysis::schema::{ScoreName, ScoreSet, SectionDistribution};

pub const GAUGE_MAX: f64 = 10.0;
pub const WORD_CLOUD_LIMIT: usize = 50;
const MIN_TERM_CHARS: usize = 3;
/// Distance from 100 within which a distribution is reported as summing to 100.
const SUM_TOLERANCE: f64 = 0.5;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are", "because",
    "been", "before", "being", "below", "between", "both", "but", "can", "could", "did", "does",
    "doing", "down", "during", "each", "etc", "few", "for", "from", "further", "had", "has",
    "have", "having", "her", "here", "hers", "him", "his", "how", "into", "its", "itself",
    "just", "more", "most", "must", "nor", "not", "now", "off", "once", "only", "other", "our",
    "ours", "out", "over", "own", "same", "she", "should", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "then", "there", "these", "they", "this", "those", "through",
    "too", "under", "until", "very", "was", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Low,
    Medium,
    High,
}

impl GaugeBand {
    pub fn for_value(value: f64) -> Self {
        if value < 5.0 {
            GaugeBand::Low
        } else if value < 8.0 {
            GaugeBand::Medium
        } else {
            GaugeBand::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub key: &'static str,
    pub label: &'static str,
    /// As returned by the model; not clamped to the gauge range.
    pub value: f64,
    pub max: f64,
    pub band: GaugeBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub slices: Vec<DonutSlice>,
    pub total: f64,
    /// Informational only; the model's numbers are shown unchanged either way.
    pub sums_to_hundred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCloudTerm {
    pub term: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualSummary {
    pub gauges: Vec<GaugeView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_distribution: Option<DonutChart>,
    pub resume_terms: Vec<WordCloudTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description_terms: Option<Vec<WordCloudTerm>>,
}

pub fn build_visual_summary(
    scores: &ScoreSet,
    sections: Option<&SectionDistribution>,
    resume_text: &str,
    job_description: Option<&str>,
) -> VisualSummary {
    VisualSummary {
        gauges: gauges(scores),
        content_distribution: sections.and_then(donut),
        resume_terms: word_cloud(resume_text, WORD_CLOUD_LIMIT),
        job_description_terms: job_description
            .filter(|jd| !jd.trim().is_empty())
            .map(|jd| word_cloud(jd, WORD_CLOUD_LIMIT)),
    }
}

pub fn gauges(scores: &ScoreSet) -> Vec<GaugeView> {
    ScoreName::ALL
        .iter()
        .map(|&name| {
            let value = scores.numeric(name);
            GaugeView {
                key: name.key(),
                label: name.label(),
                value,
                max: GAUGE_MAX,
                band: GaugeBand::for_value(value),
            }
        })
        .collect()
}

/// `None` when the model reported no sections.
pub fn donut(distribution: &SectionDistribution) -> Option<DonutChart> {
    if distribution.is_empty() {
        return None;
    }
    let total = distribution.total();
    Some(DonutChart {
        slices: distribution
            .shares()
            .iter()
            .map(|share| DonutSlice {
                label: share.label.clone(),
                percentage: share.percentage,
            })
            .collect(),
        total,
        sums_to_hundred: (total - 100.0).abs() <= SUM_TOLERANCE,
    })
}

/// Most frequent terms of `text`, highest count first, ties alphabetical.
///
/// Terms are lower-cased runs of letters, digits, `+` and `#` (so "C++" and
/// "C#" survive), at least three characters long, containing a letter, and
/// not an English stop word.
pub fn word_cloud(text: &str, limit: usize) -> Vec<WordCloudTerm> {
    let mut counts: HashMap<String, u32> = HashMap::new();

    for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#')) {
        let term = raw.to_lowercase();
        if term.chars().count() < MIN_TERM_CHARS
            || !term.chars().any(char::is_alphabetic)
            || STOP_WORDS.contains(&term.as_str())
        {
            continue;
        }
        *counts.entry(term).or_insert(0) += 1;
    }

    let mut terms: Vec<WordCloudTerm> = counts
        .into_iter()
        .map(|(term, count)| WordCloudTerm { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(limit);
    terms
}
