//! Payload shapes the model is asked to return, and the typed views over them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which JSON payload shape the caller's prompt template asked for.
/// The parser never infers this from the reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// Flat object of scores.
    #[default]
    Simple,
    /// `{"scores": {...}, "section_analysis": {...}}`
    WithSectionAnalysis,
}

impl SchemaVariant {
    pub fn includes_section_analysis(self) -> bool {
        matches!(self, SchemaVariant::WithSectionAnalysis)
    }
}

impl std::str::FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "simple" => Ok(SchemaVariant::Simple),
            "with_section_analysis" => Ok(SchemaVariant::WithSectionAnalysis),
            other => Err(format!(
                "unknown schema '{other}' (expected 'simple' or 'with_section_analysis')"
            )),
        }
    }
}

/// The four sub-scores every prompt template asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreName {
    ClarityAndFormatting,
    ImpactAndAchievements,
    AtsFriendliness,
    JobFit,
}

impl ScoreName {
    pub const ALL: [ScoreName; 4] = [
        ScoreName::ClarityAndFormatting,
        ScoreName::ImpactAndAchievements,
        ScoreName::AtsFriendliness,
        ScoreName::JobFit,
    ];

    /// JSON key as emitted by the model.
    pub fn key(self) -> &'static str {
        match self {
            ScoreName::ClarityAndFormatting => "Clarity_and_Formatting",
            ScoreName::ImpactAndAchievements => "Impact_and_Achievements",
            ScoreName::AtsFriendliness => "ATS_Friendliness",
            ScoreName::JobFit => "Job_Fit",
        }
    }

    /// Human-readable metric label.
    pub fn label(self) -> &'static str {
        match self {
            ScoreName::ClarityAndFormatting => "Clarity & Formatting",
            ScoreName::ImpactAndAchievements => "Impact & Achievements",
            ScoreName::AtsFriendliness => "ATS Friendliness",
            ScoreName::JobFit => "Job Fit Score",
        }
    }
}

/// Scores exactly as the model returned them.
///
/// Every key of the decoded object is kept, known or not, and values are
/// never rounded or clamped. Reading an absent known score yields 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScoreSet(Map<String, Value>);

impl ScoreSet {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Integer value of a known score; absent or non-integer values read as 0.
    pub fn get(&self, name: ScoreName) -> i64 {
        self.raw(name.key()).and_then(Value::as_i64).unwrap_or(0)
    }

    /// Numeric value for charting; absent or non-numeric values read as 0.0.
    pub fn numeric(&self, name: ScoreName) -> f64 {
        self.raw(name.key()).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// The value rendered for display, as-is. Absent or null reads as "0".
    pub fn display(&self, name: ScoreName) -> String {
        match self.raw(name.key()) {
            None | Some(Value::Null) => "0".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One slice of the resume content breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionShare {
    pub label: String,
    pub percentage: f64,
}

/// Resume-section label → percentage, in the order the model listed them.
///
/// The prompt asks for percentages summing to 100; that is not verified here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectionDistribution(Vec<SectionShare>);

impl SectionDistribution {
    /// Keeps numeric entries in order. Non-numeric values cannot be charted and are dropped.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        Self(
            map.iter()
                .filter_map(|(label, value)| {
                    value.as_f64().map(|percentage| SectionShare {
                        label: label.clone(),
                        percentage,
                    })
                })
                .collect(),
        )
    }

    pub fn shares(&self) -> &[SectionShare] {
        &self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|s| s.percentage).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
