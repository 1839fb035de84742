//! Qualitative feedback: the Markdown part of a reply, split into titled sections.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Heading marker the prompt templates ask the model to use.
const HEADING_MARKER: &str = "###";

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSection {
    pub title: String,
    pub body: String,
}

/// Title → body, in order of first appearance.
///
/// A repeated title replaces the earlier body but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualitativeFeedback {
    sections: Vec<FeedbackSection>,
}

impl QualitativeFeedback {
    pub fn insert(&mut self, title: String, body: String) {
        match self.sections.iter_mut().find(|s| s.title == title) {
            Some(existing) => existing.body = body,
            None => self.sections.push(FeedbackSection { title, body }),
        }
    }

    pub fn get(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.title == title)
            .map(|s| s.body.as_str())
    }

    /// Body for `title`, or `placeholder` when the model produced no such section.
    pub fn get_or<'a>(&'a self, title: &str, placeholder: &'a str) -> &'a str {
        self.get(title).unwrap_or(placeholder)
    }

    pub fn sections(&self) -> &[FeedbackSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

impl Serialize for QualitativeFeedback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.title, &section.body)?;
        }
        map.end()
    }
}

/// Splits feedback text on `###` headings.
///
/// Each non-blank fragment contributes one section: its first line (trimmed,
/// emoji included) is the title and the rest (trimmed) is the body. Text
/// before the first heading is a fragment like any other.
pub fn split_sections(text: &str) -> QualitativeFeedback {
    let mut feedback = QualitativeFeedback::default();

    for fragment in text.split(HEADING_MARKER) {
        if fragment.trim().is_empty() {
            continue;
        }
        let (title, body) = match fragment.split_once('\n') {
            Some((title, body)) => (title.trim(), body.trim()),
            None => (fragment.trim(), ""),
        };
        feedback.insert(title.to_string(), body.to_string());
    }

    feedback
}
