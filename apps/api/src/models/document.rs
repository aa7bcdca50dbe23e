use serde::Serialize;

use crate::scoring::normalizer::clean_text;

/// A named piece of text, cleaned once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: String,
    clean_text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, raw_text: &str) -> Self {
        Self {
            name: name.into(),
            clean_text: clean_text(raw_text),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clean_text(&self) -> &str {
        &self.clean_text
    }
}

/// A registered job description. `index` is its position in the session's JD list.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescription {
    pub index: usize,
    pub document: Document,
}

impl JobDescription {
    pub fn new(index: usize, name: impl Into<String>, text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            index,
            document: Document::new(name, &text),
        }
    }

    pub fn name(&self) -> &str {
        self.document.name()
    }

    pub fn summary(&self) -> JobDescriptionSummary {
        JobDescriptionSummary {
            index: self.index,
            name: self.document.name().to_string(),
            characters: self.document.clean_text().chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptionSummary {
    pub index: usize,
    pub name: String,
    pub characters: usize,
}
