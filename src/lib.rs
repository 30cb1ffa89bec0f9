pub mod checker;
pub mod cli;
pub mod config;
pub mod dict;
pub mod error;
pub mod rules;

pub use checker::Checkers;
pub use config::Config;
pub use error::RuleError;

use serde::Serialize;

/// The two independent kinds of mistakes gramma reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spelling,
    Pattern,
}

/// One piece of annotated output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Text(String),
    /// De-emphasized label, usually the name of a rule in braces.
    Hint(String),
    /// The flagged span itself.
    Mark(String),
}

/// Annotated output of one matcher plus the number of matches it counted.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub category: Category,
    pub segments: Vec<Segment>,
    pub matches: usize,
}

impl Section {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            segments: Vec::new(),
            matches: 0,
        }
    }

    pub fn text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        // Keep consecutive plain text in one segment
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(&text);
        } else {
            self.segments.push(Segment::Text(text));
        }
    }

    pub fn hint(&mut self, label: &str) {
        self.segments.push(Segment::Hint(format!("{{{}}}", label)));
    }

    pub fn mark(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::Mark(text.into()));
    }

    /// Append another section's segments and matches.
    pub fn extend(&mut self, other: Section) {
        for segment in other.segments {
            match segment {
                Segment::Text(text) => self.text(text),
                other => self.segments.push(other),
            }
        }
        self.matches += other.matches;
    }

    /// Plain rendering without any styling, mostly useful in tests.
    pub fn plain(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) | Segment::Hint(t) | Segment::Mark(t) => t.as_str(),
            })
            .collect()
    }
}

/// Result of one checking run over the whole input.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub spelling: Section,
    pub patterns: Section,
}
