pub mod parser;

use crate::error::Result;
use parser::{parse_rules, strip_marker, MID_SENTENCE_MARKER, MULTI_WORD_MARKER};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PatternAttributes {
    /// The match may span several tokens; highlight via capture groups.
    pub multi_word: bool,
    /// Leave the match unmarked when it opens the sentence.
    pub mid_sentence_only: bool,
}

impl PatternAttributes {
    pub fn is_empty(&self) -> bool {
        !self.multi_word && !self.mid_sentence_only
    }
}

impl fmt::Display for PatternAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.multi_word {
            names.push("multi-word");
        }
        if self.mid_sentence_only {
            names.push("mid-sentence");
        }
        write!(f, "{}", names.join(", "))
    }
}

/// A named regex describing a phrasing that should be flagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MistakePattern {
    pub name: String,
    pub pattern: String,
    pub attributes: PatternAttributes,
}

impl fmt::Display for MistakePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attributes.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.attributes)
        }
    }
}

/// A named regex for tokens that must not count as spelling mistakes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ValidExpression {
    pub name: String,
    pub pattern: String,
}

impl fmt::Display for ValidExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.pattern)
    }
}

/// Load mistake patterns in file order. `None` means no rule file is configured.
pub fn load_mistake_patterns(path: Option<&Path>) -> Result<Vec<MistakePattern>> {
    let Some((content, origin)) = read_rule_file(path) else {
        return Ok(Vec::new());
    };

    let patterns = parse_mistake_patterns(&content, &origin)?;
    debug!(count = patterns.len(), file = %origin, "loaded mistake patterns");
    Ok(patterns)
}

pub fn parse_mistake_patterns(content: &str, origin: &str) -> Result<Vec<MistakePattern>> {
    Ok(parse_rules(content, origin)?
        .into_iter()
        .map(|rule| {
            let mut name = rule.name;
            let attributes = PatternAttributes {
                multi_word: strip_marker(&mut name, MULTI_WORD_MARKER),
                mid_sentence_only: strip_marker(&mut name, MID_SENTENCE_MARKER),
            };
            MistakePattern {
                name,
                pattern: rule.pattern,
                attributes,
            }
        })
        .collect())
}

/// Load valid expressions in file order. `None` means no rule file is configured.
pub fn load_valid_expressions(path: Option<&Path>) -> Result<Vec<ValidExpression>> {
    let Some((content, origin)) = read_rule_file(path) else {
        return Ok(Vec::new());
    };

    let expressions = parse_valid_expressions(&content, &origin)?;
    debug!(count = expressions.len(), file = %origin, "loaded valid expressions");
    Ok(expressions)
}

pub fn parse_valid_expressions(content: &str, origin: &str) -> Result<Vec<ValidExpression>> {
    Ok(parse_rules(content, origin)?
        .into_iter()
        .map(|rule| ValidExpression {
            name: rule.name,
            pattern: rule.pattern,
        })
        .collect())
}

/// Missing or unreadable rule files are not fatal; checking goes on without rules.
fn read_rule_file(path: Option<&Path>) -> Option<(String, String)> {
    let path = path?;
    match fs::read_to_string(path) {
        Ok(content) => Some((content, path.display().to_string())),
        Err(e) => {
            warn!("Cannot read rule file {}: {}", path.display(), e);
            None
        }
    }
}
