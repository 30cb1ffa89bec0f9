use crate::error::{Result, RuleError};

/// Marks a pattern whose match may stretch across several tokens.
pub const MULTI_WORD_MARKER: &str = "multi-word:";
/// Marks a pattern that must not be flagged at the very start of a sentence.
pub const MID_SENTENCE_MARKER: &str = "mid-sentence:";

/// A single `name=pattern` line as written in a rule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    pub name: String,
    pub pattern: String,
}

/// Parse rule file content. `origin` only shows up in error messages.
pub fn parse_rules(content: &str, origin: &str) -> Result<Vec<RuleLine>> {
    let mut rules = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        // Only the first '=' separates; patterns may contain more of them
        let (name, pattern) = line
            .split_once('=')
            .ok_or_else(|| RuleError::MissingSeparator {
                origin: origin.to_string(),
                line: idx + 1,
                content: line.to_string(),
            })?;

        rules.push(RuleLine {
            name: name.to_string(),
            pattern: pattern.to_string(),
        });
    }

    Ok(rules)
}

/// Remove the first occurrence of `marker` from `name`, reporting whether it was there.
pub fn strip_marker(name: &mut String, marker: &str) -> bool {
    match name.find(marker) {
        Some(pos) => {
            name.replace_range(pos..pos + marker.len(), "");
            true
        }
        None => false,
    }
}
