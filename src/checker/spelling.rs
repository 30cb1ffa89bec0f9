use crate::checker::dictionary::SpellingOracle;
use crate::checker::tokenizer::{split_words, trim_punctuation};
use crate::rules::ValidExpression;
use crate::{Category, Section};
use regex::Regex;
use tracing::error;

/// A valid expression ready for matching.
pub struct CompiledExpression {
    pub name: String,
    regex: Regex,
}

pub struct SpellMatcher {
    oracle: Box<dyn SpellingOracle>,
    expressions: Vec<CompiledExpression>,
    punctuation: Vec<char>,
    verbose: bool,
}

impl SpellMatcher {
    pub fn new(
        oracle: Box<dyn SpellingOracle>,
        valid_expressions: &[ValidExpression],
        punctuation: Vec<char>,
        verbose: bool,
    ) -> Self {
        let mut expressions = Vec::new();
        for expr in valid_expressions {
            match Regex::new(&expr.pattern) {
                Ok(regex) => expressions.push(CompiledExpression {
                    name: expr.name.clone(),
                    regex,
                }),
                Err(e) => error!("Skipping valid expression {}: {}", expr.name, e),
            }
        }

        Self {
            oracle,
            expressions,
            punctuation,
            verbose,
        }
    }

    /// Name of the first valid expression matching `word`, if any.
    pub fn exception_for(&self, word: &str) -> Option<&str> {
        self.expressions
            .iter()
            .find(|expr| expr.regex.is_match(word))
            .map(|expr| expr.name.as_str())
    }

    pub fn check(&self, text: &str) -> Section {
        let mut section = Section::new(Category::Spelling);

        for (line_idx, line) in text.lines().enumerate() {
            if line_idx > 0 {
                section.text("\n");
            }

            for (word_idx, word) in split_words(line).into_iter().enumerate() {
                if word_idx > 0 {
                    section.text(" ");
                }
                self.check_word(word, &mut section);
            }
        }

        section
    }

    fn check_word(&self, word: &str, section: &mut Section) {
        let trimmed = trim_punctuation(word, &self.punctuation);

        if trimmed.is_empty() || self.oracle.is_correctly_spelled(trimmed) {
            section.text(word);
            return;
        }

        match self.exception_for(trimmed) {
            Some(name) => {
                if self.verbose {
                    section.hint(name);
                    section.text(" ");
                }
                // the original token, punctuation included
                section.text(word);
            }
            None => {
                section.mark(word);
                section.matches += 1;
            }
        }
    }
}
