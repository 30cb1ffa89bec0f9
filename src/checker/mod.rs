pub mod dictionary;
pub mod highlight;
pub mod pattern;
pub mod spelling;
pub mod tokenizer;

use crate::rules::{self, MistakePattern, ValidExpression};
use crate::{Config, Report};
use anyhow::Result;
use dictionary::{Dictionary, SpellingOracle, Unavailable};
use pattern::PatternMatcher;
use spelling::SpellMatcher;
use tracing::{info, warn};

/// Both matchers, configured and ready to run over any number of inputs.
pub struct Checkers {
    spelling: SpellMatcher,
    patterns: PatternMatcher,
    valid_expressions: Vec<ValidExpression>,
    mistake_patterns: Vec<MistakePattern>,
}

impl Checkers {
    pub fn new(config: &Config) -> Result<Self> {
        let valid_expressions = rules::load_valid_expressions(config.valid_expressions.as_deref())?;
        let mistake_patterns = rules::load_mistake_patterns(config.mistake_patterns.as_deref())?;
        let oracle = load_oracle(config);

        Ok(Self::from_parts(
            oracle,
            valid_expressions,
            mistake_patterns,
            config,
        ))
    }

    /// Assemble checkers from already loaded rules and an arbitrary oracle.
    pub fn from_parts(
        oracle: Box<dyn SpellingOracle>,
        valid_expressions: Vec<ValidExpression>,
        mistake_patterns: Vec<MistakePattern>,
        config: &Config,
    ) -> Self {
        let spelling = SpellMatcher::new(
            oracle,
            &valid_expressions,
            config.punctuation.clone(),
            config.verbose,
        );
        let patterns = PatternMatcher::new(&mistake_patterns, config.terminator);

        Self {
            spelling,
            patterns,
            valid_expressions,
            mistake_patterns,
        }
    }

    pub fn valid_expressions(&self) -> &[ValidExpression] {
        &self.valid_expressions
    }

    /// Every loaded pattern, including ones whose regex failed to compile.
    pub fn mistake_patterns(&self) -> &[MistakePattern] {
        &self.mistake_patterns
    }

    /// Run spell check and pattern check side by side over `text`.
    pub fn run(&self, text: &str) -> Report {
        let (spelling, patterns) = rayon::join(
            || self.spelling.check(text),
            || self.patterns.check(text),
        );

        info!(
            spelling = spelling.matches,
            patterns = patterns.matches,
            "check finished"
        );

        Report { spelling, patterns }
    }
}

fn load_oracle(config: &Config) -> Box<dyn SpellingOracle> {
    let loaded = match &config.dictionary {
        Some(path) => Dictionary::load_from_path(path),
        None => Dictionary::load(&config.language),
    };

    match loaded {
        Ok(dict) => {
            info!(language = %config.language, words = dict.len(), "dictionary loaded");
            Box::new(dict)
        }
        Err(e) => {
            warn!("{:#}; every word will be checked against valid expressions only", e);
            Box::new(Unavailable)
        }
    }
}
