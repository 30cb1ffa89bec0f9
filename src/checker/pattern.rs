use crate::checker::highlight::{align_capture, render, Highlight};
use crate::checker::tokenizer::{split_sentences, tokens, Token};
use crate::rules::MistakePattern;
use crate::{Category, Section};
use fancy_regex::Regex;
use rayon::prelude::*;
use std::ops::Range;
use tracing::{error, warn};

/// A mistake pattern with its compiled regex.
pub struct CompiledPattern {
    pub rule: MistakePattern,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(rule: &MistakePattern) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            rule: rule.clone(),
            regex: Regex::new(&rule.pattern)?,
        })
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or_else(|e| {
            warn!("Pattern {} failed on {:?}: {}", self.rule.name, text, e);
            false
        })
    }

    /// Token runs to highlight, or `None` if the pattern does not match `sentence`.
    pub fn find(&self, sentence: &str, tokens: &[Token<'_>]) -> Option<Vec<Range<usize>>> {
        if !self.is_match(sentence) {
            return None;
        }

        let mut runs = if self.rule.attributes.multi_word {
            self.capture_runs(sentence, tokens)
        } else {
            tokens
                .iter()
                .enumerate()
                .filter(|(_, t)| self.is_match(t.text))
                .map(|(idx, _)| idx..idx + 1)
                .collect()
        };

        if self.rule.attributes.mid_sentence_only {
            runs.retain(|r| r.start != 0);
        }

        Some(runs)
    }

    fn capture_runs(&self, sentence: &str, tokens: &[Token<'_>]) -> Vec<Range<usize>> {
        let mut runs = Vec::new();

        for caps in self.regex.captures_iter(sentence) {
            let caps = match caps {
                Ok(caps) => caps,
                Err(e) => {
                    warn!("Pattern {} failed on {:?}: {}", self.rule.name, sentence, e);
                    break;
                }
            };

            // Without explicit groups the whole match is highlighted
            let groups = if caps.len() > 1 { 1..caps.len() } else { 0..1 };
            for group in groups {
                let Some(m) = caps.get(group) else {
                    continue;
                };
                if let Some(run) = align_capture(tokens, m.start(), m.end(), m.as_str()) {
                    if !runs.contains(&run) {
                        runs.push(run);
                    }
                }
            }
        }

        runs
    }
}

pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
    terminator: char,
}

impl PatternMatcher {
    /// Patterns that fail to compile are logged and left out of the run.
    pub fn new(rules: &[MistakePattern], terminator: char) -> Self {
        let mut patterns = Vec::new();
        for rule in rules {
            match CompiledPattern::compile(rule) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => error!("Skipping mistake pattern {}: {}", rule.name, e),
            }
        }

        Self {
            patterns,
            terminator,
        }
    }

    pub fn patterns(&self) -> impl Iterator<Item = &MistakePattern> {
        self.patterns.iter().map(|p| &p.rule)
    }

    pub fn check(&self, text: &str) -> Section {
        let sentences = split_sentences(text, self.terminator);

        // Sentences are checked in parallel; collect keeps their order.
        let rendered: Vec<Section> = sentences
            .par_iter()
            .map(|sentence| self.check_sentence(sentence))
            .collect();

        let mut section = Section::new(Category::Pattern);
        for part in rendered {
            section.extend(part);
        }
        section
    }

    pub fn check_sentence(&self, sentence: &str) -> Section {
        let mut section = Section::new(Category::Pattern);
        let tokens = tokens(sentence);

        let found: Vec<(&CompiledPattern, Vec<Range<usize>>)> = self
            .patterns
            .par_iter()
            .filter_map(|p| p.find(sentence, &tokens).map(|runs| (p, runs)))
            .collect();

        if found.is_empty() {
            section.text(format!("{}{}\n", sentence, self.terminator));
            return section;
        }

        section.matches = found.len();

        let highlights: Vec<Highlight<'_>> = found
            .iter()
            .flat_map(|(p, runs)| {
                runs.iter().map(|run| Highlight {
                    tokens: run.clone(),
                    name: p.rule.name.as_str(),
                })
            })
            .collect();

        render(&tokens, &highlights, &mut section);
        section.text(format!("{}\n", self.terminator));
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse_mistake_patterns;
    use crate::Segment;

    fn matcher(rules: &str) -> PatternMatcher {
        PatternMatcher::new(&parse_mistake_patterns(rules, "test").unwrap(), '.')
    }

    fn marks(section: &Section) -> Vec<&str> {
        section
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Mark(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unmatched_sentences_are_verbatim() {
        let m = matcher("DASS=(?<!, )(dass)");
        let section = m.check("Ich weiß, dass es regnet. Heute  ist Montag.");
        assert_eq!(section.matches, 0);
        assert_eq!(section.plain(), "Ich weiß, dass es regnet.\nHeute  ist Montag.\n");
    }

    #[test]
    fn test_mid_sentence_dass_is_marked() {
        let m = matcher("mid-sentence:DASS_OHNE_KOMMA=(?<!, )(dass)");
        let section = m.check("Ich denke dass es regnet.");
        assert_eq!(section.matches, 1);
        assert_eq!(marks(&section), vec!["dass"]);
        assert_eq!(section.plain(), "Ich denke {DASS_OHNE_KOMMA} dass es regnet.\n");
    }

    #[test]
    fn test_sentence_initial_match_stays_unmarked() {
        let m = matcher("mid-sentence:DASS_OHNE_KOMMA=(?<!, )(dass)");
        let section = m.check("Dass es regnet, weiß ich.");
        assert!(marks(&section).is_empty());
        assert_eq!(section.plain(), "Dass es regnet, weiß ich.\n");

        let m = matcher("mid-sentence:DASS_OHNE_KOMMA=(?<!, )([Dd]ass)");
        let section = m.check("Dass es regnet, weiß ich.");
        assert_eq!(section.matches, 1);
        assert!(marks(&section).is_empty());
        assert_eq!(section.plain(), "Dass es regnet, weiß ich.\n");
    }

    #[test]
    fn test_multi_word_marks_captured_phrase() {
        let m = matcher("multi-word:SEIT_SEID=(seid \\w+)");
        let section = m.check("Wir warten seid gestern auf dich.");
        assert_eq!(section.matches, 1);
        assert_eq!(marks(&section), vec!["seid gestern"]);
        assert_eq!(section.plain(), "Wir warten {SEIT_SEID} seid gestern auf dich.\n");
    }

    #[test]
    fn test_multi_word_uses_each_group_and_match() {
        let m = matcher("multi-word:DOPPELT=\\b((\\w+) \\2)\\b");
        let section = m.check("Das ist ist gut und und schön.");
        assert_eq!(section.matches, 1);
        assert_eq!(marks(&section), vec!["ist ist", "und und"]);
        assert_eq!(
            section.plain(),
            "Das {DOPPELT} ist ist gut {DOPPELT} und und schön.\n"
        );
    }

    #[test]
    fn test_multi_word_respects_lookbehind_position() {
        let m = matcher("multi-word:mid-sentence:DASS=(?<!, )(dass)");
        let section = m.check("Ich glaube, dass er weiß dass es stimmt.");
        assert_eq!(marks(&section), vec!["dass"]);
        assert_eq!(
            section.plain(),
            "Ich glaube, dass er weiß {DASS} dass es stimmt.\n"
        );
    }

    #[test]
    fn test_counts_one_match_per_sentence_and_pattern() {
        let m = matcher("A=alpha\nB=beta\nC=gamma");
        let section = m.check("Ein alpha hier. Ein beta dort. Ein gamma da. Nichts.");
        assert_eq!(section.matches, 3);
        assert_eq!(marks(&section), vec!["alpha", "beta", "gamma"]);
        assert!(section.plain().ends_with("Nichts.\n"));
    }

    #[test]
    fn test_all_matching_patterns_apply_once_per_sentence() {
        let m = matcher("WORT=wort\nDOPPEL=wort wort\nmulti-word:PHRASE=(wort wort)");
        let section = m.check("Ein wort wort zu viel.");
        assert_eq!(section.matches, 3);
        assert_eq!(
            section.plain(),
            "Ein {WORT} {PHRASE} wort wort zu viel.\n"
        );
    }

    #[test]
    fn test_broken_pattern_is_skipped() {
        let m = matcher("BROKEN=(dass\nOK=dass");
        assert_eq!(m.patterns().count(), 1);
        let section = m.check("Ich denke dass.");
        assert_eq!(section.matches, 1);
    }

    #[test]
    fn test_sentence_order_is_preserved() {
        let m = matcher("X=x");
        let text: String = (0..50)
            .map(|i| if i % 7 == 0 { format!("satz x {}. ", i) } else { format!("satz {}. ", i) })
            .collect();
        let section = m.check(&text);
        let lines: Vec<String> = section.plain().lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 50);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("{}.", i)), "line {} was {:?}", i, line);
        }
        assert_eq!(section.matches, 8);
    }
}
