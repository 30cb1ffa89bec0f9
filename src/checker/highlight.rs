//! Mapping regex matches back onto sentence tokens and rendering the result.
//!
//! Regex engines report byte spans, while output is produced token by token.
//! A captured phrase is re-aligned by walking the tokens from the one where the
//! capture begins and accumulating them as long as the accumulated text stays
//! a prefix of the captured text.

use crate::checker::tokenizer::Token;
use crate::Section;
use std::ops::Range;

/// A run of tokens flagged by one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub tokens: Range<usize>,
    pub name: &'a str,
}

/// Find the run of tokens covering the capture `captured` found at `start..end`.
pub fn align_capture(
    tokens: &[Token<'_>],
    start: usize,
    end: usize,
    captured: &str,
) -> Option<Range<usize>> {
    let target = captured.split_whitespace().collect::<Vec<_>>().join(" ");
    if target.is_empty() {
        return None;
    }

    // The capture may start on whitespace; the next token is then the anchor.
    let anchor = tokens.iter().position(|t| t.end > start)?;

    let mut accumulated = String::new();
    let mut run_end = anchor;

    for (idx, token) in tokens.iter().enumerate().skip(anchor) {
        let candidate = if accumulated.is_empty() {
            token.text.to_string()
        } else {
            format!("{} {}", accumulated, token.text)
        };

        if target.starts_with(&candidate) {
            run_end = idx + 1;
            if candidate.len() == target.len() {
                break;
            }
            accumulated = candidate;
        } else if candidate.starts_with(&target)
            && !candidate[target.len()..].chars().any(char::is_alphanumeric)
        {
            // token carries trailing punctuation the capture left out
            run_end = idx + 1;
            break;
        } else {
            break;
        }
    }

    if run_end > anchor {
        return Some(anchor..run_end);
    }

    // Capture begins or ends inside a token: take every token it touches.
    let first = tokens.iter().position(|t| t.end > start && t.start < end)?;
    let last = tokens.iter().rposition(|t| t.end > start && t.start < end)?;
    Some(first..last + 1)
}

/// Emit `tokens` space-separated, replacing highlighted runs with hints and a mark.
///
/// Overlapping highlights are merged into a single mark preceded by the hint
/// of every pattern involved, in the order the highlights were given.
pub fn render(tokens: &[Token<'_>], highlights: &[Highlight<'_>], section: &mut Section) {
    let mut idx = 0;

    while idx < tokens.len() {
        if idx > 0 {
            section.text(" ");
        }

        let mut end = idx;
        let mut members = vec![false; highlights.len()];
        loop {
            let mut grown = false;
            for (i, h) in highlights.iter().enumerate() {
                let joins = h.tokens.start == idx || (h.tokens.start > idx && h.tokens.start < end);
                if !members[i] && joins && !h.tokens.is_empty() {
                    members[i] = true;
                    end = end.max(h.tokens.end.min(tokens.len()));
                    grown = true;
                }
            }
            if !grown {
                break;
            }
        }

        if end == idx {
            section.text(tokens[idx].text);
            idx += 1;
            continue;
        }

        let mut names: Vec<&str> = Vec::new();
        for (h, _) in highlights.iter().zip(&members).filter(|(_, m)| **m) {
            if !names.contains(&h.name) {
                names.push(h.name);
            }
        }
        for name in names {
            section.hint(name);
            section.text(" ");
        }

        let run: Vec<&str> = tokens[idx..end].iter().map(|t| t.text).collect();
        section.mark(run.join(" "));
        idx = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::tokenizer::tokens;
    use crate::{Category, Segment};

    fn capture(sentence: &str, captured: &str) -> Option<Range<usize>> {
        let start = sentence.find(captured).unwrap();
        align_capture(&tokens(sentence), start, start + captured.len(), captured)
    }

    #[test]
    fn test_aligns_single_token() {
        assert_eq!(capture("Ich denke dass es regnet", "dass"), Some(2..3));
    }

    #[test]
    fn test_aligns_phrase() {
        assert_eq!(capture("Ich denke dass es regnet", "dass es"), Some(2..4));
        assert_eq!(capture("Ich denke dass es regnet", "es regnet"), Some(3..5));
    }

    #[test]
    fn test_phrase_spread_over_irregular_whitespace() {
        let sentence = "Er ist  seid\tgestern hier";
        let start = sentence.find("seid").unwrap();
        let end = sentence.find("gestern").unwrap() + "gestern".len();
        let range = align_capture(&tokens(sentence), start, end, &sentence[start..end]);
        assert_eq!(range, Some(2..4));
    }

    #[test]
    fn test_anchor_skips_earlier_occurrences() {
        let sentence = "dass er weiß dass es stimmt";
        let start = sentence.rfind("dass").unwrap();
        let range = align_capture(&tokens(sentence), start, start + 4, "dass");
        assert_eq!(range, Some(3..4));
    }

    #[test]
    fn test_trailing_punctuation_joins_run() {
        assert_eq!(capture("Er sagt dass, wenn", "dass"), Some(2..3));
        assert_eq!(capture("Er kommt wegen dem Regen, nicht", "wegen dem Regen"), Some(2..5));
    }

    #[test]
    fn test_capture_inside_token() {
        assert_eq!(capture("Die Haustür ist offen", "Haus"), Some(1..2));
        assert_eq!(capture("Die Haustür ist offen", "tür ist"), Some(1..3));
    }

    #[test]
    fn test_blank_capture_is_ignored() {
        let toks = tokens("a b");
        assert_eq!(align_capture(&toks, 1, 2, " "), None);
    }

    #[test]
    fn test_render_without_highlights() {
        let toks = tokens("Es  regnet heute");
        let mut section = Section::new(Category::Pattern);
        render(&toks, &[], &mut section);
        assert_eq!(section.segments, vec![Segment::Text("Es regnet heute".to_string())]);
    }

    #[test]
    fn test_render_merges_overlapping_highlights() {
        let toks = tokens("weil ich seid gestern hier bin");
        let highlights = vec![
            Highlight { tokens: 2..4, name: "SEIT" },
            Highlight { tokens: 3..4, name: "ZEIT" },
            Highlight { tokens: 2..3, name: "SEIT" },
            Highlight { tokens: 5..6, name: "VERB" },
        ];
        let mut section = Section::new(Category::Pattern);
        render(&toks, &highlights, &mut section);

        assert_eq!(
            section.segments,
            vec![
                Segment::Text("weil ich ".to_string()),
                Segment::Hint("{SEIT}".to_string()),
                Segment::Text(" ".to_string()),
                Segment::Hint("{ZEIT}".to_string()),
                Segment::Text(" ".to_string()),
                Segment::Mark("seid gestern".to_string()),
                Segment::Text(" hier ".to_string()),
                Segment::Hint("{VERB}".to_string()),
                Segment::Text(" ".to_string()),
                Segment::Mark("bin".to_string()),
            ]
        );
        assert_eq!(section.plain(), "weil ich {SEIT} {ZEIT} seid gestern hier {VERB} bin");
    }
}
