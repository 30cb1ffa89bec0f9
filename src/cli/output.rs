use crate::rules::{MistakePattern, ValidExpression};
use crate::{Category, Report, Section, Segment};
use colored::*;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Presentation style of one kind of mistake.
#[derive(Debug, Clone, Copy)]
pub struct ErrorCategory {
    pub kind: &'static str,
    color: Color,
    emphasis: Color,
}

impl ErrorCategory {
    pub fn new(kind: &'static str, color: Color, emphasis: Color) -> Self {
        Self {
            kind,
            color,
            emphasis,
        }
    }

    pub fn of(category: Category) -> Self {
        match category {
            Category::Spelling => Self::new("SPELLING", Color::Yellow, Color::BrightYellow),
            Category::Pattern => Self::new("PATTERN", Color::Blue, Color::BrightBlue),
        }
    }

    pub fn mark_error(&self, text: &str, colored: bool) -> String {
        if colored {
            text.color(self.emphasis).bold().to_string()
        } else {
            format!("[[{}]]", text)
        }
    }

    pub fn mark_hint(&self, text: &str, colored: bool) -> String {
        if colored {
            text.color(self.color).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_section(section: &Section, colored: bool) -> String {
    let style = ErrorCategory::of(section.category);
    section
        .segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.clone(),
            Segment::Hint(text) => style.mark_hint(text, colored),
            Segment::Mark(text) => style.mark_error(text, colored),
        })
        .collect()
}

/// Listing of the loaded rules shown in verbose mode.
pub fn render_preamble(patterns: &[MistakePattern], expressions: &[ValidExpression]) -> String {
    let mut out = String::new();

    if !patterns.is_empty() {
        let _ = writeln!(out, "# Looking for {} mistake patterns:", patterns.len());
        for pattern in patterns {
            let _ = writeln!(out, "# {}", pattern);
        }
    }

    if !expressions.is_empty() {
        let _ = writeln!(out, "# Ignoring matches for {} expressions:", expressions.len());
        for expr in expressions {
            let _ = writeln!(out, "# {}", expr);
        }
    }

    out
}

pub fn render_summary(report: &Report) -> String {
    format!(
        "Spell checker found {} matches.\nPattern checker found {} matches.\n",
        report.spelling.matches, report.patterns.matches
    )
}

pub fn render_text(
    report: &Report,
    patterns: &[MistakePattern],
    expressions: &[ValidExpression],
    verbose: bool,
    colored: bool,
) -> String {
    let mut out = String::new();

    if verbose {
        let preamble = render_preamble(patterns, expressions);
        if !preamble.is_empty() {
            out.push_str(&preamble);
            out.push('\n');
        }
    }

    let spelling = ErrorCategory::of(Category::Spelling);
    out.push_str(&spelling.mark_error("# Spell check", colored));
    out.push('\n');
    out.push_str(&render_section(&report.spelling, colored));
    out.push_str("\n\n");

    let pattern = ErrorCategory::of(Category::Pattern);
    out.push_str(&pattern.mark_error("# Pattern check", colored));
    out.push('\n');
    out.push_str(&render_section(&report.patterns, colored));
    out.push('\n');

    out.push_str(&render_summary(report));
    out
}

#[derive(Debug, Serialize)]
struct JsonPattern<'a> {
    name: &'a str,
    pattern: &'a str,
    multi_word: bool,
    mid_sentence: bool,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    mistake_patterns: Vec<JsonPattern<'a>>,
    valid_expressions: &'a [ValidExpression],
    spelling: &'a Section,
    patterns: &'a Section,
}

pub fn render_json(
    report: &Report,
    patterns: &[MistakePattern],
    expressions: &[ValidExpression],
) -> serde_json::Result<String> {
    let output = JsonOutput {
        mistake_patterns: patterns
            .iter()
            .map(|p| JsonPattern {
                name: &p.name,
                pattern: &p.pattern,
                multi_word: p.attributes.multi_word,
                mid_sentence: p.attributes.mid_sentence_only,
            })
            .collect(),
        valid_expressions: expressions,
        spelling: &report.spelling,
        patterns: &report.patterns,
    };

    serde_json::to_string_pretty(&output)
}

pub fn print_report(
    report: &Report,
    patterns: &[MistakePattern],
    expressions: &[ValidExpression],
    verbose: bool,
    colored_output: bool,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            print!(
                "{}",
                render_text(report, patterns, expressions, verbose, colored_output)
            );
        }
        OutputFormat::Json => println!("{}", render_json(report, patterns, expressions)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse_mistake_patterns;

    fn report() -> Report {
        let mut spelling = Section::new(Category::Spelling);
        spelling.text("Es ");
        spelling.mark("regnett");
        spelling.matches = 1;

        let mut patterns = Section::new(Category::Pattern);
        patterns.text("Ich denke ");
        patterns.hint("DASS");
        patterns.text(" ");
        patterns.mark("dass");
        patterns.text(".\n");
        patterns.matches = 1;

        Report { spelling, patterns }
    }

    #[test]
    fn test_plain_rendering() {
        let out = render_text(&report(), &[], &[], false, false);
        assert_eq!(
            out,
            "[[# Spell check]]\nEs [[regnett]]\n\n\
             [[# Pattern check]]\nIch denke {DASS} [[dass]].\n\n\
             Spell checker found 1 matches.\nPattern checker found 1 matches.\n"
        );
    }

    #[test]
    fn test_colored_rendering_styles_marks() {
        colored::control::set_override(true);
        let section = &report().patterns;
        let out = render_section(section, true);
        assert!(out.contains(&"dass".bright_blue().bold().to_string()));
        assert!(out.contains(&"{DASS}".blue().to_string()));
        assert!(out.starts_with("Ich denke "));
    }

    #[test]
    fn test_preamble_lists_every_pattern_once() {
        let patterns = parse_mistake_patterns(
            "A=a\nmulti-word:B=(b c)\nmid-sentence:multi-word:C=(c)\n",
            "test",
        )
        .unwrap();
        let expressions = vec![ValidExpression {
            name: "NUMBER".to_string(),
            pattern: "\\d+".to_string(),
        }];

        let preamble = render_preamble(&patterns, &expressions);
        assert_eq!(
            preamble,
            "# Looking for 3 mistake patterns:\n\
             # A\n\
             # B (multi-word)\n\
             # C (multi-word, mid-sentence)\n\
             # Ignoring matches for 1 expressions:\n\
             # NUMBER=\\d+\n"
        );
    }

    #[test]
    fn test_verbose_output_starts_with_preamble() {
        let patterns = parse_mistake_patterns("A=a\n", "test").unwrap();
        let out = render_text(&report(), &patterns, &[], true, false);
        assert!(out.starts_with("# Looking for 1 mistake patterns:\n# A\n\n[[# Spell check]]"));
    }

    #[test]
    fn test_json_output() {
        let patterns = parse_mistake_patterns("mid-sentence:DASS=(dass)\n", "test").unwrap();
        let json = render_json(&report(), &patterns, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["mistake_patterns"][0]["name"], "DASS");
        assert_eq!(value["mistake_patterns"][0]["mid_sentence"], true);
        assert_eq!(value["patterns"]["matches"], 1);
        assert_eq!(value["patterns"]["category"], "pattern");
        assert_eq!(value["patterns"]["segments"][1]["kind"], "hint");
        assert_eq!(value["patterns"]["segments"][1]["text"], "{DASS}");
        assert_eq!(value["spelling"]["segments"][1]["kind"], "mark");
    }
}
