use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rule file setting value meaning "no file".
pub const NO_FILE: &str = "none";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_language")]
    pub language: String,

    /// File with `name=regex` exceptions to spelling mistakes
    #[serde(default)]
    pub valid_expressions: Option<PathBuf>,

    /// File with `name=regex` mistake patterns
    #[serde(default)]
    pub mistake_patterns: Option<PathBuf>,

    /// Explicit FST dictionary instead of the installed one for `language`
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    /// Characters trimmed from tokens before dictionary lookup
    #[serde(default = "default_punctuation")]
    pub punctuation: Vec<char>,

    #[serde(default = "default_terminator")]
    pub terminator: char,

    #[serde(default)]
    pub verbose: bool,
}

fn default_language() -> String {
    "de_DE".to_string()
}

fn default_punctuation() -> Vec<char> {
    vec![',', '.']
}

fn default_terminator() -> char {
    '.'
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            valid_expressions: None,
            mistake_patterns: None,
            dictionary: None,
            punctuation: default_punctuation(),
            terminator: default_terminator(),
            verbose: false,
        }
    }
}

/// Values given on the command line; `None` leaves the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub valid_expressions: Option<String>,
    pub mistake_patterns: Option<String>,
    pub dictionary: Option<PathBuf>,
    pub verbose: bool,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(".gramma.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        Ok(config.apply(overrides))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.resolve_none())
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(path) = overrides.valid_expressions {
            self.valid_expressions = rule_path(&path);
        }
        if let Some(path) = overrides.mistake_patterns {
            self.mistake_patterns = rule_path(&path);
        }
        if overrides.dictionary.is_some() {
            self.dictionary = overrides.dictionary;
        }
        self.verbose |= overrides.verbose;
        self
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        if other.language != default_language() {
            self.language = other.language;
        }
        if other.valid_expressions.is_some() {
            self.valid_expressions = other.valid_expressions;
        }
        if other.mistake_patterns.is_some() {
            self.mistake_patterns = other.mistake_patterns;
        }
        if other.dictionary.is_some() {
            self.dictionary = other.dictionary;
        }
        if other.punctuation != default_punctuation() {
            self.punctuation = other.punctuation;
        }
        if other.terminator != default_terminator() {
            self.terminator = other.terminator;
        }
        self.verbose |= other.verbose;
        self
    }

    // A config file may spell out "none" just like the command line.
    fn resolve_none(mut self) -> Self {
        for path in [&mut self.valid_expressions, &mut self.mistake_patterns] {
            if path.as_deref() == Some(Path::new(NO_FILE)) {
                *path = None;
            }
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gramma").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gramma").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

/// Interpret a rule file argument, where `none` disables the file.
pub fn rule_path(value: &str) -> Option<PathBuf> {
    if value == NO_FILE || value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "de_DE");
        assert_eq!(config.punctuation, vec![',', '.']);
        assert_eq!(config.terminator, '.');
        assert!(config.valid_expressions.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            language: "de_AT".to_string(),
            mistake_patterns: Some(PathBuf::from("patterns.txt")),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "de_AT");
        assert_eq!(merged.mistake_patterns, Some(PathBuf::from("patterns.txt")));
        assert_eq!(merged.punctuation, default_punctuation());
    }

    #[test]
    fn test_cli_none_disables_rule_file() {
        let config = Config {
            valid_expressions: Some(PathBuf::from("valid.txt")),
            ..Default::default()
        };
        let config = config.apply(Overrides {
            valid_expressions: Some("none".to_string()),
            mistake_patterns: Some("patterns.txt".to_string()),
            verbose: true,
            ..Default::default()
        });
        assert!(config.valid_expressions.is_none());
        assert_eq!(config.mistake_patterns, Some(PathBuf::from("patterns.txt")));
        assert!(config.verbose);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "language = \"de_CH\"\nvalid_expressions = \"none\"\nmistake_patterns = \"rules/patterns.txt\"\npunctuation = [\",\", \".\", \";\"]\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.language, "de_CH");
        assert!(config.valid_expressions.is_none());
        assert_eq!(config.mistake_patterns, Some(PathBuf::from("rules/patterns.txt")));
        assert_eq!(config.punctuation, vec![',', '.', ';']);
        assert_eq!(config.terminator, '.');
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = [").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
