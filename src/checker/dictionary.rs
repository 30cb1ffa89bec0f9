use anyhow::{Context, Result};
use fst::{Set, SetBuilder};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

/// Answers whether a single word is spelled correctly.
pub trait SpellingOracle: Send + Sync {
    fn is_correctly_spelled(&self, word: &str) -> bool;
}

/// Stand-in used when no dictionary could be loaded: every word is suspicious,
/// so only valid expressions keep tokens from being flagged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unavailable;

impl SpellingOracle for Unavailable {
    fn is_correctly_spelled(&self, _word: &str) -> bool {
        false
    }
}

impl SpellingOracle for HashSet<String> {
    fn is_correctly_spelled(&self, word: &str) -> bool {
        self.contains(word) || self.contains(&word.to_lowercase())
    }
}

pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for given language
    pub fn load(language: &str) -> Result<Self> {
        let dict_path = Self::path_for(language)?;

        if !dict_path.exists() {
            anyhow::bail!(
                "No dictionary installed for '{}' (expected {})",
                language,
                dict_path.display()
            );
        }

        Self::load_from_path(&dict_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

        let reader = BufReader::new(file);
        let set = Set::new(reader.bytes().collect::<Result<Vec<_>, _>>()?)
            .context("Failed to parse dictionary")?;

        Ok(Self { set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Build dictionary from word list
    pub fn build_from_words(words: &[String], output_path: &Path) -> Result<()> {
        let mut sorted_words = words.to_vec();
        sorted_words.sort();
        sorted_words.dedup();

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;

        let writer = BufWriter::new(file);
        let mut builder = SetBuilder::new(writer).context("Failed to create FST builder")?;

        for word in sorted_words {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }

        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    /// Where the dictionary for `language` lives in the data directory.
    pub fn path_for(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join(format!("{}.dict", language)))
    }
}

impl SpellingOracle for Dictionary {
    // Word lists are stored lowercase, but capitalized entries (German nouns)
    // may be present too.
    fn is_correctly_spelled(&self, word: &str) -> bool {
        self.contains(word) || self.contains(&word.to_lowercase())
    }
}
