use crate::checker::dictionary::Dictionary;
use anyhow::{Context, Result};
use colored::*;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::Path;

// Pinned commit so downloads stay reproducible
const ENGLISH_WORDLIST_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23/words_alpha.txt";

pub fn list_dictionaries() -> Result<()> {
    let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;

    if !data_dir.exists() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to install one from a word list.",
            "gramma dict build de_DE words.txt".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    let mut found_any = false;
    for entry in fs::read_dir(&data_dir)? {
        let path = entry?.path();

        if path.extension().and_then(|s| s.to_str()) == Some("dict") {
            found_any = true;
            let language = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown");

            let size_kb = fs::metadata(&path)?.len() / 1024;

            println!(
                "  {} {} ({})",
                "✓".green(),
                language.cyan().bold(),
                format!("{}KB", size_kb).dimmed()
            );
        }
    }

    if !found_any {
        println!("{}", "No dictionaries found.".yellow());
    }

    println!();
    println!("Data directory: {}", data_dir.display().to_string().dimmed());

    Ok(())
}

/// Parse a word list: one word per line, `#` comments, optionally gzip-compressed.
pub fn read_word_list(bytes: &[u8]) -> Result<Vec<String>> {
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoded = String::new();
        GzDecoder::new(bytes)
            .read_to_string(&mut decoded)
            .context("Failed to decompress word list")?;
        decoded
    } else {
        String::from_utf8(bytes.to_vec()).context("Word list is not valid UTF-8")?
    };

    Ok(content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

/// Build the dictionary for `language` from a local word list file.
pub fn build_dictionary(language: &str, word_list: &Path) -> Result<()> {
    let bytes = fs::read(word_list)
        .with_context(|| format!("Failed to read word list: {}", word_list.display()))?;
    install(language, &bytes)
}

pub fn download_dictionary(language: &str, url: Option<&str>) -> Result<()> {
    let url = match (url, language) {
        (Some(url), _) => url.to_string(),
        (None, "en_US" | "en_GB") => ENGLISH_WORDLIST_URL.to_string(),
        (None, other) => anyhow::bail!(
            "No default word list for '{}'. Pass --url or use `gramma dict build`.",
            other
        ),
    };

    println!(
        "{} word list for {}...",
        "Downloading".cyan().bold(),
        language.yellow()
    );
    println!("Source: {}", url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    pb.set_message("Downloading...");

    let response = reqwest::blocking::get(&url).context("Failed to download word list")?;
    if !response.status().is_success() {
        anyhow::bail!("Failed to download word list: HTTP {}", response.status());
    }
    let bytes = response.bytes()?;
    pb.finish_with_message("Download complete");

    install(language, &bytes)
}

fn install(language: &str, bytes: &[u8]) -> Result<()> {
    println!("{}", "Building dictionary...".cyan());
    let words = read_word_list(bytes)?;
    println!("Found {} words", words.len().to_string().yellow());

    let dict_path = Dictionary::path_for(language)?;
    if let Some(parent) = dict_path.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    Dictionary::build_from_words(&words, &dict_path)?;

    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

/// Hex SHA-256 of a dictionary file, shown by `dict info`.
pub fn checksum(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = Dictionary::path_for(language)?;

    if !dict_path.exists() {
        println!(
            "{} Dictionary for {} not found.",
            "✗".red().bold(),
            language.yellow()
        );
        println!(
            "Run {} to install it.",
            format!("gramma dict build {} <word-list>", language).cyan()
        );
        return Ok(());
    }

    let metadata = fs::metadata(&dict_path)?;

    println!("{}", format!("Dictionary: {}", language).bold());
    println!("  Path: {}", dict_path.display());
    println!("  Size: {} KB", metadata.len() / 1024);
    println!("  SHA-256: {}", checksum(&dict_path)?);
    println!("  Format: FST (Finite State Transducer)");

    match Dictionary::load_from_path(&dict_path) {
        Ok(dict) => println!("  Words: {}", dict.len()),
        Err(e) => println!("  {}: {}", "Error loading dictionary".red(), e),
    }

    Ok(())
}
