use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use gramma::cli::output::{print_report, OutputFormat};
use gramma::config::Overrides;
use gramma::{dict, Checkers, Config};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gramma")]
#[command(version, about = "Spell and mistake-pattern checker for plain text", long_about = None)]
struct Cli {
    /// Text file to check (reads standard input when omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Verbose mode: list loaded rules and hint matching valid expressions
    #[arg(short, long)]
    verbose: bool,

    /// File of name=regex pairs not considered spelling mistakes, e.g. 'NUMBER=\d+', or "none"
    #[arg(long, value_name = "FILE")]
    valid_exprs: Option<String>,

    /// File of name=regex mistake patterns, e.g. 'DASS_OHNE_KOMMA=(?<!, )(dass)', or "none"
    #[arg(long, value_name = "FILE")]
    mistake_patterns: Option<String>,

    /// Dictionary language code (e.g., de_DE, en_US)
    #[arg(short, long, env = "GRAMMA_LANG")]
    language: Option<String>,

    /// FST dictionary file to use instead of the installed one
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Build a dictionary from a word list (one word per line, plain or gzip)
    Build {
        /// Language code (e.g., de_DE)
        language: String,
        /// Word list file
        word_list: PathBuf,
    },
    /// Download a word list and build a dictionary from it
    Download {
        /// Language code (e.g., en_US)
        language: String,
        /// Word list URL; defaults exist for en_US and en_GB only
        #[arg(long)]
        url: Option<String>,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "gramma=info" } else { "gramma=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Diagnostics go to stderr so they never mix with the annotated text
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read from stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "gramma", &mut io::stdout());
        return Ok(());
    }

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let start = Instant::now();

    let config = Config::load(Overrides {
        language: cli.language,
        valid_expressions: cli.valid_exprs,
        mistake_patterns: cli.mistake_patterns,
        dictionary: cli.dictionary,
        verbose: cli.verbose,
    })?;

    let input = read_input(cli.input.as_ref())?;
    let checkers = Checkers::new(&config)?;
    let report = checkers.run(&input);

    print_report(
        &report,
        checkers.mistake_patterns(),
        checkers.valid_expressions(),
        config.verbose,
        !cli.no_color,
        &cli.format,
    )?;

    info!(elapsed = ?start.elapsed(), "gramma done");
    Ok(())
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => dict::manager::list_dictionaries()?,
            DictCommands::Build {
                language,
                word_list,
            } => dict::manager::build_dictionary(&language, &word_list)?,
            DictCommands::Download { language, url } => {
                dict::manager::download_dictionary(&language, url.as_deref())?
            }
            DictCommands::Info { language } => dict::manager::show_info(&language)?,
        },
    }
    Ok(())
}
