//! CLI tool for checking PowerPoint decks against presentation guidelines.

mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use pptcheck_core::{CheckReport, Checker, CheckerConfig, SenseTable, SentenceClassifier, WordSet};
use pptcheck_pptx::PptxParser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Check a PowerPoint deck and write a feedback report.
#[derive(Parser, Debug)]
#[command(name = "pptcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Presentation to check (.pptx)
    presentation: PathBuf,

    /// Output HTML report
    #[arg(short, long, default_value = "output.html")]
    output: PathBuf,

    /// YAML file with check thresholds (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config/default.yaml")]
    config: PathBuf,

    /// Directory with verbs.txt and prepositions.txt (default: built-in lists)
    #[arg(long)]
    word_lists: Option<PathBuf>,

    /// Word sense table used by the sentence check
    #[arg(long)]
    senses: Option<PathBuf>,

    /// Print the report as JSON to stdout instead of writing HTML
    #[arg(long)]
    json: bool,

    /// Open the HTML report in the default browser
    #[arg(long)]
    open: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    validate_input(&args.presentation)?;
    let checker = build_checker(&args)?;
    let report = check_file(&args.presentation, &checker)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.time_estimate {
        Some(estimate) => println!("Estimate total time for presentation: {}", estimate.total),
        None => println!("Cannot estimate presentation time without any speaker notes provided!"),
    }

    let title = args
        .presentation
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("presentation");
    let html = report::render_html(title, &report)?;
    std::fs::write(&args.output, html)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    if args.verbose {
        eprintln!("Written to: {}", args.output.display());
    }

    if args.open {
        let target = std::fs::canonicalize(&args.output).unwrap_or_else(|_| args.output.clone());
        webbrowser::open(&target.to_string_lossy())
            .with_context(|| format!("Failed to open {} in a browser", target.display()))?;
    }

    Ok(())
}

/// Only Office Open XML decks can be read.
fn validate_input(path: &Path) -> Result<()> {
    let is_pptx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pptx"));
    if !is_pptx {
        bail!("Input file must be of '.pptx' type: {}", path.display());
    }
    Ok(())
}

fn build_checker(args: &Args) -> Result<Checker<SenseTable>> {
    let config = CheckerConfig::load(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;

    let words = match &args.word_lists {
        Some(dir) => WordSet::load_dir(dir)
            .with_context(|| format!("Failed to load word lists from {}", dir.display()))?,
        None => WordSet::default(),
    };
    let senses = match &args.senses {
        Some(path) => SenseTable::load(path)
            .with_context(|| format!("Failed to load sense table {}", path.display()))?,
        None => SenseTable::default(),
    };
    log::debug!("Sense table has {} words", senses.len());

    Ok(Checker::with_classifier(
        config,
        SentenceClassifier::with_lookup(words, senses),
    ))
}

/// Read a deck and run every check on it.
fn check_file(path: &Path, checker: &Checker<SenseTable>) -> Result<CheckReport> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let deck = PptxParser::new()
        .parse(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", path.display()))?;
    log::debug!(
        "Read {} slides ({} in scope)",
        deck.slides.len(),
        deck.in_scope_slides().len()
    );

    Ok(checker.check(&deck))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pptcheck", "talk.pptx"]).unwrap();
        assert_eq!(args.output, PathBuf::from("output.html"));
        assert_eq!(args.config, PathBuf::from("config/default.yaml"));
        assert!(!args.json && !args.open && !args.verbose);
        assert!(args.word_lists.is_none());
    }

    #[test]
    fn test_validate_input() {
        assert!(validate_input(Path::new("talk.pptx")).is_ok());
        assert!(validate_input(Path::new("TALK.PPTX")).is_ok());
        assert!(validate_input(Path::new("talk.ppt")).is_err());
        assert!(validate_input(Path::new("talk")).is_err());
    }

    #[test]
    fn test_build_checker_reads_config() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "maxWordsPerSlide: 12").unwrap();

        let path = config.path().to_string_lossy().to_string();
        let args = Args::try_parse_from(["pptcheck", "talk.pptx", "-c", &path]).unwrap();
        let checker = build_checker(&args).unwrap();
        assert_eq!(checker.config().max_words_per_slide, 12);
    }

    #[test]
    fn test_bad_sense_table_is_reported() {
        let mut senses = tempfile::NamedTempFile::new().unwrap();
        writeln!(senses, "process n x").unwrap();

        let path = senses.path().to_string_lossy().to_string();
        let args = Args::try_parse_from(["pptcheck", "talk.pptx", "--senses", &path]).unwrap();
        assert!(build_checker(&args).is_err());
    }

    #[test]
    fn test_unreadable_deck_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".pptx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();

        let checker = Checker::with_classifier(
            CheckerConfig::default(),
            SentenceClassifier::with_lookup(WordSet::default(), SenseTable::default()),
        );
        assert!(check_file(file.path(), &checker).is_err());
    }
}
