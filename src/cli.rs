//! Command-line interface module for classifier.
//!
//! This module handles all CLI-related functionality including:
//! - Argument definitions and validation
//! - Informational commands (version, rules, defaults, editing, reset)
//! - Picking the classification mode and running its passes

use crate::classifier::{ClassifyReport, MatchPolicy, classify, classify_by_date};
use crate::config::ConfigStore;
use crate::date_format::DateFormat;
use crate::error::{Error, Result};
use crate::mover::Mover;
use crate::output::OutputFormatter;
use crate::platform;
use crate::rules::{DEFAULT_RULES, OVERRIDE_FILE_NAME, OverrideConfig, RuleTable};
use clap::{Parser, ValueHint};
use std::fs;
use std::path::{Path, PathBuf};

pub const VERSION: &str = concat!("Classifier ", env!("CARGO_PKG_VERSION"));

const USAGE: &str = "usage: classifier [-i Directory]
        -h, --help        Show help.";

/// Organize files in your directory into different folders.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "classifier", about = "Organize files in your directory into different folders")]
pub struct Args {
    /// Show version and exit
    #[arg(short = 'v', long)]
    pub version: bool,

    /// Show the current list of types and formats
    #[arg(short = 't', long)]
    pub types: bool,

    /// Edit the list of types and formats
    #[arg(short = 'e', long)]
    pub edit: bool,

    /// Reset the default config file
    #[arg(short = 'r', long)]
    pub reset: bool,

    /// Show the default config file
    #[arg(short = 's', long)]
    pub show_default: bool,

    /// Move all files with these extensions into --specific-folder
    #[arg(long, num_args = 1.., value_name = "EXT")]
    pub specific_types: Option<Vec<String>>,

    /// Folder to move --specific-types into
    #[arg(long, value_name = "FOLDER")]
    pub specific_folder: Option<String>,

    /// Main directory to put organized folders (defaults to --input)
    #[arg(short = 'o', long, value_hint = ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// The directory whose files to classify
    #[arg(short = 'i', long, value_hint = ValueHint::DirPath)]
    pub input: Option<PathBuf>,

    /// Organize files by creation date
    #[arg(short = 'd', long)]
    pub date: bool,

    /// Date format for folder names using YYYY, MM, DD, ... (requires --date)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Move a file into the first matching category only
    #[arg(long)]
    pub first_match: bool,

    /// Show what would be moved without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Use this rules file instead of the one in the home directory
    #[arg(short = 'c', long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Rejects option combinations that only make sense together.
    pub fn validate(&self) -> Result<()> {
        if self.specific_folder.is_some() != self.specific_types.is_some() {
            return Err(Error::InvalidArguments(
                "--specific-folder and --specific-types need to be specified together".to_string(),
            ));
        }
        if self.format.is_some() && !self.date {
            return Err(Error::InvalidArguments(
                "date format --format must be given along with --date".to_string(),
            ));
        }
        Ok(())
    }

    fn config_store(&self) -> ConfigStore {
        match &self.config {
            Some(path) => ConfigStore::at(path),
            None => ConfigStore::default_location(),
        }
    }

    fn match_policy(&self) -> MatchPolicy {
        if self.first_match {
            MatchPolicy::FirstMatch
        } else {
            MatchPolicy::AllMatches
        }
    }
}

/// Runs the CLI application for parsed arguments.
///
/// Informational flags are handled first and exit early. Otherwise exactly
/// one classification run is performed on `--input`.
///
/// # Examples
///
/// ```no_run
/// use classifier::cli::{Args, run_cli};
/// use clap::Parser;
///
/// let args = Args::parse_from(["classifier", "-i", "/home/user/Downloads", "--dry-run"]);
/// if let Err(e) = run_cli(&args) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(args: &Args) -> Result<()> {
    let store = args.config_store();

    if args.version {
        OutputFormatter::plain(VERSION);
        return Ok(());
    }

    if args.show_default {
        OutputFormatter::plain(DEFAULT_RULES);
        return Ok(());
    }

    if args.reset {
        store.reset()?;
        OutputFormatter::success(&format!("CONFIG file reset at: {}", store.path().display()));
        return Ok(());
    }

    if args.edit {
        ensure_config(&store)?;
        return platform::open_in_editor(store.path());
    }

    if args.types {
        ensure_config(&store)?;
        let (rules, errors) = store.load()?;
        report_config_errors(store.path(), &errors);
        print!("{}", rules);
        return Ok(());
    }

    args.validate()?;

    // Date mode never reads the rules file, so it must not create one.
    if !args.date {
        ensure_config(&store)?;
    }

    let Some(input) = args.input.as_deref() else {
        OutputFormatter::plain(USAGE);
        return Ok(());
    };
    let output = args.output.as_deref().unwrap_or(input);
    let mover = if args.dry_run {
        Mover::dry_run()
    } else {
        Mover::new()
    };

    OutputFormatter::info(&format!("\nScanning Folder: {}", input.display()));
    let report = run_classification(args, &store, input, output, &mover)?;

    report.print_summary();
    if mover.is_dry_run() {
        OutputFormatter::dry_run_notice("No files were modified.");
    }
    OutputFormatter::success("Done!");
    Ok(())
}

/// Picks the classification mode: date, ad-hoc types, directory config, or
/// the global rules, in that order of precedence.
fn run_classification(
    args: &Args,
    store: &ConfigStore,
    input: &Path,
    output: &Path,
    mover: &Mover,
) -> Result<ClassifyReport> {
    if args.date {
        let format = match &args.format {
            Some(pattern) => DateFormat::parse(pattern)?,
            None => DateFormat::default(),
        };
        return classify_by_date(&format, output, input, mover);
    }

    let (global, errors) = store.load()?;
    report_config_errors(store.path(), &errors);
    let policy = args.match_policy();

    if let (Some(folder), Some(types)) = (&args.specific_folder, &args.specific_types) {
        let rules = RuleTable::single(folder, types).with_ignore(global.ignored());
        OutputFormatter::plain(&format!("For: {}: {}", folder, types.join(", ")));
        return classify(&rules, output, input, mover, policy);
    }

    let override_path = input.join(OVERRIDE_FILE_NAME);
    if override_path.is_file() {
        return classify_with_override(&override_path, args, &global, input, mover, policy);
    }

    OutputFormatter::plain(&format!("Using the CONFIG file {}\n", store.path().display()));
    classify(&global, output, input, mover, policy)
}

/// Runs one pass per line of the directory's own config file.
fn classify_with_override(
    override_path: &Path,
    args: &Args,
    global: &RuleTable,
    input: &Path,
    mover: &Mover,
    policy: MatchPolicy,
) -> Result<ClassifyReport> {
    OutputFormatter::info("Using config in current directory");
    if args.output.is_some() {
        OutputFormatter::warning("--output is ignored while the directory has its own config");
    }

    let text = fs::read_to_string(override_path).map_err(|e| Error::io(override_path, e))?;
    let (config, errors) = OverrideConfig::parse(&text, input);
    report_config_errors(override_path, &errors);

    let mut report = ClassifyReport::default();
    for pass in config.passes {
        let rules = pass
            .rules
            .with_ignore(global.ignored())
            .with_ignore(&config.ignore);
        for rule in rules.rules() {
            OutputFormatter::plain(&format!(
                "\nScanning:  {}\nFor:       {}\nInto:      {}\nFormats:   {}",
                input.display(),
                rule.category,
                pass.destination.display(),
                rule.extensions.join(", ")
            ));
        }
        report.merge(classify(&rules, &pass.destination, input, mover, policy)?);
    }
    Ok(report)
}

/// Writes the default rules file on first use and says where it went.
fn ensure_config(store: &ConfigStore) -> Result<()> {
    if store.ensure_exists()? {
        OutputFormatter::info(&format!("CONFIG file created at: {}", store.path().display()));
    }
    Ok(())
}

fn report_config_errors(path: &Path, errors: &[Error]) {
    for error in errors {
        OutputFormatter::error(&format!("{}: {} (line skipped)", path.display(), error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("classifier").chain(args.iter().copied()))
    }

    #[test]
    fn test_specific_options_must_come_together() {
        assert!(matches!(
            parse(&["--specific-folder", "Docs"]).validate(),
            Err(Error::InvalidArguments(_))
        ));
        assert!(matches!(
            parse(&["--specific-types", "pdf", "doc"]).validate(),
            Err(Error::InvalidArguments(_))
        ));
        assert!(
            parse(&["--specific-folder", "Docs", "--specific-types", "pdf", "doc"])
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_format_requires_date() {
        assert!(parse(&["-f", "YYYY"]).validate().is_err());
        assert!(parse(&["-d", "-f", "YYYY"]).validate().is_ok());
    }

    #[test]
    fn test_specific_types_collects_values() {
        let args = parse(&["--specific-types", "pdf", "doc", "--specific-folder", "Docs"]);
        assert_eq!(
            args.specific_types,
            Some(vec!["pdf".to_string(), "doc".to_string()])
        );
    }

    #[test]
    fn test_date_mode_leaves_config_alone() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        fs::create_dir(&input).unwrap();
        let config = temp_dir.path().join("rules.conf");

        let args = Args {
            input: Some(input),
            date: true,
            config: Some(config.clone()),
            ..Args::default()
        };
        let result = run_cli(&args);

        #[cfg(feature = "date")]
        assert!(result.is_ok());
        #[cfg(not(feature = "date"))]
        assert!(matches!(result, Err(Error::MissingCapability { .. })));
        assert!(!config.exists());
    }

    #[test]
    fn test_match_policy_flag() {
        assert_eq!(parse(&[]).match_policy(), MatchPolicy::AllMatches);
        assert_eq!(
            parse(&["--first-match"]).match_policy(),
            MatchPolicy::FirstMatch
        );
    }
}
