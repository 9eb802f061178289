//! Classification passes over a single directory.
//!
//! A pass lists the immediate entries of the input directory once and hands
//! every matching regular file to the [`Mover`]. Subdirectories are never
//! descended into. Failures of individual moves are collected in the
//! returned [`ClassifyReport`] and never stop the pass; only an unreadable
//! input directory does.

use crate::date_format::DateFormat;
use crate::error::{Error, Result};
use crate::mover::{MoveOp, MoveOutcome, Mover};
use crate::output::OutputFormatter;
use crate::rules::{OVERRIDE_FILE_NAME, RuleTable, normalize_extension};
use std::collections::BTreeMap;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

/// How many categories a file is offered to when several list its extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Attempt every matching category in table order. After the first
    /// successful move the source is gone, so later attempts are no-ops.
    #[default]
    AllMatches,
    /// Stop after the first matching category.
    FirstMatch,
}

/// Tally of one classification pass.
#[derive(Debug, Default)]
pub struct ClassifyReport {
    /// Files moved (or, in a dry run, that would move) per destination folder.
    pub moved: BTreeMap<String, usize>,
    /// Files skipped because their extension is in the IGNORE set.
    pub ignored: Vec<PathBuf>,
    /// Files whose extension matched no category.
    pub unmatched: Vec<PathBuf>,
    /// Move requests that were no-ops: already in place, or no longer a file.
    pub unchanged: usize,
    /// Moves that failed.
    pub failures: Vec<Error>,
}

impl ClassifyReport {
    pub fn moved_total(&self) -> usize {
        self.moved.values().sum()
    }

    /// True when no move failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds another pass into this one.
    pub fn merge(&mut self, other: ClassifyReport) {
        for (folder, count) in other.moved {
            *self.moved.entry(folder).or_insert(0) += count;
        }
        self.ignored.extend(other.ignored);
        self.unmatched.extend(other.unmatched);
        self.unchanged += other.unchanged;
        self.failures.extend(other.failures);
    }

    /// Prints the per-folder summary table, then the ignored and unmatched
    /// counts when they are non-zero.
    ///
    /// A warning line follows when any move failed. The individual failures
    /// were already printed as they happened.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::classifier::ClassifyReport;
    ///
    /// let mut report = ClassifyReport::default();
    /// report.moved.insert("Audio".to_string(), 3);
    /// report.print_summary();
    /// ```
    pub fn print_summary(&self) {
        OutputFormatter::summary_table(&self.moved, self.moved_total());
        if !self.ignored.is_empty() {
            OutputFormatter::plain(&format!("Ignored:   {}", self.ignored.len()));
        }
        if !self.unmatched.is_empty() {
            OutputFormatter::plain(&format!("Unmatched: {}", self.unmatched.len()));
        }
        if !self.failures.is_empty() {
            OutputFormatter::warning(&format!(
                "{} file(s) could not be moved. Please review errors above.",
                self.failures.len()
            ));
        }
    }

    fn record(&mut self, op: &MoveOp, folder: &str, result: Result<MoveOutcome>) {
        let name = op.file_name.to_string_lossy();
        match result {
            Ok(MoveOutcome::Moved { from, to }) => {
                log::debug!("moved {} -> {}", from.display(), to.display());
                OutputFormatter::success(&format!("moved: {}", to.display()));
                *self.moved.entry(folder.to_string()).or_insert(0) += 1;
            }
            Ok(MoveOutcome::WouldMove { to, .. }) => {
                OutputFormatter::dry_run_notice(&format!("would move: {}", to.display()));
                *self.moved.entry(folder.to_string()).or_insert(0) += 1;
            }
            Ok(MoveOutcome::SamePath) => {
                log::debug!("{} already in {}", name, folder);
                OutputFormatter::skipped(&format!("already in place: {}", name));
                self.unchanged += 1;
            }
            Ok(MoveOutcome::NotAFile) => {
                log::debug!("{} is not a regular file, not moving to {}", name, folder);
                OutputFormatter::skipped(&format!("not a file: {}", name));
                self.unchanged += 1;
            }
            Err(e) => self.record_failure(e),
        }
    }

    fn record_failure(&mut self, error: Error) {
        log::warn!("{}", error);
        OutputFormatter::error(&format!("Cannot move file - {}", error));
        self.failures.push(error);
    }
}

/// Lists the immediate entries of `dir`, sorted by name.
fn list_entries(dir: &Path) -> Result<Vec<DirEntry>> {
    let mut entries: Vec<DirEntry> = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| {
            entry
                .map_err(|e| log::warn!("skipping unreadable entry in {}: {}", dir.display(), e))
                .ok()
        })
        .collect();
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Lowercased extension without the dot; empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Moves the files of `input_dir` into `output_base/<category>` folders.
///
/// # Examples
///
/// ```no_run
/// use classifier::classifier::{MatchPolicy, classify};
/// use classifier::mover::Mover;
/// use classifier::rules::RuleTable;
/// use std::path::Path;
///
/// let downloads = Path::new("/home/user/Downloads");
/// let report = classify(
///     &RuleTable::default_rules(),
///     downloads,
///     downloads,
///     &Mover::new(),
///     MatchPolicy::AllMatches,
/// )
/// .unwrap();
/// println!("moved {} files", report.moved_total());
/// ```
pub fn classify(
    rules: &RuleTable,
    output_base: &Path,
    input_dir: &Path,
    mover: &Mover,
    policy: MatchPolicy,
) -> Result<ClassifyReport> {
    log::info!(
        "classifying {} into {} ({} categories, {:?})",
        input_dir.display(),
        output_base.display(),
        rules.rules().len(),
        policy
    );

    let mut report = ClassifyReport::default();

    for entry in list_entries(input_dir)? {
        let file_name = entry.file_name();
        if file_name == OVERRIDE_FILE_NAME {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = extension_of(&path);
        if rules.is_ignored(&ext) {
            log::debug!("ignoring {}", path.display());
            OutputFormatter::skipped(&format!("ignored: {}", file_name.to_string_lossy()));
            report.ignored.push(path);
            continue;
        }

        let mut matched = false;
        for rule in rules.matches(&ext) {
            matched = true;
            let op = MoveOp::new(&file_name, input_dir, &output_base.join(&rule.category));
            let result = mover.execute(&op);
            report.record(&op, &rule.category, result);

            if policy == MatchPolicy::FirstMatch {
                break;
            }
        }

        if !matched {
            log::debug!("no category for {}", path.display());
            report.unmatched.push(path);
        }
    }

    Ok(report)
}

/// Moves the files of `input_dir` into `output_base/<formatted creation date>`.
///
/// Hidden entries are skipped. The IGNORE set is not consulted in this mode.
/// Platforms that do not record a birth time fall back to the modification
/// time.
#[cfg(feature = "date")]
pub fn classify_by_date(
    date_format: &DateFormat,
    output_base: &Path,
    input_dir: &Path,
    mover: &Mover,
) -> Result<ClassifyReport> {
    log::info!(
        "classifying {} by date ({}) into {}",
        input_dir.display(),
        date_format.pattern(),
        output_base.display()
    );

    let mut report = ClassifyReport::default();

    for entry in list_entries(input_dir)? {
        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let timestamp = fs::metadata(&path).and_then(|metadata| {
            metadata.created().or_else(|e| {
                log::debug!("no creation time for {} ({}), using mtime", path.display(), e);
                metadata.modified()
            })
        });
        let timestamp = match timestamp {
            Ok(timestamp) => timestamp,
            Err(cause) => {
                report.record_failure(Error::MoveFailed { file: path, cause });
                continue;
            }
        };

        let folder = date_format.format_system_time(timestamp);
        let op = MoveOp::new(&file_name, input_dir, &output_base.join(&folder));
        let result = mover.execute(&op);
        report.record(&op, &folder, result);
    }

    Ok(report)
}

/// Date classification needs chrono; this build was made without it.
#[cfg(not(feature = "date"))]
pub fn classify_by_date(
    _date_format: &DateFormat,
    _output_base: &Path,
    _input_dir: &Path,
    _mover: &Mover,
) -> Result<ClassifyReport> {
    Err(Error::MissingCapability {
        capability: "date classification",
        hint: "rebuild classifier with `--features date`",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).expect("Failed to write test file");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("a/Photo.JPG")), "jpg");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
    }

    #[test]
    fn test_all_matches_moves_once_then_noops() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "feed.xml");
        let rules = RuleTable::parse("Documents: xml\nPlain Text: xml").unwrap();

        let report = classify(&rules, base, base, &Mover::new(), MatchPolicy::AllMatches).unwrap();

        assert!(base.join("Documents/feed.xml").is_file());
        assert!(!base.join("Plain Text").exists());
        assert_eq!(report.moved_total(), 1);
        assert_eq!(report.unchanged, 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_first_match_stops_early() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "feed.xml");
        let rules = RuleTable::parse("Plain Text: xml\nDocuments: xml").unwrap();

        let report = classify(&rules, base, base, &Mover::new(), MatchPolicy::FirstMatch).unwrap();

        assert!(base.join("Plain Text/feed.xml").is_file());
        assert_eq!(report.unchanged, 0);
    }

    #[test]
    fn test_ignored_and_unmatched_stay_put() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "movie.part");
        touch(base, "notes.xyz");
        let rules = RuleTable::parse("IGNORE: part\nVideos: part, mkv").unwrap();

        let report = classify(&rules, base, base, &Mover::new(), MatchPolicy::AllMatches).unwrap();

        assert!(base.join("movie.part").is_file());
        assert!(base.join("notes.xyz").is_file());
        assert!(!base.join("Videos").exists());
        assert_eq!(report.ignored.len(), 1);
        assert_eq!(report.unmatched.len(), 1);
    }

    #[test]
    fn test_override_file_is_never_moved() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, OVERRIDE_FILE_NAME);
        let rules = RuleTable::parse("Config: conf").unwrap();

        let report = classify(&rules, base, base, &Mover::new(), MatchPolicy::AllMatches).unwrap();

        assert!(base.join(OVERRIDE_FILE_NAME).is_file());
        assert_eq!(report.moved_total(), 0);
    }

    #[test]
    fn test_missing_input_directory_fails_pass() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = classify(
            &RuleTable::default_rules(),
            &missing,
            &missing,
            &Mover::new(),
            MatchPolicy::AllMatches,
        );
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_collision_recorded_and_pass_continues() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        fs::create_dir(base.join("Audio")).unwrap();
        touch(&base.join("Audio"), "a.mp3");
        touch(base, "a.mp3");
        touch(base, "b.mp3");
        let rules = RuleTable::parse("Audio: mp3").unwrap();

        let report = classify(&rules, base, base, &Mover::new(), MatchPolicy::AllMatches).unwrap();

        assert_eq!(report.failures.len(), 1);
        assert!(base.join("a.mp3").is_file());
        assert!(base.join("Audio/b.mp3").is_file());
    }

    #[test]
    fn test_rerun_from_category_folder_is_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        fs::create_dir_all(out.join("Audio")).unwrap();
        touch(&out.join("Audio"), "a.mp3");
        let rules = RuleTable::parse("Audio: mp3").unwrap();

        let input = out.join("..").join("out").join("Audio");
        let report = classify(&rules, &out, &input, &Mover::new(), MatchPolicy::AllMatches).unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.moved_total(), 0);
        assert!(out.join("Audio/a.mp3").is_file());
    }

    #[cfg(feature = "date")]
    #[test]
    fn test_classify_by_date_uses_timestamp_and_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();
        touch(&input, "photo.part");
        touch(&input, ".hidden");

        let format = DateFormat::default();
        let metadata = fs::metadata(input.join("photo.part")).unwrap();
        let stamp = metadata.created().or_else(|_| metadata.modified()).unwrap();
        let folder = format.format_system_time(stamp);

        let report = classify_by_date(&format, &output, &input, &Mover::new()).unwrap();

        assert!(output.join(&folder).join("photo.part").is_file());
        assert!(input.join(".hidden").is_file());
        assert_eq!(report.moved_total(), 1);
    }

    #[cfg(not(feature = "date"))]
    #[test]
    fn test_classify_by_date_requires_feature() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();
        touch(base, "a.txt");
        let result = classify_by_date(&DateFormat::default(), base, base, &Mover::new());
        assert!(matches!(result, Err(Error::MissingCapability { .. })));
        assert!(base.join("a.txt").is_file());
    }
}
