//! Output formatting and styling module.
//!
//! All user-facing console output goes through [`OutputFormatter`] so every
//! move, skip and failure is printed with the same styling. Diagnostics for
//! developers go through the `log` facade instead.

use colored::*;
use std::collections::BTreeMap;

/// Consistent, coloured console output.
///
/// Successes and summaries go to stdout, errors to stderr. Colours are
/// dropped when `NO_COLOR` is set.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::success("moved: Pictures/cat.jpg");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// Written to stderr so failures stay visible when stdout is piped.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::error("Cannot move file - a.mp3 already exists");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::warning("--output is ignored when an override file is present");
    /// ```
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::info("Opening /home/user/.classifier.conf");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a dimmed note for files that were deliberately left alone.
    ///
    /// Used for files whose extension is on the IGNORE list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::skipped("ignored: movie.crdownload");
    /// ```
    pub fn skipped(message: &str) {
        println!("{} {}", "-".dimmed(), message.dimmed());
    }

    /// Prints a section header in bold, preceded by a blank line.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message, prefixed with `[DRY RUN]`.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// OutputFormatter::dry_run_notice("would move: Downloads/Audio/song.mp3");
    /// ```
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a summary table of moved files per destination folder.
    ///
    /// # Arguments
    ///
    /// * `folder_counts` - Files moved per destination folder, in name order
    /// * `total_files` - Total printed on the last row
    ///
    /// # Example
    ///
    /// ```no_run
    /// use classifier::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Pictures".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_folder_len = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(6); // "Folder"

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_folder_len
        );
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
