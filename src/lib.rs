//! classifier - organize the files of a directory into category folders
//!
//! This library provides a rule table mapping category names to file
//! extensions, a single-directory classification pass that moves matching
//! files into `output/<category>` folders, a date-based alternative that
//! names folders after each file's creation date, and the command-line
//! surface tying them together.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod date_format;
pub mod error;
pub mod mover;
pub mod output;
pub mod platform;
pub mod rules;

pub use classifier::{ClassifyReport, MatchPolicy, classify, classify_by_date};
pub use config::ConfigStore;
pub use date_format::DateFormat;
pub use error::{Error, Result};
pub use mover::{MoveOp, MoveOutcome, Mover};
pub use rules::{OverrideConfig, Rule, RuleTable};

pub use cli::{Args, run_cli};
