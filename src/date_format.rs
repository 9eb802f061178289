//! Folder names derived from timestamps.
//!
//! Patterns use a small token language:
//!
//! | Token  | Meaning                 | Example   |
//! |--------|-------------------------|-----------|
//! | `YYYY` | four-digit year         | `2024`    |
//! | `YY`   | two-digit year          | `24`      |
//! | `MMMM` | month name              | `March`   |
//! | `MMM`  | abbreviated month name  | `Mar`     |
//! | `MM`   | two-digit month         | `03`      |
//! | `M`    | month                   | `3`       |
//! | `DD`   | two-digit day           | `07`      |
//! | `D`    | day                     | `7`       |
//! | `HH`   | hour, 00-23             | `09`      |
//! | `mm`   | minute                  | `05`      |
//! | `ss`   | second                  | `02`      |
//!
//! Text inside `[...]` is copied literally, so `[Month] MM` renders as
//! `Month 03`. Any other character is copied as is.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Format used when none is given on the command line.
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]]*\]|YYYY|YY|MMMM|MMM|MM|M|DD|D|HH|mm|ss")
        .expect("Invalid date token pattern")
});

/// A parsed date pattern, ready to render timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    strftime: String,
}

impl DateFormat {
    /// Parses a pattern. An empty pattern is rejected.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(Error::InvalidArguments(
                "date format must not be empty".to_string(),
            ));
        }

        let mut strftime = String::with_capacity(pattern.len() * 2);
        let mut last = 0;
        for token in TOKEN.find_iter(pattern) {
            push_literal(&mut strftime, &pattern[last..token.start()]);
            let text = token.as_str();
            match text {
                "YYYY" => strftime.push_str("%Y"),
                "YY" => strftime.push_str("%y"),
                "MMMM" => strftime.push_str("%B"),
                "MMM" => strftime.push_str("%b"),
                "MM" => strftime.push_str("%m"),
                "M" => strftime.push_str("%-m"),
                "DD" => strftime.push_str("%d"),
                "D" => strftime.push_str("%-d"),
                "HH" => strftime.push_str("%H"),
                "mm" => strftime.push_str("%M"),
                "ss" => strftime.push_str("%S"),
                // [literal]
                _ => push_literal(&mut strftime, &text[1..text.len() - 1]),
            }
            last = token.end();
        }
        push_literal(&mut strftime, &pattern[last..]);

        Ok(Self {
            pattern: pattern.to_string(),
            strftime,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Renders a timestamp in its own time zone.
    #[cfg(feature = "date")]
    pub fn format<Tz>(&self, timestamp: &chrono::DateTime<Tz>) -> String
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        timestamp.format(&self.strftime).to_string()
    }

    /// Renders a file system timestamp in local time.
    #[cfg(feature = "date")]
    pub fn format_system_time(&self, time: std::time::SystemTime) -> String {
        self.format(&chrono::DateTime::<chrono::Local>::from(time))
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_DATE_FORMAT.to_string(),
            strftime: "%Y-%m-%d".to_string(),
        }
    }
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_parsed_default() {
        assert_eq!(
            DateFormat::parse(DEFAULT_DATE_FORMAT).unwrap(),
            DateFormat::default()
        );
    }

    #[test]
    fn test_empty_format_rejected() {
        assert!(matches!(
            DateFormat::parse("  "),
            Err(Error::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_literal_percent_escaped() {
        let format = DateFormat::parse("100% YYYY").unwrap();
        assert_eq!(format.strftime, "100%% %Y");
    }

    #[cfg(feature = "date")]
    mod rendering {
        use super::*;
        use chrono::{NaiveDate, Utc};

        fn sample() -> chrono::DateTime<Utc> {
            NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(9, 5, 2)
                .unwrap()
                .and_utc()
        }

        fn render(pattern: &str) -> String {
            DateFormat::parse(pattern).unwrap().format(&sample())
        }

        #[test]
        fn test_numeric_tokens() {
            assert_eq!(render("YYYY-MM-DD"), "2024-03-07");
            assert_eq!(render("YY.M.D"), "24.3.7");
            assert_eq!(render("HH-mm-ss"), "09-05-02");
        }

        #[test]
        fn test_month_names() {
            assert_eq!(render("MMMM YYYY"), "March 2024");
            assert_eq!(render("MMM"), "Mar");
        }

        #[test]
        fn test_bracketed_literal() {
            assert_eq!(render("[Month] MM"), "Month 03");
            assert_eq!(render("[100%]-YYYY"), "100%-2024");
        }

        #[test]
        fn test_path_separators_pass_through() {
            assert_eq!(render("YYYY/MM"), "2024/03");
        }
    }
}
