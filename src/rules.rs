/// Rule tables mapping category names to file extensions.
///
/// A rule table is parsed from plain text with one `Category: ext, ext, ...`
/// entry per line. The reserved `IGNORE` category lists extensions that are
/// never moved by extension-based classification.
///
/// # Examples
///
/// ```
/// use classifier::rules::RuleTable;
///
/// let table = RuleTable::parse("IGNORE: part\nPictures: JPG, png").unwrap();
/// assert!(table.is_ignored("part"));
/// let hits: Vec<_> = table.matches("jpg").map(|r| r.category.as_str()).collect();
/// assert_eq!(hits, vec!["Pictures"]);
/// ```
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Category key whose extensions are excluded from extension-based classification.
pub const IGNORE: &str = "IGNORE";

/// Name of the per-directory override file inside an input directory.
pub const OVERRIDE_FILE_NAME: &str = ".classifier.conf";

/// Rules written to a fresh configuration file.
pub const DEFAULT_RULES: &str = "\
IGNORE: crdownload, desktop, opdownload, part, partial
Audio: aa, aac, aiff, amr, dvf, flac, gsm, m4a, m4b, m4p, midi, mp3, msv, ogg, ra, wav, wma
Ringtones: m4r, mmf, srt
Videos: 3g2, 3gp, amv, avi, flv, f4a, f4p, f4v, gifv, m4p, m4v, mkv, mp2, mp4, mpeg, mpg, ogv, rm, svi, ts, vob, webm, wmv
Pictures: bmp, bpg, gif, ico, jpeg, jpg, odg, png, psd, rgbe, svg, tiff, webp, vml
Archives: 7z, bz2, cpio, dmg, gz, iso, lz, rar, tar, tgz, xz, zip
Documents: ai, atom, doc, docx, kdb, kdbx, odf, odm, odp, ods, odt, pdf, ppsx, ppt, pptx, pub, qif, rtf, sxw, xls, xlsv, xlsx, xml, xt
Webpages: asp, aspx, cgi, htm, html, xhtml
Programming: a, c, cljs, coffee, class, d, e, el, erb, fth, go, java, js, lua, lisp, m, o, p, php, pl, pm, py, pyc, pyo, r, rb, so, tcl
Plain Text: asc, cer, cfg, conf, crt, css, csv, ini, inf, json, log, md, pem, pub, ppk, ssh, txt, xml, yaml
Books: chm, epub, fb2, mobi
Packages: deb, ebuild, jar, rpm
Programs: bat, cmd, com, exe, msi, out, sh, vbs";

/// Normalizes an extension for comparison: trimmed, no leading dot, lowercase.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn normalize_all<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| normalize_extension(ext.as_ref()))
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// A destination category and the extensions routed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Category name, also used as the destination folder name.
    pub category: String,
    /// Normalized extensions, in the order they were written.
    pub extensions: Vec<String>,
}

impl Rule {
    /// Returns true if this rule lists `ext` (case-insensitive).
    pub fn contains(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.extensions.iter().any(|candidate| *candidate == ext)
    }
}

/// An ordered set of rules plus the IGNORE extensions.
///
/// Tables are built once per classification pass and never mutated while a
/// pass runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
    ignore: BTreeSet<String>,
}

impl RuleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the built-in default rules.
    pub fn default_rules() -> Self {
        let (table, _) = Self::parse_lenient(DEFAULT_RULES);
        table
    }

    /// Builds a table with a single category, used for ad-hoc moves.
    ///
    /// # Arguments
    ///
    /// * `category` - Destination folder name
    /// * `extensions` - Extensions routed to it, normalized on insert
    ///
    /// # Examples
    ///
    /// ```
    /// use classifier::rules::RuleTable;
    ///
    /// let table = RuleTable::single("Scans", [".PDF", "tiff"]);
    /// assert_eq!(table.rules()[0].extensions, vec!["pdf", "tiff"]);
    /// ```
    pub fn single<I, S>(category: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        table.insert(category, extensions);
        table
    }

    /// Adds or replaces a category.
    ///
    /// A category that is already present keeps its position and has its
    /// extension list replaced. Inserting `IGNORE` replaces the ignore set.
    pub fn insert<I, S>(&mut self, category: &str, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = category.trim();
        let extensions = normalize_all(extensions);

        if category == IGNORE {
            self.ignore = extensions.into_iter().collect();
            return;
        }

        match self.rules.iter_mut().find(|rule| rule.category == category) {
            Some(rule) => rule.extensions = extensions,
            None => self.rules.push(Rule {
                category: category.to_string(),
                extensions,
            }),
        }
    }

    /// Adds extensions to the ignore set, keeping the ones already there.
    ///
    /// Used to carry the global IGNORE list into ad-hoc and override passes.
    pub fn with_ignore<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore.extend(normalize_all(extensions));
        self
    }

    /// The categories in table order, without `IGNORE`.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The normalized IGNORE extensions, sorted.
    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignore
    }

    /// Returns true if files with this extension must never be moved.
    pub fn is_ignored(&self, ext: &str) -> bool {
        self.ignore.contains(&normalize_extension(ext))
    }

    /// Iterates the non-IGNORE rules listing `ext`, in table order.
    pub fn matches<'a>(&'a self, ext: &str) -> impl Iterator<Item = &'a Rule> + use<'a> {
        let ext = normalize_extension(ext);
        self.rules.iter().filter(move |rule| rule.contains(&ext))
    }

    /// Parses a table, failing on the first malformed line.
    ///
    /// Blank lines are skipped. A repeated category replaces the earlier
    /// extension list in place.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigMalformed`] with the 1-based line number when a line has
    /// no `:` or an empty category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use classifier::rules::RuleTable;
    ///
    /// assert!(RuleTable::parse("Audio: mp3\nno colon here").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (index, line) in text.lines().enumerate() {
            if let Some((category, extensions)) = parse_rule_line(index + 1, line)? {
                table.insert(&category, extensions);
            }
        }
        Ok(table)
    }

    /// Parses a table, skipping malformed lines and returning them as errors.
    ///
    /// This is how the global configuration file is read: one bad line never
    /// disables the rest of the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use classifier::rules::RuleTable;
    ///
    /// let (table, errors) = RuleTable::parse_lenient("Audio: mp3\nno colon here");
    /// assert_eq!(table.rules().len(), 1);
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn parse_lenient(text: &str) -> (Self, Vec<Error>) {
        let mut table = Self::new();
        let mut errors = Vec::new();
        for (index, line) in text.lines().enumerate() {
            match parse_rule_line(index + 1, line) {
                Ok(Some((category, extensions))) => table.insert(&category, extensions),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        (table, errors)
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ignore.is_empty() {
            let ignored: Vec<&str> = self.ignore.iter().map(String::as_str).collect();
            writeln!(f, "{}: {}", IGNORE, ignored.join(", "))?;
        }
        for rule in &self.rules {
            writeln!(f, "{}: {}", rule.category, rule.extensions.join(", "))?;
        }
        Ok(())
    }
}

fn malformed(line: usize, text: &str, reason: &str) -> Error {
    Error::ConfigMalformed {
        line,
        text: text.to_string(),
        reason: reason.to_string(),
    }
}

/// Splits `Category: ext, ext` into its parts. Blank lines yield `None`.
fn parse_rule_line(line_no: usize, line: &str) -> Result<Option<(String, Vec<String>)>> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let (category, value) = line
        .split_once(':')
        .ok_or_else(|| malformed(line_no, line, "expected 'Category: ext, ext, ...'"))?;

    let category = category.trim();
    if category.is_empty() {
        return Err(malformed(line_no, line, "category name is empty"));
    }

    let extensions = value.split(',').map(|ext| ext.to_string()).collect();
    Ok(Some((category.to_string(), extensions)))
}

/// One classification pass declared by a line of the override file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverridePass {
    pub rules: RuleTable,
    /// Base folder the category folder is created under.
    pub destination: PathBuf,
}

/// Parsed contents of a per-directory override file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideConfig {
    pub passes: Vec<OverridePass>,
    /// Extensions listed on `IGNORE` lines; applied to every pass.
    pub ignore: BTreeSet<String>,
}

impl OverrideConfig {
    /// Parses `Category: destFolder: ext,ext,...` lines.
    ///
    /// Every line has exactly three `:`-separated fields. The one exception is
    /// a Windows drive prefix at the start of the destination (`C:\Sorted`,
    /// `D:/media`), which stays part of the destination field. `IGNORE` lines
    /// take two or three fields and only contribute extensions.
    ///
    /// # Arguments
    ///
    /// * `text` - Contents of a `.classifier.conf` file
    /// * `input_dir` - Directory that relative destinations are resolved against
    ///
    /// # Returns
    ///
    /// The parsed passes in file order, plus one [`Error::ConfigMalformed`]
    /// for every line that was skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use classifier::rules::OverrideConfig;
    /// use std::path::Path;
    ///
    /// let text = "Pictures: sorted: jpg, png\nPics: a: b: gif";
    /// let (config, errors) = OverrideConfig::parse(text, Path::new("/in"));
    /// assert_eq!(config.passes.len(), 1);
    /// assert_eq!(config.passes[0].destination, Path::new("/in/sorted"));
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn parse(text: &str, input_dir: &Path) -> (Self, Vec<Error>) {
        const EXPECTED: &str = "expected 'Category: destFolder: ext,ext,...'";

        let mut config = Self::default();
        let mut errors = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_override_fields(line);
            let category = fields[0].trim();

            if category == IGNORE {
                match fields.as_slice() {
                    [_, exts] | [_, _, exts] => {
                        config.ignore.extend(normalize_all(exts.split(',')));
                    }
                    _ => errors.push(malformed(line_no, line, EXPECTED)),
                }
                continue;
            }

            let [_, destination, value] = fields.as_slice() else {
                errors.push(malformed(line_no, line, EXPECTED));
                continue;
            };

            let destination = destination.trim();
            if category.is_empty() || destination.is_empty() {
                errors.push(malformed(
                    line_no,
                    line,
                    "category and destination folder must not be empty",
                ));
                continue;
            }

            config.passes.push(OverridePass {
                rules: RuleTable::single(category, value.split(',')),
                destination: input_dir.join(destination),
            });
        }

        (config, errors)
    }
}

/// Splits an override line on `:`.
///
/// A colon directly after a single drive letter at the start of the second
/// field (`C:\`, `C:/`) does not end that field.
fn split_override_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    for (at, _) in line.match_indices(':') {
        let head = line[start..at].trim();
        let is_drive = fields.len() == 1
            && head.len() == 1
            && head.bytes().all(|b| b.is_ascii_alphabetic())
            && line[at + 1..].starts_with(['\\', '/']);
        if is_drive {
            continue;
        }
        fields.push(&line[start..at]);
        start = at + 1;
    }
    fields.push(&line[start..]);
    fields
}
