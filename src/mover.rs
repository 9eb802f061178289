/// Physical relocation of single files into destination folders.
///
/// The mover keeps no state between moves: each [`MoveOp`] is checked and
/// executed on its own. A source and destination in the same directory
/// (however the two paths are spelled) and sources that are not regular files
/// are no-ops, so re-running a move is harmless.
use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One file relocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOp {
    /// Name of the file inside `from_dir`.
    pub file_name: OsString,
    /// Directory the file currently lives in.
    pub from_dir: PathBuf,
    /// Folder the file should end up in.
    pub to_dir: PathBuf,
}

impl MoveOp {
    /// Creates a request to move `from_dir/file_name` into `to_dir`.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Bare file name, without any directory part
    /// * `from_dir` - Directory holding the file
    /// * `to_dir` - Destination folder; created on demand when the move runs
    pub fn new(file_name: impl Into<OsString>, from_dir: &Path, to_dir: &Path) -> Self {
        Self {
            file_name: file_name.into(),
            from_dir: from_dir.to_path_buf(),
            to_dir: to_dir.to_path_buf(),
        }
    }

    /// Full path of the file before the move.
    pub fn source(&self) -> PathBuf {
        self.from_dir.join(&self.file_name)
    }

    /// Full path the file will have after the move.
    ///
    /// # Examples
    ///
    /// ```
    /// use classifier::mover::MoveOp;
    /// use std::path::Path;
    ///
    /// let op = MoveOp::new("song.mp3", Path::new("in"), Path::new("out/Audio"));
    /// assert_eq!(op.destination(), Path::new("out/Audio/song.mp3"));
    /// ```
    pub fn destination(&self) -> PathBuf {
        self.to_dir.join(&self.file_name)
    }
}

/// What happened to a single move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file was renamed into place.
    Moved { from: PathBuf, to: PathBuf },
    /// Dry run: the file would have been moved.
    WouldMove { from: PathBuf, to: PathBuf },
    /// Source and destination are the same path.
    SamePath,
    /// The source is missing or is not a regular file.
    NotAFile,
}

/// Moves files into destination folders, creating the folders on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mover {
    dry_run: bool,
}

impl Mover {
    /// A mover that renames files.
    pub fn new() -> Self {
        Self { dry_run: false }
    }

    /// A mover that only reports what it would do.
    ///
    /// Dry runs still check the source and the destination, so a collision
    /// is reported exactly as a real run would report it. No folder is created.
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Returns true for movers built with [`Mover::dry_run`].
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Moves `from_dir/file_name` to `to_dir/file_name`.
    ///
    /// An existing file at the destination is never overwritten; the move
    /// fails with [`Error::MoveFailed`] instead.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use classifier::mover::{Mover, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/home/user/Downloads");
    /// let outcome = Mover::new().move_to("song.mp3", dir, &dir.join("Audio")).unwrap();
    /// assert!(matches!(outcome, MoveOutcome::Moved { .. }));
    /// ```
    pub fn move_to(
        &self,
        file_name: impl AsRef<OsStr>,
        from_dir: &Path,
        to_dir: &Path,
    ) -> Result<MoveOutcome> {
        self.execute(&MoveOp::new(file_name.as_ref(), from_dir, to_dir))
    }

    /// Executes a single move request.
    ///
    /// Checks run in this order:
    ///
    /// 1. Same directory on disk: [`MoveOutcome::SamePath`].
    /// 2. Source missing or not a regular file: [`MoveOutcome::NotAFile`].
    /// 3. Destination already exists: [`Error::MoveFailed`] with
    ///    [`io::ErrorKind::AlreadyExists`].
    ///
    /// Otherwise the destination folder is created if needed and the file is
    /// renamed into it, or [`MoveOutcome::WouldMove`] is returned in a dry run.
    ///
    /// # Errors
    ///
    /// [`Error::MoveFailed`] naming the source file. The cause carries the
    /// underlying I/O error.
    pub fn execute(&self, op: &MoveOp) -> Result<MoveOutcome> {
        let from = op.source();
        let to = op.destination();

        if from == to || same_directory(&op.from_dir, &op.to_dir) {
            return Ok(MoveOutcome::SamePath);
        }

        // Symlinks are followed; directories are never moved.
        if !from.is_file() {
            return Ok(MoveOutcome::NotAFile);
        }

        if to.exists() {
            return Err(Error::MoveFailed {
                file: from,
                cause: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("{} already exists", to.display()),
                ),
            });
        }

        if self.dry_run {
            return Ok(MoveOutcome::WouldMove { from, to });
        }

        if !op.to_dir.is_dir() {
            fs::create_dir_all(&op.to_dir).map_err(|e| Error::MoveFailed {
                file: from.clone(),
                cause: e,
            })?;
        }

        fs::rename(&from, &to).map_err(|e| Error::MoveFailed {
            file: from.clone(),
            cause: e,
        })?;

        Ok(MoveOutcome::Moved { from, to })
    }
}

/// Whether two directory paths resolve to the same place on disk.
///
/// `./out/Audio`, `out/Audio` and `out/../out/Audio` are one directory.
/// Paths that cannot be resolved (missing directories) are never the same.
fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
