use std::{
    fmt::Display,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::{Builder, NamedTempFile};
use thiserror::Error;

pub const POSTS_DIR: &str = "blog";
pub const QUOTES_DIR: &str = "bookQuotes";

/// Staged files are hidden so the site generator never picks them up.
const STAGING_PREFIX: &str = ".postsmith-";
const STAGING_SUFFIX: &str = ".tmp";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum StorageAction {
    CheckExists,
    CreateDir,
    Stage,
    Commit,
    Remove,
}

impl Display for StorageAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StorageAction::CheckExists => "checking existence of",
            StorageAction::CreateDir => "creating directory",
            StorageAction::Stage => "staging",
            StorageAction::Commit => "writing",
            StorageAction::Remove => "removing",
        })
    }
}

#[derive(Debug, Error)]
#[error("Failed {action} {}: {source}", path.display())]
pub struct StorageError {
    pub action: StorageAction,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl StorageError {
    fn new(action: StorageAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        self.source.kind() == io::ErrorKind::AlreadyExists
    }
}

pub type Result<T, E = StorageError> = std::result::Result<T, E>;

/// The two content areas of a site: `blog` for posts and `bookQuotes` for
/// the quotes of book notes.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ContentStore {
    posts_dir: PathBuf,
    quotes_dir: PathBuf,
}

impl ContentStore {
    #[must_use]
    pub fn new(content_root: impl AsRef<Path>) -> Self {
        let content_root = content_root.as_ref();
        Self {
            posts_dir: content_root.join(POSTS_DIR),
            quotes_dir: content_root.join(QUOTES_DIR),
        }
    }

    #[must_use]
    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    #[must_use]
    pub fn quotes_dir(&self) -> &Path {
        &self.quotes_dir
    }

    #[must_use]
    pub fn post_path(&self, filename: &str) -> PathBuf {
        self.posts_dir.join(filename)
    }

    #[must_use]
    pub fn quotes_path(&self, filename: &str) -> PathBuf {
        self.quotes_dir.join(filename)
    }

    pub fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists()
            .map_err(|err| StorageError::new(StorageAction::CheckExists, path, err))
    }

    pub fn ensure_posts_dir(&self) -> Result<()> {
        ensure_dir(&self.posts_dir)
    }

    pub fn ensure_quotes_dir(&self) -> Result<()> {
        ensure_dir(&self.quotes_dir)
    }

    /// Writes `contents` to a hidden temporary file next to `target`. Nothing
    /// is visible under the target name until the returned file is committed.
    pub fn stage(&self, target: PathBuf, contents: &str) -> Result<StagedFile> {
        let dir = target
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        let mut file = Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|err| StorageError::new(StorageAction::Stage, &dir, err))?;

        file.write_all(contents.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|err| StorageError::new(StorageAction::Stage, file.path(), err))?;

        Ok(StagedFile { file, target })
    }

    pub fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|err| StorageError::new(StorageAction::Remove, path, err))
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| StorageError::new(StorageAction::CreateDir, dir, err))
}

/// A fully written temporary file waiting to be renamed to its target.
/// Dropping it without committing deletes it.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Renames the file into place, failing with
    /// [`io::ErrorKind::AlreadyExists`] instead of replacing an existing file.
    pub fn commit_new(self) -> Result<PathBuf> {
        let Self { file, target } = self;
        match file.persist_noclobber(&target) {
            Ok(_) => Ok(target),
            Err(err) => Err(StorageError::new(StorageAction::Commit, target, err.error)),
        }
    }

    /// Renames the file into place, replacing whatever is there.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { file, target } = self;
        match file.persist(&target) {
            Ok(_) => Ok(target),
            Err(err) => Err(StorageError::new(StorageAction::Commit, target, err.error)),
        }
    }
}
