//! State persisted between runs: the mark set and the last directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StateError;
use crate::marks::MarkSet;

const MARKS_FILE: &str = "marks";
const LASTDIR_FILE: &str = "lastdir";
const LOG_FILE: &str = "colfm.log";

/// Files under the state directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Use `dir` if given, else the platform data directory.
    pub fn locate(dir: Option<PathBuf>) -> Result<Self, StateError> {
        dir.or_else(|| dirs::data_local_dir().map(|d| d.join("colfm")))
            .map(Self::new)
            .ok_or(StateError::NoStateDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn marks_path(&self) -> PathBuf {
        self.dir.join(MARKS_FILE)
    }

    pub fn lastdir_path(&self) -> PathBuf {
        self.dir.join(LASTDIR_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /// The saved marks; empty if none were saved.
    pub fn load_marks(&self) -> Result<MarkSet, StateError> {
        Ok(self
            .read(&self.marks_path())?
            .map(|text| MarkSet::parse(&text))
            .unwrap_or_default())
    }

    pub fn save_marks(&self, marks: &MarkSet) -> Result<(), StateError> {
        self.write(&self.marks_path(), &marks.serialize())
    }

    pub fn clear_marks(&self) -> Result<(), StateError> {
        let path = self.marks_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Io { path, source }),
        }
    }

    /// The directory active at the last clean exit.
    pub fn load_lastdir(&self) -> Result<Option<PathBuf>, StateError> {
        Ok(self
            .read(&self.lastdir_path())?
            .map(|text| text.trim_end_matches('\n').to_string())
            .filter(|text| !text.is_empty())
            .map(PathBuf::from))
    }

    pub fn save_lastdir(&self, dir: &Path) -> Result<(), StateError> {
        self.write(&self.lastdir_path(), &format!("{}\n", dir.display()))
    }

    fn read(&self, path: &Path) -> Result<Option<String>, StateError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StateError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), StateError> {
        let io = |source| StateError::Io {
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io)?;
        fs::write(path, contents).map_err(io)
    }
}
