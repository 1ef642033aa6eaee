use chatbot_types::{Transcript, HISTORY_KEY};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::view::ChatView;

/// Durable home of the transcript.
///
/// Implementors provide the two fallible primitives; the reporting
/// operations never fail. They surface problems through the view and carry on.
pub trait HistoryStore {
    fn try_load(&self) -> Result<Transcript, StoreError>;

    fn try_save(&self, transcript: &Transcript) -> Result<Saved, StoreError>;

    /// Persisted transcript, or an empty one if there is none or it cannot be read
    fn load(&self, view: &mut dyn ChatView) -> Transcript {
        match self.try_load() {
            Ok(transcript) => transcript,
            Err(e) => {
                view.show_error(&format!("Error loading chat history: {}", e));
                Transcript::new()
            }
        }
    }

    /// Overwrite the persisted transcript
    fn save(&self, transcript: &Transcript, view: &mut dyn ChatView) {
        match self.try_save(transcript) {
            Ok(Saved::Written) => {}
            Ok(Saved::ReplacedCorrupt(e)) => {
                view.show_error(&format!("Error reading chat history before saving: {}", e));
            }
            Err(e) => view.show_error(&format!("Error saving chat history: {}", e)),
        }
    }

    fn clear(&self, view: &mut dyn ChatView) {
        self.save(&Transcript::new(), view);
    }
}

/// A save that went through
#[derive(Debug)]
pub enum Saved {
    Written,
    /// The previous file could not be read; it was moved aside first
    ReplacedCorrupt(StoreError),
}

/// Key-value JSON file holding the transcript under [`HISTORY_KEY`].
///
/// The file is a JSON object; keys other than the history key are kept
/// untouched on rewrite. Writes go through a temporary sibling file and a
/// rename. A file that exists but cannot be parsed is moved aside to
/// `<name>.corrupt-<timestamp>` instead of being overwritten.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
    key: String,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: HISTORY_KEY.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the whole document; `None` when the file does not exist
    fn read_document(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(self.quarantine(format!("not valid UTF-8: {}", e)));
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(other) => {
                let reason = format!("expected a JSON object, found {}", json_kind(&other));
                Err(self.quarantine(reason))
            }
            Err(e) => Err(self.quarantine(e.to_string())),
        }
    }

    /// Move an unreadable file out of the way so the next save cannot destroy it
    fn quarantine(&self, reason: String) -> StoreError {
        let backup = self.unused_backup_path(chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
        let backup = match fs::rename(&self.path, &backup) {
            Ok(()) => Some(backup),
            Err(_) => None,
        };
        StoreError::Corrupt {
            path: self.path.clone(),
            backup,
            reason,
        }
    }

    /// `<name>.corrupt-<stamp>`, with `-<n>` appended until nothing is there.
    /// `rename` replaces its target, so an existing backup must never be picked.
    fn unused_backup_path(&self, stamp: impl std::fmt::Display) -> PathBuf {
        let mut base = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        base.push(format!(".corrupt-{}", stamp));

        let mut candidate = self.path.with_file_name(&base);
        let mut counter = 1;
        while candidate.exists() {
            let mut name = base.clone();
            name.push(format!("-{}", counter));
            candidate = self.path.with_file_name(name);
            counter += 1;
        }
        candidate
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.io_error(e)
        })
    }
}

impl HistoryStore for FileHistoryStore {
    fn try_load(&self) -> Result<Transcript, StoreError> {
        let Some(mut document) = self.read_document()? else {
            return Ok(Transcript::new());
        };

        match document.remove(&self.key) {
            None => Ok(Transcript::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| self.quarantine(format!("invalid \"{}\" entry: {}", self.key, e))),
        }
    }

    fn try_save(&self, transcript: &Transcript) -> Result<Saved, StoreError> {
        let (mut document, saved) = match self.read_document() {
            Ok(document) => (document.unwrap_or_default(), Saved::Written),
            // Moved aside by read_document; safe to start a fresh file
            Err(e @ StoreError::Corrupt { backup: Some(_), .. }) => {
                (Map::new(), Saved::ReplacedCorrupt(e))
            }
            // Still in place: writing now would destroy it
            Err(e) => return Err(e),
        };

        document.insert(self.key.clone(), serde_json::to_value(transcript)?);
        self.write_document(&document)?;
        Ok(saved)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
