use crate::data_types::Submission;
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const KEY_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only JSON document of submissions keyed by arrival time.
///
/// Every append reads the whole file, inserts one entry and rewrites the whole
/// file, so each save costs O(file size). There is no locking: the collector
/// must stay the only writer.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document. A missing file is an empty store.
    pub fn load(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&content)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(Error::NotAnObject),
        }
    }

    pub fn append(&self, submission: &Submission) -> Result<String> {
        self.append_at(Local::now(), submission)
    }

    /// Inserts `submission` under a key derived from `at` and rewrites the file.
    /// Returns the key used.
    pub fn append_at(&self, at: DateTime<Local>, submission: &Submission) -> Result<String> {
        let mut entries = self.load()?;
        let key = unique_key(&entries, at);
        entries.insert(key.clone(), serde_json::to_value(submission)?);
        self.write(&entries)?;
        Ok(key)
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        entries.serialize(&mut ser)?;

        // Staged beside the store, then swapped in; the old file stays intact on failure.
        let staging = self.staging_path();
        if let Err(e) = std::fs::write(&staging, out) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn unique_key(entries: &Map<String, Value>, at: DateTime<Local>) -> String {
    let base = at.format(KEY_FORMAT).to_string();
    let mut key = base.clone();
    let mut n = 2;
    while entries.contains_key(&key) {
        key = format!("{} #{}", base, n);
        n += 1;
    }
    key
}
