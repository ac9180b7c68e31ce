// ABOUTME: Durable string-keyed store for unit state, kept as one JSON document on disk.
// ABOUTME: Reads once on open; writes atomically (temp file + rename) on flush.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use snafu::{ResultExt, Snafu};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name used under `$CHARM_DIR` when no explicit path is given.
pub const STATE_FILENAME: &str = ".unit-state.json";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    #[snafu(display("failed to read unit state {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("unit state {} is corrupted: {source}", path.display()))]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("failed to write unit state {}: {source}", path.display()))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("failed to encode value for {key}: {source}"))]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[snafu(display("stored value for {key} has an unexpected shape: {source}"))]
    Decode {
        key: String,
        source: serde_json::Error,
    },
}

/// Default store location: `$CHARM_DIR/.unit-state.json`, or the working
/// directory when `CHARM_DIR` is unset.
pub fn default_path() -> PathBuf {
    std::env::var_os("CHARM_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(STATE_FILENAME)
}

#[derive(Debug)]
pub struct UnitStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    dirty: bool,
}

impl UnitStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).context(CorruptSnafu { path: &path })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e).context(ReadSnafu { path: &path }),
        };

        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.values
            .get(key)
            .map(|value| serde_json::from_value(value.clone()).context(DecodeSnafu { key }))
            .transpose()
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).context(EncodeSnafu { key })?;
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
        Ok(())
    }

    /// Remove a key. Returns whether it was present.
    pub fn unset(&mut self, key: &str) -> bool {
        let removed = self.values.remove(key).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Write pending changes to disk. No-op when nothing changed.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.values).context(EncodeSnafu { key: "*" })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(WriteSnafu { path: parent })?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).context(WriteSnafu { path: &tmp })?;
        std::fs::rename(&tmp, &self.path).context(WriteSnafu { path: &self.path })?;

        tracing::debug!("unit state written to {}", self.path.display());
        self.dirty = false;
        Ok(())
    }
}
