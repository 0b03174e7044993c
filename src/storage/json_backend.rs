use std::{fs, path::PathBuf};

use crate::{
    config::{tmp_path, write_atomic},
    errors::Result,
    utils::paths::ensure_dir,
};

use super::KeyValueStore;

const VALUE_EXTENSION: &str = "json";

/// Filesystem-backed store keeping each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn value_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", canonical_name(key), VALUE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.value_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, bytes = value.len(), "value written");
        Ok(())
    }
}

/// Lowercases and replaces anything outside `[a-z0-9_-]` so a key is always
/// a safe file name.
fn canonical_name(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".into()
    } else {
        cleaned
    }
}
