use crate::domain::error::MaskStoreError;
use crate::domain::model::MaskRecord;
use crate::domain::traits::MaskStore;
use crate::infrastructure::schema_validator::validate_mask_record;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// One pretty-printed JSON file per key under a cache directory.
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// racing a writer sees either the old record, the new one, or nothing.
#[derive(Debug, Clone)]
pub struct JsonFileMaskStore {
    dir: PathBuf,
}

impl JsonFileMaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

impl MaskStore for JsonFileMaskStore {
    fn load(&self, key: &str) -> Result<Option<MaskRecord>, MaskStoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!(path = %path.display(), "no cached mask");
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&raw)?;
        validate_mask_record(&value).map_err(|e| MaskStoreError::Schema(e.to_string()))?;
        let record: MaskRecord = serde_json::from_value(value)?;
        Ok(Some(record))
    }

    fn save(&self, key: &str, record: &MaskRecord) -> Result<(), MaskStoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension(format!("json.tmp.{}", std::process::id()));

        let pretty = serde_json::to_string_pretty(record)?;
        fs::write(&tmp, pretty)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(path = %path.display(), cut = record.cut_edges.len(), "cached mask");
        Ok(())
    }
}

/// Process-local store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryMaskStore {
    records: Mutex<BTreeMap<String, MaskRecord>>,
}

impl MemoryMaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut r) = self.records.lock() {
            r.clear();
        }
    }
}

impl MaskStore for MemoryMaskStore {
    fn load(&self, key: &str) -> Result<Option<MaskRecord>, MaskStoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| MaskStoreError::Mismatch("memory store poisoned".into()))?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, key: &str, record: &MaskRecord) -> Result<(), MaskStoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| MaskStoreError::Mismatch("memory store poisoned".into()))?;
        records.insert(key.to_string(), record.clone());
        Ok(())
    }
}

/// Keep keys to a single, portable file name component.
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}
