//! Local persistence for the observed set.
//!
//! The whole set lives in a single JSON file, rewritten in full on every
//! save:
//!
//! ```text
//! ~/.neowatch/
//!   observed.json    # Array of every object ever reported as new
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::model::ObservedSet;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// File-based storage for the observed set.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Creates a storage instance backed by the given file.
    ///
    /// The parent directory is created if it doesn't exist. The file itself
    /// is created lazily by [`Storage::load`].
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Returns the default store file: `~/.neowatch/observed.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".neowatch").join("observed.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the observed set.
    ///
    /// A missing file is a valid empty set: it is written out and returned.
    pub fn load(&self) -> Result<ObservedSet> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let empty = ObservedSet::new();
                self.save(&empty)?;
                return Ok(empty);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    /// Overwrites the stored set.
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// failure leaves the previous contents in place.
    pub fn save(&self, observed: &ObservedSet) -> Result<()> {
        let json = serde_json::to_string_pretty(observed)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), objects = observed.len(), "saved observed set");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::merge::merge;
    use crate::model::TrackedObject;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("state").join("observed.json")).unwrap();
        (dir, storage)
    }

    fn sample_object(id: &str) -> TrackedObject {
        serde_json::from_value(serde_json::json!({
            "neo_reference_id": id,
            "name": format!("({id})"),
            "is_potentially_hazardous_asteroid": true,
            "close_approach_data": [
                { "close_approach_date": "2024-01-01", "orbiting_body": "Earth" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn load_missing_initializes_empty() {
        let (_dir, storage) = test_storage();
        assert!(!storage.path().exists());

        let loaded = storage.load().unwrap();

        assert!(loaded.is_empty());
        assert!(storage.path().exists());
        assert_eq!(fs::read_to_string(storage.path()).unwrap().trim(), "[]");
    }

    #[test]
    fn save_and_load_preserves_order() {
        let (_dir, storage) = test_storage();
        let merged = merge(
            ObservedSet::new(),
            ["b", "a", "c"].map(sample_object),
        )
        .merged;

        storage.save(&merged).unwrap();
        let loaded = storage.load().unwrap();

        let ids: Vec<_> = loaded.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(loaded, merged);
    }

    #[test]
    fn save_overwrites_in_full() {
        let (_dir, storage) = test_storage();
        let first = merge(ObservedSet::new(), [sample_object("a")]).merged;
        let second = merge(ObservedSet::new(), [sample_object("z")]).merged;

        storage.save(&first).unwrap();
        storage.save(&second).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.iter().next().unwrap().id, "z");
        assert!(!storage.tmp_path().exists());
    }

    #[test]
    fn corrupt_file_is_json_error() {
        let (_dir, storage) = test_storage();
        fs::write(storage.path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn save_into_missing_directory_fails_with_io() {
        let dir = TempDir::new().unwrap();
        let storage = Storage {
            path: dir.path().join("gone").join("observed.json"),
        };

        let err = storage.save(&ObservedSet::new()).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
