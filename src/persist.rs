//! Single-file binary persistence for datasets.
//!
//! `save` writes `{stem}.bin`: a 4-byte magic tag, a little-endian version,
//! then a bincode payload. `load` requires the exact format `save`
//! produced; there is no schema migration or partial-read support.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{RationaleError, Result};

const MAGIC: [u8; 4] = *b"RATD";
const VERSION: u16 = 1;
const HEADER_LEN: usize = MAGIC.len() + 2;

fn dataset_path(stem: &Path) -> PathBuf {
    stem.with_extension("bin")
}

/// Serialize a value to `{stem}.bin`, returning the written path.
pub fn save<T: Serialize>(value: &T, stem: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dataset_path(stem.as_ref());
    let payload = bincode::serialize(value)
        .map_err(|e| RationaleError::SerializationMismatch(format!("encode failed: {e}")))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    fs::write(&path, bytes)?;

    debug!("saved dataset to {}", path.display());
    Ok(path)
}

/// Deserialize the value previously saved under `stem`.
pub fn load<T: DeserializeOwned>(stem: impl AsRef<Path>) -> Result<T> {
    let path = dataset_path(stem.as_ref());
    let bytes = fs::read(&path)?;

    if bytes.len() < HEADER_LEN || bytes[..MAGIC.len()] != MAGIC {
        return Err(RationaleError::SerializationMismatch(format!(
            "{} was not produced by dataset save",
            path.display()
        )));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(RationaleError::SerializationMismatch(format!(
            "unsupported dataset version {version}, expected {VERSION}"
        )));
    }

    bincode::deserialize(&bytes[HEADER_LEN..])
        .map_err(|e| RationaleError::SerializationMismatch(format!("decode failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::PromptRecord;

    fn records() -> Vec<PromptRecord> {
        vec![
            PromptRecord {
                category: "family".to_string(),
                a: "boy".to_string(),
                b: "girl".to_string(),
                prompt: "I initially invited my boy".to_string(),
            },
            PromptRecord {
                category: "currency".to_string(),
                a: "Japan".to_string(),
                b: "yen".to_string(),
                prompt: "As soon as I arrived in Japan".to_string(),
            },
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("analogy_prompts");

        let saved = records();
        let path = save(&saved, &stem).unwrap();
        assert_eq!(path.extension().unwrap(), "bin");

        let loaded: Vec<PromptRecord> = load(&stem).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_rejects_foreign_file() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("notes");
        fs::write(dataset_path(&stem), b"just some text").unwrap();

        let err = load::<Vec<PromptRecord>>(&stem).unwrap_err();
        assert!(matches!(err, RationaleError::SerializationMismatch(_)));
    }

    #[test]
    fn test_load_rejects_version_bump() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("analogy_prompts");
        let path = save(&records(), &stem).unwrap();

        let mut bytes = fs::read(&path).unwrap();
        bytes[4] = VERSION as u8 + 1;
        fs::write(&path, bytes).unwrap();

        let err = load::<Vec<PromptRecord>>(&stem).unwrap_err();
        assert!(matches!(err, RationaleError::SerializationMismatch(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<Vec<PromptRecord>>(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, RationaleError::Io(_)));
    }
}
