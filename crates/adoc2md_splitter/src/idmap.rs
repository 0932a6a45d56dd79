//! The persisted `<doc>.idmap` sidecar: a map from anchor id, heading
//! permalink, or document name to the output file that contains it plus a
//! caption used as a link-text fallback. Grounded on spec.md §4.3/§6 — the
//! original implementation (`splitter.go`) never persists this to disk, so
//! the on-disk shape and loader are new relative to `original_source/`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct IdMapEntry {
    pub file_name: String,
    pub caption: String,
}

/// id/permalink/document-name -> where it lives.
pub type DocIdMap = HashMap<String, IdMapEntry>;

#[derive(Debug, Error)]
pub enum IdMapError {
    #[error("failed to read idmap sidecar {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write idmap sidecar {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse idmap sidecar: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Sidecar path for `doc_name` (its `.adoc` extension, if any, is dropped)
/// under `artifacts_dir`.
pub fn sidecar_path(artifacts_dir: &Path, doc_name: &str) -> PathBuf {
    let stem = doc_name.strip_suffix(".adoc").unwrap_or(doc_name);
    artifacts_dir.join(format!("{stem}.idmap"))
}

pub fn load_sidecar(artifacts_dir: &Path, doc_name: &str) -> Result<DocIdMap, IdMapError> {
    let path = sidecar_path(artifacts_dir, doc_name);
    let data = std::fs::read_to_string(&path).map_err(|source| IdMapError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_yaml::from_str(&data)?)
}

pub fn save_sidecar(artifacts_dir: &Path, doc_name: &str, map: &DocIdMap) -> Result<(), IdMapError> {
    let path = sidecar_path(artifacts_dir, doc_name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| IdMapError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let yaml = serde_yaml::to_string(map)?;
    std::fs::write(&path, yaml).map_err(|source| IdMapError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_strips_adoc_extension() {
        let p = sidecar_path(Path::new("/art"), "UserGuide.adoc");
        assert_eq!(p, Path::new("/art/UserGuide.idmap"));
    }

    #[test]
    fn round_trips_through_yaml() {
        let dir = std::env::temp_dir().join(format!("adoc2md_idmap_test_{}", std::process::id()));
        let mut map = DocIdMap::new();
        map.insert(
            "v3.6".to_string(),
            IdMapEntry { file_name: "guide_1.md".to_string(), caption: "Version 3.6".to_string() },
        );
        save_sidecar(&dir, "Guide.adoc", &map).unwrap();
        let loaded = load_sidecar(&dir, "Guide.adoc").unwrap();
        assert_eq!(loaded, map);
        std::fs::remove_dir_all(&dir).ok();
    }
}
