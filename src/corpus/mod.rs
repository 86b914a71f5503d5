//! Fingerprint Corpus
//!
//! Loads the directory of real fingerprint documents the synthesizers draw
//! from and derives per-record classification keys.
//!
//! # Modules
//!
//! - `aggregates` - Read-only keyed indices over the loaded corpus
//!
//! # Example
//!
//! ```rust,no_run
//! use fingerprint_synth::corpus::load_corpus;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let entries = load_corpus("data/corpus", false).await?;
//!     println!("{} usable records", entries.len());
//!     Ok(())
//! }
//! ```

pub mod aggregates;

pub use aggregates::{pair_key, AttributeIndex, Aggregates};

use futures::future::join_all;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::fingerprint::os::{normalize_key, OsCategory};
use crate::fingerprint::record::FingerprintRecord;
use crate::sampling::compat::canonical_browser_key;
use crate::synth::identity::content_hash;

/// Errors that make generation impossible
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus directory does not exist.
    #[error("Corpus directory not found: {0}")]
    DirectoryMissing(PathBuf),

    /// The corpus directory exists but cannot be listed.
    #[error("Failed to read corpus directory {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing usable remained after filtering.
    #[error("Corpus at {0} contains no usable fingerprint records")]
    Empty(String),
}

/// A corpus record with its derived classification keys
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    /// Document file name, used as the seeded base-template reference
    pub file_name: String,
    pub record: FingerprintRecord,
    pub os_category: OsCategory,
    /// Normalized `navigator.platform`
    pub platform_key: String,
    /// Canonical browser key
    pub browser_key: String,
    /// Identity hash of the record
    pub content_hash: String,
}

impl CorpusEntry {
    /// Classify a record and compute its keys
    pub fn new(file_name: impl Into<String>, record: FingerprintRecord) -> Self {
        let os_category = record.detect_os();
        let platform_key = normalize_key(&record.navigator.platform);
        let browser_key = canonical_browser_key(&record.browser_name);
        let content_hash = content_hash(&record);
        Self {
            file_name: file_name.into(),
            record,
            os_category,
            platform_key,
            browser_key,
            content_hash,
        }
    }
}

/// Drop synthetic-tagged records unless `include_synthetic` is set
pub fn filter_entries(entries: Vec<CorpusEntry>, include_synthetic: bool) -> Vec<CorpusEntry> {
    if include_synthetic {
        return entries;
    }
    let before = entries.len();
    let kept: Vec<CorpusEntry> = entries
        .into_iter()
        .filter(|entry| !entry.record.is_synthetic())
        .collect();
    if kept.len() < before {
        debug!("Excluded {} synthetic records", before - kept.len());
    }
    kept
}

/// Load every `*.json` document in `dir`.
///
/// Files are read concurrently and processed in file-name order. Documents
/// that fail to parse are skipped.
///
/// # Errors
///
/// Returns [`CorpusError::DirectoryMissing`] or [`CorpusError::Unreadable`]
/// when the directory cannot be listed, and [`CorpusError::Empty`] when no
/// usable record remains.
pub async fn load_corpus(
    dir: impl AsRef<Path>,
    include_synthetic: bool,
) -> Result<Vec<CorpusEntry>, CorpusError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CorpusError::DirectoryMissing(dir.to_path_buf()));
    }

    let unreadable = |source| CorpusError::Unreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut listing = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
    let mut paths = Vec::new();
    while let Some(item) = listing.next_entry().await.map_err(unreadable)? {
        let path = item.path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let reads = paths.into_iter().map(|path| async move {
        let content = tokio::fs::read_to_string(&path).await;
        (path, content)
    });
    let documents = join_all(reads).await;

    let mut entries = Vec::with_capacity(documents.len());
    let mut skipped = 0usize;
    for (path, content) in documents {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = match content {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read corpus document {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };

        match serde_json::from_str::<FingerprintRecord>(&content) {
            Ok(record) => entries.push(CorpusEntry::new(file_name, record)),
            Err(e) => {
                debug!("Skipping malformed corpus document {}: {}", file_name, e);
                skipped += 1;
            }
        }
    }

    let entries = filter_entries(entries, include_synthetic);
    if entries.is_empty() {
        return Err(CorpusError::Empty(dir.display().to_string()));
    }

    info!(
        "Loaded {} corpus records from {} ({} skipped)",
        entries.len(),
        dir.display(),
        skipped
    );
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::record::RecordBuilder;

    #[test]
    fn test_entry_keys() {
        let record = RecordBuilder::new("Chrome Mobile")
            .user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36")
            .platform(" Linux armv81 ")
            .build();
        let entry = CorpusEntry::new("a.json", record);
        assert_eq!(entry.os_category, OsCategory::Android);
        assert_eq!(entry.platform_key, "linux armv81");
        assert_eq!(entry.browser_key, "chrome");
        assert_eq!(entry.content_hash.len(), 12);
    }

    #[test]
    fn test_filter_entries() {
        let real = CorpusEntry::new("real.json", RecordBuilder::new("Chrome").build());
        let fake = CorpusEntry::new("fake.json", RecordBuilder::new("Chrome").synthetic().build());

        let kept = filter_entries(vec![real.clone(), fake.clone()], false);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].file_name, "real.json");

        let all = filter_entries(vec![real, fake], true);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let result = load_corpus("/nonexistent/corpus/dir", false).await;
        assert!(matches!(result, Err(CorpusError::DirectoryMissing(_))));
    }
}
