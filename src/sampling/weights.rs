//! Weighted Category Tables
//!
//! Loading of `label,weight` CSV tables and roulette-wheel sampling over them.
//! A table that cannot be read degrades to an empty list: the sampler then
//! returns `None` and callers fall back to uniform choice.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::fingerprint::os::{normalize_key, slugify, OsCategory};
use crate::sampling::compat::BROWSER_FAMILIES;
use crate::sampling::prng::Prng;

/// File names of the four top-level tables
pub const LANGUAGES_TABLE: &str = "languages.csv";
pub const OPERATING_SYSTEMS_TABLE: &str = "operating_systems.csv";
pub const BROWSERS_TABLE: &str = "browsers.csv";
pub const TIMEZONES_TABLE: &str = "timezones.csv";

/// One row of a weight table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCategoryEntry {
    /// Display label as written in the table
    pub label: String,
    /// Normalized lowercase key
    pub key: String,
    pub weight: f64,
}

impl WeightedCategoryEntry {
    /// Create an entry, normalizing the key from the label
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        let label = label.into();
        Self {
            key: normalize_key(&label),
            label,
            weight,
        }
    }
}

/// Parse a weight table. The first row is a header; rows with an empty label
/// or a missing/non-finite weight are skipped.
pub fn parse_weight_table(content: &str) -> Vec<WeightedCategoryEntry> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping weight row {}: {}", index + 1, e);
                continue;
            }
        };

        let label = record.get(0).unwrap_or("").trim();
        let weight = record
            .get(1)
            .and_then(|w| w.trim().parse::<f64>().ok())
            .filter(|w| w.is_finite());

        match weight {
            Some(weight) if !label.is_empty() => {
                entries.push(WeightedCategoryEntry::new(label, weight));
            }
            _ => debug!("Skipping weight row {}: {:?}", index + 1, record),
        }
    }
    entries
}

/// Read and parse a weight table; unreadable or missing files yield an
/// empty table.
pub async fn load_weight_table(path: impl AsRef<Path>) -> Vec<WeightedCategoryEntry> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let entries = parse_weight_table(&content);
            if entries.is_empty() {
                warn!("Weight table {} has no usable rows", path.display());
            }
            entries
        }
        Err(e) => {
            debug!("Weight table {} unavailable: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Roulette-wheel selection over `entries`, optionally restricted to keys in
/// `allowed`. Returns `None` when there is nothing to choose from.
///
/// A non-positive total weight degrades to a uniform pick among the
/// filtered entries.
pub fn sample_weighted<'a>(
    entries: &'a [WeightedCategoryEntry],
    allowed: Option<&BTreeSet<String>>,
    rng: &mut Prng,
) -> Option<&'a WeightedCategoryEntry> {
    if entries.is_empty() {
        return None;
    }

    let filtered: Vec<&WeightedCategoryEntry> = match allowed {
        Some(keys) if !keys.is_empty() => entries.iter().filter(|e| keys.contains(&e.key)).collect(),
        _ => entries.iter().collect(),
    };
    if filtered.is_empty() {
        return None;
    }

    let total: f64 = filtered.iter().map(|e| e.weight.max(0.0)).sum();
    if total <= 0.0 {
        return rng.pick(&filtered).copied();
    }

    let target = rng.next_f64() * total;
    let mut cumulative = 0.0;
    for entry in filtered.iter().copied() {
        cumulative += entry.weight.max(0.0);
        if cumulative >= target {
            return Some(entry);
        }
    }
    filtered.last().copied()
}

/// Every weight table a generation session samples from
#[derive(Debug, Clone, Default)]
pub struct WeightTables {
    pub languages: Vec<WeightedCategoryEntry>,
    pub operating_systems: Vec<WeightedCategoryEntry>,
    pub browsers: Vec<WeightedCategoryEntry>,
    pub timezones: Vec<WeightedCategoryEntry>,
    /// OS version details, one table per OS category
    pub os_versions: BTreeMap<OsCategory, Vec<WeightedCategoryEntry>>,
    /// Browser version labels, keyed by browser key
    pub browser_versions: BTreeMap<String, Vec<WeightedCategoryEntry>>,
}

impl WeightTables {
    /// Load every table from `dir`. All reads are issued together and
    /// awaited before returning; missing files leave their table empty.
    pub async fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let os_loads = OsCategory::all().into_iter().map(|os| {
            let path = dir.join(os_versions_file(os));
            async move { (os, load_weight_table(path).await) }
        });
        let browser_loads = BROWSER_FAMILIES.iter().map(|family| {
            let path = dir.join(browser_versions_file(family.key));
            async move { (family.key.to_string(), load_weight_table(path).await) }
        });

        let (languages, operating_systems, browsers, timezones, os_results, browser_results) = tokio::join!(
            load_weight_table(dir.join(LANGUAGES_TABLE)),
            load_weight_table(dir.join(OPERATING_SYSTEMS_TABLE)),
            load_weight_table(dir.join(BROWSERS_TABLE)),
            load_weight_table(dir.join(TIMEZONES_TABLE)),
            join_all(os_loads),
            join_all(browser_loads),
        );

        let tables = Self {
            languages,
            operating_systems,
            browsers,
            timezones,
            os_versions: os_results
                .into_iter()
                .filter(|(_, entries)| !entries.is_empty())
                .collect(),
            browser_versions: browser_results
                .into_iter()
                .filter(|(_, entries)| !entries.is_empty())
                .collect(),
        };

        info!(
            "Loaded weight tables from {}: {} languages, {} OS, {} browsers, {} timezones, {} OS version tables, {} browser version tables",
            dir.display(),
            tables.languages.len(),
            tables.operating_systems.len(),
            tables.browsers.len(),
            tables.timezones.len(),
            tables.os_versions.len(),
            tables.browser_versions.len()
        );
        tables
    }

    /// OS version table for a category (empty when not loaded)
    pub fn os_versions_for(&self, os: OsCategory) -> &[WeightedCategoryEntry] {
        self.os_versions.get(&os).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Browser version table for a browser key (empty when not loaded)
    pub fn browser_versions_for(&self, browser_key: &str) -> &[WeightedCategoryEntry] {
        self.browser_versions
            .get(browser_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// `os_versions_<os-slug>.csv`
pub fn os_versions_file(os: OsCategory) -> String {
    format!("os_versions_{}.csv", slugify(os.label()))
}

/// `browser_versions_<browser-slug>.csv`
pub fn browser_versions_file(browser_key: &str) -> String {
    format!("browser_versions_{}.csv", slugify(browser_key))
}
