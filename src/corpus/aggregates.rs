//! Corpus Aggregates
//!
//! Read-only indices over the corpus, built once per session. Every
//! attribute family is indexed four ways: by browser key, by platform key,
//! by OS category and by the `"<os>|<browser>"` pair. A record missing an
//! attribute is skipped for that attribute only.
//!
//! Values are stored as owned copies, so handing one out to a synthesizer
//! (which clones it again before mutation) never touches the corpus records.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::corpus::CorpusEntry;
use crate::fingerprint::navigator::{MimeTypeInfo, NavigatorInfo, PluginInfo};
use crate::fingerprint::os::OsCategory;
use crate::fingerprint::record::{AudioInfo, ScreenInfo, TimezoneInfo};
use crate::fingerprint::webgl::WebGlInfo;

/// Join an OS category and a browser key into a pair index key
pub fn pair_key(os: OsCategory, browser_key: &str) -> String {
    format!("{}|{}", os.label(), browser_key)
}

/// Observed values of one attribute family under each categorical key
#[derive(Debug, Clone)]
pub struct AttributeIndex<T> {
    by_browser: BTreeMap<String, Vec<T>>,
    by_platform: BTreeMap<String, Vec<T>>,
    by_os: BTreeMap<OsCategory, Vec<T>>,
    by_pair: BTreeMap<String, Vec<T>>,
}

impl<T> Default for AttributeIndex<T> {
    fn default() -> Self {
        Self {
            by_browser: BTreeMap::new(),
            by_platform: BTreeMap::new(),
            by_os: BTreeMap::new(),
            by_pair: BTreeMap::new(),
        }
    }
}

impl<T: Clone> AttributeIndex<T> {
    fn insert(&mut self, entry: &CorpusEntry, value: T) {
        self.by_browser
            .entry(entry.browser_key.clone())
            .or_default()
            .push(value.clone());
        if !entry.platform_key.is_empty() {
            self.by_platform
                .entry(entry.platform_key.clone())
                .or_default()
                .push(value.clone());
        }
        self.by_pair
            .entry(pair_key(entry.os_category, &entry.browser_key))
            .or_default()
            .push(value.clone());
        self.by_os.entry(entry.os_category).or_default().push(value);
    }

    fn insert_opt(&mut self, entry: &CorpusEntry, value: Option<T>) {
        if let Some(value) = value {
            self.insert(entry, value);
        }
    }

    /// Values observed for a browser key
    pub fn for_browser(&self, browser_key: &str) -> &[T] {
        self.by_browser
            .get(browser_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values observed for a platform key
    pub fn for_platform(&self, platform_key: &str) -> &[T] {
        self.by_platform
            .get(platform_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values observed for an OS category
    pub fn for_os(&self, os: OsCategory) -> &[T] {
        self.by_os.get(&os).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values observed for an OS × browser pair
    pub fn for_pair(&self, os: OsCategory, browser_key: &str) -> &[T] {
        self.by_pair
            .get(&pair_key(os, browser_key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total observations
    pub fn len(&self) -> usize {
        self.by_os.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed indices over every synthesizable attribute
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    /// Navigator sections with a non-empty user agent (template overlay source)
    pub navigators: AttributeIndex<NavigatorInfo>,
    pub languages: AttributeIndex<Vec<String>>,
    /// Language lists keyed by primary language code (`en`, `de`, ...)
    pub languages_by_code: BTreeMap<String, Vec<Vec<String>>>,
    pub timezones: AttributeIndex<TimezoneInfo>,
    /// Timezones keyed by minute offset
    pub timezones_by_offset: BTreeMap<i32, Vec<TimezoneInfo>>,
    pub hardware_concurrency: AttributeIndex<u32>,
    pub device_memory: AttributeIndex<f64>,
    pub max_touch_points: AttributeIndex<u32>,
    pub do_not_track: AttributeIndex<String>,
    pub screens: AttributeIndex<ScreenInfo>,
    pub webgl: AttributeIndex<WebGlInfo>,
    pub canvas: AttributeIndex<String>,
    pub audio: AttributeIndex<AudioInfo>,
    pub features: AttributeIndex<BTreeMap<String, bool>>,
    pub plugins: AttributeIndex<Vec<PluginInfo>>,
    pub mime_types: AttributeIndex<Vec<MimeTypeInfo>>,
    /// OS categories present in the corpus
    pub os_categories: BTreeSet<OsCategory>,
    /// Browser keys observed under each OS category
    pub browsers_by_os: BTreeMap<OsCategory, BTreeSet<String>>,
    /// Identity hashes of every corpus record
    pub content_hashes: BTreeSet<String>,
    pub record_count: usize,
}

impl Aggregates {
    /// Scan the corpus once and build every index
    pub fn build(entries: &[CorpusEntry]) -> Self {
        let mut aggregates = Aggregates::default();

        for entry in entries {
            let record = &entry.record;
            let navigator = &record.navigator;

            aggregates.os_categories.insert(entry.os_category);
            aggregates
                .browsers_by_os
                .entry(entry.os_category)
                .or_default()
                .insert(entry.browser_key.clone());
            aggregates.content_hashes.insert(entry.content_hash.clone());

            if !navigator.user_agent.is_empty() {
                aggregates.navigators.insert(entry, navigator.clone());
            }

            if !navigator.languages.is_empty() {
                aggregates.languages.insert(entry, navigator.languages.clone());
                let code = primary_language_code(&navigator.languages[0]);
                if !code.is_empty() {
                    aggregates
                        .languages_by_code
                        .entry(code)
                        .or_default()
                        .push(navigator.languages.clone());
                }
            }

            if let Some(timezone) = &record.timezone {
                aggregates.timezones.insert(entry, timezone.clone());
                aggregates
                    .timezones_by_offset
                    .entry(timezone.offset)
                    .or_default()
                    .push(timezone.clone());
            }

            aggregates
                .hardware_concurrency
                .insert_opt(entry, navigator.hardware_concurrency.filter(|c| *c > 0));
            aggregates
                .device_memory
                .insert_opt(entry, navigator.device_memory.filter(|m| *m > 0.0));
            // zero on a handheld means "not reported"
            if navigator.max_touch_points > 0 || !entry.os_category.is_mobile() {
                aggregates
                    .max_touch_points
                    .insert(entry, navigator.max_touch_points);
            }
            aggregates
                .do_not_track
                .insert_opt(entry, navigator.do_not_track.clone());

            aggregates
                .screens
                .insert_opt(entry, record.screen.clone().filter(|s| s.width > 0 && s.height > 0));
            aggregates.webgl.insert_opt(entry, record.webgl.clone());
            aggregates
                .canvas
                .insert_opt(entry, record.canvas.clone().filter(|c| !c.is_empty()));
            aggregates.audio.insert_opt(entry, record.audio.clone());

            if !record.features.is_empty() {
                aggregates.features.insert(entry, record.features.clone());
            }
            if !record.plugins.is_empty() {
                aggregates.plugins.insert(entry, record.plugins.clone());
            }
            if !record.mime_types.is_empty() {
                aggregates.mime_types.insert(entry, record.mime_types.clone());
            }

            aggregates.record_count += 1;
        }

        debug!(
            "Built aggregates over {} records: {} OS categories, {} screens, {} WebGL profiles",
            aggregates.record_count,
            aggregates.os_categories.len(),
            aggregates.screens.len(),
            aggregates.webgl.len()
        );
        aggregates
    }
}

/// Primary subtag of a language tag (`en-US` -> `en`)
pub fn primary_language_code(tag: &str) -> String {
    tag.trim()
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or("")
        .to_lowercase()
}
