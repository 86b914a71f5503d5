//! Browser/OS Compatibility
//!
//! The static browser → OS compatibility matrix and the resolver that picks an
//! OS category and then a browser for it. Whatever the weight tables or the
//! corpus contain, the resolved pair is always a member of the matrix.
//!
//! # Example
//!
//! ```rust
//! use fingerprint_synth::fingerprint::os::OsCategory;
//! use fingerprint_synth::sampling::compat::is_compatible;
//!
//! assert!(is_compatible("safari", OsCategory::MacOs));
//! assert!(!is_compatible("safari", OsCategory::Windows));
//! ```

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::fingerprint::os::{normalize_key, OsCategory};
use crate::sampling::prng::Prng;
use crate::sampling::weights::{sample_weighted, WeightedCategoryEntry};

const DESKTOP_AND_MOBILE: &[OsCategory] = &[
    OsCategory::Windows,
    OsCategory::MacOs,
    OsCategory::Linux,
    OsCategory::Android,
    OsCategory::Ios,
];

/// A browser family the synthesizer knows how to produce
#[derive(Debug, Clone, Copy)]
pub struct BrowserFamily {
    /// Normalized key (as in weight tables and corpus indices)
    pub key: &'static str,
    pub display_name: &'static str,
    /// OS categories this browser ships on
    pub os: &'static [OsCategory],
    /// Only exists on handheld devices
    pub mobile_only: bool,
    /// Blink-based (affects vendor strings and WebGL version text)
    pub chromium: bool,
}

/// Known browser families
pub const BROWSER_FAMILIES: &[BrowserFamily] = &[
    BrowserFamily {
        key: "chrome",
        display_name: "Chrome",
        os: DESKTOP_AND_MOBILE,
        mobile_only: false,
        chromium: true,
    },
    BrowserFamily {
        key: "edge",
        display_name: "Edge",
        os: DESKTOP_AND_MOBILE,
        mobile_only: false,
        chromium: true,
    },
    BrowserFamily {
        key: "firefox",
        display_name: "Firefox",
        os: DESKTOP_AND_MOBILE,
        mobile_only: false,
        chromium: false,
    },
    BrowserFamily {
        key: "google app",
        display_name: "Google App",
        os: &[OsCategory::Android, OsCategory::Ios],
        mobile_only: true,
        chromium: true,
    },
    BrowserFamily {
        key: "mobile safari",
        display_name: "Mobile Safari",
        os: &[OsCategory::Ios],
        mobile_only: true,
        chromium: false,
    },
    BrowserFamily {
        key: "opera",
        display_name: "Opera",
        os: &[
            OsCategory::Windows,
            OsCategory::MacOs,
            OsCategory::Linux,
            OsCategory::Android,
        ],
        mobile_only: false,
        chromium: true,
    },
    BrowserFamily {
        key: "safari",
        display_name: "Safari",
        os: &[OsCategory::MacOs],
        mobile_only: false,
        chromium: false,
    },
    BrowserFamily {
        key: "samsung internet",
        display_name: "Samsung Internet",
        os: &[OsCategory::Android],
        mobile_only: true,
        chromium: true,
    },
];

/// Alternative spellings seen in weight tables and third-party exports
const BROWSER_ALIASES: &[(&str, &str)] = &[
    ("chrome mobile", "chrome"),
    ("chrome mobile ios", "chrome"),
    ("chromium", "chrome"),
    ("microsoft edge", "edge"),
    ("edge mobile", "edge"),
    ("firefox mobile", "firefox"),
    ("firefox ios", "firefox"),
    ("opera mobile", "opera"),
    ("safari mobile", "mobile safari"),
    ("samsung browser", "samsung internet"),
    ("samsungbrowser", "samsung internet"),
    ("gsa", "google app"),
    ("google", "google app"),
];

/// Static browser key → allowed OS categories
pub static COMPATIBILITY_MATRIX: Lazy<BTreeMap<&'static str, BTreeSet<OsCategory>>> =
    Lazy::new(|| {
        BROWSER_FAMILIES
            .iter()
            .map(|family| (family.key, family.os.iter().copied().collect()))
            .collect()
    });

/// Map a browser name to its matrix key, resolving known aliases
pub fn canonical_browser_key(name: &str) -> String {
    let key = normalize_key(name);
    BROWSER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// Look up a browser family by key
pub fn browser_family(browser_key: &str) -> Option<&'static BrowserFamily> {
    BROWSER_FAMILIES.iter().find(|f| f.key == browser_key)
}

/// Whether `(os, browser_key)` is a member of the matrix
pub fn is_compatible(browser_key: &str, os: OsCategory) -> bool {
    COMPATIBILITY_MATRIX
        .get(browser_key)
        .map(|set| set.contains(&os))
        .unwrap_or(false)
}

/// Browser keys allowed on an OS category, sorted
pub fn browsers_for(os: OsCategory) -> BTreeSet<String> {
    COMPATIBILITY_MATRIX
        .iter()
        .filter(|(_, set)| set.contains(&os))
        .map(|(key, _)| key.to_string())
        .collect()
}

/// OS categories with at least one compatible browser
pub fn supported_os_categories() -> BTreeSet<OsCategory> {
    COMPATIBILITY_MATRIX.values().flatten().copied().collect()
}

/// Display name for a browser key (`mobile safari` -> `Mobile Safari`)
pub fn browser_display_name(browser_key: &str) -> String {
    match browser_family(browser_key) {
        Some(family) => family.display_name.to_string(),
        None => browser_key
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" "),
    }
}

/// Browsers that never appear on desktop
pub fn is_mobile_only_browser(browser_key: &str) -> bool {
    browser_family(browser_key)
        .map(|f| f.mobile_only)
        .unwrap_or(false)
}

/// Blink-based browsers
pub fn is_chromium_browser(browser_key: &str) -> bool {
    browser_family(browser_key)
        .map(|f| f.chromium)
        .unwrap_or(false)
}

/// The sampled OS category with the label it was drawn under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOs {
    pub category: OsCategory,
    pub label: String,
}

/// The sampled browser with the label it was drawn under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBrowser {
    /// Matrix key
    pub key: String,
    pub label: String,
}

/// Pick an OS category.
///
/// Candidates are the matrix-supported categories; when `corpus_os` is given
/// (seeded mode) they are further restricted to categories present in the
/// corpus, unless that leaves nothing. The OS weight table is sampled over
/// the candidates, with a uniform pick among them as fallback.
pub fn resolve_os(
    table: &[WeightedCategoryEntry],
    corpus_os: Option<&BTreeSet<OsCategory>>,
    rng: &mut Prng,
) -> ResolvedOs {
    let supported = supported_os_categories();
    let candidates: BTreeSet<OsCategory> = match corpus_os {
        Some(present) => {
            let narrowed: BTreeSet<OsCategory> =
                supported.intersection(present).copied().collect();
            if narrowed.is_empty() {
                supported
            } else {
                narrowed
            }
        }
        None => supported,
    };

    let allowed: BTreeSet<String> = table
        .iter()
        .filter(|entry| {
            entry
                .key
                .parse::<OsCategory>()
                .map(|os| candidates.contains(&os))
                .unwrap_or(false)
        })
        .map(|entry| entry.key.clone())
        .collect();

    if !allowed.is_empty() {
        if let Some(entry) = sample_weighted(table, Some(&allowed), rng) {
            if let Ok(category) = entry.key.parse::<OsCategory>() {
                return ResolvedOs {
                    category,
                    label: entry.label.clone(),
                };
            }
        }
    }

    let ordered: Vec<OsCategory> = candidates.into_iter().collect();
    let category = rng.pick(&ordered).copied().unwrap_or(OsCategory::Windows);
    debug!("OS table gave no usable entry, picked {} uniformly", category);
    ResolvedOs {
        category,
        label: category.label().to_string(),
    }
}

/// Pick a browser compatible with `os`.
///
/// The matrix set for `os` is intersected with `corpus_browsers` when given
/// (seeded mode), falling back to the full matrix set if the intersection is
/// empty. The browser table is sampled over the candidates, with a uniform
/// pick among them as fallback.
pub fn resolve_browser(
    os: OsCategory,
    table: &[WeightedCategoryEntry],
    corpus_browsers: Option<&BTreeSet<String>>,
    rng: &mut Prng,
) -> ResolvedBrowser {
    let compatible = browsers_for(os);
    let candidates: BTreeSet<String> = match corpus_browsers {
        Some(observed) => {
            let narrowed: BTreeSet<String> =
                compatible.intersection(observed).cloned().collect();
            if narrowed.is_empty() {
                compatible
            } else {
                narrowed
            }
        }
        None => compatible,
    };

    let allowed: BTreeSet<String> = table
        .iter()
        .filter(|entry| candidates.contains(&canonical_browser_key(&entry.key)))
        .map(|entry| entry.key.clone())
        .collect();

    if !allowed.is_empty() {
        if let Some(entry) = sample_weighted(table, Some(&allowed), rng) {
            return ResolvedBrowser {
                key: canonical_browser_key(&entry.key),
                label: entry.label.clone(),
            };
        }
    }

    let ordered: Vec<String> = candidates.into_iter().collect();
    let key = rng
        .pick(&ordered)
        .cloned()
        .unwrap_or_else(|| "chrome".to_string());
    debug!("Browser table gave no usable entry for {}, picked {} uniformly", os, key);
    ResolvedBrowser {
        label: browser_display_name(&key),
        key,
    }
}
