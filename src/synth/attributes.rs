//! Shared Attribute Samplers
//!
//! Samplers used by both synthesis paths. Each one walks the fallback chain
//! corpus → curated pool → hard default, so none of them can fail.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::{BTreeMap, BTreeSet};

use crate::corpus::aggregates::{primary_language_code, Aggregates};
use crate::fingerprint::navigator::NavigatorInfo;
use crate::fingerprint::os::OsCategory;
use crate::fingerprint::record::{ScreenInfo, TimezoneInfo};
use crate::sampling::prng::Prng;
use crate::sampling::weights::{sample_weighted, WeightTables};
use crate::synth::overlay::{apply_browser_version, apply_os_version};
use crate::synth::pools::DESKTOP_UI_MARGINS;

/// Random bytes behind a generated canvas token
const CANVAS_TOKEN_BYTES: usize = 48;

/// Uniform pick from the corpus candidates, else from the curated pool
pub fn pick_value<T: Clone>(rng: &mut Prng, corpus: &[T], curated: &[T]) -> Option<T> {
    rng.pick(corpus)
        .or_else(|| rng.pick(curated))
        .cloned()
}

/// Pick a candidate that differs from `current` when one exists.
///
/// Starts at a random position and scans forward through the pool; if every
/// candidate equals `current` the one at the starting position is returned.
pub fn pick_distinct<T: Clone + PartialEq>(
    rng: &mut Prng,
    candidates: &[T],
    current: &T,
) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let start = rng.index(candidates.len());
    (0..candidates.len())
        .map(|offset| &candidates[(start + offset) % candidates.len()])
        .find(|candidate| *candidate != current)
        .or_else(|| candidates.get(start))
        .cloned()
}

/// Default region for a bare language code
pub fn default_country(code: &str) -> String {
    match code {
        "en" => "US",
        "de" => "DE",
        "fr" => "FR",
        "ja" => "JP",
        "es" => "ES",
        "pt" => "BR",
        "zh" => "CN",
        "ru" => "RU",
        "it" => "IT",
        "ko" => "KR",
        other => return other.to_uppercase(),
    }
    .to_string()
}

/// Two-entry language list for a tag: `["de-DE", "de"]`
pub fn language_list_for(tag: &str) -> Vec<String> {
    let code = primary_language_code(tag);
    let region = tag
        .trim()
        .split(|c| c == '-' || c == '_')
        .nth(1)
        .map(str::to_uppercase)
        .unwrap_or_else(|| default_country(&code));
    vec![format!("{}-{}", code, region), code]
}

/// Sample a language set; returns the list and the label it was drawn from
pub fn sample_languages(
    tables: &WeightTables,
    aggregates: &Aggregates,
    os: OsCategory,
    rng: &mut Prng,
) -> (Vec<String>, String) {
    if let Some(entry) = sample_weighted(&tables.languages, None, rng) {
        let code = primary_language_code(&entry.label);
        let corpus = aggregates
            .languages_by_code
            .get(&code)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let languages = rng
            .pick(corpus)
            .cloned()
            .unwrap_or_else(|| language_list_for(&entry.label));
        return (languages, entry.label.clone());
    }

    let languages = rng
        .pick(aggregates.languages.for_os(os))
        .cloned()
        .unwrap_or_else(|| vec!["en-US".to_string(), "en".to_string()]);
    let label = languages.first().cloned().unwrap_or_default();
    (languages, label)
}

/// Unsigned ASCII decimal, nothing else
fn parse_digits(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parse a `UTC±HH:MM` label into minutes east of UTC
pub fn parse_utc_offset(label: &str) -> Option<i32> {
    let trimmed = label.trim();
    let prefixed = trimmed
        .get(..3)
        .map(|p| p.eq_ignore_ascii_case("UTC") || p.eq_ignore_ascii_case("GMT"))
        .unwrap_or(false);
    let rest = if prefixed { trimmed[3..].trim() } else { trimmed };
    if rest.is_empty() {
        return if prefixed { Some(0) } else { None };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (parse_digits(h)?, parse_digits(m)?),
        None if digits.len() == 4 => {
            // Non-digits are rejected first so the byte split lands on a char boundary
            parse_digits(digits)?;
            (parse_digits(&digits[..2])?, parse_digits(&digits[2..])?)
        }
        None => (parse_digits(digits)?, 0),
    };
    if hours > 14 || !(0..60).contains(&minutes) {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Sample a timezone; returns the timezone and the label it was drawn from
pub fn sample_timezone(
    tables: &WeightTables,
    aggregates: &Aggregates,
    os: OsCategory,
    rng: &mut Prng,
) -> (TimezoneInfo, String) {
    if let Some(entry) = sample_weighted(&tables.timezones, None, rng) {
        let label = entry.label.clone();
        let timezone = match parse_utc_offset(&label) {
            Some(east) => {
                let offset = -east;
                let corpus = aggregates
                    .timezones_by_offset
                    .get(&offset)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                rng.pick(corpus).cloned().unwrap_or(TimezoneInfo {
                    offset,
                    name: label.clone(),
                })
            }
            None => {
                let named: Vec<&TimezoneInfo> = aggregates
                    .timezones_by_offset
                    .values()
                    .flatten()
                    .filter(|tz| tz.name == label)
                    .collect();
                rng.pick(&named).map(|tz| (*tz).clone()).unwrap_or(TimezoneInfo {
                    offset: 0,
                    name: label.clone(),
                })
            }
        };
        return (timezone, label);
    }

    let timezone = rng
        .pick(aggregates.timezones.for_os(os))
        .cloned()
        .unwrap_or(TimezoneInfo {
            offset: 0,
            name: "UTC".to_string(),
        });
    let label = timezone.name.clone();
    (timezone, label)
}

/// Fill missing avail dimensions with a randomized UI margin
pub fn fill_screen(screen: ScreenInfo, os: OsCategory, rng: &mut Prng) -> ScreenInfo {
    if !screen.needs_avail() {
        return screen.with_reserved_margin(0);
    }
    let margin = if os.is_mobile() {
        0
    } else {
        rng.pick(DESKTOP_UI_MARGINS).copied().unwrap_or(0)
    };
    screen.with_reserved_margin(margin)
}

/// Opaque canvas token from fresh stream bytes
pub fn fresh_canvas_token(rng: &mut Prng) -> String {
    let mut bytes = [0u8; CANVAS_TOKEN_BYTES];
    rng.fill_bytes(&mut bytes);
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// Labels applied by [`apply_version_overlay`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedVersions {
    pub os_version: Option<String>,
    pub browser_version: Option<String>,
}

/// Sample OS and browser version labels and rewrite the navigator's user
/// agent with them. Labels whose token is absent are not reported.
pub fn apply_version_overlay(
    navigator: &mut NavigatorInfo,
    tables: &WeightTables,
    os: OsCategory,
    browser_key: &str,
    rng: &mut Prng,
) -> AppliedVersions {
    let mut applied = AppliedVersions::default();
    let mut user_agent = navigator.user_agent.clone();

    if let Some(entry) = sample_weighted(tables.os_versions_for(os), None, rng) {
        if let Some(next) = apply_os_version(&user_agent, os, &entry.label) {
            user_agent = next;
            applied.os_version = Some(entry.label.clone());
        }
    }
    if let Some(entry) = sample_weighted(tables.browser_versions_for(browser_key), None, rng) {
        if let Some(next) = apply_browser_version(&user_agent, browser_key, &entry.label) {
            user_agent = next;
            applied.browser_version = Some(entry.label.clone());
        }
    }

    navigator.set_user_agent(user_agent);
    applied
}

/// Random-sized, order-preserving subset of `items` with duplicate keys
/// removed. Non-empty whenever `items` is.
pub fn random_subset<T, K, F>(rng: &mut Prng, items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut seen = BTreeSet::new();
    let unique: Vec<&T> = items.iter().filter(|item| seen.insert(key(item))).collect();
    if unique.is_empty() {
        return Vec::new();
    }

    let size = rng.range_inclusive(1, unique.len() as u32) as usize;
    let mut order: Vec<usize> = (0..unique.len()).collect();
    for i in 0..size {
        let j = i + rng.index(order.len() - i);
        order.swap(i, j);
    }
    let mut chosen = order[..size].to_vec();
    chosen.sort_unstable();
    chosen.into_iter().map(|i| unique[i].clone()).collect()
}

/// Keep `webgl2` implying `webgl`, deriving `webgl2` when it is missing
pub fn normalize_webgl_flags(features: &mut BTreeMap<String, bool>) {
    let webgl = features.get("webgl").copied();
    let webgl2 = features.get("webgl2").copied();
    match (webgl, webgl2) {
        (Some(enabled), None) => {
            features.insert("webgl2".to_string(), enabled);
        }
        (Some(false), Some(true)) => {
            features.insert("webgl2".to_string(), false);
        }
        (None, Some(true)) => {
            features.insert("webgl".to_string(), true);
        }
        _ => {}
    }
}
