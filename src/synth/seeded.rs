//! Seeded Mutation
//!
//! Clones a real corpus record as the base and replaces a subset of its
//! attributes: languages and timezone always, hardware fields and the screen
//! with fixed substitution probabilities. Everything else is kept from the
//! template.

use crate::corpus::CorpusEntry;
use crate::fingerprint::os::OsCategory;
use crate::sampling::compat::{browser_display_name, is_compatible, ResolvedBrowser, ResolvedOs};
use crate::sampling::prng::Prng;
use crate::synth::attributes::{
    apply_version_overlay, fill_screen, pick_distinct, sample_languages, sample_timezone,
};
use crate::synth::{pure, Draft, SynthSession};

const HARDWARE_CONCURRENCY_PROBABILITY: f64 = 0.4;
const DEVICE_MEMORY_PROBABILITY: f64 = 0.35;
const MAX_TOUCH_POINTS_PROBABILITY: f64 = 0.5;
const DO_NOT_TRACK_PROBABILITY: f64 = 0.25;
const SCREEN_PROBABILITY: f64 = 0.5;

/// Corpus records eligible as the base: the OS × browser pair, else the
/// browser, else the whole corpus.
pub fn candidate_pool<'a>(
    entries: &'a [CorpusEntry],
    os: OsCategory,
    browser_key: &str,
) -> Vec<&'a CorpusEntry> {
    let pair: Vec<&CorpusEntry> = entries
        .iter()
        .filter(|e| e.os_category == os && e.browser_key == browser_key)
        .collect();
    if !pair.is_empty() {
        return pair;
    }

    let browser: Vec<&CorpusEntry> = entries
        .iter()
        .filter(|e| e.browser_key == browser_key)
        .collect();
    if !browser.is_empty() {
        return browser;
    }

    entries.iter().collect()
}

/// Clone a compatible corpus record and mutate it
pub fn mutate(
    session: &SynthSession,
    os: &ResolvedOs,
    browser: &ResolvedBrowser,
    rng: &mut Prng,
) -> Draft {
    let aggregates = session.aggregates();
    let tables = session.tables();

    let pool = candidate_pool(session.entries(), os.category, &browser.key);
    let base = match rng.pick(&pool) {
        Some(entry) => *entry,
        None => return pure::synthesize(session, os, browser, rng),
    };
    let mut record = base.record.clone();

    // The output describes the template's own pair whenever that pair is valid
    let (category, browser_key) = if is_compatible(&base.browser_key, base.os_category) {
        (base.os_category, base.browser_key.clone())
    } else {
        (os.category, browser.key.clone())
    };
    let os_label = if category == os.category {
        os.label.clone()
    } else {
        category.label().to_string()
    };
    let browser_label = if browser_key == browser.key {
        browser.label.clone()
    } else {
        browser_display_name(&browser_key)
    };

    let (languages, language_label) = sample_languages(tables, aggregates, category, rng);
    record.navigator.set_languages(languages);

    let navigator = &mut record.navigator;
    if rng.chance(HARDWARE_CONCURRENCY_PROBABILITY) {
        let current = navigator.hardware_concurrency.unwrap_or(0);
        if let Some(value) =
            pick_distinct(rng, aggregates.hardware_concurrency.for_os(category), &current)
        {
            navigator.hardware_concurrency = Some(value);
        }
    }
    if rng.chance(DEVICE_MEMORY_PROBABILITY) {
        let current = navigator.device_memory.unwrap_or(0.0);
        if let Some(value) = pick_distinct(rng, aggregates.device_memory.for_os(category), &current)
        {
            navigator.device_memory = Some(value);
        }
    }
    if rng.chance(MAX_TOUCH_POINTS_PROBABILITY) {
        let current = navigator.max_touch_points;
        if let Some(value) =
            pick_distinct(rng, aggregates.max_touch_points.for_os(category), &current)
        {
            navigator.max_touch_points = value;
        }
    }
    if rng.chance(DO_NOT_TRACK_PROBABILITY) {
        let current = navigator.do_not_track.clone().unwrap_or_default();
        if let Some(value) = pick_distinct(rng, aggregates.do_not_track.for_os(category), &current)
        {
            navigator.do_not_track = Some(value);
        }
    }

    let (timezone, timezone_label) = sample_timezone(tables, aggregates, category, rng);
    record.timezone = Some(timezone);

    if rng.chance(SCREEN_PROBABILITY) {
        let by_platform = aggregates.screens.for_platform(&base.platform_key);
        let candidates = if by_platform.is_empty() {
            aggregates.screens.for_os(category)
        } else {
            by_platform
        };
        if let Some(screen) = rng.pick(candidates).cloned() {
            record.screen = Some(fill_screen(screen, category, rng));
        }
    }

    let versions = apply_version_overlay(&mut record.navigator, tables, category, &browser_key, rng);

    Draft {
        record,
        os: category,
        os_label,
        browser_key,
        browser_label,
        language: language_label,
        timezone: timezone_label,
        versions,
        base_template: Some(base.file_name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::navigator::PluginInfo;
    use crate::fingerprint::record::{AudioInfo, RecordBuilder, TimezoneInfo};
    use crate::fingerprint::webgl::{GpuProfile, WebGlInfo};
    use crate::sampling::weights::{parse_weight_table, WeightTables};

    fn entry(name: &str, browser: &str, ua: &str, platform: &str) -> CorpusEntry {
        CorpusEntry::new(
            name,
            RecordBuilder::new(browser).user_agent(ua).platform(platform).build(),
        )
    }

    #[test]
    fn test_candidate_pool_fallback_chain() {
        let entries = vec![
            entry("a.json", "Chrome", "Mozilla/5.0 (Windows NT 10.0; Win64; x64)", "Win32"),
            entry("b.json", "Chrome", "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)", "MacIntel"),
            entry("c.json", "Firefox", "Mozilla/5.0 (X11; Linux x86_64; rv:125.0)", "Linux x86_64"),
        ];

        let pair = candidate_pool(&entries, OsCategory::MacOs, "chrome");
        assert_eq!(pair.len(), 1);
        assert_eq!(pair[0].file_name, "b.json");

        let browser = candidate_pool(&entries, OsCategory::Android, "chrome");
        assert_eq!(browser.len(), 2);

        let all = candidate_pool(&entries, OsCategory::Ios, "mobile safari");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_mutate_replaces_locale_and_keeps_media() {
        let template = RecordBuilder::new("Chrome")
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36")
            .platform("Win32")
            .languages(&["en-US", "en"])
            .hardware(Some(8), Some(8.0))
            .timezone("America/New_York", 240)
            .webgl(WebGlInfo::from_profile(&GpuProfile::AmdRx6700Xt, true))
            .canvas("data:image/png;base64,VEVNUExBVEU=")
            .audio(AudioInfo {
                supported: true,
                sample_rate: Some(96000),
                state: Some("running".to_string()),
                max_channel_count: Some(6),
            })
            .plugins(vec![PluginInfo::pdf_viewer("Chrome PDF Viewer")])
            .feature("webgl", true)
            .feature("serviceWorker", false)
            .build();
        let other = RecordBuilder::new("Firefox")
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0")
            .platform("Win32")
            .hardware(Some(16), Some(8.0))
            .build();

        let tables = WeightTables {
            languages: parse_weight_table("label,weight\nja-JP,1\n"),
            timezones: parse_weight_table("label,weight\nUTC+03:00,1\n"),
            ..Default::default()
        };
        let session =
            SynthSession::from_records(vec![template.clone(), other], tables, false).unwrap();
        let os = ResolvedOs {
            category: OsCategory::Windows,
            label: "windows".to_string(),
        };
        let browser = ResolvedBrowser {
            key: "chrome".to_string(),
            label: "Chrome".to_string(),
        };

        let mut changed = 0;
        for state in 0..200 {
            let draft = mutate(&session, &os, &browser, &mut Prng::from_state(state));
            let record = &draft.record;

            assert_eq!(draft.base_template.as_deref(), Some("record_0000.json"));
            assert_eq!(record.webgl, template.webgl);
            assert_eq!(record.canvas, template.canvas);
            assert_eq!(record.audio, template.audio);
            assert_eq!(record.features, template.features);
            assert_eq!(record.plugins, template.plugins);

            assert_eq!(record.navigator.languages[0], "ja-JP");
            assert_eq!(record.navigator.language, "ja-JP");
            assert_eq!(
                record.timezone,
                Some(TimezoneInfo {
                    offset: -180,
                    name: "UTC+03:00".to_string(),
                })
            );

            // The only alternative to the template's 8 cores is 16
            match record.navigator.hardware_concurrency {
                Some(8) => {}
                Some(16) => changed += 1,
                other => panic!("unexpected hardware concurrency {:?}", other),
            }
        }
        assert!(changed > 0);
        assert!(changed < 200);
    }
}
