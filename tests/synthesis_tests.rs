//! Integration tests for record generation
//!
//! These tests drive `SynthSession` through its public API with an in-memory
//! corpus and verify reproducibility and the consistency guarantees every
//! generated record carries.

use chrono::{DateTime, TimeZone, Utc};
use fingerprint_synth::fingerprint::{AudioInfo, GpuProfile, OsCategory, RecordBuilder, WebGlInfo};
use fingerprint_synth::sampling::{canonical_browser_key, is_compatible, parse_weight_table};
use fingerprint_synth::synth::identity::content_hash;
use fingerprint_synth::{
    FingerprintRecord, GenerationMode, GenerationOptions, SynthSession, WeightTables,
};

// ============================================================================
// Fixtures
// ============================================================================

fn pinned_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn corpus_records() -> Vec<FingerprintRecord> {
    vec![
        RecordBuilder::new("Chrome")
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36")
            .platform("Win32")
            .languages(&["en-US", "en"])
            .hardware(Some(8), Some(8.0))
            .screen(1920, 1080)
            .timezone("America/New_York", 240)
            .webgl(WebGlInfo::from_profile(&GpuProfile::NvidiaRtx3060, true))
            .canvas("data:image/png;base64,AAAA")
            .feature("webgl", true)
            .feature("webgl2", true)
            .build(),
        RecordBuilder::new("Safari")
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15")
            .platform("MacIntel")
            .languages(&["de-DE", "de", "en"])
            .hardware(Some(10), None)
            .screen(1512, 982)
            .timezone("Europe/Berlin", -120)
            .audio(AudioInfo {
                supported: true,
                sample_rate: Some(44100),
                state: Some("suspended".to_string()),
                max_channel_count: Some(2),
            })
            .build(),
        RecordBuilder::new("Mobile Safari")
            .user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1")
            .platform("iPhone")
            .languages(&["en-GB", "en"])
            .touch_points(5)
            .screen(390, 844)
            .build(),
        RecordBuilder::new("Chrome")
            .user_agent("Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36")
            .platform("Linux armv8l")
            .hardware(Some(8), Some(4.0))
            .touch_points(5)
            .screen(412, 915)
            .build(),
    ]
}

fn session_with(tables: WeightTables) -> SynthSession {
    SynthSession::from_records(corpus_records(), tables, false).unwrap()
}

fn session() -> SynthSession {
    session_with(WeightTables::default())
}

fn options(mode: GenerationMode, seed: &str) -> GenerationOptions {
    GenerationOptions::new(mode)
        .with_seed(seed)
        .with_generated_at(pinned_time())
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_pure_generation_is_reproducible() {
    let session = session();
    let first = session.generate(&options(GenerationMode::Pure, "repro"));
    let second = session.generate(&options(GenerationMode::Pure, "repro"));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.record).unwrap(),
        serde_json::to_string(&second.record).unwrap()
    );
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let session = session();
    let first = session.generate(&options(GenerationMode::Seeded, "repro"));
    let second = session.generate(&options(GenerationMode::Seeded, "repro"));

    assert_eq!(first, second);
    assert_eq!(first.record.id, second.record.id);
}

#[test]
fn test_demo_seed_selects_same_pair() {
    let session = session();
    let first = session.generate(&options(GenerationMode::Pure, "demo"));
    let second = session.generate(&options(GenerationMode::Pure, "demo"));

    assert_eq!(first.metadata.os_category, second.metadata.os_category);
    assert_eq!(first.metadata.browser, second.metadata.browser);

    // A different seed is free to pick another pair; it only has to be valid
    let other = session.generate(&options(GenerationMode::Pure, "demo2"));
    assert!(is_compatible(
        &canonical_browser_key(&other.metadata.browser),
        other.metadata.os_category
    ));
}

#[test]
fn test_unseeded_generation_gets_unique_ids() {
    let session = session();
    let options = GenerationOptions::new(GenerationMode::Pure);
    let a = session.generate(&options);
    let b = session.generate(&options);
    assert_ne!(a.record.id, b.record.id);
}

// ============================================================================
// Consistency guarantees
// ============================================================================

#[test]
fn test_os_browser_pair_is_always_compatible() {
    let session = session();
    for mode in [GenerationMode::Pure, GenerationMode::Seeded] {
        for i in 0..200 {
            let result = session.generate(&options(mode, &format!("compat-{}", i)));
            let key = canonical_browser_key(&result.metadata.browser);
            assert!(
                is_compatible(&key, result.metadata.os_category),
                "{} on {} is not a real-world pair",
                result.metadata.browser,
                result.metadata.os_category
            );
            assert_eq!(result.record.os_category, Some(result.metadata.os_category));
        }
    }
}

#[test]
fn test_webgl2_implies_webgl() {
    let session = session();
    for mode in [GenerationMode::Pure, GenerationMode::Seeded] {
        for i in 0..150 {
            let result = session.generate(&options(mode, &format!("gl-{}", i)));
            let features = &result.record.features;
            if features.get("webgl2") == Some(&true) {
                assert_eq!(features.get("webgl"), Some(&true));
            }
        }
    }
}

#[test]
fn test_mobile_records_have_no_plugins() {
    let session = session();
    let mut mobile_seen = 0;
    for mode in [GenerationMode::Pure, GenerationMode::Seeded] {
        for i in 0..150 {
            let result = session.generate(&options(mode, &format!("mobile-{}", i)));
            if result.metadata.os_category.is_mobile() {
                mobile_seen += 1;
                assert!(result.record.plugins.is_empty());
                assert!(result.record.mime_types.is_empty());
            }
        }
    }
    assert!(mobile_seen > 0);
}

#[test]
fn test_language_matches_language_list_head() {
    let session = session();
    for i in 0..100 {
        let result = session.generate(&options(GenerationMode::Pure, &format!("lang-{}", i)));
        let navigator = &result.record.navigator;
        assert!(!navigator.languages.is_empty());
        assert_eq!(navigator.language, navigator.languages[0]);
    }
}

#[test]
fn test_records_are_tagged_synthetic() {
    let session = session();
    for mode in [GenerationMode::Pure, GenerationMode::Seeded] {
        let result = session.generate(&options(mode, "tagged"));
        assert!(result.record.is_synthetic());
        assert!(!result.record.navigator.webdriver);
        assert_eq!(
            result.record.generated_at.as_deref(),
            Some("2024-06-01T12:00:00.000Z")
        );
        assert!(result.filename.starts_with("synthetic_"));
    }
}

#[test]
fn test_content_hash_ignores_provenance() {
    let session = session();
    let result = session.generate(&options(GenerationMode::Pure, "hash"));
    assert_eq!(content_hash(&result.record), result.metadata.content_hash);

    let mut retagged = result.record.clone();
    retagged.id = Some("another-id".to_string());
    retagged.generated_at = Some("2030-01-01T00:00:00.000Z".to_string());
    retagged.canvas = Some("data:image/png;base64,BBBB".to_string());
    assert_eq!(content_hash(&retagged), result.metadata.content_hash);
}

#[test]
fn test_corpus_is_not_mutated_by_generation() {
    let session = session();
    let before: Vec<FingerprintRecord> = session.entries().iter().map(|e| e.record.clone()).collect();
    for i in 0..50 {
        session.generate(&options(GenerationMode::Seeded, &format!("alias-{}", i)));
    }
    let after: Vec<FingerprintRecord> = session.entries().iter().map(|e| e.record.clone()).collect();
    assert_eq!(before, after);
}

// ============================================================================
// Seeded mode
// ============================================================================

#[test]
fn test_single_record_pair_is_always_the_base() {
    let session = session();
    let mut windows_chrome = 0;
    for i in 0..200 {
        let result = session.generate(&options(GenerationMode::Seeded, &format!("base-{}", i)));
        if result.metadata.os_category == OsCategory::Windows && result.metadata.browser == "Chrome"
        {
            windows_chrome += 1;
            assert_eq!(result.metadata.base_template.as_deref(), Some("record_0000.json"));
        }
        if result.metadata.os_category == OsCategory::Ios {
            assert_eq!(result.metadata.base_template.as_deref(), Some("record_0002.json"));
        }
    }
    assert!(windows_chrome > 0);
}

#[test]
fn test_seeded_mode_stays_within_corpus_os_categories() {
    let session = session();
    for i in 0..100 {
        let result = session.generate(&options(GenerationMode::Seeded, &format!("os-{}", i)));
        assert_ne!(result.metadata.os_category, OsCategory::Linux);
        assert!(result.metadata.base_template.is_some());
    }
}

// ============================================================================
// Weight tables
// ============================================================================

#[test]
fn test_weight_tables_steer_resolution() {
    let tables = WeightTables {
        operating_systems: parse_weight_table("label,weight\nios,1\n"),
        browsers: parse_weight_table("label,weight\nChrome,5\nMobile Safari,1\n"),
        ..Default::default()
    };
    let session = session_with(tables);
    for i in 0..50 {
        let result = session.generate(&options(GenerationMode::Pure, &format!("table-{}", i)));
        assert_eq!(result.metadata.os_category, OsCategory::Ios);
        assert!(["Chrome", "Mobile Safari"].contains(&result.metadata.browser.as_str()));
    }
}

#[test]
fn test_browser_version_overlay_is_recorded() {
    let mut tables = WeightTables {
        operating_systems: parse_weight_table("label,weight\nwindows,1\n"),
        browsers: parse_weight_table("label,weight\nChrome,1\n"),
        ..Default::default()
    };
    tables.browser_versions.insert(
        "chrome".to_string(),
        parse_weight_table("label,weight\nChrome 126.0.0.0,1\n"),
    );
    let session = session_with(tables);

    let result = session.generate(&options(GenerationMode::Pure, "versions"));
    assert!(result.record.navigator.user_agent.contains("Chrome/126.0.0.0"));
    assert!(result.record.navigator.app_version.contains("Chrome/126.0.0.0"));

    let meta = result.record.source_metadata.unwrap();
    assert_eq!(meta.browser_version.as_deref(), Some("Chrome 126.0.0.0"));
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_is_reproducible() {
    let session = session();
    let options = options(GenerationMode::Seeded, "batch");
    let first = session.generate_batch(&options, 5);
    let second = session.generate_batch(&options, 5);

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}
