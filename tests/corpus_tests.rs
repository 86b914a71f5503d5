//! Integration tests for loading corpora and weight tables from disk

use std::fs;
use std::path::Path;

use fingerprint_synth::config::SynthSettings;
use fingerprint_synth::corpus::{load_corpus, CorpusError};
use fingerprint_synth::fingerprint::OsCategory;
use fingerprint_synth::sampling::WeightTables;
use fingerprint_synth::synth::{GenerationMode, GenerationOptions, SynthSession};
use tempfile::TempDir;

const WINDOWS_CHROME: &str = r#"{
  "navigator": {
    "userAgent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "platform": "Win32",
    "vendor": "Google Inc.",
    "language": "en-US",
    "languages": ["en-US", "en"],
    "hardwareConcurrency": 8,
    "deviceMemory": 8
  },
  "screen": { "width": 1920, "height": 1080, "availWidth": 1920, "availHeight": 1040, "colorDepth": 24, "pixelDepth": 24 },
  "timezone": { "offset": 240, "name": "America/New_York" },
  "features": { "webgl": true, "webgl2": true },
  "browserName": "Chrome"
}"#;

const MAC_SAFARI: &str = r#"{
  "navigator": {
    "userAgent": "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "platform": "MacIntel",
    "languages": ["fr-FR", "fr"]
  },
  "browserName": "Safari"
}"#;

const SYNTHETIC_FIREFOX: &str = r#"{
  "navigator": {
    "userAgent": "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "platform": "Linux x86_64"
  },
  "browserName": "Firefox",
  "synthetic": true,
  "source": "synthetic"
}"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn corpus_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b_safari.json", MAC_SAFARI);
    write(dir.path(), "a_chrome.json", WINDOWS_CHROME);
    write(dir.path(), "z_synthetic.json", SYNTHETIC_FIREFOX);
    write(dir.path(), "broken.json", "{ not json");
    write(dir.path(), "notes.txt", "ignored");
    dir
}

#[tokio::test]
async fn test_load_corpus_skips_malformed_and_synthetic() {
    let dir = corpus_dir();
    let entries = load_corpus(dir.path(), false).await.unwrap();

    let names: Vec<&str> = entries.iter().map(|e| e.file_name.as_str()).collect();
    assert_eq!(names, vec!["a_chrome.json", "b_safari.json"]);

    assert_eq!(entries[0].os_category, OsCategory::Windows);
    assert_eq!(entries[0].browser_key, "chrome");
    assert_eq!(entries[1].os_category, OsCategory::MacOs);
    assert_eq!(entries[1].platform_key, "macintel");
    assert_eq!(entries[0].content_hash.len(), 12);
}

#[tokio::test]
async fn test_load_corpus_can_include_synthetic() {
    let dir = corpus_dir();
    let entries = load_corpus(dir.path(), true).await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().any(|e| e.record.is_synthetic()));
}

#[tokio::test]
async fn test_missing_corpus_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nowhere");
    let result = load_corpus(&missing, false).await;
    assert!(matches!(result, Err(CorpusError::DirectoryMissing(_))));
}

#[tokio::test]
async fn test_synthetic_only_corpus_is_empty() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "only.json", SYNTHETIC_FIREFOX);
    write(dir.path(), "broken.json", "[]");

    let result = load_corpus(dir.path(), false).await;
    assert!(matches!(result, Err(CorpusError::Empty(_))));
}

#[tokio::test]
async fn test_missing_tables_degrade_to_empty() {
    let dir = TempDir::new().unwrap();
    let tables = WeightTables::load(dir.path().join("absent")).await;
    assert!(tables.languages.is_empty());
    assert!(tables.operating_systems.is_empty());
    assert!(tables.browsers.is_empty());
    assert!(tables.timezones.is_empty());
}

#[tokio::test]
async fn test_session_loads_from_settings() {
    let corpus = corpus_dir();
    let tables = TempDir::new().unwrap();
    write(tables.path(), "operating_systems.csv", "label,weight\nwindows,3\nmac os,1\n");
    write(tables.path(), "browsers.csv", "label,weight\nChrome,1\nSafari,1\n");
    write(tables.path(), "languages.csv", "label,weight\nja-JP,1\n");

    let settings = SynthSettings::default()
        .with_corpus_dir(corpus.path())
        .with_tables_dir(tables.path());
    let session = SynthSession::load(&settings).await.unwrap();
    assert_eq!(session.entries().len(), 2);
    assert_eq!(session.tables().operating_systems.len(), 2);

    for i in 0..30 {
        let options = GenerationOptions::new(GenerationMode::Seeded).with_seed(format!("disk-{}", i).as_str());
        let result = session.generate(&options);
        let category = result.metadata.os_category;
        assert!(category == OsCategory::Windows || category == OsCategory::MacOs);
        assert!(result.metadata.base_template.is_some());
    }
}

#[tokio::test]
async fn test_session_load_reports_missing_corpus() {
    let dir = TempDir::new().unwrap();
    let settings = SynthSettings::default()
        .with_corpus_dir(dir.path().join("missing"))
        .with_tables_dir(dir.path());
    let result = SynthSession::load(&settings).await;
    assert!(matches!(result, Err(CorpusError::DirectoryMissing(_))));
}
