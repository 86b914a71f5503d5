//! Record Identity
//!
//! A short content hash over the identifying subset of a record: user agent,
//! platform, GPU vendor/renderer, hardware concurrency, device memory, screen
//! and browser name. Fields outside that projection (canvas, audio,
//! provenance) never influence it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::fingerprint::os::slugify;
use crate::fingerprint::record::{FingerprintRecord, ScreenInfo};

/// Hex characters kept from the digest
pub const HASH_LEN: usize = 12;

/// Prefix marking generated files
pub const FILENAME_PREFIX: &str = "synthetic";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentityProjection<'a> {
    user_agent: &'a str,
    platform: &'a str,
    gpu_vendor: Option<&'a str>,
    gpu_renderer: Option<&'a str>,
    hardware_concurrency: Option<u32>,
    device_memory: Option<f64>,
    screen: Option<&'a ScreenInfo>,
    browser_name: &'a str,
}

/// Content hash of a record, truncated to [`HASH_LEN`] hex characters
pub fn content_hash(record: &FingerprintRecord) -> String {
    let webgl = record.webgl.as_ref();
    let projection = IdentityProjection {
        user_agent: &record.navigator.user_agent,
        platform: &record.navigator.platform,
        gpu_vendor: webgl.map(|w| w.effective_vendor()),
        gpu_renderer: webgl.map(|w| w.effective_renderer()),
        hardware_concurrency: record.navigator.hardware_concurrency,
        device_memory: record.navigator.device_memory,
        screen: record.screen.as_ref(),
        browser_name: &record.browser_name,
    };

    // Serializing borrowed strings and numbers cannot fail
    let canonical = serde_json::to_vec(&projection).unwrap_or_default();
    let digest = Sha256::digest(&canonical);
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LEN);
    hash
}

/// `synthetic_<browser-slug>_<YYYYMMDD>_<hash>.json`
pub fn output_filename(browser_name: &str, generated_at: &DateTime<Utc>, hash: &str) -> String {
    let slug = slugify(browser_name);
    let slug = if slug.is_empty() { "unknown".to_string() } else { slug };
    format!(
        "{}_{}_{}_{}.json",
        FILENAME_PREFIX,
        slug,
        generated_at.format("%Y%m%d"),
        hash
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::record::{AudioInfo, RecordBuilder};
    use chrono::TimeZone;

    fn base() -> FingerprintRecord {
        RecordBuilder::new("Chrome")
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/124.0.0.0")
            .platform("Win32")
            .hardware(Some(8), Some(8.0))
            .screen(1920, 1080)
            .build()
    }

    #[test]
    fn test_hash_ignores_fields_outside_projection() {
        let a = base();
        let mut b = base();
        b.canvas = Some("data:image/png;base64,AAAA".to_string());
        b.audio = Some(AudioInfo {
            supported: true,
            sample_rate: Some(48000),
            ..Default::default()
        });
        b.features.insert("webgl".to_string(), false);
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_hash_follows_user_agent() {
        let a = base();
        let mut b = base();
        b.navigator.set_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/125.0.0.0");
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_hash_shape() {
        let hash = content_hash(&base());
        assert_eq!(hash.len(), HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_output_filename() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
        assert_eq!(
            output_filename("Mobile Safari", &at, "0123456789ab"),
            "synthetic_mobile_safari_20240517_0123456789ab.json"
        );
    }
}
