//! Consistency Checks
//!
//! Heuristic checks run on every finished record. Findings are advisory:
//! they are logged and returned with the record, never treated as errors.

use tracing::warn;

use crate::fingerprint::os::OsCategory;
use crate::fingerprint::record::FingerprintRecord;

/// Inspect a finished record and describe any inconsistencies found
pub fn check_consistency(
    record: &FingerprintRecord,
    os: OsCategory,
    browser_key: &str,
) -> Vec<String> {
    let navigator = &record.navigator;
    let user_agent = navigator.user_agent.as_str();
    let mut warnings = Vec::new();

    match os {
        OsCategory::Ios => {
            let ua_marker = user_agent.contains("iPhone") || user_agent.contains("iPad");
            if !ua_marker {
                warnings.push("iOS user agent lacks an iPhone/iPad marker".to_string());
            }
            let platform_marker =
                navigator.platform.contains("iPhone") || navigator.platform.contains("iPad");
            if !platform_marker {
                warnings.push(format!(
                    "iOS platform '{}' lacks an iPhone/iPad marker",
                    navigator.platform
                ));
            }
            if navigator.max_touch_points == 0 {
                warnings.push("iOS record reports zero touch points".to_string());
            }
        }
        OsCategory::Android => {
            if !user_agent.contains("Android") {
                warnings.push("Android user agent lacks an Android marker".to_string());
            }
            if navigator.max_touch_points == 0 {
                warnings.push("Android record reports zero touch points".to_string());
            }
        }
        OsCategory::Windows => {
            if !user_agent.contains("Windows") {
                warnings.push("Windows user agent lacks a Windows marker".to_string());
            }
        }
        _ => {}
    }

    if browser_key == "mobile safari" && !user_agent.contains("Mobile") {
        warnings.push("Mobile Safari user agent lacks a Mobile marker".to_string());
    }

    for warning in &warnings {
        warn!("Consistency check: {}", warning);
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::record::RecordBuilder;

    #[test]
    fn test_clean_ios_record() {
        let record = RecordBuilder::new("Mobile Safari")
            .user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1")
            .platform("iPhone")
            .touch_points(5)
            .build();
        assert!(check_consistency(&record, OsCategory::Ios, "mobile safari").is_empty());
    }

    #[test]
    fn test_ios_findings() {
        let record = RecordBuilder::new("Mobile Safari")
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Safari/605.1.15")
            .platform("MacIntel")
            .build();
        let warnings = check_consistency(&record, OsCategory::Ios, "mobile safari");
        assert_eq!(warnings.len(), 4);
    }

    #[test]
    fn test_android_and_windows_findings() {
        let record = RecordBuilder::new("Chrome")
            .user_agent("Mozilla/5.0 (X11; Linux x86_64)")
            .build();
        assert_eq!(check_consistency(&record, OsCategory::Android, "chrome").len(), 2);
        assert_eq!(check_consistency(&record, OsCategory::Windows, "chrome").len(), 1);
        assert!(check_consistency(&record, OsCategory::Linux, "chrome").is_empty());
    }
}
