//! Operating System Categories
//!
//! Every fingerprint is bucketed into one of a small set of OS categories that
//! condition all sampling. Detection runs an ordered rule table over the
//! platform string, user agent and browser name; the first matching rule wins.
//!
//! # Example
//!
//! ```rust
//! use fingerprint_synth::fingerprint::os::{classify_os, OsCategory};
//!
//! let os = classify_os("iPhone", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X)", "Mobile Safari");
//! assert_eq!(os, OsCategory::Ios);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system bucket used to condition sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OsCategory {
    #[serde(rename = "android")]
    Android,
    #[serde(rename = "ios")]
    Ios,
    #[serde(rename = "windows")]
    Windows,
    #[serde(rename = "mac os")]
    MacOs,
    #[serde(rename = "gnu/linux based")]
    Linux,
    #[serde(rename = "others")]
    Others,
}

impl OsCategory {
    /// All categories, in label order
    pub fn all() -> [OsCategory; 6] {
        [
            OsCategory::Android,
            OsCategory::Ios,
            OsCategory::Windows,
            OsCategory::MacOs,
            OsCategory::Linux,
            OsCategory::Others,
        ]
    }

    /// Canonical lowercase label, also used as the weight-table key
    pub fn label(&self) -> &'static str {
        match self {
            OsCategory::Android => "android",
            OsCategory::Ios => "ios",
            OsCategory::Windows => "windows",
            OsCategory::MacOs => "mac os",
            OsCategory::Linux => "gnu/linux based",
            OsCategory::Others => "others",
        }
    }

    /// Touch-first handheld platforms
    pub fn is_mobile(&self) -> bool {
        matches!(self, OsCategory::Android | OsCategory::Ios)
    }
}

impl fmt::Display for OsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(OsCategory::Android),
            "ios" | "iphone os" | "ipados" => Ok(OsCategory::Ios),
            "windows" => Ok(OsCategory::Windows),
            "mac os" | "macos" | "mac os x" | "os x" => Ok(OsCategory::MacOs),
            "gnu/linux based" | "linux" | "gnu/linux" => Ok(OsCategory::Linux),
            "others" | "other" => Ok(OsCategory::Others),
            other => Err(format!("Unknown OS category: {}", other)),
        }
    }
}

/// Lower-cased view of the three signals a rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct OsSignals<'a> {
    pub platform: &'a str,
    pub user_agent: &'a str,
    pub browser: &'a str,
}

/// One entry of the detection table
pub struct OsRule {
    pub category: OsCategory,
    pub matches: fn(&OsSignals<'_>) -> bool,
}

fn is_ios(s: &OsSignals<'_>) -> bool {
    ["iphone", "ipad", "ipod"]
        .iter()
        .any(|m| s.platform.contains(m) || s.user_agent.contains(m))
}

fn is_mac(s: &OsSignals<'_>) -> bool {
    s.platform.starts_with("mac")
        || s.user_agent.contains("macintosh")
        || s.user_agent.contains("mac os x")
}

fn is_windows(s: &OsSignals<'_>) -> bool {
    s.platform.starts_with("win") || s.user_agent.contains("windows")
}

fn is_android(s: &OsSignals<'_>) -> bool {
    s.user_agent.contains("android")
        || s.platform.contains("android")
        || s.browser.contains("samsung")
}

fn is_linux(s: &OsSignals<'_>) -> bool {
    s.platform.contains("linux")
        || s.user_agent.contains("linux")
        || s.user_agent.contains("x11")
        || s.user_agent.contains("cros")
}

/// Ordered detection rules; earlier entries take priority.
pub const OS_RULES: &[OsRule] = &[
    OsRule {
        category: OsCategory::Ios,
        matches: is_ios,
    },
    OsRule {
        category: OsCategory::MacOs,
        matches: is_mac,
    },
    OsRule {
        category: OsCategory::Windows,
        matches: is_windows,
    },
    OsRule {
        category: OsCategory::Android,
        matches: is_android,
    },
    OsRule {
        category: OsCategory::Linux,
        matches: is_linux,
    },
];

/// Classify a record into an OS category using [`OS_RULES`]
pub fn classify_os(platform: &str, user_agent: &str, browser: &str) -> OsCategory {
    let platform = platform.trim().to_lowercase();
    let user_agent = user_agent.to_lowercase();
    let browser = browser.trim().to_lowercase();
    let signals = OsSignals {
        platform: &platform,
        user_agent: &user_agent,
        browser: &browser,
    };

    OS_RULES
        .iter()
        .find(|rule| (rule.matches)(&signals))
        .map(|rule| rule.category)
        .unwrap_or(OsCategory::Others)
}

/// Normalize a categorical key (lower-cased, trimmed)
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// File-name friendly form of a key (`gnu/linux based` -> `gnu_linux_based`)
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_sep = false;
    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ios_beats_mac() {
        let ua = "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15";
        assert_eq!(classify_os("MacIntel", ua, "Mobile Safari"), OsCategory::Ios);
    }

    #[test]
    fn test_android_beats_linux() {
        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36";
        assert_eq!(classify_os("Linux armv81", ua, "Chrome"), OsCategory::Android);
    }

    #[test]
    fn test_desktop_platforms() {
        assert_eq!(classify_os("Win32", "", "Chrome"), OsCategory::Windows);
        assert_eq!(classify_os("MacIntel", "", "Safari"), OsCategory::MacOs);
        assert_eq!(
            classify_os("Linux x86_64", "Mozilla/5.0 (X11; Linux x86_64)", "Firefox"),
            OsCategory::Linux
        );
        assert_eq!(classify_os("", "", ""), OsCategory::Others);
    }

    #[test]
    fn test_rule_order_is_explicit() {
        let order: Vec<OsCategory> = OS_RULES.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                OsCategory::Ios,
                OsCategory::MacOs,
                OsCategory::Windows,
                OsCategory::Android,
                OsCategory::Linux
            ]
        );
    }

    #[test]
    fn test_label_round_trip_and_serde() {
        for os in OsCategory::all() {
            assert_eq!(os.label().parse::<OsCategory>().unwrap(), os);
        }
        let json = serde_json::to_string(&OsCategory::Linux).unwrap();
        assert_eq!(json, "\"gnu/linux based\"");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("gnu/linux based"), "gnu_linux_based");
        assert_eq!(slugify("Mobile Safari"), "mobile_safari");
        assert_eq!(slugify("  mac os "), "mac_os");
    }
}
