//! Curated Fallback Pools
//!
//! Hand-maintained value pools the synthesizers fall back to when the corpus
//! has no observation for a category, plus user-agent templates per
//! browser and OS.

use std::collections::BTreeMap;

use crate::fingerprint::os::OsCategory;
use crate::fingerprint::record::AudioInfo;

/// Reserved UI heights (taskbar, menu bar, dock) for desktop screens
pub const DESKTOP_UI_MARGINS: &[u32] = &[0, 25, 30, 40, 48];

/// Desktop hard defaults: cores, memory (GB), touch points
pub const DESKTOP_DEFAULTS: (u32, f64, u32) = (16, 16.0, 0);

/// Handheld hard defaults: cores, memory (GB), touch points
pub const MOBILE_DEFAULTS: (u32, f64, u32) = (8, 6.0, 5);

/// `navigator.platform` values per OS. iOS reports the device family.
pub fn platforms_for(os: OsCategory) -> &'static [&'static str] {
    match os {
        OsCategory::Windows => &["Win32"],
        OsCategory::MacOs => &["MacIntel"],
        OsCategory::Linux => &["Linux x86_64", "Linux aarch64"],
        OsCategory::Android => &["Linux armv81", "Linux aarch64"],
        OsCategory::Ios => &["iPhone", "iPad"],
        OsCategory::Others => &["Win32", "Linux x86_64"],
    }
}

/// Android device models for the `{device}` token
pub const ANDROID_DEVICES: &[&str] = &[
    "Pixel 8",
    "Pixel 7a",
    "SM-S918B",
    "SM-A546B",
    "SM-G991B",
    "2201116SG",
    "CPH2451",
    "K",
];

pub fn hardware_concurrency_pool(os: OsCategory) -> &'static [u32] {
    match os {
        OsCategory::Windows | OsCategory::Others => &[4, 6, 8, 12, 16, 20, 24],
        OsCategory::MacOs => &[8, 10, 12],
        OsCategory::Linux => &[4, 8, 12, 16],
        OsCategory::Android => &[8],
        OsCategory::Ios => &[4, 6],
    }
}

pub fn device_memory_pool(os: OsCategory) -> &'static [f64] {
    match os {
        OsCategory::Windows | OsCategory::Others | OsCategory::Linux => &[4.0, 8.0, 16.0, 32.0],
        OsCategory::MacOs => &[8.0, 16.0],
        OsCategory::Android => &[4.0, 6.0, 8.0],
        OsCategory::Ios => &[4.0, 6.0, 8.0],
    }
}

pub fn touch_points_pool(os: OsCategory) -> &'static [u32] {
    match os {
        OsCategory::Windows => &[0, 0, 0, 10],
        OsCategory::MacOs | OsCategory::Linux | OsCategory::Others => &[0],
        OsCategory::Android | OsCategory::Ios => &[5],
    }
}

/// `navigator.doNotTrack` values; most browsers leave it unset
pub fn do_not_track_pool(_os: OsCategory) -> &'static [Option<&'static str>] {
    &[None, None, None, Some("1")]
}

/// Common screen resolutions per OS
pub fn screen_presets(os: OsCategory) -> &'static [(u32, u32)] {
    match os {
        OsCategory::Windows | OsCategory::Others => &[
            (1920, 1080),
            (1366, 768),
            (1536, 864),
            (2560, 1440),
            (1440, 900),
            (1600, 900),
        ],
        OsCategory::MacOs => &[(1440, 900), (1512, 982), (1728, 1117), (2560, 1440)],
        OsCategory::Linux => &[(1920, 1080), (2560, 1440), (1366, 768)],
        OsCategory::Android => &[(412, 915), (360, 800), (393, 873), (384, 854)],
        OsCategory::Ios => &[(390, 844), (393, 852), (430, 932), (375, 667), (820, 1180)],
    }
}

/// Audio profiles per OS
pub fn audio_presets(os: OsCategory) -> Vec<AudioInfo> {
    let rates: &[u32] = match os {
        OsCategory::MacOs | OsCategory::Ios => &[44100, 48000],
        _ => &[48000, 44100],
    };
    rates
        .iter()
        .map(|rate| AudioInfo {
            supported: true,
            sample_rate: Some(*rate),
            state: Some("suspended".to_string()),
            max_channel_count: Some(2),
        })
        .collect()
}

/// Feature flags a fresh browser profile reports
pub fn default_features(mobile: bool) -> BTreeMap<String, bool> {
    let mut features: BTreeMap<String, bool> = [
        ("cookies", true),
        ("geolocation", true),
        ("indexedDB", true),
        ("localStorage", true),
        ("notification", true),
        ("serviceWorker", true),
        ("sessionStorage", true),
        ("webgl", true),
        ("webgl2", true),
        ("webrtc", true),
    ]
    .into_iter()
    .map(|(name, enabled)| (name.to_string(), enabled))
    .collect();

    features.insert("bluetooth".to_string(), !mobile);
    if mobile {
        features.insert("touch".to_string(), true);
    }
    features
}

/// Probability that a feature flag is flipped on a synthetic record
pub fn feature_flip_probability(feature: &str) -> f64 {
    match feature {
        "notification" => 0.15,
        "bluetooth" => 0.1,
        "webgl2" | "webrtc" | "geolocation" => 0.05,
        "serviceWorker" => 0.03,
        "webgl" | "indexedDB" => 0.02,
        "localStorage" | "sessionStorage" => 0.01,
        _ => 0.03,
    }
}

/// `navigator.vendor` for a browser on an OS. Every iOS browser is WebKit.
pub fn vendor_for(browser_key: &str, os: OsCategory, chromium: bool) -> &'static str {
    if os == OsCategory::Ios || browser_key.contains("safari") {
        "Apple Computer, Inc."
    } else if chromium {
        "Google Inc."
    } else {
        ""
    }
}

/// OS version substituted into `{os_version}` before any table overlay
pub fn default_os_version(os: OsCategory) -> &'static str {
    match os {
        OsCategory::Windows => "10.0",
        OsCategory::MacOs => "10_15_7",
        OsCategory::Android => "14",
        OsCategory::Ios => "17_4",
        OsCategory::Linux | OsCategory::Others => "",
    }
}

const CHROME_DESKTOP: &str = "AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const CHROME_MOBILE: &str =
    "AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36";
const IOS_PREFIX: &str = "Mozilla/5.0 ({device}; CPU {ios_cpu} {os_version} like Mac OS X)";

/// User-agent template for a browser/OS pair.
///
/// Tokens: `{os_version}`, `{os_version_dotted}`, `{device}` and
/// `{ios_cpu}` (`iPhone OS` or `OS`).
pub fn user_agent_template(browser_key: &str, os: OsCategory) -> String {
    let desktop_prefix = match os {
        OsCategory::MacOs => "Mozilla/5.0 (Macintosh; Intel Mac OS X {os_version})",
        OsCategory::Linux => "Mozilla/5.0 (X11; Linux x86_64)",
        _ => "Mozilla/5.0 (Windows NT {os_version}; Win64; x64)",
    };
    let android_prefix = "Mozilla/5.0 (Linux; Android {os_version}; {device})";

    match (browser_key, os) {
        ("firefox", OsCategory::Android) => {
            "Mozilla/5.0 (Android {os_version}; Mobile; rv:125.0) Gecko/125.0 Firefox/125.0"
                .to_string()
        }
        ("firefox", OsCategory::Ios) => format!(
            "{} AppleWebKit/605.1.15 (KHTML, like Gecko) FxiOS/125.0 Mobile/15E148 Safari/605.1.15",
            IOS_PREFIX
        ),
        ("firefox", OsCategory::MacOs) => {
            "Mozilla/5.0 (Macintosh; Intel Mac OS X {os_version_dotted}; rv:125.0) Gecko/20100101 Firefox/125.0"
                .to_string()
        }
        ("firefox", OsCategory::Linux) => {
            "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0".to_string()
        }
        ("firefox", _) => {
            "Mozilla/5.0 (Windows NT {os_version}; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0"
                .to_string()
        }
        ("safari", _) => {
            "Mozilla/5.0 (Macintosh; Intel Mac OS X {os_version}) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15"
                .to_string()
        }
        ("mobile safari", _) => format!(
            "{} AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
            IOS_PREFIX
        ),
        ("samsung internet", _) => format!(
            "{} AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/24.0 Chrome/117.0.0.0 Mobile Safari/537.36",
            android_prefix
        ),
        ("google app", OsCategory::Ios) => format!(
            "{} AppleWebKit/605.1.15 (KHTML, like Gecko) GSA/311.0.622788618 Mobile/15E148 Safari/604.1",
            IOS_PREFIX
        ),
        ("google app", _) => format!(
            "{} AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/124.0.0.0 Mobile Safari/537.36 GSA/15.16.36.28.arm64",
            android_prefix
        ),
        ("edge", OsCategory::Ios) => format!(
            "{} AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 EdgiOS/124.0.2478.50 Mobile/15E148 Safari/605.1.15",
            IOS_PREFIX
        ),
        ("edge", OsCategory::Android) => {
            format!("{} {} EdgA/124.0.2478.64", android_prefix, CHROME_MOBILE)
        }
        ("edge", _) => format!("{} {} Edg/124.0.0.0", desktop_prefix, CHROME_DESKTOP),
        ("opera", OsCategory::Android) => {
            format!("{} {} OPR/81.0.4292.78", android_prefix, CHROME_MOBILE)
        }
        ("opera", _) => format!("{} {} OPR/109.0.0.0", desktop_prefix, CHROME_DESKTOP),
        (_, OsCategory::Ios) => format!(
            "{} AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/124.0.6367.88 Mobile/15E148 Safari/604.1",
            IOS_PREFIX
        ),
        (_, OsCategory::Android) => format!("{} {}", android_prefix, CHROME_MOBILE),
        _ => format!("{} {}", desktop_prefix, CHROME_DESKTOP),
    }
}

/// Fill a template's tokens
pub fn render_user_agent(template: &str, os_version: &str, device: &str) -> String {
    let ios_cpu = if device.starts_with("iPad") {
        "OS"
    } else {
        "iPhone OS"
    };
    template
        .replace("{os_version_dotted}", &os_version.replace('_', "."))
        .replace("{os_version}", os_version)
        .replace("{device}", device)
        .replace("{ios_cpu}", ios_cpu)
}
