//! Fingerprint Records
//!
//! The canonical record shape shared by real corpus samples and synthetic
//! output. A record consists of many components:
//! - Navigator properties (user agent, platform, languages, hardware)
//! - Screen resolution and color depth
//! - Timezone
//! - WebGL, canvas and audio profiles
//! - Plugins, MIME types and feature flags
//!
//! Corpus documents are often partial; every component except `navigator`
//! may be absent. Synthetic records always carry every component.
//!
//! # Usage
//!
//! ```rust
//! use fingerprint_synth::fingerprint::record::RecordBuilder;
//!
//! let record = RecordBuilder::new("Chrome")
//!     .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/124.0.0.0")
//!     .platform("Win32")
//!     .screen(1920, 1080)
//!     .build();
//!
//! assert_eq!(record.browser_name, "Chrome");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fingerprint::navigator::{MimeTypeInfo, NavigatorInfo, PluginInfo};
use crate::fingerprint::os::{classify_os, OsCategory};
use crate::fingerprint::webgl::WebGlInfo;
use crate::sampling::prng::Seed;
use crate::synth::GenerationMode;

/// Marker written to `source` on synthetic output
pub const SYNTHETIC_SOURCE: &str = "synthetic";

/// Screen configuration. Zero means "not reported" for the derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub avail_width: u32,
    #[serde(default)]
    pub avail_height: u32,
    #[serde(default)]
    pub color_depth: u32,
    #[serde(default)]
    pub pixel_depth: u32,
}

impl ScreenInfo {
    /// A screen with no reserved UI area and 24-bit color
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            avail_width: width,
            avail_height: height,
            color_depth: 24,
            pixel_depth: 24,
        }
    }

    /// True when either avail dimension is missing
    pub fn needs_avail(&self) -> bool {
        self.avail_width == 0 || self.avail_height == 0
    }

    /// Fill missing avail dimensions by reserving `margin` pixels of height
    /// for OS chrome (taskbar, menu bar). Missing depths default to 24.
    pub fn with_reserved_margin(mut self, margin: u32) -> Self {
        if self.avail_width == 0 {
            self.avail_width = self.width;
        }
        if self.avail_height == 0 {
            self.avail_height = self.height.saturating_sub(margin);
        }
        if self.color_depth == 0 {
            self.color_depth = 24;
        }
        if self.pixel_depth == 0 {
            self.pixel_depth = self.color_depth;
        }
        self
    }
}

/// Timezone as reported by `Date.prototype.getTimezoneOffset` and
/// `Intl.DateTimeFormat().resolvedOptions().timeZone`.
///
/// `offset` follows the JavaScript sign convention: minutes *behind* UTC,
/// so `UTC+02:00` is `-120`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    pub offset: i32,
    #[serde(default)]
    pub name: String,
}

/// The `audio` section of a fingerprint record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AudioInfo {
    pub supported: bool,
    pub sample_rate: Option<u32>,
    pub state: Option<String>,
    pub max_channel_count: Option<u32>,
}

impl Default for AudioInfo {
    fn default() -> Self {
        Self {
            supported: false,
            sample_rate: None,
            state: None,
            max_channel_count: None,
        }
    }
}

/// Provenance of a synthetic record: every sampled dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub mode: GenerationMode,
    pub os_category: OsCategory,
    /// OS label as it appears in the weight table
    pub os: String,
    pub browser: String,
    pub language: String,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_template: Option<String>,
    pub generated_at: String,
}

/// A complete or partial browser fingerprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintRecord {
    pub navigator: NavigatorInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<TimezoneInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webgl: Option<WebGlInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioInfo>,
    #[serde(default)]
    pub plugins: Vec<PluginInfo>,
    #[serde(default)]
    pub mime_types: Vec<MimeTypeInfo>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    #[serde(default)]
    pub browser_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_category: Option<OsCategory>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_metadata: Option<SourceMetadata>,
}

impl FingerprintRecord {
    /// Whether this record was produced by a generator rather than captured
    pub fn is_synthetic(&self) -> bool {
        self.synthetic || self.source.as_deref() == Some(SYNTHETIC_SOURCE)
    }

    /// OS category derived from platform, user agent and browser name
    pub fn detect_os(&self) -> OsCategory {
        classify_os(
            &self.navigator.platform,
            &self.navigator.user_agent,
            &self.browser_name,
        )
    }
}

/// Builder for assembling records by hand (fixtures, manual corpora)
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: FingerprintRecord,
}

impl RecordBuilder {
    /// Start a record for the given browser with an empty navigator
    pub fn new(browser_name: impl Into<String>) -> Self {
        Self {
            record: FingerprintRecord {
                navigator: NavigatorInfo::default(),
                screen: None,
                timezone: None,
                webgl: None,
                canvas: None,
                audio: None,
                plugins: Vec::new(),
                mime_types: Vec::new(),
                features: BTreeMap::new(),
                browser_name: browser_name.into(),
                os_category: None,
                synthetic: false,
                source: None,
                generated_at: None,
                id: None,
                source_metadata: None,
            },
        }
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.record.navigator.set_user_agent(user_agent);
        self
    }

    /// Set the platform
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.record.navigator.platform = platform.into();
        self
    }

    /// Set all languages
    pub fn languages(mut self, languages: &[&str]) -> Self {
        self.record
            .navigator
            .set_languages(languages.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Set hardware concurrency and device memory
    pub fn hardware(mut self, cores: Option<u32>, memory: Option<f64>) -> Self {
        self.record.navigator.hardware_concurrency = cores;
        self.record.navigator.device_memory = memory;
        self
    }

    /// Set max touch points
    pub fn touch_points(mut self, points: u32) -> Self {
        self.record.navigator.max_touch_points = points;
        self
    }

    /// Set screen resolution
    pub fn screen(mut self, width: u32, height: u32) -> Self {
        self.record.screen = Some(ScreenInfo::new(width, height));
        self
    }

    /// Set timezone
    pub fn timezone(mut self, name: impl Into<String>, offset: i32) -> Self {
        self.record.timezone = Some(TimezoneInfo {
            offset,
            name: name.into(),
        });
        self
    }

    /// Set the WebGL section
    pub fn webgl(mut self, webgl: WebGlInfo) -> Self {
        self.record.webgl = Some(webgl);
        self
    }

    /// Set the canvas token
    pub fn canvas(mut self, token: impl Into<String>) -> Self {
        self.record.canvas = Some(token.into());
        self
    }

    /// Set the audio section
    pub fn audio(mut self, audio: AudioInfo) -> Self {
        self.record.audio = Some(audio);
        self
    }

    /// Set plugins
    pub fn plugins(mut self, plugins: Vec<PluginInfo>) -> Self {
        self.record.plugins = plugins;
        self
    }

    /// Set a single feature flag
    pub fn feature(mut self, name: &str, enabled: bool) -> Self {
        self.record.features.insert(name.to_string(), enabled);
        self
    }

    /// Tag the record as synthetic output
    pub fn synthetic(mut self) -> Self {
        self.record.synthetic = true;
        self.record.source = Some(SYNTHETIC_SOURCE.to_string());
        self
    }

    /// Build the final record
    pub fn build(self) -> FingerprintRecord {
        self.record
    }
}
