//! Navigator Properties
//!
//! The `navigator` section of a fingerprint record together with the plugin
//! and MIME type records that travel with it. Also holds the curated plugin
//! library used when the corpus has no plugin sample for a browser.
//!
//! # Example
//!
//! ```rust
//! use fingerprint_synth::fingerprint::navigator::NavigatorInfo;
//!
//! let navigator = NavigatorInfo::default();
//!
//! // Synthetic navigators never expose webdriver
//! assert!(!navigator.webdriver);
//! ```

use serde::{Deserialize, Serialize};

/// Information about a browser plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name
    #[serde(default)]
    pub name: String,
    /// Plugin description
    #[serde(default)]
    pub description: String,
    /// Plugin filename
    #[serde(default)]
    pub filename: String,
}

impl PluginInfo {
    /// Create a new plugin info
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            filename: filename.into(),
        }
    }

    /// Built-in PDF viewer under the given display name
    pub fn pdf_viewer(name: &str) -> Self {
        Self::new(name, "Portable Document Format", "internal-pdf-viewer")
    }
}

/// Information about a MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeTypeInfo {
    /// MIME type string (e.g., "application/pdf")
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Description of the MIME type
    #[serde(default)]
    pub description: String,
    /// File extensions (e.g., "pdf")
    #[serde(default)]
    pub suffixes: String,
}

impl MimeTypeInfo {
    /// Create a new MIME type info
    pub fn new(
        mime_type: impl Into<String>,
        description: impl Into<String>,
        suffixes: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            description: description.into(),
            suffixes: suffixes.into(),
        }
    }

    /// PDF MIME type
    pub fn pdf() -> Self {
        Self::new("application/pdf", "Portable Document Format", "pdf")
    }

    /// Text PDF MIME type
    pub fn text_pdf() -> Self {
        Self::new("text/pdf", "Portable Document Format", "pdf")
    }
}

/// The `navigator` section of a fingerprint record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigatorInfo {
    /// User agent string
    pub user_agent: String,
    /// App version (user agent without the `Mozilla/` prefix)
    pub app_version: String,
    /// Platform string (e.g., "Win32", "MacIntel", "Linux x86_64")
    pub platform: String,
    /// Vendor string (e.g., "Google Inc.")
    pub vendor: String,
    /// Primary language, always `languages[0]` for synthetic output
    pub language: String,
    /// Accepted languages, primary first
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub do_not_track: Option<String>,
    /// Number of logical CPU cores
    pub hardware_concurrency: Option<u32>,
    /// Device memory in GB
    pub device_memory: Option<f64>,
    /// Maximum touch points (0 for non-touch devices)
    pub max_touch_points: u32,
    /// Product (usually "Gecko")
    pub product: String,
    /// Product sub (usually "20030107" or "20100101")
    pub product_sub: String,
    /// Always false for synthetic output
    pub webdriver: bool,
}

impl NavigatorInfo {
    /// Replace the user agent and keep `app_version` in step with it
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = user_agent.into();
        self.app_version = extract_app_version(&self.user_agent);
    }

    /// Replace the language list; the primary language follows `languages[0]`
    pub fn set_languages(&mut self, languages: Vec<String>) {
        if let Some(first) = languages.first() {
            self.language = first.clone();
        }
        self.languages = languages;
    }

    /// Copy the fields a synthesized navigator does not decide itself
    /// (product tokens and cookie support) from a real template.
    pub fn overlay_template(&mut self, template: &NavigatorInfo) {
        if !template.product.is_empty() {
            self.product = template.product.clone();
        }
        if !template.product_sub.is_empty() {
            self.product_sub = template.product_sub.clone();
        }
        self.cookie_enabled = template.cookie_enabled;
    }
}

/// Blank navigator; corpus documents fill in what they report and leave the
/// rest empty or `None`.
impl Default for NavigatorInfo {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            app_version: String::new(),
            platform: String::new(),
            vendor: String::new(),
            language: String::new(),
            languages: Vec::new(),
            cookie_enabled: true,
            do_not_track: None,
            hardware_concurrency: None,
            device_memory: None,
            max_touch_points: 0,
            product: String::new(),
            product_sub: String::new(),
            webdriver: false,
        }
    }
}

/// `productSub` a browser family reports
pub fn product_sub_for(browser_key: &str) -> &'static str {
    if browser_key.contains("firefox") {
        "20100101"
    } else {
        "20030107"
    }
}

/// Curated plugin library for desktop browsers
pub fn default_plugin_library() -> Vec<PluginInfo> {
    vec![
        PluginInfo::pdf_viewer("PDF Viewer"),
        PluginInfo::pdf_viewer("Chrome PDF Viewer"),
        PluginInfo::pdf_viewer("Chromium PDF Viewer"),
        PluginInfo::pdf_viewer("Microsoft Edge PDF Viewer"),
        PluginInfo::pdf_viewer("WebKit built-in PDF"),
    ]
}

/// Curated MIME type library matching [`default_plugin_library`]
pub fn default_mime_library() -> Vec<MimeTypeInfo> {
    vec![MimeTypeInfo::pdf(), MimeTypeInfo::text_pdf()]
}

/// Extract app version from user agent
pub fn extract_app_version(user_agent: &str) -> String {
    // App version is everything after "Mozilla/"
    if let Some(pos) = user_agent.find("Mozilla/") {
        user_agent[pos + 8..].to_string()
    } else {
        user_agent.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webdriver_default_false() {
        assert!(!NavigatorInfo::default().webdriver);
    }

    #[test]
    fn test_set_user_agent_updates_app_version() {
        let mut nav = NavigatorInfo::default();
        nav.set_user_agent("Mozilla/5.0 (X11; Linux x86_64) Firefox/125.0");
        assert_eq!(nav.app_version, "5.0 (X11; Linux x86_64) Firefox/125.0");
    }

    #[test]
    fn test_set_languages_sets_primary() {
        let mut nav = NavigatorInfo::default();
        nav.set_languages(vec!["de-DE".to_string(), "de".to_string()]);
        assert_eq!(nav.language, "de-DE");
        assert_eq!(nav.languages.len(), 2);
    }

    #[test]
    fn test_partial_navigator_deserializes() {
        let nav: NavigatorInfo =
            serde_json::from_str(r#"{"userAgent":"UA","deviceMemory":4}"#).unwrap();
        assert_eq!(nav.user_agent, "UA");
        assert_eq!(nav.hardware_concurrency, None);
        assert_eq!(nav.device_memory, Some(4.0));
        assert!(!nav.webdriver);
    }

    #[test]
    fn test_overlay_template_keeps_identity_fields() {
        let mut nav = NavigatorInfo::default();
        let template = NavigatorInfo {
            user_agent: "other".to_string(),
            product_sub: "20100101".to_string(),
            cookie_enabled: false,
            ..Default::default()
        };
        nav.overlay_template(&template);
        assert_ne!(nav.user_agent, "other");
        assert_eq!(nav.product_sub, "20100101");
        assert!(!nav.cookie_enabled);
    }

    #[test]
    fn test_mime_type_field_name() {
        let json = serde_json::to_value(MimeTypeInfo::pdf()).unwrap();
        assert_eq!(json["type"], "application/pdf");
    }
}
