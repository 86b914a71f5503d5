//! Fingerprint Data Model
//!
//! Record types shared by the corpus loader and the synthesizers.
//!
//! # Modules
//!
//! - `record` - The fingerprint record and its screen/timezone/audio parts
//! - `navigator` - Navigator properties, plugins and MIME types
//! - `webgl` - WebGL section and curated GPU pools
//! - `os` - OS categories and the ordered detection rule table

pub mod navigator;
pub mod os;
pub mod record;
pub mod webgl;

// Re-export commonly used types for convenience
pub use navigator::{MimeTypeInfo, NavigatorInfo, PluginInfo};
pub use os::{classify_os, normalize_key, slugify, OsCategory};
pub use record::{
    AudioInfo, FingerprintRecord, RecordBuilder, ScreenInfo, SourceMetadata, TimezoneInfo,
};
pub use webgl::{GpuProfile, WebGlInfo};
