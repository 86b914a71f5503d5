//! # fingerprint-synth
//!
//! Synthesizes browser fingerprint records that are statistically plausible
//! and internally consistent, drawing on a corpus of real fingerprints and
//! categorical weight tables.
//!
//! ## Features
//!
//! - **Pure Synthesis**: Composes a new record from independently sampled parts
//! - **Seeded Mutation**: Clones a real record and perturbs selected attributes
//! - **Compatibility Matrix**: OS/browser pairs are always real-world plausible
//! - **Reproducibility**: A seed yields the same record on every platform
//! - **Consistency Checks**: Advisory warnings for user-agent/platform/vendor drift
//! - **Flexible Configuration**: TOML/JSON files, environment variables, CLI arguments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fingerprint_synth::{
//!     config::SynthSettings,
//!     synth::{GenerationMode, GenerationOptions, SynthSession},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = SynthSettings::default()
//!         .with_corpus_dir("data/corpus")
//!         .with_mode(GenerationMode::Seeded);
//!
//!     let session = SynthSession::load(&settings).await?;
//!     let options = GenerationOptions::new(settings.mode).with_seed("demo");
//!     let result = session.generate(&options);
//!
//!     println!("{}", serde_json::to_string_pretty(&result.record)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`fingerprint`]: Record data model and OS classification
//! - [`sampling`]: PRNG, weight tables and the compatibility matrix
//! - [`corpus`]: Corpus loading and attribute aggregates
//! - [`synth`]: Generation session, synthesizers and validation
//! - [`config`]: Configuration loading and management
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     SynthSession                         │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌───────────┐  ┌──────────┐  ┌──────────┐  │
//! │  │ Corpus  │  │ Sampling  │  │  Pure /  │  │ Validate │  │
//! │  │ + Aggr. │  │ + Compat  │  │  Seeded  │  │ + Hash   │  │
//! │  └────┬────┘  └─────┬─────┘  └────┬─────┘  └────┬─────┘  │
//! │       └─────────────┴─────────────┴─────────────┘        │
//! │                          │                               │
//! │                    ┌─────┴─────┐                         │
//! │                    │  Config   │                         │
//! │                    └───────────┘                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! Configuration follows a precedence chain:
//! 1. Default values
//! 2. Configuration file (TOML/JSON)
//! 3. Environment variables (`FP_SYNTH_*`)
//! 4. CLI arguments
//!
//! See [`config::SynthSettings`] for all available options.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Fingerprint record data model and OS classification.
pub mod fingerprint;

/// Deterministic PRNG, weighted tables and the OS/browser compatibility matrix.
pub mod sampling;

/// Corpus loading and per-attribute aggregates.
pub mod corpus;

/// Generation session with pure and seeded strategies.
pub mod synth;

/// Configuration management for loading settings from files, env, and CLI.
pub mod config;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

// Record types
pub use fingerprint::{
    classify_os, AudioInfo, FingerprintRecord, GpuProfile, MimeTypeInfo, NavigatorInfo,
    OsCategory, PluginInfo, RecordBuilder, ScreenInfo, SourceMetadata, TimezoneInfo, WebGlInfo,
};

// Sampling types
pub use sampling::{Prng, Seed, WeightTables, WeightedCategoryEntry, COMPATIBILITY_MATRIX};

// Corpus types
pub use corpus::{load_corpus, Aggregates, CorpusEntry, CorpusError};

// Generation types
pub use synth::{
    GenerationMetadata, GenerationMode, GenerationOptions, GenerationResult, SynthSession,
};

// Config types
pub use config::{CliArgs, ConfigError, SynthSettings};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use fingerprint_synth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{CliArgs, SynthSettings};
    pub use crate::fingerprint::{FingerprintRecord, OsCategory};
    pub use crate::sampling::Seed;
    pub use crate::synth::{GenerationMode, GenerationOptions, GenerationResult, SynthSession};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
        assert!(FULL_VERSION.contains(VERSION));
        assert!(FULL_VERSION.contains(NAME));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let options = GenerationOptions::new(GenerationMode::Pure).with_seed(1u64);
        assert_eq!(options.seed, Some(Seed::Number(1)));
        let _ = NAME;
    }
}
