//! Configuration module for fingerprint-synth.
//!
//! This module provides configuration management for generation runs, including:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides (`FP_SYNTH_*`)
//! - CLI argument merging
//! - Validation and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use fingerprint_synth::config::SynthSettings;
//!
//! // Load from a specific file
//! let settings = SynthSettings::from_file("synth.toml").unwrap();
//!
//! // Override with environment variables
//! let settings = settings.merge_with_env();
//! ```

mod settings;

pub use settings::{CliArgs, ConfigError, SynthSettings, ENV_PREFIX, MAX_COUNT};
