//! Generator settings and configuration management.
//!
//! This module defines the settings for a generation run and the machinery to
//! load them from files, environment variables and CLI arguments.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sampling::prng::Seed;
use crate::synth::GenerationMode;

/// Prefix of every environment variable the generator reads.
pub const ENV_PREFIX: &str = "FP_SYNTH_";

/// Largest batch a single run may request.
pub const MAX_COUNT: usize = 10_000;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Settings for a generation run.
///
/// # Configuration Precedence
///
/// Settings are applied in the following order (later sources override earlier):
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables (`FP_SYNTH_*`)
/// 4. CLI arguments
///
/// # Example
///
/// ```rust
/// use fingerprint_synth::config::SynthSettings;
/// use fingerprint_synth::synth::GenerationMode;
///
/// let settings = SynthSettings::default()
///     .with_mode(GenerationMode::Seeded)
///     .with_seed("demo")
///     .with_count(5);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthSettings {
    /// Directory of real fingerprint documents.
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,

    /// Directory of weight tables.
    #[serde(default = "default_tables_dir")]
    pub tables_dir: PathBuf,

    /// Directory generated records are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Generation strategy.
    #[serde(default)]
    pub mode: GenerationMode,

    /// Seed for reproducible output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Seed>,

    /// Number of records to generate.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Keep synthetic-tagged documents in the corpus.
    #[serde(default)]
    pub include_synthetic: bool,

    /// Write records to `output_dir` (otherwise print them).
    #[serde(default = "default_write_output")]
    pub write_output: bool,
}

// Default value functions for serde
fn default_corpus_dir() -> PathBuf {
    PathBuf::from("data/corpus")
}

fn default_tables_dir() -> PathBuf {
    PathBuf::from("data/tables")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/synthetic")
}

fn default_count() -> usize {
    1
}

fn default_write_output() -> bool {
    true
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            tables_dir: default_tables_dir(),
            output_dir: default_output_dir(),
            mode: GenerationMode::default(),
            seed: None,
            count: default_count(),
            include_synthetic: false,
            write_output: default_write_output(),
        }
    }
}

impl SynthSettings {
    /// Creates a new SynthSettings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match file_extension(path).as_str() {
            "toml" => Ok(toml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Saves settings to a configuration file.
    ///
    /// The format is determined by the file extension.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match file_extension(path).as_str() {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Loads settings from environment variables.
    ///
    /// Variables are prefixed with `FP_SYNTH_`, for example
    /// `FP_SYNTH_CORPUS_DIR`, `FP_SYNTH_MODE` or `FP_SYNTH_SEED`.
    pub fn from_env() -> Self {
        Self::default().merge_with_env()
    }

    /// Merges current settings with environment variable overrides.
    pub fn merge_with_env(mut self) -> Self {
        self.apply_overrides(|name| env::var(format!("{}{}", ENV_PREFIX, name)).ok());
        self
    }

    /// Applies overrides from a variable lookup. `lookup` receives the
    /// variable name without the `FP_SYNTH_` prefix.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CORPUS_DIR") {
            self.corpus_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("TABLES_DIR") {
            self.tables_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }

        if let Some(val) = lookup("MODE") {
            if let Ok(mode) = val.parse() {
                self.mode = mode;
            }
        }

        if let Some(val) = lookup("SEED") {
            if !val.is_empty() {
                self.seed = Some(Seed::Text(val));
            }
        }

        if let Some(val) = lookup("COUNT") {
            if let Ok(count) = val.parse() {
                self.count = count;
            }
        }

        if let Some(val) = lookup("INCLUDE_SYNTHETIC") {
            self.include_synthetic = parse_bool(&val);
        }

        if let Some(val) = lookup("WRITE_OUTPUT") {
            self.write_output = parse_bool(&val);
        }
    }

    /// Merges settings with CLI arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fingerprint_synth::config::{CliArgs, SynthSettings};
    ///
    /// let args = CliArgs {
    ///     count: Some(3),
    ///     seed: Some("demo".to_string()),
    ///     ..Default::default()
    /// };
    ///
    /// let settings = SynthSettings::default().merge_with_args(&args);
    /// assert_eq!(settings.count, 3);
    /// ```
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        if let Some(ref dir) = args.corpus_dir {
            self.corpus_dir = dir.clone();
        }
        if let Some(ref dir) = args.tables_dir {
            self.tables_dir = dir.clone();
        }
        if let Some(ref dir) = args.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(ref seed) = args.seed {
            self.seed = Some(Seed::Text(seed.clone()));
        }
        if let Some(count) = args.count {
            self.count = count;
        }
        if let Some(include) = args.include_synthetic {
            self.include_synthetic = include;
        }
        if let Some(write) = args.write_output {
            self.write_output = write;
        }

        self
    }

    /// Validates all settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpus_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Corpus directory cannot be empty".to_string(),
            ));
        }
        if self.tables_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Weight table directory cannot be empty".to_string(),
            ));
        }
        if self.write_output && self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "Output directory cannot be empty when writing output".to_string(),
            ));
        }

        if self.count == 0 {
            return Err(ConfigError::ValidationError(
                "Count must be at least 1".to_string(),
            ));
        }
        if self.count > MAX_COUNT {
            return Err(ConfigError::ValidationError(format!(
                "Count cannot exceed {}",
                MAX_COUNT
            )));
        }

        if let Some(Seed::Text(ref seed)) = self.seed {
            if seed.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Seed cannot be blank".to_string(),
                ));
            }
        }

        Ok(())
    }

    // Builder-style methods for convenient configuration

    /// Sets the corpus directory.
    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = dir.into();
        self
    }

    /// Sets the weight table directory.
    pub fn with_tables_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tables_dir = dir.into();
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the generation mode.
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Sets the number of records.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Keeps synthetic-tagged corpus documents.
    pub fn with_include_synthetic(mut self, include: bool) -> Self {
        self.include_synthetic = include;
        self
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// CLI argument structure for parsing command line options.
///
/// All fields are optional to allow partial overrides.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Corpus directory.
    pub corpus_dir: Option<PathBuf>,
    /// Weight table directory.
    pub tables_dir: Option<PathBuf>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Generation mode.
    pub mode: Option<GenerationMode>,
    /// Seed text.
    pub seed: Option<String>,
    /// Number of records.
    pub count: Option<usize>,
    /// Keep synthetic-tagged corpus documents.
    pub include_synthetic: Option<bool>,
    /// Write files (false prints to stdout).
    pub write_output: Option<bool>,
    /// Configuration file path.
    pub config_file: Option<PathBuf>,
}

impl CliArgs {
    /// Creates an empty CliArgs instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the final settings by applying the full configuration chain:
    /// defaults, configuration file (if specified), environment variables,
    /// then these arguments. The result is validated.
    pub fn load_settings(&self) -> Result<SynthSettings, ConfigError> {
        let settings = if let Some(ref config_file) = self.config_file {
            SynthSettings::from_file(config_file)?
        } else {
            SynthSettings::default()
        };

        let settings = settings.merge_with_env().merge_with_args(self);
        settings.validate()?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = SynthSettings::new();
        assert_eq!(settings.corpus_dir, PathBuf::from("data/corpus"));
        assert_eq!(settings.tables_dir, PathBuf::from("data/tables"));
        assert_eq!(settings.output_dir, PathBuf::from("data/synthetic"));
        assert_eq!(settings.mode, GenerationMode::Pure);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.count, 1);
        assert!(!settings.include_synthetic);
        assert!(settings.write_output);
    }

    #[test]
    fn test_builder_methods() {
        let settings = SynthSettings::default()
            .with_corpus_dir("/tmp/corpus")
            .with_mode(GenerationMode::Seeded)
            .with_seed(42u64)
            .with_count(10)
            .with_include_synthetic(true);

        assert_eq!(settings.corpus_dir, PathBuf::from("/tmp/corpus"));
        assert_eq!(settings.mode, GenerationMode::Seeded);
        assert_eq!(settings.seed, Some(Seed::Number(42)));
        assert_eq!(settings.count, 10);
        assert!(settings.include_synthetic);
    }

    #[test]
    fn test_validation() {
        assert!(SynthSettings::default().validate().is_ok());
        assert!(SynthSettings::default().with_count(0).validate().is_err());
        assert!(SynthSettings::default()
            .with_count(MAX_COUNT + 1)
            .validate()
            .is_err());
        assert!(SynthSettings::default().with_seed("  ").validate().is_err());
        assert!(SynthSettings::default().with_corpus_dir("").validate().is_err());
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("CORPUS_DIR", "/srv/corpus"),
            ("MODE", "seeded"),
            ("SEED", "demo"),
            ("COUNT", "7"),
            ("INCLUDE_SYNTHETIC", "1"),
            ("WRITE_OUTPUT", "false"),
        ]
        .into_iter()
        .collect();

        let mut settings = SynthSettings::default();
        settings.apply_overrides(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(settings.corpus_dir, PathBuf::from("/srv/corpus"));
        assert_eq!(settings.mode, GenerationMode::Seeded);
        assert_eq!(settings.seed, Some(Seed::Text("demo".to_string())));
        assert_eq!(settings.count, 7);
        assert!(settings.include_synthetic);
        assert!(!settings.write_output);
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let mut settings = SynthSettings::default();
        settings.apply_overrides(|name| match name {
            "MODE" => Some("chaotic".to_string()),
            "COUNT" => Some("many".to_string()),
            _ => None,
        });
        assert_eq!(settings.mode, GenerationMode::Pure);
        assert_eq!(settings.count, 1);
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        env::set_var("FP_SYNTH_TABLES_DIR", "/srv/weights");
        let settings = SynthSettings::from_env();
        env::remove_var("FP_SYNTH_TABLES_DIR");

        assert_eq!(settings.tables_dir, PathBuf::from("/srv/weights"));
        assert_eq!(settings.corpus_dir, PathBuf::from("data/corpus"));
    }

    #[test]
    fn test_load_settings_without_config_file() {
        let args = CliArgs {
            count: Some(4),
            output_dir: Some(PathBuf::from("/tmp/synthetic")),
            ..CliArgs::new()
        };
        let settings = args.load_settings().unwrap();
        assert_eq!(settings.count, 4);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/synthetic"));

        let invalid = CliArgs {
            count: Some(0),
            ..CliArgs::new()
        };
        assert!(matches!(
            invalid.load_settings(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_cli_args_merge() {
        let args = CliArgs {
            mode: Some(GenerationMode::Seeded),
            seed: Some("42".to_string()),
            write_output: Some(false),
            ..Default::default()
        };

        let settings = SynthSettings::default().merge_with_args(&args);

        assert_eq!(settings.mode, GenerationMode::Seeded);
        assert_eq!(settings.seed, Some(Seed::Text("42".to_string())));
        assert!(!settings.write_output);
        assert_eq!(settings.count, 1); // Unchanged
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.toml");
        let settings = SynthSettings::default()
            .with_mode(GenerationMode::Seeded)
            .with_seed(7u64);
        settings.to_file(&path).unwrap();

        let loaded = SynthSettings::from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_json_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.json");
        fs::write(&path, r#"{"mode":"seeded","seed":"demo","count":3}"#).unwrap();

        let loaded = SynthSettings::from_file(&path).unwrap();
        assert_eq!(loaded.mode, GenerationMode::Seeded);
        assert_eq!(loaded.seed, Some(Seed::Text("demo".to_string())));
        assert_eq!(loaded.count, 3);
        assert_eq!(loaded.tables_dir, PathBuf::from("data/tables"));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.yaml");
        fs::write(&path, "mode: pure").unwrap();
        assert!(matches!(
            SynthSettings::from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
