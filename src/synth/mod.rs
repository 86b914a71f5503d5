//! Fingerprint Synthesis
//!
//! The generation session and its two strategies.
//!
//! # Modules
//!
//! - `pure` - Composes a record from independently sampled parts
//! - `seeded` - Clones a corpus record and mutates selected attributes
//! - `attributes` - Samplers shared by both strategies
//! - `pools` - Curated fallback pools and user-agent templates
//! - `overlay` - Version rewriting inside user agents
//! - `validate` - Post-hoc consistency checks
//! - `identity` - Content hash and output file naming
//!
//! # Example
//!
//! ```rust,no_run
//! use fingerprint_synth::config::SynthSettings;
//! use fingerprint_synth::synth::{GenerationMode, GenerationOptions, SynthSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SynthSession::load(&SynthSettings::default()).await?;
//!     let options = GenerationOptions::new(GenerationMode::Pure).with_seed("demo");
//!     let result = session.generate(&options);
//!     println!("{} -> {}", result.metadata.browser, result.filename);
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod identity;
pub mod overlay;
pub mod pools;
pub mod pure;
pub mod seeded;
pub mod validate;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SynthSettings;
use crate::corpus::{filter_entries, load_corpus, Aggregates, CorpusEntry, CorpusError};
use crate::fingerprint::os::OsCategory;
use crate::fingerprint::record::{FingerprintRecord, SourceMetadata, SYNTHETIC_SOURCE};
use crate::sampling::compat::{browser_display_name, is_mobile_only_browser, resolve_browser, resolve_os};
use crate::sampling::prng::{Prng, Seed};
use crate::sampling::weights::WeightTables;
use attributes::{normalize_webgl_flags, AppliedVersions};
use identity::{content_hash, output_filename};
use validate::check_consistency;

/// Generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Compose an entirely new record from sampled parts
    #[default]
    Pure,
    /// Clone a real record and mutate selected attributes
    Seeded,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Pure => write!(f, "pure"),
            GenerationMode::Seeded => write!(f, "seeded"),
        }
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pure" => Ok(GenerationMode::Pure),
            "seeded" => Ok(GenerationMode::Seeded),
            other => Err(format!(
                "Unknown generation mode: {}. Valid modes are: pure, seeded",
                other
            )),
        }
    }
}

/// Options for a single generation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    pub mode: GenerationMode,
    /// Seed for a reproducible record; `None` draws from OS entropy
    pub seed: Option<Seed>,
    /// Timestamp written to the record; defaults to now
    pub generated_at: Option<DateTime<Utc>>,
}

impl GenerationOptions {
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Pin the generation timestamp
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// How a record was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub mode: GenerationMode,
    pub os_category: OsCategory,
    /// Browser display name
    pub browser: String,
    pub content_hash: String,
    /// Corpus file the record was cloned from (seeded mode)
    pub base_template: Option<String>,
    /// Consistency findings; advisory only
    pub warnings: Vec<String>,
    /// The record's identity hash matches a corpus record
    pub duplicates_corpus: bool,
}

/// A generated record with its file name and metadata
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub record: FingerprintRecord,
    pub filename: String,
    pub metadata: GenerationMetadata,
}

/// Output of a synthesis strategy before tagging
#[derive(Debug, Clone)]
pub struct Draft {
    pub record: FingerprintRecord,
    pub os: OsCategory,
    pub os_label: String,
    pub browser_key: String,
    pub browser_label: String,
    pub language: String,
    pub timezone: String,
    pub versions: AppliedVersions,
    pub base_template: Option<String>,
}

/// A loaded corpus, its aggregates and the weight tables.
///
/// Read-only after construction; concurrent generation calls may share one
/// session, each call drawing from its own PRNG.
#[derive(Debug, Clone)]
pub struct SynthSession {
    entries: Vec<CorpusEntry>,
    aggregates: Aggregates,
    tables: WeightTables,
}

impl SynthSession {
    /// Load the corpus and weight tables named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns a [`CorpusError`] when the corpus directory is missing,
    /// unreadable or has no usable records. Weight tables never fail.
    pub async fn load(settings: &SynthSettings) -> Result<Self, CorpusError> {
        let (entries, tables) = tokio::join!(
            load_corpus(&settings.corpus_dir, settings.include_synthetic),
            WeightTables::load(&settings.tables_dir),
        );
        Self::from_parts(entries?, tables, settings.include_synthetic)
    }

    /// Build a session from already loaded parts
    pub fn from_parts(
        entries: Vec<CorpusEntry>,
        tables: WeightTables,
        include_synthetic: bool,
    ) -> Result<Self, CorpusError> {
        let entries = filter_entries(entries, include_synthetic);
        if entries.is_empty() {
            return Err(CorpusError::Empty("in-memory corpus".to_string()));
        }
        let aggregates = Aggregates::build(&entries);
        Ok(Self {
            entries,
            aggregates,
            tables,
        })
    }

    /// Build a session from bare records, naming them `record_NNNN.json`
    pub fn from_records(
        records: Vec<FingerprintRecord>,
        tables: WeightTables,
        include_synthetic: bool,
    ) -> Result<Self, CorpusError> {
        let entries = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| CorpusEntry::new(format!("record_{:04}.json", i), record))
            .collect();
        Self::from_parts(entries, tables, include_synthetic)
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    pub fn tables(&self) -> &WeightTables {
        &self.tables
    }

    /// Generate one record
    pub fn generate(&self, options: &GenerationOptions) -> GenerationResult {
        let mut rng = Prng::new(options.seed.as_ref());
        let seeded = options.mode == GenerationMode::Seeded;

        let os = resolve_os(
            &self.tables.operating_systems,
            seeded.then_some(&self.aggregates.os_categories),
            &mut rng,
        );
        let corpus_browsers = if seeded {
            self.aggregates.browsers_by_os.get(&os.category)
        } else {
            None
        };
        let browser = resolve_browser(os.category, &self.tables.browsers, corpus_browsers, &mut rng);
        debug!("Resolved {} / {} ({} mode)", os.label, browser.label, options.mode);

        let draft = match options.mode {
            GenerationMode::Pure => pure::synthesize(self, &os, &browser, &mut rng),
            GenerationMode::Seeded => seeded::mutate(self, &os, &browser, &mut rng),
        };
        self.finalize(draft, options, &mut rng)
    }

    /// Generate `count` records. With a seed, record `i > 0` uses the seed
    /// `"<seed>-<i>"`, so the batch as a whole is reproducible.
    pub fn generate_batch(&self, options: &GenerationOptions, count: usize) -> Vec<GenerationResult> {
        (0..count)
            .map(|index| {
                let mut item = options.clone();
                item.seed = options.seed.as_ref().map(|seed| seed.for_batch_index(index));
                self.generate(&item)
            })
            .collect()
    }

    fn finalize(&self, draft: Draft, options: &GenerationOptions, rng: &mut Prng) -> GenerationResult {
        let Draft {
            mut record,
            os,
            os_label,
            browser_key,
            browser_label,
            language,
            timezone,
            versions,
            base_template,
        } = draft;

        if os.is_mobile() || is_mobile_only_browser(&browser_key) {
            record.plugins.clear();
            record.mime_types.clear();
        }
        normalize_webgl_flags(&mut record.features);
        record.navigator.webdriver = false;
        record.browser_name = browser_display_name(&browser_key);
        record.os_category = Some(os);

        let warnings = check_consistency(&record, os, &browser_key);
        let hash = content_hash(&record);
        let duplicates_corpus = self.aggregates.content_hashes.contains(&hash);
        if duplicates_corpus {
            warn!("Synthetic record {} duplicates a corpus record", hash);
        }

        let generated_at = options.generated_at.unwrap_or_else(Utc::now);
        let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let id = if rng.is_deterministic() {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            uuid::Builder::from_random_bytes(bytes).into_uuid()
        } else {
            Uuid::new_v4()
        };

        record.synthetic = true;
        record.source = Some(SYNTHETIC_SOURCE.to_string());
        record.generated_at = Some(timestamp.clone());
        record.id = Some(id.to_string());
        record.source_metadata = Some(SourceMetadata {
            mode: options.mode,
            os_category: os,
            os: os_label,
            browser: browser_label,
            language,
            timezone,
            os_version: versions.os_version,
            browser_version: versions.browser_version,
            seed: options.seed.clone(),
            base_template: base_template.clone(),
            generated_at: timestamp,
        });

        let filename = output_filename(&record.browser_name, &generated_at, &hash);
        info!(
            "Generated {} ({} on {}, {} warnings)",
            filename,
            record.browser_name,
            os,
            warnings.len()
        );

        GenerationResult {
            metadata: GenerationMetadata {
                mode: options.mode,
                os_category: os,
                browser: record.browser_name.clone(),
                content_hash: hash,
                base_template,
                warnings,
                duplicates_corpus,
            },
            record,
            filename,
        }
    }
}
