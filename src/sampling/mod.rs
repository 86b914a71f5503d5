//! Sampling Primitives
//!
//! Randomness and categorical selection used by both synthesis paths.
//!
//! # Modules
//!
//! - `prng` - Seedable uniform stream
//! - `weights` - Weight-table loading and roulette-wheel sampling
//! - `compat` - Browser/OS compatibility matrix and pair resolution

pub mod compat;
pub mod prng;
pub mod weights;

pub use compat::{
    canonical_browser_key, is_compatible, resolve_browser, resolve_os, ResolvedBrowser,
    ResolvedOs, COMPATIBILITY_MATRIX,
};
pub use prng::{Prng, Seed};
pub use weights::{
    load_weight_table, parse_weight_table, sample_weighted, WeightTables, WeightedCategoryEntry,
};
