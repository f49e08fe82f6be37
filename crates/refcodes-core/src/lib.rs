// crates/refcodes-core/src/lib.rs

//! # refcodes-core
//!
//! In-memory reference-data lookup: versioned ISO datasets (countries,
//! subdivisions, currencies, languages, scripts) and the Harmonized
//! System commodity-code taxonomy, loaded lazily from JSON and queried
//! through per-field indices, fuzzy ranking search and parent/child
//! hierarchy traversal. No network access, no persistence: one read at
//! first use, then pure in-memory lookups.
//!
//! ```no_run
//! use refcodes_core::{Countries, Subdivisions};
//!
//! fn main() -> refcodes_core::Result<()> {
//!     let countries = Countries::from_path("databases/iso3166-1.json");
//!     let germany = countries.get("alpha_2", "DE")?.expect("DE is in ISO 3166-1");
//!     assert_eq!(germany.field("name")?, "Germany");
//!
//!     let subdivisions = Subdivisions::from_path("databases/iso3166-2.json");
//!     let ranked = countries.search_fuzzy("sachsen", &subdivisions)?;
//!     assert_eq!(ranked[0].field("alpha_2")?, "DE");
//!     Ok(())
//! }
//! ```

pub mod datasets;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod record;
pub mod search;
pub mod store;
pub mod text;
pub mod translations;

// Re-exports
pub use crate::datasets::{
    Countries, Currencies, DatasetDir, HistoricCountries, HsCodes, LanguageFamilies, Languages,
    Scripts, Sections, Subdivisions,
};
pub use crate::error::{RefError, Result};
pub use crate::hierarchy::{HsLevel, HS_ROOT};
pub use crate::record::Record;
pub use crate::store::{DatasetConfig, Store};
pub use crate::text::{equals_folded, fold_key, fold_query};
