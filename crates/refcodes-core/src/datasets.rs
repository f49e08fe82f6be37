// crates/refcodes-core/src/datasets.rs

//! # Dataset presets
//!
//! Every dataset the crate knows about is a [`DatasetConfig`] plus a thin
//! wrapper around the generic [`Store`]. The wrappers deref to the store,
//! so all of `get`/`lookup`/`records`/`count` and the mutation API are
//! available directly; dataset-specific operations (hierarchy traversal,
//! fuzzy search, subdivision relations) live in `hierarchy.rs` and
//! `search.rs` as extra `impl` blocks on these types.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::store::{DatasetConfig, Store};

/// ISO 3166-1, current countries.
pub const COUNTRIES: DatasetConfig = DatasetConfig {
    name: "Country",
    root_key: "3166-1",
    key_field: "alpha_2",
    no_index: &[],
};

/// ISO 3166-3, countries removed from the standard.
pub const HISTORIC_COUNTRIES: DatasetConfig = DatasetConfig {
    name: "HistoricCountry",
    root_key: "3166-3",
    key_field: "alpha_4",
    no_index: &[],
};

/// ISO 3166-2, country subdivisions. Names are deliberately unindexed:
/// they are ambiguous across countries and are matched by the search
/// helpers instead.
pub const SUBDIVISIONS: DatasetConfig = DatasetConfig {
    name: "Subdivision",
    root_key: "3166-2",
    key_field: "code",
    no_index: &["name", "parent_code", "parent", "type"],
};

/// ISO 4217 currencies.
pub const CURRENCIES: DatasetConfig = DatasetConfig {
    name: "Currency",
    root_key: "4217",
    key_field: "alpha_3",
    no_index: &[],
};

/// ISO 639-3 languages. The unindexed columns are either non-unique
/// classifiers or rarely-filled alternates.
pub const LANGUAGES: DatasetConfig = DatasetConfig {
    name: "Language",
    root_key: "639-3",
    key_field: "alpha_3",
    no_index: &["status", "scope", "type", "inverted_name", "common_name"],
};

/// ISO 639-5 language families and groups.
pub const LANGUAGE_FAMILIES: DatasetConfig = DatasetConfig {
    name: "LanguageFamily",
    root_key: "639-5",
    key_field: "alpha_3",
    no_index: &[],
};

/// ISO 15924 scripts.
pub const SCRIPTS: DatasetConfig = DatasetConfig {
    name: "Script",
    root_key: "15924",
    key_field: "alpha_4",
    no_index: &[],
};

/// WCO Harmonized System commodity codes.
pub const HSCODES: DatasetConfig = DatasetConfig {
    name: "HSCode",
    root_key: "hscodes",
    key_field: "hscode",
    no_index: &[],
};

/// Harmonized System sections (the roman-numeral groupings of chapters).
pub const SECTIONS: DatasetConfig = DatasetConfig {
    name: "Section",
    root_key: "sections",
    key_field: "section",
    no_index: &[],
};

macro_rules! dataset_wrapper {
    ($(#[$doc:meta])* $name:ident, $config:expr) => {
        $(#[$doc])*
        pub struct $name {
            store: Store,
        }

        impl $name {
            pub fn from_path(path: impl Into<PathBuf>) -> Self {
                $name {
                    store: Store::new($config, path),
                }
            }

            /// Attach a translation-catalog directory (see [`Store::with_catalog_dir`]).
            pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
                self.store = self.store.with_catalog_dir(dir);
                self
            }

            pub fn store(&self) -> &Store {
                &self.store
            }
        }

        impl Deref for $name {
            type Target = Store;

            fn deref(&self) -> &Store {
                &self.store
            }
        }
    };
}

dataset_wrapper!(
    /// Access to the ISO 3166-1 database (countries).
    Countries,
    COUNTRIES
);
dataset_wrapper!(
    /// Access to the ISO 3166-3 database (former countries).
    HistoricCountries,
    HISTORIC_COUNTRIES
);
dataset_wrapper!(
    /// Access to the ISO 3166-2 database (country subdivisions).
    Subdivisions,
    SUBDIVISIONS
);
dataset_wrapper!(
    /// Access to the ISO 4217 database (currencies).
    Currencies,
    CURRENCIES
);
dataset_wrapper!(
    /// Access to the ISO 639-3 database (languages).
    Languages,
    LANGUAGES
);
dataset_wrapper!(
    /// Access to the ISO 639-5 database (language families and groups).
    LanguageFamilies,
    LANGUAGE_FAMILIES
);
dataset_wrapper!(
    /// Access to the ISO 15924 database (scripts).
    Scripts,
    SCRIPTS
);
dataset_wrapper!(
    /// Access to the Harmonized System commodity-code database.
    HsCodes,
    HSCODES
);
dataset_wrapper!(
    /// Access to the Harmonized System sections database.
    Sections,
    SECTIONS
);

/// Construct every dataset from one directory of JSON files, using the
/// conventional file names produced by the data-preparation pipeline.
/// Convenience for applications that ship the full bundle.
pub struct DatasetDir {
    pub countries: Countries,
    pub historic_countries: HistoricCountries,
    pub subdivisions: Subdivisions,
    pub currencies: Currencies,
    pub languages: Languages,
    pub language_families: LanguageFamilies,
    pub scripts: Scripts,
    pub hscodes: HsCodes,
    pub sections: Sections,
}

impl DatasetDir {
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        DatasetDir {
            countries: Countries::from_path(dir.join("iso3166-1.json")),
            historic_countries: HistoricCountries::from_path(dir.join("iso3166-3.json")),
            subdivisions: Subdivisions::from_path(dir.join("iso3166-2.json")),
            currencies: Currencies::from_path(dir.join("iso4217.json")),
            languages: Languages::from_path(dir.join("iso639-3.json")),
            language_families: LanguageFamilies::from_path(dir.join("iso639-5.json")),
            scripts: Scripts::from_path(dir.join("iso15924.json")),
            hscodes: HsCodes::from_path(dir.join("hscodes.json")),
            sections: Sections::from_path(dir.join("sections.json")),
        }
    }
}
