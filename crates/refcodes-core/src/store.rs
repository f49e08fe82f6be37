// crates/refcodes-core/src/store.rs

//! # Indexed record store
//!
//! The generic, lazily-loaded record store that every dataset (countries,
//! subdivisions, currencies, scripts, languages, HS codes) is a
//! configuration of.
//!
//! Lifecycle: `Unloaded → Loading → Loaded`. A store is constructed cheap
//! and stays unloaded until the first access (`get`, `lookup`, `records`,
//! `count`), at which point the whole dataset file is parsed and all
//! indices are built. The write half of the internal `RwLock` doubles as
//! the load lock: concurrent first-accesses never double-parse. Once
//! loaded, reads take the shared lock and never mutate, so unlimited
//! concurrent readers are fine. `Loaded → Unloaded` only via [`Store::clear`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::{RefError, Result};
use crate::loader::read_dataset;
use crate::record::Record;
use crate::text::fold_key;
use crate::translations::read_catalog;

/// Static description of one dataset: where its entries live in the JSON
/// document and how they are indexed. Each concrete dataset is one of
/// these plus a thin wrapper type, not a subtype of the store.
#[derive(Clone, Copy, Debug)]
pub struct DatasetConfig {
    /// Human-readable entry name, used in diagnostics ("Country", "HSCode").
    pub name: &'static str,
    /// Top-level JSON key holding the entry array (e.g. "3166-1").
    pub root_key: &'static str,
    /// Primary key field: unique per record, used as the fuzzy-search
    /// accumulator key and tie-break.
    pub key_field: &'static str,
    /// Fields deliberately excluded from indexing (long free text,
    /// ambiguous columns). `lookup` falls back to a linear scan over these.
    pub no_index: &'static [&'static str],
}

impl DatasetConfig {
    fn is_indexed(&self, field: &str) -> bool {
        !self.no_index.contains(&field)
    }
}

/// Everything that exists only in the `Loaded` state.
struct LoadedData {
    records: Vec<Record>,
    /// field name → folded value → position in `records`.
    indices: HashMap<String, HashMap<String, usize>>,
    /// language → canonical value → localized string, parsed once per language.
    catalogs: HashMap<String, HashMap<String, String>>,
    /// language → folded localized string → position in `records`.
    language_indices: HashMap<String, HashMap<String, usize>>,
}

/// A lazily-loaded, indexed collection of [`Record`]s for one dataset file.
pub struct Store {
    config: DatasetConfig,
    path: PathBuf,
    catalog_dir: Option<PathBuf>,
    inner: RwLock<Option<LoadedData>>,
    loads: AtomicUsize,
}

impl Store {
    pub fn new(config: DatasetConfig, path: impl Into<PathBuf>) -> Self {
        Store {
            config,
            path: path.into(),
            catalog_dir: None,
            inner: RwLock::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Attach a directory of per-language translation catalogs
    /// (`<dir>/<lang>.json`). Without one, language-aware lookups simply
    /// never match.
    pub fn with_catalog_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.catalog_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// How many times this store has parsed its dataset file. Stays flat
    /// across repeated reads; grows only on first access after
    /// construction or [`Store::clear`].
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    // -----------------------------------------------------------------------
    // Lazy load
    // -----------------------------------------------------------------------

    /// Parse the dataset file and build every index. All-or-nothing: on
    /// failure nothing is retained and the store stays `Unloaded`.
    fn load_data(&self) -> Result<LoadedData> {
        let records = read_dataset(&self.path, self.config.root_key)?;

        let mut indices: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            index_record(&self.config, &mut indices, record, pos);
        }

        log::info!(
            "loaded {} {} records from {}",
            records.len(),
            self.config.name,
            self.path.display()
        );

        Ok(LoadedData {
            records,
            indices,
            catalogs: HashMap::new(),
            language_indices: HashMap::new(),
        })
    }

    /// Run `f` against the loaded data, loading first if needed.
    fn with_loaded<T>(&self, f: impl FnOnce(&LoadedData) -> T) -> Result<T> {
        {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(data) = guard.as_ref() {
                return Ok(f(data));
            }
        }
        // Unloaded: take the write lock, which acts as the load lock. All
        // concurrent first-accesses block here; exactly one performs the
        // parse (double-checked after acquisition).
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(self.load_data()?);
            self.loads.fetch_add(1, Ordering::Relaxed);
        }
        Ok(f(guard.as_ref().expect("store loaded above")))
    }

    /// Like [`Store::with_loaded`] but with mutable access. Only the
    /// mutation API and the catalog cache go through here; these assume a
    /// single quiesced writer.
    fn with_loaded_mut<T>(&self, f: impl FnOnce(&DatasetConfig, &mut LoadedData) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            *guard = Some(self.load_data()?);
            self.loads.fetch_add(1, Ordering::Relaxed);
        }
        f(&self.config, guard.as_mut().expect("store loaded above"))
    }

    /// Make sure the catalogs and overlay indices for `languages` are
    /// cached, then run `f`. The fast path (everything cached, or no
    /// languages requested) goes through the shared lock.
    fn with_languages<T>(
        &self,
        languages: &[&str],
        f: impl FnOnce(&LoadedData) -> T,
    ) -> Result<T> {
        if languages.is_empty() {
            return self.with_loaded(f);
        }
        {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(data) = guard.as_ref() {
                if languages.iter().all(|l| data.catalogs.contains_key(*l)) {
                    return Ok(f(data));
                }
            }
        }
        let catalog_dir = self.catalog_dir.clone();
        self.with_loaded_mut(|config, data| {
            for lang in languages {
                if data.catalogs.contains_key(*lang) {
                    continue;
                }
                let catalog = match &catalog_dir {
                    Some(dir) => read_catalog(dir, lang)?,
                    None => HashMap::new(),
                };
                let overlay = build_language_index(config, data, &catalog);
                data.language_indices.insert((*lang).to_string(), overlay);
                data.catalogs.insert((*lang).to_string(), catalog);
            }
            Ok(f(data))
        })
    }

    // -----------------------------------------------------------------------
    // Read API
    // -----------------------------------------------------------------------

    /// Look up the record whose `field` equals `value` (case- and
    /// accent-insensitive). This is the "maybe" accessor: a miss is
    /// `Ok(None)`, never an error. Only loading itself can fail.
    pub fn get(&self, field: &str, value: &str) -> Result<Option<Record>> {
        self.get_localized(field, value, &[])
    }

    /// [`Store::get`] with a translation-overlay fallback: when the field
    /// index misses, the overlay indices for `languages` are consulted in
    /// the order given.
    pub fn get_localized(
        &self,
        field: &str,
        value: &str,
        languages: &[&str],
    ) -> Result<Option<Record>> {
        let folded = fold_key(value);
        self.with_languages(languages, |data| {
            if let Some(pos) = data.indices.get(field).and_then(|idx| idx.get(&folded)) {
                return Some(data.records[*pos].clone());
            }
            for lang in languages {
                if let Some(pos) = data
                    .language_indices
                    .get(*lang)
                    .and_then(|idx| idx.get(&folded))
                {
                    return Some(data.records[*pos].clone());
                }
            }
            None
        })
    }

    /// Look up a record by value alone, trying every primary index, then
    /// the requested languages, then a linear scan over the no-index
    /// fields. This is the "must succeed" accessor: a total miss is
    /// [`RefError::NotFound`].
    pub fn lookup(&self, value: &str) -> Result<Record> {
        self.lookup_localized(value, &[])
    }

    pub fn lookup_localized(&self, value: &str, languages: &[&str]) -> Result<Record> {
        let folded = fold_key(value);
        let found = self.with_languages(languages, |data| {
            // Exact matches against every primary index first. Field order
            // is fixed (sorted) so collisions across indices resolve
            // deterministically.
            let mut fields: Vec<&String> = data.indices.keys().collect();
            fields.sort();
            for field in fields {
                if let Some(pos) = data.indices[field].get(&folded) {
                    return Some(data.records[*pos].clone());
                }
            }
            for lang in languages {
                if let Some(pos) = data
                    .language_indices
                    .get(*lang)
                    .and_then(|idx| idx.get(&folded))
                {
                    return Some(data.records[*pos].clone());
                }
            }
            // Slow path: the fields deliberately kept out of the indices.
            for record in &data.records {
                for field in self.config.no_index {
                    if record.get(field).is_some_and(|v| fold_key(v) == folded) {
                        return Some(record.clone());
                    }
                }
            }
            None
        })?;
        found.ok_or_else(|| RefError::NotFound(value.to_string()))
    }

    /// Snapshot of all records in insertion order, triggering load if
    /// needed. Repeated calls after load never re-parse.
    pub fn records(&self) -> Result<Vec<Record>> {
        self.with_loaded(|data| data.records.clone())
    }

    /// Total record count, triggering load if needed.
    pub fn count(&self) -> Result<usize> {
        self.with_loaded(|data| data.records.len())
    }

    // -----------------------------------------------------------------------
    // Mutation API — for tests and local patching of the in-memory
    // dataset, not a write-heavy store. Single writer, quiesced access.
    // -----------------------------------------------------------------------

    /// Construct a record from `fields` and append it, updating every
    /// relevant index. No uniqueness check: a key collision with an
    /// existing record follows the same last-write-wins rule as load time.
    pub fn add_entry<I, K, V>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let record = Record::from_pairs(fields);
        self.with_loaded_mut(|config, data| {
            let pos = data.records.len();
            index_record(config, &mut data.indices, &record, pos);
            data.records.push(record);
            rebuild_language_indices(config, data);
            Ok(())
        })
    }

    /// Remove the record whose `field` equals `value`. A miss is a raised
    /// [`RefError::NotFound`] (unlike `get`); a criterion on a field the
    /// dataset excludes from indexing is [`RefError::InvalidQuery`].
    pub fn remove_entry(&self, field: &str, value: &str) -> Result<()> {
        let folded = fold_key(value);
        self.with_loaded_mut(|config, data| {
            if !config.is_indexed(field) {
                return Err(RefError::InvalidQuery(format!(
                    "field {field:?} is not indexed in the {} dataset",
                    config.name
                )));
            }
            let pos = data
                .indices
                .get(field)
                .and_then(|idx| idx.get(&folded))
                .copied()
                .ok_or_else(|| RefError::NotFound(format!("{field}={value}")))?;

            data.records.remove(pos);

            // Positions after the removed record shifted; rebuild all
            // indices in full rather than patching them.
            data.indices.clear();
            for (pos, record) in data.records.iter().enumerate() {
                index_record(config, &mut data.indices, record, pos);
            }
            rebuild_language_indices(config, data);
            Ok(())
        })
    }

    /// Drop all records and indices and revert to `Unloaded`. The next
    /// access re-parses the dataset file.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

/// Insert one record into every index it belongs in. On a duplicate
/// (field, folded value) pair the later-inserted record wins; the
/// collision is a known data-quality issue in the upstream datasets and
/// is logged, never raised.
fn index_record(
    config: &DatasetConfig,
    indices: &mut HashMap<String, HashMap<String, usize>>,
    record: &Record,
    pos: usize,
) {
    for (field, value) in record.iter() {
        if !config.is_indexed(field) {
            continue;
        }
        let index = indices.entry(field.to_string()).or_default();
        if index.insert(fold_key(value), pos).is_some() {
            log::debug!(
                "{} {value:?} already taken in index {field:?} and will be \
                 overridden; this is a duplicate in the source dataset",
                config.name
            );
        }
    }
}

/// Build the overlay index for one catalog: resolve each canonical value
/// through the primary indices and key the owning record by the folded
/// localized string.
fn build_language_index(
    config: &DatasetConfig,
    data: &LoadedData,
    catalog: &HashMap<String, String>,
) -> HashMap<String, usize> {
    let mut overlay = HashMap::new();
    let mut fields: Vec<&String> = data.indices.keys().collect();
    fields.sort();
    for (canonical, localized) in catalog {
        let folded_canonical = fold_key(canonical);
        let pos = fields
            .iter()
            .find_map(|field| data.indices[*field].get(&folded_canonical));
        let Some(pos) = pos else {
            log::debug!(
                "translation {localized:?} refers to unknown {} value {canonical:?}",
                config.name
            );
            continue;
        };
        if overlay.insert(fold_key(localized), *pos).is_some() {
            log::debug!(
                "translated value {localized:?} is ambiguous in the {} overlay",
                config.name
            );
        }
    }
    overlay
}

/// Re-derive every cached language overlay after a mutation.
fn rebuild_language_indices(config: &DatasetConfig, data: &mut LoadedData) {
    let catalogs = std::mem::take(&mut data.catalogs);
    data.language_indices.clear();
    for (lang, catalog) in &catalogs {
        let overlay = build_language_index(config, data, catalog);
        data.language_indices.insert(lang.clone(), overlay);
    }
    data.catalogs = catalogs;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CURRENCIES: DatasetConfig = DatasetConfig {
        name: "Currency",
        root_key: "4217",
        key_field: "alpha_3",
        no_index: &[],
    };

    fn currency_store() -> (tempfile::NamedTempFile, Store) {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"{"4217": [
                {"alpha_3": "EUR", "name": "Euro", "numeric": "978"},
                {"alpha_3": "USD", "name": "US Dollar", "numeric": "840"},
                {"alpha_3": "ARS", "name": "Argentine Peso", "numeric": "032"}
            ]}"#,
        )
        .unwrap();
        let store = Store::new(CURRENCIES, f.path());
        (f, store)
    }

    #[test]
    fn get_is_case_insensitive_and_never_fails_on_miss() {
        let (_f, store) = currency_store();
        let euro = store.get("alpha_3", "eur").unwrap().unwrap();
        assert_eq!(euro.field("name").unwrap(), "Euro");
        assert_eq!(store.get("alpha_3", "XXX").unwrap(), None);
        assert_eq!(store.get("nonexistent_field", "EUR").unwrap(), None);
    }

    #[test]
    fn lookup_tries_every_index_then_errors() {
        let (_f, store) = currency_store();
        assert_eq!(
            store.lookup("argentine peso").unwrap().field("alpha_3").unwrap(),
            "ARS"
        );
        assert_eq!(store.lookup("840").unwrap().field("alpha_3").unwrap(), "USD");
        assert!(matches!(store.lookup("Doubloon"), Err(RefError::NotFound(_))));
    }

    #[test]
    fn load_happens_once() {
        let (_f, store) = currency_store();
        assert_eq!(store.load_count(), 0);
        assert_eq!(store.count().unwrap(), 3);
        let _ = store.records().unwrap();
        let _ = store.get("alpha_3", "EUR").unwrap();
        assert_eq!(store.load_count(), 1);
        store.clear();
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.load_count(), 2);
    }

    #[test]
    fn failed_load_leaves_store_unloaded() {
        let store = Store::new(CURRENCIES, "/nonexistent/iso4217.json");
        assert!(store.count().is_err());
        assert_eq!(store.load_count(), 0);
    }

    #[test]
    fn add_and_remove_roundtrip() {
        let (_f, store) = currency_store();
        store
            .add_entry([("alpha_3", "XTS"), ("name", "Testing Unit"), ("numeric", "963")])
            .unwrap();
        assert_eq!(store.count().unwrap(), 4);
        let xts = store.get("alpha_3", "XTS").unwrap().unwrap();
        assert_eq!(
            format!("{xts:?}"),
            r#"Record(alpha_3="XTS", name="Testing Unit", numeric="963")"#
        );

        store.remove_entry("alpha_3", "XTS").unwrap();
        assert_eq!(store.get("alpha_3", "XTS").unwrap(), None);
        assert!(matches!(
            store.remove_entry("alpha_3", "XTS"),
            Err(RefError::NotFound(_))
        ));
    }

    #[test]
    fn remove_rebuilds_indices() {
        let (_f, store) = currency_store();
        store.remove_entry("alpha_3", "EUR").unwrap();
        assert_eq!(store.count().unwrap(), 2);
        // The survivors are still reachable through every index.
        assert_eq!(store.get("numeric", "032").unwrap().unwrap().field("alpha_3").unwrap(), "ARS");
        assert_eq!(store.get("name", "us dollar").unwrap().unwrap().field("alpha_3").unwrap(), "USD");
    }

    #[test]
    fn duplicate_index_key_last_write_wins() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"{"4217": [
                {"alpha_3": "AAA", "name": "Duplicated"},
                {"alpha_3": "BBB", "name": "Duplicated"}
            ]}"#,
        )
        .unwrap();
        let store = Store::new(CURRENCIES, f.path());
        let hit = store.get("name", "duplicated").unwrap().unwrap();
        assert_eq!(hit.field("alpha_3").unwrap(), "BBB");
    }

    #[test]
    fn localized_get_consults_overlay_after_primary() {
        let dir = tempfile::tempdir().unwrap();
        let mut cat = std::fs::File::create(dir.path().join("de.json")).unwrap();
        cat.write_all(br#"{"Euro": "Euro", "US Dollar": "US-Dollar"}"#).unwrap();

        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(
            br#"{"4217": [
                {"alpha_3": "EUR", "name": "Euro"},
                {"alpha_3": "USD", "name": "US Dollar"}
            ]}"#,
        )
        .unwrap();
        let store = Store::new(CURRENCIES, f.path()).with_catalog_dir(dir.path());

        assert_eq!(store.get("name", "US-Dollar").unwrap(), None);
        let usd = store.get_localized("name", "US-Dollar", &["de"]).unwrap().unwrap();
        assert_eq!(usd.field("alpha_3").unwrap(), "USD");
        let usd = store.lookup_localized("us-dollar", &["de"]).unwrap();
        assert_eq!(usd.field("alpha_3").unwrap(), "USD");
    }
}
