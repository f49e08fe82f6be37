// crates/refcodes-core/src/translations.rs

//! # Translation catalogs
//!
//! Optional per-language message catalogs: `<catalog_dir>/<lang>.json`, a
//! flat JSON object mapping canonical field values to localized strings
//! (e.g. `{"Germany": "Deutschland"}`).
//!
//! The store turns a catalog into a secondary index (folded localized
//! string → record) which is consulted after the primary indices on
//! `get`/`lookup` calls that request languages. Catalogs are parsed once
//! per language and cached for the store's lifetime.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::loader::open_stream;

/// Parse the catalog for `lang`, returning canonical → localized pairs.
///
/// A missing catalog file is not an error: languages are best-effort
/// overlays and a `get` must never fail on a miss. The caller caches the
/// empty map so the file is only probed once.
pub fn read_catalog(dir: &Path, lang: &str) -> Result<HashMap<String, String>> {
    let path = dir.join(format!("{lang}.json"));
    if !path.is_file() {
        log::debug!("no translation catalog for {lang:?} at {}", path.display());
        return Ok(HashMap::new());
    }
    let reader = open_stream(&path)?;
    let catalog: HashMap<String, String> = serde_json::from_reader(reader)?;
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("de.json")).unwrap();
        f.write_all(br#"{"Germany": "Deutschland", "France": "Frankreich"}"#)
            .unwrap();

        let catalog = read_catalog(dir.path(), "de").unwrap();
        assert_eq!(catalog.get("Germany").map(String::as_str), Some("Deutschland"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = read_catalog(dir.path(), "xx").unwrap();
        assert!(catalog.is_empty());
    }
}
