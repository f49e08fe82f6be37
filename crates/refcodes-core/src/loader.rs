// crates/refcodes-core/src/loader.rs

//! # Dataset loader
//!
//! Handles the physical layer (I/O, optional decompression) and parses the
//! dataset JSON into [`Record`]s.
//!
//! The on-disk contract is a single JSON document with one top-level key
//! (the dataset's root key, e.g. `"hscodes"` or `"3166-1"`) holding an
//! array of flat string→string objects. Nothing nested is interpreted
//! here; every key of every object becomes a record field verbatim.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{RefError, Result};
use crate::record::Record;

/// Opens a file, buffers it, and optionally wraps it in a gzip decoder.
/// Returns a generic reader so the caller doesn't care about compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        RefError::Io(std::io::Error::new(
            e.kind(),
            format!("dataset not found at {}: {e}", path.display()),
        ))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        use flate2::read::GzDecoder;
        if path.extension().is_some_and(|ext| ext == "gz") {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
        Ok(Box::new(reader))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}

/// Parse the dataset file and return the entries under `root_key` in file
/// order. Malformed JSON surfaces as [`RefError::Json`]; a well-formed file
/// without the expected root key as [`RefError::MissingRootKey`].
pub fn read_dataset(path: &Path, root_key: &str) -> Result<Vec<Record>> {
    let reader = open_stream(path)?;
    let mut doc: HashMap<String, Vec<IndexMap<String, String>>> =
        serde_json::from_reader(reader)?;

    let entries = doc
        .remove(root_key)
        .ok_or_else(|| RefError::MissingRootKey(root_key.to_string()))?;

    Ok(entries.into_iter().map(Record::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_entries_in_file_order() {
        let f = write_temp(
            r#"{"4217": [{"alpha_3": "EUR", "name": "Euro", "numeric": "978"},
                         {"alpha_3": "USD", "name": "US Dollar", "numeric": "840"}]}"#,
        );
        let records = read_dataset(f.path(), "4217").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("alpha_3").unwrap(), "EUR");
        assert_eq!(records[1].field("name").unwrap(), "US Dollar");
    }

    #[test]
    fn missing_root_key() {
        let f = write_temp(r#"{"4217": []}"#);
        let err = read_dataset(f.path(), "15924").unwrap_err();
        assert!(matches!(err, RefError::MissingRootKey(ref k) if k == "15924"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let f = write_temp("{not json");
        assert!(matches!(
            read_dataset(f.path(), "4217"),
            Err(RefError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_dataset(Path::new("/nonexistent/iso4217.json"), "4217").unwrap_err();
        assert!(matches!(err, RefError::Io(_)));
    }
}
