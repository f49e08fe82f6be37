// crates/refcodes-core/src/record.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RefError, Result};

/// One dataset row: a country, a currency, an HS code, etc.
///
/// A record is a flexible set of named string fields. The field set is
/// fixed by the dataset entry it was parsed from; no field is guaranteed
/// to exist beyond what the dataset guarantees. Field insertion order is
/// preserved and used when enumerating via [`Record::iter`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new(fields: IndexMap<String, String>) -> Self {
        Record { fields }
    }

    /// Build a record from (name, value) pairs, preserving their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Record {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Field value, or [`RefError::MissingField`] when the record does not
    /// carry the field.
    pub fn field(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RefError::MissingField(name.to_string()))
    }

    /// Field value as an `Option`, for callers that treat absence as normal.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set or overwrite a field in place. Used during construction and by
    /// derived fields; records are immutable by convention afterwards.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All (name, value) pairs in field-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Debug for Record {
    /// Deterministic representation: fields sorted alphabetically by name,
    /// so snapshots do not depend on dataset column order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<(&str, &str)> = self.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        write!(f, "Record(")?;
        for (i, (k, v)) in sorted.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v:?}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn germany() -> Record {
        Record::from_pairs([
            ("name", "Germany"),
            ("alpha_2", "DE"),
            ("alpha_3", "DEU"),
        ])
    }

    #[test]
    fn field_access() {
        let r = germany();
        assert_eq!(r.field("alpha_2").unwrap(), "DE");
        assert!(matches!(
            r.field("foo"),
            Err(RefError::MissingField(ref n)) if n == "foo"
        ));
        assert_eq!(r.get("foo"), None);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let r = germany();
        let names: Vec<&str> = r.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["name", "alpha_2", "alpha_3"]);
    }

    #[test]
    fn debug_repr_is_sorted() {
        let r = germany();
        assert_eq!(
            format!("{r:?}"),
            r#"Record(alpha_2="DE", alpha_3="DEU", name="Germany")"#
        );
    }

    #[test]
    fn set_overwrites() {
        let mut r = germany();
        r.set("name", "Bundesrepublik Deutschland");
        assert_eq!(r.field("name").unwrap(), "Bundesrepublik Deutschland");
        assert_eq!(r.len(), 3);
    }
}
