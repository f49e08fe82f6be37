// crates/refcodes-core/src/hierarchy.rs

//! # Hierarchy traversal
//!
//! Parent/child relations between records of the same dataset.
//!
//! HS codes form a strict tree: chapter (`level` "2") → heading ("4") →
//! subheading ("6"), linked by the `parent` field and rooted at the
//! sentinel code `"TOTAL"`. Subdivisions are bidirectional: a
//! subdivision's `parent` points at another subdivision of the same
//! country, while the owning country is a direct field lookup into the
//! countries store.
//!
//! Everything here goes through the stores' public operations only.

use std::collections::HashSet;

use crate::datasets::{Countries, HsCodes, Subdivisions};
use crate::error::Result;
use crate::record::Record;

/// Sentinel `parent` value marking a top-level HS chapter.
pub const HS_ROOT: &str = "TOTAL";

const LEVEL_CHAPTER: &str = "2";
const LEVEL_HEADING: &str = "4";
const LEVEL_SUBHEADING: &str = "6";

/// Level classifiers for HS code records. Pure functions of the `level`
/// field; a record without one is none of the three.
pub trait HsLevel {
    fn level(&self) -> Option<&str>;

    fn is_chapter(&self) -> bool {
        self.level() == Some(LEVEL_CHAPTER)
    }

    fn is_heading(&self) -> bool {
        self.level() == Some(LEVEL_HEADING)
    }

    fn is_subheading(&self) -> bool {
        self.level() == Some(LEVEL_SUBHEADING)
    }
}

impl HsLevel for Record {
    fn level(&self) -> Option<&str> {
        self.get("level")
    }
}

impl HsCodes {
    /// All codes at a given depth ("2", "4" or "6"), in dataset order.
    pub fn get_by_level(&self, level: &str) -> Result<Vec<Record>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.get("level") == Some(level))
            .collect())
    }

    /// All direct children of `parent_code`, in dataset order.
    pub fn get_children(&self, parent_code: &str) -> Result<Vec<Record>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.get("parent") == Some(parent_code))
            .collect())
    }

    /// The full chain from chapter down to `code`, root first. An unknown
    /// starting code yields an empty chain rather than an error. The walk
    /// stops at the sentinel root, at a parent that does not resolve, or
    /// when a code repeats (a cyclic parent chain is a data defect, not a
    /// reason to spin).
    pub fn get_hierarchy(&self, code: &str) -> Result<Vec<Record>> {
        let mut chain = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut current = self.get("hscode", code)?;
        while let Some(record) = current {
            if let Some(own_code) = record.get("hscode") {
                if !seen.insert(own_code.to_string()) {
                    log::debug!("cyclic parent chain detected at HS code {own_code:?}");
                    break;
                }
            }
            let parent = record.get("parent").map(str::to_string);
            chain.insert(0, record);
            current = match parent.as_deref() {
                Some(p) if p != HS_ROOT && !p.is_empty() => self.get("hscode", p)?,
                _ => None,
            };
        }

        Ok(chain)
    }
}

impl Subdivisions {
    /// The country part of a subdivision code ("DE-ST" → "DE").
    pub fn country_code(record: &Record) -> Result<String> {
        let code = record.field("code")?;
        Ok(code.split('-').next().unwrap_or(code).to_string())
    }

    /// The full parent subdivision code, if any. Datasets write the
    /// parent both with and without the country prefix; normalize to the
    /// prefixed form ("DE-ST", not "ST").
    pub fn parent_code(record: &Record) -> Result<Option<String>> {
        let Some(parent) = record.get("parent") else {
            return Ok(None);
        };
        let country = Self::country_code(record)?;
        if parent.split('-').next() == Some(country.as_str()) {
            Ok(Some(parent.to_string()))
        } else {
            Ok(Some(format!("{country}-{parent}")))
        }
    }

    /// Resolve the parent subdivision, if the record declares one and it
    /// exists in this store.
    pub fn parent(&self, record: &Record) -> Result<Option<Record>> {
        match Self::parent_code(record)? {
            Some(code) => self.get("code", &code),
            None => Ok(None),
        }
    }

    /// Resolve the owning country in the given countries store.
    pub fn country(&self, record: &Record, countries: &Countries) -> Result<Option<Record>> {
        let code = Self::country_code(record)?;
        countries.get("alpha_2", &code)
    }

    /// All subdivisions of one country, in dataset order. An unknown
    /// country simply has no subdivisions.
    pub fn for_country(&self, alpha_2: &str) -> Result<Vec<Record>> {
        let wanted = alpha_2.to_uppercase();
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| {
                r.get("code")
                    .and_then(|c| c.split('-').next())
                    .is_some_and(|c| c == wanted)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_classifiers() {
        let chapter = Record::from_pairs([("hscode", "01"), ("level", "2")]);
        let heading = Record::from_pairs([("hscode", "0101"), ("level", "4")]);
        let subheading = Record::from_pairs([("hscode", "010121"), ("level", "6")]);
        let section = Record::from_pairs([("section", "I")]);

        assert!(chapter.is_chapter() && !chapter.is_heading() && !chapter.is_subheading());
        assert!(heading.is_heading());
        assert!(subheading.is_subheading());
        assert!(!section.is_chapter() && !section.is_heading() && !section.is_subheading());
    }

    #[test]
    fn subdivision_codes() {
        let plain = Record::from_pairs([("code", "DE-ST"), ("name", "Sachsen-Anhalt")]);
        assert_eq!(Subdivisions::country_code(&plain).unwrap(), "DE");
        assert_eq!(Subdivisions::parent_code(&plain).unwrap(), None);

        let bare_parent = Record::from_pairs([("code", "AL-BU"), ("parent", "09")]);
        assert_eq!(
            Subdivisions::parent_code(&bare_parent).unwrap().as_deref(),
            Some("AL-09")
        );

        let prefixed_parent = Record::from_pairs([("code", "AL-BU"), ("parent", "AL-09")]);
        assert_eq!(
            Subdivisions::parent_code(&prefixed_parent).unwrap().as_deref(),
            Some("AL-09")
        );
    }
}
