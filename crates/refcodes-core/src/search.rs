// crates/refcodes-core/src/search.rs

//! # Fuzzy search
//!
//! Multi-pass, priority-scored matching on top of the store. Each pass
//! awards points to a candidate's primary key; points accumulate across
//! passes and the final ranking is fully deterministic: descending by
//! total points, ascending by primary key among ties.
//!
//! The point values are heuristics tuned against the real datasets and
//! are part of the output contract — consumers depend on the ranking, so
//! the formulas are fixed:
//!
//! - exact structural lookup: 50
//! - exact match in a secondary collection: 49
//! - substring in a primary descriptive field: `max(5, 30 − 2·pos)`
//! - substring in a secondary field: `max(1, 5 − pos)`

use std::collections::HashMap;

use crate::datasets::{Countries, HsCodes, Subdivisions};
use crate::error::{RefError, Result};
use crate::record::Record;
use crate::store::Store;
use crate::text::{fold_key, fold_query};

/// Accumulates points per primary key and produces the deterministic
/// ranking.
struct ScoreBoard {
    points: HashMap<String, i32>,
}

impl ScoreBoard {
    fn new() -> Self {
        ScoreBoard {
            points: HashMap::new(),
        }
    }

    fn add(&mut self, key: &str, points: i32) {
        *self.points.entry(key.to_string()).or_insert(0) += points;
    }

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keys sorted by (descending points, ascending key). The key
    /// tie-break keeps equal-score results stable across runs.
    fn ranked(self) -> Vec<String> {
        let mut entries: Vec<(String, i32)> = self.points.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.into_iter().map(|(key, _)| key).collect()
    }
}

/// Substring points scaled by match position: earlier matches score
/// higher, clamped to `floor`.
fn position_points(haystack_folded: &str, query: &str, ceiling: i32, step: i32, floor: i32) -> Option<i32> {
    haystack_folded
        .find(query)
        .map(|pos| (ceiling - step * pos as i32).max(floor))
}

/// Resolve ranked primary keys back to their full records.
fn resolve(store: &Store, keys: Vec<String>) -> Result<Vec<Record>> {
    let field = store.config().key_field;
    keys.into_iter()
        .filter_map(|key| store.get(field, &key).transpose())
        .collect()
}

/// Run `lookup` as a scoring pass: a hit is worth 50 points, a miss is
/// silently skipped, anything else propagates.
fn lookup_pass(store: &Store, board: &mut ScoreBoard, query: &str) -> Result<()> {
    match store.lookup(query) {
        Ok(record) => {
            board.add(record.field(store.config().key_field)?, 50);
            Ok(())
        }
        Err(RefError::NotFound(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

impl Subdivisions {
    /// All subdivisions with a field value exactly equal to the query
    /// after folding. Values carrying alternatives separated by `;` match
    /// on each alternative.
    pub fn match_exact(&self, query: &str) -> Result<Vec<Record>> {
        let q = fold_query(query);
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| {
                record
                    .iter()
                    .any(|(_, v)| fold_key(v).split(';').any(|part| part == q))
            })
            .collect())
    }

    /// All subdivisions whose name contains the folded query.
    pub fn partial_match(&self, query: &str) -> Result<Vec<Record>> {
        let q = fold_query(query);
        Ok(self
            .records()?
            .into_iter()
            .filter(|record| record.get("name").is_some_and(|n| fold_key(n).contains(&q)))
            .collect())
    }

    /// Ranked fuzzy search over subdivisions: exact field matches score
    /// 50, partial name matches score by position.
    pub fn search_fuzzy(&self, query: &str) -> Result<Vec<Record>> {
        let q = fold_query(query);
        let mut board = ScoreBoard::new();

        for record in self.match_exact(&q)? {
            board.add(record.field("code")?, 50);
        }

        for record in self.partial_match(&q)? {
            let name = record.field("name")?;
            if let Some(points) = position_points(&fold_key(name), &q, 5, 1, 1) {
                board.add(record.field("code")?, points);
            }
        }

        if board.is_empty() {
            return Err(RefError::NotFound(query.to_string()));
        }
        resolve(self.store(), board.ranked())
    }
}

impl Countries {
    /// Ranked fuzzy search over countries.
    ///
    /// Subdivision names feed into the ranking of their owning country:
    /// an exact subdivision match is almost as strong as a direct country
    /// hit, a partial one is a weak signal. Pass order:
    ///
    /// 1. exact lookup on the query (codes, names): 50
    /// 2. exact subdivision matches → owning country: 49 each
    /// 3. substring in `name`/`official_name`/`comment` (first hit per
    ///    country): `max(5, 30 − 2·pos)`
    /// 4. partial subdivision name matches → owning country: `max(1, 5 − pos)`
    pub fn search_fuzzy(&self, query: &str, subdivisions: &Subdivisions) -> Result<Vec<Record>> {
        let q = fold_query(query);
        let mut board = ScoreBoard::new();

        lookup_pass(self.store(), &mut board, &q)?;

        for subdivision in subdivisions.match_exact(&q)? {
            board.add(&Subdivisions::country_code(&subdivision)?, 49);
        }

        for country in self.records()? {
            for field in ["name", "official_name", "comment"] {
                let Some(value) = country.get(field) else {
                    continue;
                };
                if let Some(points) = position_points(&fold_key(value), &q, 30, 2, 5) {
                    board.add(country.field("alpha_2")?, points);
                    break;
                }
            }
        }

        for subdivision in subdivisions.partial_match(&q)? {
            let name = subdivision.field("name")?;
            if let Some(points) = position_points(&fold_key(name), &q, 5, 1, 1) {
                board.add(&Subdivisions::country_code(&subdivision)?, points);
            }
        }

        if board.is_empty() {
            return Err(RefError::NotFound(query.to_string()));
        }
        resolve(self.store(), board.ranked())
    }
}

impl HsCodes {
    /// Ranked fuzzy search over HS codes: exact lookup 50, exact
    /// description match 49, description substring by position.
    pub fn search_fuzzy(&self, query: &str) -> Result<Vec<Record>> {
        let q = fold_query(query);
        let mut board = ScoreBoard::new();

        lookup_pass(self.store(), &mut board, &q)?;

        if let Some(record) = self.get("description", &q)? {
            board.add(record.field("hscode")?, 49);
        }

        for record in self.records()? {
            let Some(description) = record.get("description") else {
                continue;
            };
            if let Some(points) = position_points(&fold_key(description), &q, 30, 2, 5) {
                board.add(record.field("hscode")?, points);
            }
        }

        if board.is_empty() {
            return Err(RefError::NotFound(query.to_string()));
        }
        resolve(self.store(), board.ranked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoreboard_ranks_by_points_then_key() {
        let mut board = ScoreBoard::new();
        board.add("DE", 30);
        board.add("AT", 30);
        board.add("CH", 50);
        // Points accumulate across passes rather than taking the maximum.
        board.add("DE", 5);
        assert_eq!(board.ranked(), ["CH", "DE", "AT"]);
    }

    #[test]
    fn position_scaling_with_floor() {
        assert_eq!(position_points("horses; live", "horses", 30, 2, 5), Some(30));
        assert_eq!(position_points("live horses", "horses", 30, 2, 5), Some(20));
        // Deep matches clamp to the floor instead of going negative.
        let deep = format!("{}horses", "x".repeat(40));
        assert_eq!(position_points(&deep, "horses", 30, 2, 5), Some(5));
        assert_eq!(position_points("unrelated", "horses", 30, 2, 5), None);
    }
}
