//! The mutation API exists for tests and for locally patching the
//! in-memory datasets; these tests mirror that usage.

use std::path::PathBuf;

use refcodes_core::{Countries, HsCodes, RefError, Subdivisions};

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

#[test]
fn add_entry() {
    let countries = Countries::from_path(data("iso3166-1.json"));
    assert_eq!(countries.get("alpha_2", "XK").unwrap(), None);

    countries
        .add_entry([
            ("alpha_2", "XK"),
            ("alpha_3", "XXK"),
            ("name", "Kosovo"),
            ("numeric", "926"),
        ])
        .unwrap();

    let kosovo = countries.get("alpha_2", "XK").unwrap().unwrap();
    let fields: Vec<(&str, &str)> = kosovo.iter().collect();
    assert_eq!(
        fields,
        [
            ("alpha_2", "XK"),
            ("alpha_3", "XXK"),
            ("name", "Kosovo"),
            ("numeric", "926"),
        ]
    );
    assert_eq!(countries.count().unwrap(), 6);
    // The new entry is reachable through every index and through lookup.
    assert_eq!(
        countries.lookup("kosovo").unwrap().field("alpha_2").unwrap(),
        "XK"
    );
}

#[test]
fn added_entries_join_fuzzy_ranking() {
    let hscodes = HsCodes::from_path(data("hscodes.json"));
    hscodes
        .add_entry([
            ("section", "XX"),
            ("hscode", "9999"),
            ("description", "Horses; artificial, for testing"),
            ("parent", "TOTAL"),
            ("level", "2"),
        ])
        .unwrap();

    let results = hscodes.search_fuzzy("horses").unwrap();
    assert!(results
        .iter()
        .any(|r| r.get("hscode") == Some("9999")));
}

#[test]
fn remove_entry() {
    let countries = Countries::from_path(data("iso3166-1.json"));
    assert!(countries.get("alpha_2", "DE").unwrap().is_some());

    countries.remove_entry("alpha_2", "DE").unwrap();

    assert_eq!(countries.get("alpha_2", "DE").unwrap(), None);
    assert_eq!(countries.count().unwrap(), 4);
    // The other records survive with intact indices.
    assert!(countries.get("alpha_2", "FR").unwrap().is_some());
    assert!(countries.get("name", "france").unwrap().is_some());
}

#[test]
fn remove_entry_miss_is_an_error() {
    let countries = Countries::from_path(data("iso3166-1.json"));
    assert!(matches!(
        countries.remove_entry("alpha_2", "ZZ"),
        Err(RefError::NotFound(_))
    ));
}

#[test]
fn remove_entry_on_unindexed_field_is_invalid() {
    let subdivisions = Subdivisions::from_path(data("iso3166-2.json"));
    // `name` is excluded from indexing for subdivisions; keying a removal
    // on it is a caller error, distinct from a miss.
    assert!(matches!(
        subdivisions.remove_entry("name", "Sachsen-Anhalt"),
        Err(RefError::InvalidQuery(_))
    ));
}

#[test]
fn clear_reverts_to_unloaded() {
    let countries = Countries::from_path(data("iso3166-1.json"));
    countries.remove_entry("alpha_2", "DE").unwrap();
    assert_eq!(countries.count().unwrap(), 4);

    countries.clear();

    // The next access re-parses the pristine file.
    assert!(countries.get("alpha_2", "DE").unwrap().is_some());
    assert_eq!(countries.count().unwrap(), 5);
    assert_eq!(countries.load_count(), 2);
}
