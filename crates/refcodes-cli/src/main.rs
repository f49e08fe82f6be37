//! refcodes — command-line interface for refcodes-core
//!
//! This binary resolves human-entered identifiers against the bundled
//! reference datasets from your terminal: country codes and names,
//! currencies, country subdivisions, and Harmonized System commodity
//! codes with their hierarchy.
//!
//! Usage examples
//! --------------
//!
//! - Show dataset sizes
//!   $ refcodes stats
//!
//! - Resolve a country by any code or name (case-insensitive)
//!   $ refcodes country de
//!   $ refcodes country deu
//!   $ refcodes --languages=de country Deutschland
//!
//! - Ranked fuzzy search
//!   $ refcodes search "new zeland"
//!   $ refcodes hs-search horses
//!
//! - Walk the HS taxonomy
//!   $ refcodes hs 010121
//!   $ refcodes children 01
//!
//! Datasets are read from `--data-dir` (default `databases/`), the JSON
//! bundle produced by the upstream data-preparation pipeline.

mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use refcodes_core::{DatasetDir, Record};

fn print_record(record: &Record) {
    for (name, value) in record.iter() {
        println!("  {name}: {value}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let languages: Vec<String> = args
        .languages
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

    let datasets = DatasetDir::open(&args.data_dir);

    match args.command {
        Commands::Stats => {
            println!("Dataset sizes:");
            println!("  Countries: {}", datasets.countries.count()?);
            println!("  Historic countries: {}", datasets.historic_countries.count()?);
            println!("  Subdivisions: {}", datasets.subdivisions.count()?);
            println!("  Currencies: {}", datasets.currencies.count()?);
            println!("  Languages: {}", datasets.languages.count()?);
            println!("  Language families: {}", datasets.language_families.count()?);
            println!("  Scripts: {}", datasets.scripts.count()?);
            println!("  HS codes: {}", datasets.hscodes.count()?);
            println!("  HS sections: {}", datasets.sections.count()?);
        }

        Commands::Country { query } => {
            let record = datasets
                .countries
                .lookup_localized(&query, &languages)
                .with_context(|| format!("no country matches {query:?}"))?;
            print_record(&record);
        }

        Commands::Search { query } => {
            let results = datasets
                .countries
                .search_fuzzy(&query, &datasets.subdivisions)
                .with_context(|| format!("nothing matches {query:?}"))?;
            for record in results.iter().take(10) {
                println!(
                    "{} ({})",
                    record.get("name").unwrap_or("?"),
                    record.get("alpha_2").unwrap_or("?")
                );
            }
        }

        Commands::Subdivisions { iso2 } => {
            for record in datasets.subdivisions.for_country(&iso2)? {
                println!(
                    "{} {}",
                    record.get("code").unwrap_or("?"),
                    record.get("name").unwrap_or("?")
                );
            }
        }

        Commands::Currency { query } => {
            let record = datasets
                .currencies
                .lookup_localized(&query, &languages)
                .with_context(|| format!("no currency matches {query:?}"))?;
            print_record(&record);
        }

        Commands::Hs { code } => {
            let chain = datasets.hscodes.get_hierarchy(&code)?;
            if chain.is_empty() {
                anyhow::bail!("unknown HS code {code:?}");
            }
            for (depth, record) in chain.iter().enumerate() {
                println!(
                    "{}{} {}",
                    "  ".repeat(depth),
                    record.get("hscode").unwrap_or("?"),
                    record.get("description").unwrap_or("")
                );
            }
        }

        Commands::Children { code } => {
            for record in datasets.hscodes.get_children(&code)? {
                println!(
                    "{} {}",
                    record.get("hscode").unwrap_or("?"),
                    record.get("description").unwrap_or("")
                );
            }
        }

        Commands::HsSearch { query } => {
            let results = datasets
                .hscodes
                .search_fuzzy(&query)
                .with_context(|| format!("nothing matches {query:?}"))?;
            for record in results.iter().take(10) {
                println!(
                    "{} {}",
                    record.get("hscode").unwrap_or("?"),
                    record.get("description").unwrap_or("")
                );
            }
        }
    }

    Ok(())
}
