use clap::{Parser, Subcommand};

/// CLI arguments for refcodes
#[derive(Debug, Parser)]
#[command(
    name = "refcodes",
    version,
    about = "CLI for querying the ISO and Harmonized System reference datasets"
)]
pub struct CliArgs {
    /// Directory holding the dataset JSON files (iso3166-1.json, hscodes.json, ...)
    #[arg(short = 'd', long = "data-dir", global = true, default_value = "databases")]
    pub data_dir: String,

    /// Optional comma-separated language codes for translated lookups (e.g. de,fr)
    #[arg(short = 'l', long = "languages", global = true)]
    pub languages: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show record counts for every dataset
    Stats,

    /// Resolve a country by any code or name (e.g. DE, DEU, Germany)
    Country {
        /// Code or name, case-insensitive
        query: String,
    },

    /// Ranked fuzzy search over countries (subdivision names count too)
    Search {
        /// Free-text query
        query: String,
    },

    /// List all subdivisions of a country
    Subdivisions {
        /// ISO2 code of the country
        iso2: String,
    },

    /// Resolve a currency by code, number or name
    Currency {
        /// Code or name (e.g. EUR, 978, Euro)
        query: String,
    },

    /// Show an HS code with its full chapter/heading/subheading chain
    Hs {
        /// HS code (e.g. 010121)
        code: String,
    },

    /// List the direct children of an HS code
    Children {
        /// Parent HS code (e.g. 01)
        code: String,
    },

    /// Ranked fuzzy search over HS code descriptions
    HsSearch {
        /// Free-text query (e.g. "horses")
        query: String,
    },
}
