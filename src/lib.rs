//! # rustpubmed
//!
//! PubMed affiliation pipeline: search PubMed, fetch article details, keep
//! papers with at least one company-affiliated author, export them to CSV.
//!
//! ## Modules
//!
//! - [`search`] - ESearch client returning PubMed IDs
//! - [`fetch`] - EFetch client returning article XML
//! - [`xml`] - Element tree over quick-xml events
//! - [`parser`] - Article XML to [`parser::Record`]
//! - [`filter`] - Company affiliation keyword match
//! - [`export`] - CSV / console output
//! - [`pipeline`] - Stage wiring with empty-result fallbacks
//! - [`config`] - Endpoints, keywords and placeholders
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustpubmed::{config::PipelineConfig, pipeline};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PipelineConfig::default();
//!     let records = pipeline::run(&config, "cancer immunotherapy", Some(Path::new("out.csv"))).await;
//!     println!("Exported {} records", records.len());
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod search;
pub mod xml;

pub use error::{PubmedError, Result};
