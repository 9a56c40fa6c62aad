//! Pipeline configuration and fixed constants.

/// E-utilities search endpoint
pub const ESEARCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi";

/// E-utilities fetch endpoint
pub const EFETCH_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Fixed ceiling on identifiers returned by a search
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Tool name reported to NCBI with every request
pub const TOOL_NAME: &str = "rustpubmed";

/// Case-insensitive substrings that mark an affiliation as commercial.
///
/// Organizational suffixes only; none may match a department name such as
/// "Pharmacology" or "Biotechnology", or a national lab.
pub const COMPANY_KEYWORDS: &[&str] = &[
    "pharmaceuticals",
    "pharma inc",
    "pharma ag",
    "pharma gmbh",
    "pharma ltd",
    "biotech inc",
    "biotech ltd",
    "inc.",
    "ltd",
    "llc",
    "corp.",
    "corporation",
    "gmbh",
    "company",
];

/// Title used when a record has none
pub const NO_TITLE: &str = "No Title";

/// Publication date used when a record has no completion year
pub const UNKNOWN_DATE: &str = "Unknown";

/// Placeholder for missing identifiers and the corresponding email column
pub const NOT_AVAILABLE: &str = "N/A";

/// Settings for a single pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Search endpoint URL
    pub esearch_url: String,
    /// Detail endpoint URL
    pub efetch_url: String,
    /// Maximum identifiers requested from the search endpoint
    pub max_results: usize,
    /// Keywords identifying company affiliations
    pub keywords: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            esearch_url: ESEARCH_URL.to_string(),
            efetch_url: EFETCH_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            keywords: COMPANY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}
