//! EFetch record parser.
//!
//! Turns a `PubmedArticleSet` document into [`Record`]s, keeping only
//! articles with at least one company-affiliated author.

use crate::config::{NOT_AVAILABLE, NO_TITLE, UNKNOWN_DATE};
use crate::error::Result;
use crate::filter::is_company_affiliation;
use crate::xml::{parse_document, XmlNode};
use serde::Serialize;
use tracing::debug;

/// A PubMed article with at least one company-affiliated author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// PubMed ID
    pub id: String,
    pub title: String,
    /// Completion year
    pub publication_date: String,
    /// Last names of all authors, in listed order
    pub authors: Vec<String>,
    /// Affiliations that matched a company keyword, deduplicated
    pub company_affiliations: Vec<String>,
    /// Always the placeholder; EFetch does not expose it reliably
    pub corresponding_email: String,
}

/// Author fields pulled from an `<Author>` element
#[derive(Debug)]
struct AuthorInfo {
    last_name: Option<String>,
    affiliation: Option<String>,
}

fn parse_author(author: &XmlNode) -> AuthorInfo {
    let last_name = author
        .child("LastName")
        .or_else(|| author.child("CollectiveName"))
        .and_then(XmlNode::non_empty_text);

    let affiliation = author
        .select("AffiliationInfo/Affiliation")
        .and_then(XmlNode::non_empty_text);

    AuthorInfo {
        last_name,
        affiliation,
    }
}

/// Build a record from one `<PubmedArticle>`, or `None` if no author qualifies
fn parse_article<K: AsRef<str>>(article: &XmlNode, keywords: &[K]) -> Option<Record> {
    let id = article
        .find("PMID")
        .and_then(XmlNode::non_empty_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let title = article
        .find("ArticleTitle")
        .and_then(XmlNode::non_empty_text)
        .unwrap_or_else(|| NO_TITLE.to_string());

    let publication_date = article
        .select("DateCompleted/Year")
        .and_then(XmlNode::non_empty_text)
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());

    let mut authors = Vec::new();
    let mut company_affiliations: Vec<String> = Vec::new();

    for author in article.descendants_named("Author").into_iter().map(parse_author) {
        if let Some(name) = author.last_name {
            authors.push(name);
        }
        if let Some(affiliation) = author.affiliation {
            if is_company_affiliation(&affiliation, keywords)
                && !company_affiliations.contains(&affiliation)
            {
                company_affiliations.push(affiliation);
            }
        }
    }

    if company_affiliations.is_empty() {
        debug!(id = %id, "No company affiliations, skipping");
        return None;
    }

    Some(Record {
        id,
        title,
        publication_date,
        authors,
        company_affiliations,
        corresponding_email: NOT_AVAILABLE.to_string(),
    })
}

/// Parse an EFetch XML document into records with company-affiliated authors.
///
/// # Errors
///
/// Returns error if the document is not well-formed XML. Missing fields
/// inside an article fall back to placeholders instead.
pub fn parse_records<K: AsRef<str>>(xml: &str, keywords: &[K]) -> Result<Vec<Record>> {
    let root = parse_document(xml)?;

    let articles: Vec<&XmlNode> = if root.name == "PubmedArticle" {
        vec![&root]
    } else {
        root.children_named("PubmedArticle").collect()
    };

    let records: Vec<Record> = articles
        .iter()
        .filter_map(|article| parse_article(article, keywords))
        .collect();

    debug!(
        articles = articles.len(),
        matched = records.len(),
        "Parsed EFetch document"
    );

    Ok(records)
}
