//! Submissions metadata, filing lists and document text cleanup.

use fin_core::{Cik, CompanyInfo, FilingForm, FilingInfo, FinError, Result};
use regex::Regex;
use serde::Deserialize;

use crate::client::{ARCHIVES_URL, PROVIDER};

/// Character cap applied to cleaned filing text.
pub const MAX_FILING_TEXT_CHARS: usize = 30_000;

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company submissions/filings metadata.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submissions {
    /// Company name
    #[serde(default)]
    pub name: Option<String>,
    /// Entity name, used when `name` is absent
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Listed tickers, primary first
    #[serde(default)]
    pub tickers: Vec<Option<String>>,
    /// List of exchanges
    #[serde(default)]
    pub exchanges: Vec<Option<String>>,
    /// SIC code
    #[serde(default)]
    pub sic: Option<String>,
    /// SIC description
    #[serde(default)]
    pub sic_description: Option<String>,
    /// Filing history
    #[serde(default)]
    pub filings: FilingHistory,
}

/// Filing history block of a submissions document.
#[derive(Debug, Default, Deserialize)]
pub struct FilingHistory {
    /// Most recent filings, column-oriented
    #[serde(default)]
    pub recent: RecentFilings,
}

/// Column-oriented recent filings. Column `i` of every vector describes filing `i`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    form: Vec<Option<String>>,
    #[serde(default)]
    accession_number: Vec<Option<String>>,
    #[serde(default)]
    filing_date: Vec<Option<String>>,
    #[serde(default)]
    report_date: Vec<Option<String>>,
    #[serde(default)]
    primary_document: Vec<Option<String>>,
    #[serde(default)]
    primary_doc_description: Vec<Option<String>>,
    #[serde(default)]
    items: Vec<Option<String>>,
}

fn column(values: &[Option<String>], i: usize) -> String {
    values.get(i).cloned().flatten().unwrap_or_default()
}

impl Submissions {
    /// Builds company info for `cik`.
    ///
    /// The primary ticker falls back to `fallback_ticker` when the company
    /// lists none.
    #[must_use]
    pub fn company_info(&self, cik: Cik, fallback_ticker: &str) -> CompanyInfo {
        let ticker = self
            .tickers
            .iter()
            .flatten()
            .find(|t| !t.is_empty())
            .map_or(fallback_ticker, String::as_str)
            .to_uppercase();
        CompanyInfo {
            cik,
            ticker,
            name: self
                .name
                .clone()
                .or_else(|| self.entity_name.clone())
                .unwrap_or_default(),
            sic: self.sic.clone().unwrap_or_default(),
            sic_description: self.sic_description.clone().unwrap_or_default(),
            exchanges: self.exchanges.iter().flatten().cloned().collect(),
        }
    }

    /// The `limit` most recent filings of `form`, newest first.
    #[must_use]
    pub fn recent_filings(&self, form: FilingForm, limit: usize) -> Vec<FilingInfo> {
        let recent = &self.filings.recent;
        recent
            .form
            .iter()
            .enumerate()
            .filter(|(_, f)| f.as_deref() == Some(form.as_str()))
            .take(limit)
            .map(|(i, _)| {
                let filing_date = column(&recent.filing_date, i);
                let report_date = column(&recent.report_date, i);
                FilingInfo {
                    accession_number: column(&recent.accession_number, i),
                    report_date: if report_date.is_empty() {
                        filing_date.clone()
                    } else {
                        report_date
                    },
                    filing_date,
                    form: form.as_str().to_string(),
                    primary_document: column(&recent.primary_document, i),
                    primary_doc_description: column(&recent.primary_doc_description, i),
                    items: column(&recent.items, i),
                }
            })
            .collect()
    }
}

/// Archive URL of a filing's primary document.
pub fn document_url(cik: Cik, filing: &FilingInfo) -> Result<String> {
    if filing.primary_document.is_empty() {
        return Err(FinError::NotFound(format!(
            "primary document for filing {}",
            filing.accession_number
        )));
    }
    Ok(format!(
        "{ARCHIVES_URL}/{}/{}/{}",
        cik.value(),
        filing.accession_number.replace('-', ""),
        filing.primary_document
    ))
}

// =============================================================================
// Markup Stripping
// =============================================================================

/// Converts HTML filing documents to plain text.
#[derive(Debug)]
pub struct MarkupStripper {
    style: Regex,
    script: Regex,
    tag: Regex,
    entity: Regex,
    whitespace: Regex,
}

impl MarkupStripper {
    /// Compiles the stripping patterns.
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                FinError::upstream(PROVIDER, format!("invalid markup pattern {pattern}: {e}"))
            })
        };
        Ok(Self {
            style: compile(r"(?is)<style[^>]*>.*?</style>")?,
            script: compile(r"(?is)<script[^>]*>.*?</script>")?,
            tag: compile(r"<[^>]+>")?,
            entity: compile(r"&#?\w+;")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Drops style and script blocks, replaces tags with spaces, decodes the
    /// common entities, blanks the rest and collapses whitespace.
    #[must_use]
    pub fn strip(&self, html: &str) -> String {
        let text = self.style.replace_all(html, "");
        let text = self.script.replace_all(&text, "");
        let text = self.tag.replace_all(&text, " ");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"");
        let text = self.entity.replace_all(&text, " ");
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }
}

/// Cuts `text` to at most `max_chars` characters.
///
/// Returns the text and whether anything was removed.
#[must_use]
pub fn truncate_chars(text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut text = text;
            text.truncate(byte_idx);
            (text, true)
        }
        None => (text, false),
    }
}
