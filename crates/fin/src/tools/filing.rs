//! Filing text pipeline.

use std::fmt;

use fin_core::{CompanyInfo, FilingDataProvider, FilingForm, FilingInfo, FinError, Result};
use fin_edgar::filings::MAX_FILING_TEXT_CHARS;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::format::grouped;
use crate::request::FilingTextRequest;

/// Document body of one filing as far as it could be retrieved.
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentText {
    /// The filing lists no primary document.
    Missing,
    /// The document request failed.
    Failed(FinError),
    /// Cleaned text.
    Text {
        /// Markup-free text.
        text: String,
        /// True when cut at the character cap.
        truncated: bool,
    },
}

/// A filing with its document text.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedFiling {
    /// Filing metadata.
    pub filing: FilingInfo,
    /// Document body.
    pub document: DocumentText,
}

/// Fetches the primary document of every filing concurrently.
///
/// A document failure is kept on its filing rather than failing the request.
pub(crate) async fn fetch_documents(
    provider: &dyn FilingDataProvider,
    company: &CompanyInfo,
    filings: Vec<FilingInfo>,
) -> Vec<FetchedFiling> {
    join_all(filings.into_iter().map(|filing| async move {
        let document = if filing.primary_document.is_empty() {
            DocumentText::Missing
        } else {
            match provider.filing_text(company, &filing).await {
                Ok(doc) => DocumentText::Text {
                    text: doc.text,
                    truncated: doc.truncated,
                },
                Err(e) => {
                    warn!(
                        accession = %filing.accession_number,
                        error = %e,
                        "Could not retrieve filing document"
                    );
                    DocumentText::Failed(e)
                }
            }
        };
        FetchedFiling { filing, document }
    }))
    .await
}

/// Writes the fenced text block (or failure note) for one filing.
pub(crate) fn write_document(
    f: &mut fmt::Formatter<'_>,
    document: &DocumentText,
    truncation_note: &str,
) -> fmt::Result {
    match document {
        DocumentText::Missing => writeln!(f, "*No primary document available for this filing.*"),
        DocumentText::Failed(e) => writeln!(f, "*Could not retrieve filing document: {e}*"),
        DocumentText::Text { text, truncated } => {
            writeln!(f, "#### Filing Text")?;
            writeln!(f)?;
            writeln!(f, "```")?;
            writeln!(f, "{text}")?;
            writeln!(f, "```")?;
            if *truncated {
                writeln!(f)?;
                writeln!(
                    f,
                    "*Truncated to {} characters.{truncation_note}*",
                    grouped(MAX_FILING_TEXT_CHARS as u64)
                )?;
            }
            Ok(())
        }
    }
}

/// Recent filings of one form with their text.
#[derive(Clone, Debug, PartialEq)]
pub struct FilingTextReport {
    /// The filer.
    pub company: CompanyInfo,
    /// Requested form.
    pub form: FilingForm,
    /// Filings, newest first.
    pub filings: Vec<FetchedFiling>,
}

/// Lists the most recent filings of the requested form and fetches their text.
pub async fn filing_text(
    provider: &dyn FilingDataProvider,
    request: &FilingTextRequest,
) -> Result<FilingTextReport> {
    request.validate()?;
    let (company, filings) = provider
        .filings(&request.identifier, request.form, request.limit)
        .await?;
    debug!(ticker = %company.ticker, form = %request.form, count = filings.len(), "Fetching filing text");
    let filings = fetch_documents(provider, &company, filings).await;
    Ok(FilingTextReport {
        company,
        form: request.form,
        filings,
    })
}

impl fmt::Display for FilingTextReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let company = &self.company;
        if self.filings.is_empty() {
            writeln!(f, "## {} ({})", company.name, company.ticker)?;
            writeln!(f)?;
            return write!(f, "*No {} filings found.*", self.form);
        }

        writeln!(f, "## {} ({}) — {} Filing(s)", company.name, company.ticker, self.form)?;
        writeln!(f)?;

        for FetchedFiling { filing, document } in &self.filings {
            let description = if filing.primary_doc_description.is_empty() {
                &filing.primary_document
            } else {
                &filing.primary_doc_description
            };
            writeln!(f, "### {} — Filed {}", filing.form, filing.filing_date)?;
            writeln!(f)?;
            writeln!(f, "| Field | Value |")?;
            writeln!(f, "|-------|-------|")?;
            writeln!(f, "| Accession | {} |", filing.accession_number)?;
            writeln!(f, "| Report Date | {} |", filing.report_date)?;
            writeln!(f, "| Document | {description} |")?;
            if !filing.items.is_empty() {
                writeln!(f, "| Items | {} |", filing.items)?;
            }
            writeln!(f)?;
            write_document(f, document, " Full filing available at SEC EDGAR.")?;
            writeln!(f)?;
            writeln!(f, "---")?;
            writeln!(f)?;
        }

        write!(
            f,
            "*Data source: SEC EDGAR | {} filing(s) retrieved*",
            self.filings.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{StaticFilings, filing};

    #[tokio::test]
    async fn test_fetches_text_per_filing() {
        let provider = StaticFilings::new(vec![
            filing("0000320193-23-000106", "10-K", "", "aapl-20230930.htm"),
            filing("0000320193-22-000108", "10-K", "", "aapl-20220924.htm"),
        ]);
        let request = FilingTextRequest::new("AAPL", FilingForm::TenK).with_limit(2);

        let report = filing_text(&provider, &request).await.unwrap();
        assert_eq!(report.filings.len(), 2);
        assert!(matches!(
            &report.filings[0].document,
            DocumentText::Text { text, truncated: false } if text.contains("aapl-20230930.htm")
        ));

        let text = report.to_string();
        assert!(text.contains("## Apple Inc. (AAPL) — 10-K Filing(s)"));
        assert!(text.contains("| Accession | 0000320193-22-000108 |"));
        assert!(text.ends_with("*Data source: SEC EDGAR | 2 filing(s) retrieved*"));
    }

    #[tokio::test]
    async fn test_document_failure_is_kept_on_filing() {
        let provider = StaticFilings::new(vec![
            filing("A-1", "10-Q", "", "broken.htm"),
            filing("A-2", "10-Q", "", ""),
        ]);
        let request = FilingTextRequest::new("AAPL", FilingForm::TenQ).with_limit(2);

        let report = filing_text(&provider, &request).await.unwrap();
        assert!(matches!(report.filings[0].document, DocumentText::Failed(_)));
        assert_eq!(report.filings[1].document, DocumentText::Missing);

        let text = report.to_string();
        assert!(text.contains("*Could not retrieve filing document:"));
        assert!(text.contains("*No primary document available for this filing.*"));
    }

    #[tokio::test]
    async fn test_no_filings() {
        let provider = StaticFilings::new(Vec::new());
        let request = FilingTextRequest::new("AAPL", FilingForm::EightK);
        let text = filing_text(&provider, &request).await.unwrap().to_string();
        assert!(text.ends_with("*No 8-K filings found.*"));
    }
}
