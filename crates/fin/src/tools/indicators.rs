//! Macroeconomic indicator pipeline.

use std::fmt;

use fin_core::{MacroDataProvider, MacroIndicatorData, Result};
use fin_fred::COMMON_SERIES;
use tracing::debug;

use crate::format::decimal;
use crate::request::MacroRequest;

/// Characters of series notes included in the report.
pub const NOTES_CHARS: usize = 500;

/// Series metadata and observations.
#[derive(Clone, Debug, PartialEq)]
pub struct MacroReport {
    /// Provider payload.
    pub data: MacroIndicatorData,
}

impl MacroReport {
    /// Series notes cut at [`NOTES_CHARS`] characters.
    #[must_use]
    pub fn notes(&self) -> &str {
        let notes = self.data.series.notes.trim();
        notes
            .char_indices()
            .nth(NOTES_CHARS)
            .map_or(notes, |(idx, _)| &notes[..idx])
    }
}

/// Fetches series metadata and observations concurrently.
pub async fn macro_indicators(
    provider: &dyn MacroDataProvider,
    request: &MacroRequest,
) -> Result<MacroReport> {
    request.validate()?;
    debug!(
        series = %request.series_id,
        limit = request.query.limit,
        provider = provider.name(),
        "Fetching macro indicator"
    );
    let data = provider.indicator(&request.series_id, &request.query).await?;
    Ok(MacroReport { data })
}

impl fmt::Display for MacroReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let series = &self.data.series;
        let observations = &self.data.observations;

        writeln!(f, "## {}", series.title)?;
        writeln!(f)?;
        writeln!(f, "| Field | Value |")?;
        writeln!(f, "|-------|-------|")?;
        writeln!(f, "| Series ID | {} |", series.id)?;
        writeln!(f, "| Units | {} |", series.units)?;
        writeln!(f, "| Frequency | {} |", series.frequency)?;
        writeln!(f, "| Seasonal Adjustment | {} |", series.seasonal_adjustment)?;
        writeln!(f, "| Last Updated | {} |", series.last_updated)?;
        writeln!(f)?;

        if observations.is_empty() {
            writeln!(f, "*No observations found for the specified parameters.*")?;
        } else {
            writeln!(f, "### Observations ({} most recent)", observations.len())?;
            writeln!(f)?;
            writeln!(f, "| Date | Value |")?;
            writeln!(f, "|------|-------|")?;
            for obs in observations {
                let value = obs.value.map_or_else(|| "N/A".to_string(), decimal);
                writeln!(f, "| {} | {value} |", obs.date)?;
            }
        }

        let notes = self.notes();
        if !notes.is_empty() {
            writeln!(f)?;
            writeln!(f, "### Notes")?;
            writeln!(f, "{notes}")?;
        }

        let common: Vec<String> = COMMON_SERIES
            .iter()
            .map(|(alias, id)| format!("{alias}={id}"))
            .collect();
        writeln!(f)?;
        writeln!(f, "---")?;
        write!(f, "*Common FRED series: {}*", common.join(", "))
    }
}
