//! Stock quote and price history pipeline.

use std::fmt;

use fin_core::{PriceDataProvider, PricePoint, Result, StockData};
use tracing::debug;

use crate::format::{self, grouped, market_cap, signed};
use crate::request::StockRequest;

/// Bars shown in the recent price table.
pub const RECENT_POINTS: usize = 10;

/// Summary of closing prices over the requested range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodStats {
    /// Highest close.
    pub high: f64,
    /// Lowest close.
    pub low: f64,
    /// First to last close change in percent; `None` when the first close is zero.
    pub return_pct: Option<f64>,
    /// Number of bars.
    pub points: usize,
}

impl PeriodStats {
    /// Stats over `history` (oldest first), `None` when it is empty.
    #[must_use]
    pub fn from_history(history: &[PricePoint]) -> Option<Self> {
        let first = history.first()?.close;
        let last = history.last()?.close;
        let (high, low) = history
            .iter()
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(hi, lo), p| {
                (hi.max(p.close), lo.min(p.close))
            });
        let return_pct = (first != 0.0).then(|| (last - first) / first * 100.0);
        Some(Self {
            high,
            low,
            return_pct,
            points: history.len(),
        })
    }
}

/// Quote, period stats and recent bars for one ticker.
#[derive(Clone, Debug, PartialEq)]
pub struct StockReport {
    /// Provider payload.
    pub data: StockData,
}

impl StockReport {
    /// Stats over the full history.
    #[must_use]
    pub fn period_stats(&self) -> Option<PeriodStats> {
        PeriodStats::from_history(&self.data.history)
    }

    /// The last [`RECENT_POINTS`] bars, oldest first.
    #[must_use]
    pub fn recent(&self) -> &[PricePoint] {
        let history = &self.data.history;
        &history[history.len().saturating_sub(RECENT_POINTS)..]
    }
}

/// Fetches the quote and history for the requested ticker.
pub async fn stock_data(
    provider: &dyn PriceDataProvider,
    request: &StockRequest,
) -> Result<StockReport> {
    request.validate()?;
    debug!(
        symbol = %request.symbol,
        range = %request.range,
        interval = %request.interval,
        provider = provider.name(),
        "Fetching stock data"
    );
    let data = provider
        .stock_data(&request.symbol, request.range, request.interval)
        .await?;
    Ok(StockReport { data })
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for StockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = &self.data.quote;
        let range = self.data.range;
        let interval = self.data.interval;

        writeln!(f, "## {} ({})", quote.name, quote.ticker)?;
        writeln!(f)?;
        writeln!(f, "### Current Quote")?;
        writeln!(f)?;
        writeln!(f, "| Metric | Value |")?;
        writeln!(f, "|--------|-------|")?;
        writeln!(f, "| Price | ${:.2} |", quote.price)?;
        writeln!(
            f,
            "| Change | {} ({}%) |",
            signed(quote.change),
            signed(quote.change_percent)
        )?;
        writeln!(
            f,
            "| Market Cap | {} |",
            quote.market_cap.map_or_else(|| "N/A".to_string(), market_cap)
        )?;
        writeln!(f, "| P/E (TTM) | {} |", ratio(quote.pe_ratio))?;
        writeln!(f, "| Forward P/E | {} |", ratio(quote.forward_pe))?;
        writeln!(
            f,
            "| Dividend Yield | {} |",
            quote
                .dividend_yield
                .filter(|y| *y != 0.0)
                .map_or_else(|| "N/A".to_string(), |y| format!("{:.2}%", y * 100.0))
        )?;
        writeln!(f, "| 52W High | ${:.2} |", quote.fifty_two_week_high)?;
        writeln!(f, "| 52W Low | ${:.2} |", quote.fifty_two_week_low)?;
        writeln!(f, "| Avg Volume | {} |", grouped(quote.avg_volume))?;
        writeln!(f, "| Beta | {} |", ratio(quote.beta))?;
        writeln!(f)?;

        if let Some(stats) = self.period_stats() {
            writeln!(f, "### Price History ({range}, {interval} interval)")?;
            writeln!(f)?;
            writeln!(f, "| Metric | Value |")?;
            writeln!(f, "|--------|-------|")?;
            writeln!(f, "| Period High | ${:.2} |", stats.high)?;
            writeln!(f, "| Period Low | ${:.2} |", stats.low)?;
            writeln!(
                f,
                "| Period Return | {} |",
                stats
                    .return_pct
                    .map_or_else(|| format::MISSING.to_string(), |r| format!("{}%", signed(r)))
            )?;
            writeln!(f, "| Data Points | {} |", stats.points)?;
            writeln!(f)?;

            let recent = self.recent();
            writeln!(f, "### Recent Price Data (last {} points)", recent.len())?;
            writeln!(f)?;
            writeln!(f, "| Date | Open | High | Low | Close | Volume |")?;
            writeln!(f, "|------|------|------|-----|-------|--------|")?;
            for p in recent {
                writeln!(
                    f,
                    "| {} | ${:.2} | ${:.2} | ${:.2} | ${:.2} | {} |",
                    p.date,
                    p.open,
                    p.high,
                    p.low,
                    p.close,
                    grouped(p.volume)
                )?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "*Data source: Yahoo Finance | Period: {range} | Interval: {interval}*"
        )
    }
}
