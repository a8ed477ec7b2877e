//! Data ingestion port trait.
//!
//! Ingestion collaborators materialize raw tabular records into the keyed
//! history the core consumes; the port guarantees unique keys and a total
//! date order by construction of [`TradingHistory`].

use std::path::Path;

use crate::domain::candle::Candle;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;
use crate::domain::record::{TimeFrame, TradingHistory, TradingRecord};

/// One row of a two-instrument spread file: a date and both closes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadRow {
    pub date: TradeDate,
    pub close_a: f64,
    pub close_b: f64,
}

pub trait DataPort {
    /// Load a spread file (`date close_a close_b` rows).
    fn load_spread(&self, path: &Path) -> Result<Vec<SpreadRow>, VelatraderError>;

    /// Load an OHLC file (`date,open,high,low,close,volume` rows).
    fn load_ohlc(&self, path: &Path) -> Result<TradingHistory, VelatraderError>;
}

/// Build a daily close-only history from the `close_a` leg of a spread.
pub fn spread_to_history(
    rows: &[SpreadRow],
    label: &str,
) -> Result<TradingHistory, VelatraderError> {
    let mut history = TradingHistory::new();
    for (i, row) in rows.iter().enumerate() {
        let key = row
            .date
            .raw()
            .map(str::to_owned)
            .unwrap_or_else(|| row.date.to_string());
        history.insert(TradingRecord {
            date: row.date.clone(),
            time_frame: TimeFrame::Daily,
            candle: Candle::from_close((i + 1) as u32, key, row.close_a, label),
            volume: 0.0,
        })?;
    }
    Ok(history)
}
