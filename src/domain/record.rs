//! Trading records and the ordered keyed history.

use std::collections::BTreeMap;

use crate::domain::candle::{Candle, PriceField};
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;

/// Bar resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFrame {
    Weekly,
    Daily,
    Hourly,
    Min30,
    Min15,
    Min10,
    Min5,
    Min1,
    Sec1,
}

/// One timestamped trading observation.
#[derive(Debug, Clone)]
pub struct TradingRecord {
    pub date: TradeDate,
    pub time_frame: TimeFrame,
    pub candle: Candle,
    pub volume: f64,
}

impl TradingRecord {
    pub fn price(&self, field: PriceField) -> f64 {
        self.candle.price(field)
    }
}

/// Per-timestamp boolean flags: did a strategy action fire.
pub type SignalMap = BTreeMap<TradeDate, bool>;

/// Time-ordered collection of trading records, one per unique timestamp.
#[derive(Debug, Clone, Default)]
pub struct TradingHistory {
    records: BTreeMap<TradeDate, TradingRecord>,
}

impl TradingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record keyed by its date. Duplicate timestamps are rejected.
    pub fn insert(&mut self, record: TradingRecord) -> Result<(), VelatraderError> {
        if self.records.contains_key(&record.date) {
            return Err(VelatraderError::DuplicateKey {
                key: record.date.to_string(),
            });
        }
        self.records.insert(record.date.clone(), record);
        Ok(())
    }

    /// Build a history from an ordered sequence of records.
    pub fn from_records(records: Vec<TradingRecord>) -> Result<Self, VelatraderError> {
        let mut history = TradingHistory::new();
        for record in records {
            history.insert(record)?;
        }
        Ok(history)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, date: &TradeDate) -> Option<&TradingRecord> {
        self.records.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TradeDate, &TradingRecord)> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TradeDate> {
        self.records.keys()
    }

    pub fn first_date(&self) -> Option<&TradeDate> {
        self.records.keys().next()
    }

    pub fn last_date(&self) -> Option<&TradeDate> {
        self.records.keys().next_back()
    }

    /// Records with dates in `[start, end]`, in date order. An inverted
    /// range yields nothing.
    pub fn range<'a>(
        &'a self,
        start: &TradeDate,
        end: &TradeDate,
    ) -> impl Iterator<Item = (&'a TradeDate, &'a TradingRecord)> {
        let bounds = if start <= end {
            Some(start.clone()..=end.clone())
        } else {
            None
        };
        bounds.into_iter().flat_map(move |b| self.records.range(b))
    }

    /// Ordered price series for one OHLC field.
    pub fn series(&self, field: PriceField) -> Vec<f64> {
        self.records.values().map(|r| r.price(field)).collect()
    }
}
