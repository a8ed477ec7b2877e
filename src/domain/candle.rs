//! OHLC candle bars and the arena that owns them.
//!
//! A candle may carry sub-candles, a finer time frame nested inside the
//! bar. Sub-candles live in a [`CandleArena`] and are referenced by index,
//! so one sub-frame can be shared by several parents without deep copies.

use crate::domain::error::VelatraderError;

/// Which OHLC component a price is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Open,
    Low,
    High,
    Close,
}

impl std::str::FromStr for PriceField {
    type Err = VelatraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "low" => Ok(PriceField::Low),
            "high" => Ok(PriceField::High),
            "close" => Ok(PriceField::Close),
            _ => Err(VelatraderError::UnknownPriceField { name: s.into() }),
        }
    }
}

/// Index of a candle inside a [`CandleArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandleId(pub usize);

#[derive(Debug, Clone)]
pub struct Candle {
    pub record_id: u32,
    /// Unique timestamp key within the source series.
    pub key: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub label: String,
    pub sub_candles: Vec<CandleId>,
}

impl Candle {
    pub fn new(
        record_id: u32,
        key: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        label: impl Into<String>,
    ) -> Self {
        Candle {
            record_id,
            key: key.into(),
            open,
            high,
            low,
            close,
            label: label.into(),
            sub_candles: Vec::new(),
        }
    }

    /// A bar from a close-only series: all four fields carry the close.
    pub fn from_close(record_id: u32, key: impl Into<String>, close: f64, label: impl Into<String>) -> Self {
        Candle::new(record_id, key, close, close, close, close, label)
    }

    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::Low => self.low,
            PriceField::High => self.high,
            PriceField::Close => self.close,
        }
    }

    /// Opt-in sanity check: `low <= open, close <= high`. Construction is
    /// permissive; callers decide whether a malformed bar is fatal.
    pub fn validate_ohlc(&self) -> Result<(), VelatraderError> {
        let in_range = |p: f64| self.low <= p && p <= self.high;
        if in_range(self.open) && in_range(self.close) {
            Ok(())
        } else {
            Err(VelatraderError::InvalidOhlc {
                label: self.label.clone(),
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            })
        }
    }
}

/// Owns every candle of a run; sub-candle links are indices into it.
#[derive(Debug, Clone, Default)]
pub struct CandleArena {
    candles: Vec<Candle>,
}

impl CandleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candle: Candle) -> CandleId {
        let id = CandleId(self.candles.len());
        self.candles.push(candle);
        id
    }

    pub fn get(&self, id: CandleId) -> Option<&Candle> {
        self.candles.get(id.0)
    }

    /// Link `child` as a sub-candle of `parent`. Returns `false` when either
    /// index is out of bounds.
    pub fn attach_sub_candle(&mut self, parent: CandleId, child: CandleId) -> bool {
        if child.0 >= self.candles.len() {
            return false;
        }
        match self.candles.get_mut(parent.0) {
            Some(candle) => {
                candle.sub_candles.push(child);
                true
            }
            None => false,
        }
    }

    /// Resolved sub-candles of `id`, in attachment order.
    pub fn sub_candles(&self, id: CandleId) -> Vec<&Candle> {
        match self.get(id) {
            Some(parent) => parent
                .sub_candles
                .iter()
                .filter_map(|child| self.get(*child))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
