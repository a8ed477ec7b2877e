//! Executed trade legs and the append-only ledger.

use std::fmt;

use crate::domain::candle::PriceField;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;

/// Tradeable instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Bbva,
    San,
    Tef,
    Idr,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ticker = match self {
            Instrument::Bbva => "BBVA",
            Instrument::San => "SAN",
            Instrument::Tef => "TEF",
            Instrument::Idr => "IDR",
        };
        write!(f, "{ticker}")
    }
}

impl std::str::FromStr for Instrument {
    type Err = VelatraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BBVA" => Ok(Instrument::Bbva),
            "SAN" => Ok(Instrument::San),
            "TEF" => Ok(Instrument::Tef),
            "IDR" => Ok(Instrument::Idr),
            _ => Err(VelatraderError::UnknownInstrument { name: s.into() }),
        }
    }
}

/// Direction of an executed leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
    Short,
    Cover,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
            Side::Short => "short",
            Side::Cover => "cover",
        };
        write!(f, "{name}")
    }
}

/// One executed leg of a strategy. Immutable once constructed; fields are
/// only settable through `new`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    price: f64,
    instrument: Instrument,
    date: TradeDate,
    side: Side,
    price_field: PriceField,
}

impl TradeRecord {
    pub fn new(
        price: f64,
        instrument: Instrument,
        date: TradeDate,
        side: Side,
        price_field: PriceField,
    ) -> Self {
        TradeRecord {
            price,
            instrument,
            date,
            side,
            price_field,
        }
    }

    /// Average realized price of the leg, fees folded in.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    pub fn date(&self) -> &TradeDate {
        &self.date
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price_field(&self) -> PriceField {
        self.price_field
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{date}  {side:<5}  {instrument}  {price:.4}",
            date = self.date,
            side = self.side.to_string(),
            instrument = self.instrument,
            price = self.price,
        )
    }
}

/// Append-only, timestamp-ordered sequence of executed legs.
///
/// The backtest runner appends legs as it walks the history, so pushes
/// arrive in date order; the ledger never reorders or removes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    trades: Vec<TradeRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, trade: TradeRecord) {
        self.trades.push(trade);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TradeRecord> {
        self.trades.get(index)
    }

    pub fn last(&self) -> Option<&TradeRecord> {
        self.trades.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradeRecord> {
        self.trades.iter()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a TradeRecord;
    type IntoIter = std::slice::Iter<'a, TradeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
