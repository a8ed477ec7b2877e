//! The trading-system abstraction: strategies as signal generators.
//!
//! A strategy declares which signal kinds it implements via [`TradingSystem::supports`];
//! `signals` returns `None` for an unimplemented kind, which is distinct
//! from a map where nothing fired. Strategies are stateless across calls:
//! each invocation sees the full history and returns a fresh map.

use crate::domain::backtest::{self, BacktestParams};
use crate::domain::candle::PriceField;
use crate::domain::capital::CapitalPolicy;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;
use crate::domain::record::{SignalMap, TradingHistory, TradingRecord};
use crate::domain::trade::{Instrument, Ledger};

/// The four strategy actions a signal map can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Short,
    Cover,
}

/// A signal map with one `false` entry per history key. Strategies start
/// from this so the completeness contract holds even when nothing fires.
pub fn blank_signals(history: &TradingHistory) -> SignalMap {
    history.keys().map(|date| (date.clone(), false)).collect()
}

pub trait TradingSystem {
    /// Whether this strategy implements `kind` at all.
    fn supports(&self, kind: SignalKind) -> bool;

    /// Signal map for `kind` over the full history: exactly one entry per
    /// timestamp key, `false` unless the rule fired. `None` iff the
    /// strategy does not implement `kind`.
    ///
    /// A rule may look back over the history up to and including the
    /// current key, never forward.
    fn signals(&self, kind: SignalKind, history: &TradingHistory) -> Option<SignalMap>;

    fn buy_signals(&self, history: &TradingHistory) -> Option<SignalMap> {
        self.signals(SignalKind::Buy, history)
    }

    fn sell_signals(&self, history: &TradingHistory) -> Option<SignalMap> {
        self.signals(SignalKind::Sell, history)
    }

    fn short_signals(&self, history: &TradingHistory) -> Option<SignalMap> {
        self.signals(SignalKind::Short, history)
    }

    fn cover_signals(&self, history: &TradingHistory) -> Option<SignalMap> {
        self.signals(SignalKind::Cover, history)
    }

    /// Alternate input representation: an ordered sequence instead of a
    /// keyed history. Returns `None` when the kind is unsupported or the
    /// sequence contains duplicate keys.
    fn signals_from_sequence(
        &self,
        kind: SignalKind,
        records: &[TradingRecord],
    ) -> Option<SignalMap> {
        let history = TradingHistory::from_records(records.to_vec()).ok()?;
        self.signals(kind, &history)
    }

    /// Long-only backtest over `[start, end]`; see [`backtest::run_long`].
    #[allow(clippy::too_many_arguments)]
    fn run_long_backtest(
        &self,
        history: &TradingHistory,
        start: TradeDate,
        end: TradeDate,
        fee_per_trade: f64,
        policy: &CapitalPolicy,
        instrument: Instrument,
        price_field: PriceField,
    ) -> Result<Ledger, VelatraderError> {
        let params = BacktestParams {
            start,
            end,
            fee_per_trade,
            instrument,
            price_field,
            close_on_range_end: false,
        };
        backtest::run_long(self, history, &params, policy)
    }
}
