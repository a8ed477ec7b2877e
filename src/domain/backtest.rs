//! Long-only backtest runner.
//!
//! Drives a [`TradingSystem`] over a date window and books one
//! [`TradeRecord`] per executed leg. State machine: FLAT to LONG on a buy
//! signal, LONG to FLAT on a later sell signal; buy signals while LONG and
//! sell signals while FLAT are ignored. A position still open at the end of
//! the range is left open by default; `close_on_range_end` force-closes it
//! at the last in-range bar, except when the position was entered at that
//! same bar, since exits only happen at a later key than the entry.
//!
//! Fees are folded into the realized leg prices: entries pay
//! `price + fee_per_trade`, exits receive `price - fee_per_trade`.

use crate::domain::candle::PriceField;
use crate::domain::capital::CapitalPolicy;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;
use crate::domain::record::TradingHistory;
use crate::domain::system::{SignalKind, TradingSystem};
use crate::domain::trade::{Instrument, Ledger, Side, TradeRecord};

#[derive(Debug, Clone)]
pub struct BacktestParams {
    pub start: TradeDate,
    pub end: TradeDate,
    /// Per-leg commission in price units.
    pub fee_per_trade: f64,
    pub instrument: Instrument,
    pub price_field: PriceField,
    /// Force-close an open position at the last in-range bar, unless the
    /// entry itself was booked at that bar. Off by default: an open
    /// position at range end stays open.
    pub close_on_range_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionState {
    Flat,
    Long,
}

/// Run a long-only backtest of `system` over `history`.
///
/// Signals are generated once over the full history; only keys inside
/// `[params.start, params.end]` drive transitions. An inverted range is an
/// empty ledger, not an error. The capital policy is accepted for callers
/// that size positions on top of the ledger; the runner itself books
/// whole-position legs and does not read it.
pub fn run_long<S>(
    system: &S,
    history: &TradingHistory,
    params: &BacktestParams,
    _policy: &CapitalPolicy,
) -> Result<Ledger, VelatraderError>
where
    S: TradingSystem + ?Sized,
{
    let mut ledger = Ledger::new();
    if params.start > params.end || history.is_empty() {
        return Ok(ledger);
    }

    let buys = system.signals(SignalKind::Buy, history);
    let sells = system.signals(SignalKind::Sell, history);

    let fired = |map: &Option<crate::domain::record::SignalMap>, date: &TradeDate| {
        map.as_ref()
            .and_then(|m| m.get(date))
            .copied()
            .unwrap_or(false)
    };

    let mut state = PositionState::Flat;
    let mut last_bar: Option<(TradeDate, f64)> = None;

    for (date, record) in history.range(&params.start, &params.end) {
        let price = record.price(params.price_field);
        last_bar = Some((date.clone(), price));

        match state {
            PositionState::Flat => {
                if fired(&buys, date) {
                    ledger.push(TradeRecord::new(
                        price + params.fee_per_trade,
                        params.instrument,
                        date.clone(),
                        Side::Buy,
                        params.price_field,
                    ));
                    state = PositionState::Long;
                }
            }
            PositionState::Long => {
                if fired(&sells, date) {
                    ledger.push(TradeRecord::new(
                        price - params.fee_per_trade,
                        params.instrument,
                        date.clone(),
                        Side::Sell,
                        params.price_field,
                    ));
                    state = PositionState::Flat;
                }
            }
        }
    }

    if params.close_on_range_end && state == PositionState::Long {
        if let Some((date, price)) = last_bar {
            // An entry booked at the last bar has no later key to exit on.
            let entered_at_last_bar = ledger.last().is_some_and(|t| t.date() == &date);
            if !entered_at_last_bar {
                ledger.push(TradeRecord::new(
                    price - params.fee_per_trade,
                    params.instrument,
                    date,
                    Side::Sell,
                    params.price_field,
                ));
            }
        }
    }

    Ok(ledger)
}
