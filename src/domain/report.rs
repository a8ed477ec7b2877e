//! Trade-ledger aggregation and the performance report.

use crate::domain::trade::{Ledger, Side, TradeRecord};

/// Aggregate statistics over a completed ledger.
///
/// Long legs are paired in order: each buy opens a round trip, the next
/// sell closes it. Leg prices already carry fees, so round-trip P&L is
/// simply `sell.price - buy.price`. Short and cover legs are outside the
/// long-only pairing and are counted separately but not valued.
#[derive(Debug, Clone, PartialEq)]
pub struct TradingStats {
    pub round_trips: usize,
    pub wins: usize,
    pub losses: usize,
    pub break_evens: usize,
    pub gross_pnl: f64,
    pub avg_pnl: f64,
    pub open_position: bool,
    pub unpaired_legs: usize,
}

impl TradingStats {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut round_trips = 0usize;
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut break_evens = 0usize;
        let mut gross_pnl = 0.0f64;
        let mut unpaired_legs = 0usize;
        let mut entry: Option<&TradeRecord> = None;

        for trade in ledger {
            match trade.side() {
                Side::Buy if entry.is_none() => entry = Some(trade),
                Side::Sell => match entry.take() {
                    Some(open) => {
                        let pnl = trade.price() - open.price();
                        round_trips += 1;
                        gross_pnl += pnl;
                        if pnl > 0.0 {
                            wins += 1;
                        } else if pnl < 0.0 {
                            losses += 1;
                        } else {
                            break_evens += 1;
                        }
                    }
                    None => unpaired_legs += 1,
                },
                _ => unpaired_legs += 1,
            }
        }

        let avg_pnl = if round_trips > 0 {
            gross_pnl / round_trips as f64
        } else {
            0.0
        };

        TradingStats {
            round_trips,
            wins,
            losses,
            break_evens,
            gross_pnl,
            avg_pnl,
            open_position: entry.is_some(),
            unpaired_legs,
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.round_trips > 0 {
            self.wins as f64 / self.round_trips as f64
        } else {
            0.0
        }
    }

    /// Human-readable performance summary.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Trading report ===\n");
        out.push_str(&format!("Round trips:    {}\n", self.round_trips));
        out.push_str(&format!(
            "Won / lost:     {} / {} ({} break-even)\n",
            self.wins, self.losses, self.break_evens
        ));
        out.push_str(&format!("Win rate:       {:.1}%\n", self.win_rate() * 100.0));
        out.push_str(&format!("Gross P&L:      {:.4}\n", self.gross_pnl));
        out.push_str(&format!("Avg round trip: {:.4}\n", self.avg_pnl));
        if self.open_position {
            out.push_str("Open position:  yes (left open at range end)\n");
        }
        if self.unpaired_legs > 0 {
            out.push_str(&format!("Unpaired legs:  {}\n", self.unpaired_legs));
        }
        out
    }
}
