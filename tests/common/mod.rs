//! Shared fixtures for integration tests.

use velatrader::domain::candle::Candle;
use velatrader::domain::date::TradeDate;
use velatrader::domain::record::{SignalMap, TimeFrame, TradingHistory, TradingRecord};
use velatrader::domain::system::{blank_signals, SignalKind, TradingSystem};

pub fn date(day: u32) -> TradeDate {
    TradeDate::from_ymd(2024, 1, day).unwrap()
}

pub fn make_record(day: u32, close: f64) -> TradingRecord {
    TradingRecord {
        date: date(day),
        time_frame: TimeFrame::Daily,
        candle: Candle::from_close(1, format!("2024-01-{day:02}"), close, "TEST"),
        volume: 0.0,
    }
}

/// History of daily closes starting at 2024-01-01.
pub fn make_history(closes: &[f64]) -> TradingHistory {
    let records = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_record((i + 1) as u32, close))
        .collect();
    TradingHistory::from_records(records).unwrap()
}

/// Strategy scripted with explicit fire days.
pub struct Scripted {
    pub buy_days: Vec<u32>,
    pub sell_days: Vec<u32>,
}

impl TradingSystem for Scripted {
    fn supports(&self, kind: SignalKind) -> bool {
        matches!(kind, SignalKind::Buy | SignalKind::Sell)
    }

    fn signals(&self, kind: SignalKind, history: &TradingHistory) -> Option<SignalMap> {
        let days = match kind {
            SignalKind::Buy => &self.buy_days,
            SignalKind::Sell => &self.sell_days,
            _ => return None,
        };
        let mut map = blank_signals(history);
        for (d, _) in history.iter() {
            let day: u32 = d.date().format("%d").to_string().parse().unwrap();
            if days.contains(&day) {
                map.insert(d.clone(), true);
            }
        }
        Some(map)
    }
}
