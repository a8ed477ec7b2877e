//! Moving-average crossover strategy.
//!
//! Buy fires at key *k* when the short simple moving average over closes
//! moves from at-or-below to above the long one, both evaluated on windows
//! ending at *k*. Keys before the first full long window (plus the prior
//! bar needed to observe the cross) stay `false`. Sell, short and cover are
//! not implemented by this strategy.

use crate::domain::candle::PriceField;
use crate::domain::error::VelatraderError;
use crate::domain::record::{SignalMap, TradingHistory};
use crate::domain::system::{blank_signals, SignalKind, TradingSystem};

#[derive(Debug, Clone)]
pub struct MovingAverageCross {
    short_window: usize,
    long_window: usize,
}

impl MovingAverageCross {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, VelatraderError> {
        if short_window == 0 || long_window == 0 || short_window >= long_window {
            return Err(VelatraderError::InvalidWindows {
                short: short_window,
                long: long_window,
            });
        }
        Ok(MovingAverageCross {
            short_window,
            long_window,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    fn sma(closes: &[f64], window: usize, end: usize) -> f64 {
        let slice = &closes[end + 1 - window..=end];
        slice.iter().sum::<f64>() / window as f64
    }
}

impl TradingSystem for MovingAverageCross {
    fn supports(&self, kind: SignalKind) -> bool {
        matches!(kind, SignalKind::Buy)
    }

    fn signals(&self, kind: SignalKind, history: &TradingHistory) -> Option<SignalMap> {
        if !self.supports(kind) {
            return None;
        }

        let closes = history.series(PriceField::Close);
        let mut map = blank_signals(history);

        for (i, (date, _)) in history.iter().enumerate() {
            // Both windows at i and at i-1 must be full to observe a cross.
            if i < self.long_window {
                continue;
            }
            let short_prev = Self::sma(&closes, self.short_window, i - 1);
            let long_prev = Self::sma(&closes, self.long_window, i - 1);
            let short_now = Self::sma(&closes, self.short_window, i);
            let long_now = Self::sma(&closes, self.long_window, i);

            if short_prev <= long_prev && short_now > long_now {
                map.insert(date.clone(), true);
            }
        }

        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::date::TradeDate;
    use crate::domain::record::{TimeFrame, TradingRecord};

    fn make_history(closes: &[f64]) -> TradingHistory {
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let day = (i + 1) as u32;
                TradingRecord {
                    date: TradeDate::from_ymd(2024, 1, day).unwrap(),
                    time_frame: TimeFrame::Daily,
                    candle: Candle::from_close(1, format!("2024-01-{day:02}"), close, "TEST"),
                    volume: 0.0,
                }
            })
            .collect();
        TradingHistory::from_records(records).unwrap()
    }

    fn fired_days(map: &SignalMap) -> Vec<u32> {
        map.iter()
            .filter(|&(_, &fired)| fired)
            .map(|(date, _)| date.date().format("%d").to_string().parse().unwrap())
            .collect()
    }

    #[test]
    fn rejects_degenerate_windows() {
        assert!(MovingAverageCross::new(0, 5).is_err());
        assert!(MovingAverageCross::new(5, 0).is_err());
        assert!(MovingAverageCross::new(5, 5).is_err());
        assert!(MovingAverageCross::new(10, 5).is_err());
        assert!(MovingAverageCross::new(5, 10).is_ok());
    }

    #[test]
    fn only_buy_is_supported() {
        let strategy = MovingAverageCross::new(2, 3).unwrap();
        assert!(strategy.supports(SignalKind::Buy));
        assert!(!strategy.supports(SignalKind::Sell));
        assert!(!strategy.supports(SignalKind::Short));
        assert!(!strategy.supports(SignalKind::Cover));

        let history = make_history(&[1.0, 2.0, 3.0, 4.0]);
        assert!(strategy.sell_signals(&history).is_none());
    }

    #[test]
    fn map_has_one_entry_per_key() {
        let strategy = MovingAverageCross::new(2, 3).unwrap();
        let history = make_history(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let map = strategy.buy_signals(&history).unwrap();
        assert_eq!(map.len(), history.len());
    }

    #[test]
    fn no_signal_before_warmup() {
        let strategy = MovingAverageCross::new(2, 4).unwrap();
        let history = make_history(&[1.0, 2.0, 3.0, 4.0]);
        let map = strategy.buy_signals(&history).unwrap();
        // Only 4 bars: index 4 never exists, so nothing can fire.
        assert!(map.values().all(|fired| !fired));
    }

    #[test]
    fn cross_up_fires_once() {
        // Downtrend keeps the short SMA below the long one, then a sharp
        // rally pushes it across.
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0, 5.0, 9.0, 12.0];
        let strategy = MovingAverageCross::new(2, 4).unwrap();
        let map = strategy.buy_signals(&make_history(&closes)).unwrap();
        assert_eq!(fired_days(&map), vec![7]);
    }

    #[test]
    fn monotonic_uptrend_never_crosses_again() {
        // Short SMA starts above and stays above: no at-or-below to above
        // transition is observable after warmup.
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let strategy = MovingAverageCross::new(2, 4).unwrap();
        let map = strategy.buy_signals(&make_history(&closes)).unwrap();
        assert!(map.values().all(|fired| !fired));
    }

    #[test]
    fn flat_series_never_fires() {
        let closes = [5.0; 10];
        let strategy = MovingAverageCross::new(3, 5).unwrap();
        let map = strategy.buy_signals(&make_history(&closes)).unwrap();
        assert!(map.values().all(|fired| !fired));
    }
}
