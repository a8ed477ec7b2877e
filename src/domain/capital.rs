//! Capital-management policy handed to the backtest runner.
//!
//! The runner takes the policy by reference but does not interpret it: the
//! long-only engine books whole-position legs and leaves sizing to whatever
//! sits on top. The fields exist so callers have somewhere explicit to put
//! their sizing configuration instead of ambient state.

#[derive(Debug, Clone, PartialEq)]
pub struct CapitalPolicy {
    /// Fraction of capital committed per entry.
    pub position_fraction: f64,
    pub max_positions: usize,
}

impl Default for CapitalPolicy {
    fn default() -> Self {
        CapitalPolicy {
            position_fraction: 1.0,
            max_positions: 1,
        }
    }
}
