//! Report output port trait.

use std::path::Path;

use crate::domain::error::VelatraderError;
use crate::domain::report::TradingStats;
use crate::domain::trade::Ledger;

/// Port for writing backtest reports. `output_path = None` means the
/// adapter's default sink (typically stdout).
pub trait ReportPort {
    fn write(
        &self,
        stats: &TradingStats,
        ledger: &Ledger,
        output_path: Option<&Path>,
    ) -> Result<(), VelatraderError>;
}
