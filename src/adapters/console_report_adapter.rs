//! Plain-text report adapter: stdout by default, a file when asked.

use std::fs;
use std::path::Path;

use crate::domain::error::VelatraderError;
use crate::domain::report::TradingStats;
use crate::domain::trade::Ledger;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct ConsoleReportAdapter;

impl ConsoleReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// The full report body: ledger listing followed by the summary.
    pub fn format(stats: &TradingStats, ledger: &Ledger) -> String {
        let mut out = String::new();
        out.push_str("=== Ledger ===\n");
        if ledger.is_empty() {
            out.push_str("(no trades)\n");
        } else {
            for trade in ledger {
                out.push_str(&trade.to_string());
                out.push('\n');
            }
        }
        out.push('\n');
        out.push_str(&stats.render());
        out
    }
}

impl ReportPort for ConsoleReportAdapter {
    fn write(
        &self,
        stats: &TradingStats,
        ledger: &Ledger,
        output_path: Option<&Path>,
    ) -> Result<(), VelatraderError> {
        let text = Self::format(stats, ledger);
        match output_path {
            Some(path) => fs::write(path, text)?,
            None => print!("{text}"),
        }
        Ok(())
    }
}
