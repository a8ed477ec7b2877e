//! CSV/whitespace file data adapter.
//!
//! Two on-disk formats are supported: two-instrument spread files
//! (`date close_a close_b`, whitespace or comma separated, one header line)
//! and OHLC files (`date,open,high,low,close,volume`). Dates go through
//! [`TradeDate::parse`], so any of its accepted formats work.

use std::fs;
use std::path::Path;

use crate::domain::candle::Candle;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;
use crate::domain::record::{TimeFrame, TradingHistory, TradingRecord};
use crate::ports::data_port::{DataPort, SpreadRow};

#[derive(Debug, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    fn sniff_delimiter(content: &str) -> u8 {
        let first_line = content.lines().next().unwrap_or("");
        if first_line.contains(',') {
            b','
        } else if first_line.contains('\t') {
            b'\t'
        } else {
            b' '
        }
    }

    fn read_file(path: &Path) -> Result<String, VelatraderError> {
        fs::read_to_string(path).map_err(|e| VelatraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }

    fn parse_number(field: &str, column: &str, line: usize) -> Result<f64, VelatraderError> {
        field.parse().map_err(|e| VelatraderError::Data {
            reason: format!("line {line}: invalid {column} value {field:?}: {e}"),
        })
    }
}

fn get_field<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    line: usize,
) -> Result<&'r str, VelatraderError> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| VelatraderError::Data {
            reason: format!("line {line}: missing {name} column"),
        })
}

impl DataPort for CsvAdapter {
    fn load_spread(&self, path: &Path) -> Result<Vec<SpreadRow>, VelatraderError> {
        let content = Self::read_file(path)?;
        let delimiter = Self::sniff_delimiter(&content);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| VelatraderError::Data {
                reason: format!("spread parse error: {e}"),
            })?;
            // Runs of spaces produce empty fields; drop them.
            let fields: Vec<&str> = record
                .iter()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect();
            if fields.is_empty() {
                continue;
            }
            let line = index + 2;
            if fields.len() < 3 {
                return Err(VelatraderError::Data {
                    reason: format!("line {line}: expected date and two closes, got {fields:?}"),
                });
            }
            rows.push(SpreadRow {
                date: TradeDate::parse(fields[0])?,
                close_a: Self::parse_number(fields[1], "close_a", line)?,
                close_b: Self::parse_number(fields[2], "close_b", line)?,
            });
        }
        Ok(rows)
    }

    fn load_ohlc(&self, path: &Path) -> Result<TradingHistory, VelatraderError> {
        let content = Self::read_file(path)?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ohlc".to_string());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let mut history = TradingHistory::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| VelatraderError::Data {
                reason: format!("OHLC parse error: {e}"),
            })?;
            let line = index + 2;
            let date_str = get_field(&record, 0, "date", line)?;
            let candle = Candle::new(
                (index + 1) as u32,
                date_str,
                Self::parse_number(get_field(&record, 1, "open", line)?, "open", line)?,
                Self::parse_number(get_field(&record, 2, "high", line)?, "high", line)?,
                Self::parse_number(get_field(&record, 3, "low", line)?, "low", line)?,
                Self::parse_number(get_field(&record, 4, "close", line)?, "close", line)?,
                label.as_str(),
            );
            history.insert(TradingRecord {
                date: TradeDate::parse(date_str)?,
                time_frame: TimeFrame::Daily,
                candle,
                volume: Self::parse_number(get_field(&record, 5, "volume", line)?, "volume", line)?,
            })?;
        }
        Ok(history)
    }
}
