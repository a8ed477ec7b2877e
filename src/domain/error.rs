//! Domain error types.

/// Errors from the statistics library.
///
/// Sentinel return values are indistinguishable from legitimate results over
/// real-valued series, so every entry point returns an explicit error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("statistic requested over an empty sequence")]
    EmptyInput,

    #[error("paired series have different lengths: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("unknown statistic name: {name}")]
    UnknownStatistic { name: String },

    #[error("{statistic} needs at least {minimum} samples, got {samples}")]
    InsufficientSamples {
        statistic: &'static str,
        minimum: usize,
        samples: usize,
    },

    #[error("division by zero: {reason}")]
    DivisionByZero { reason: String },
}

/// Top-level error type for velatrader.
#[derive(Debug, thiserror::Error)]
pub enum VelatraderError {
    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("unparseable date: {input}")]
    DateParse { input: String },

    #[error("duplicate timestamp key: {key}")]
    DuplicateKey { key: String },

    #[error("candle {label} violates OHLC bounds: open={open} high={high} low={low} close={close}")]
    InvalidOhlc {
        label: String,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("invalid moving-average windows: short={short}, long={long}")]
    InvalidWindows { short: usize, long: usize },

    #[error("invalid sequence parameters: {reason}")]
    InvalidSequence { reason: String },

    #[error("invalid option parameters: {reason}")]
    InvalidOption { reason: String },

    #[error("unknown instrument: {name}")]
    UnknownInstrument { name: String },

    #[error("unknown price field: {name}")]
    UnknownPriceField { name: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&VelatraderError> for std::process::ExitCode {
    fn from(err: &VelatraderError) -> Self {
        let code: u8 = match err {
            VelatraderError::Io(_) => 1,
            VelatraderError::ConfigParse { .. } | VelatraderError::ConfigMissing { .. } => 2,
            VelatraderError::Data { .. } | VelatraderError::DuplicateKey { .. } => 3,
            VelatraderError::DateParse { .. }
            | VelatraderError::InvalidOhlc { .. }
            | VelatraderError::InvalidWindows { .. }
            | VelatraderError::InvalidSequence { .. }
            | VelatraderError::InvalidOption { .. }
            | VelatraderError::UnknownInstrument { .. }
            | VelatraderError::UnknownPriceField { .. } => 4,
            VelatraderError::Stats(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
