//! CLI definition and dispatch.
//!
//! Run modes are explicit subcommands; there are no ambient test toggles.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::adapters::console_report_adapter::ConsoleReportAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_long, BacktestParams};
use crate::domain::candle::PriceField;
use crate::domain::capital::CapitalPolicy;
use crate::domain::crossover::MovingAverageCross;
use crate::domain::date::TradeDate;
use crate::domain::error::VelatraderError;
use crate::domain::gbm::{self, MarketDynamics};
use crate::domain::pricing::OptionContract;
use crate::domain::record::TradingHistory;
use crate::domain::report::TradingStats;
use crate::domain::sequence::van_der_corput;
use crate::domain::stats;
use crate::domain::system::TradingSystem;
use crate::domain::trade::Instrument;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{spread_to_history, DataPort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "velatrader", about = "Moving-average trading system backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print descriptive statistics for a two-column spread file
    Stats { data: PathBuf },
    /// Print moving-average crossover buy signals
    Signals {
        data: PathBuf,
        #[arg(long, default_value_t = 5)]
        short: usize,
        #[arg(long, default_value_t = 10)]
        long: usize,
        /// Treat the data file as OHLC rows instead of a spread file
        #[arg(long)]
        ohlc: bool,
    },
    /// Run a long-only backtest and report trade statistics
    Backtest {
        data: PathBuf,
        /// INI file whose [backtest] section overrides the flags below
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 5)]
        short: usize,
        #[arg(long, default_value_t = 10)]
        long: usize,
        /// First date of the window (defaults to the first record)
        #[arg(long)]
        start: Option<String>,
        /// Last date of the window (defaults to the last record)
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        fee: f64,
        #[arg(long, default_value = "close")]
        field: String,
        #[arg(long, default_value = "BBVA")]
        instrument: String,
        /// Force-close an open position at the end of the window
        #[arg(long)]
        close_on_end: bool,
        #[arg(long)]
        ohlc: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Price a European call by quasi-Monte Carlo with an analytical check
    Price {
        #[arg(long, default_value_t = 100.0)]
        spot: f64,
        #[arg(long, default_value_t = 100.0)]
        strike: f64,
        #[arg(long, default_value_t = 0.05)]
        rate: f64,
        #[arg(long, default_value_t = 0.0)]
        dividend: f64,
        #[arg(long, default_value_t = 0.2)]
        sigma: f64,
        #[arg(long, default_value_t = 1.0)]
        maturity: f64,
        #[arg(long, default_value_t = 8192)]
        samples: u64,
        /// Use seeded pseudo-random draws instead of the Halton sequence
        #[arg(long)]
        random: bool,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Stats { data } => run_stats(&data),
        Command::Signals {
            data,
            short,
            long,
            ohlc,
        } => run_signals(&data, short, long, ohlc),
        Command::Backtest {
            data,
            config,
            short,
            long,
            start,
            end,
            fee,
            field,
            instrument,
            close_on_end,
            ohlc,
            output,
        } => {
            let mut settings = BacktestSettings {
                short,
                long,
                start,
                end,
                fee,
                field,
                instrument,
                close_on_end,
            };
            run_backtest(&data, config.as_deref(), &mut settings, ohlc, output.as_deref())
        }
        Command::Price {
            spot,
            strike,
            rate,
            dividend,
            sigma,
            maturity,
            samples,
            random,
            seed,
        } => run_price(
            spot, strike, rate, dividend, sigma, maturity, samples, random, seed,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BacktestSettings {
    short: usize,
    long: usize,
    start: Option<String>,
    end: Option<String>,
    fee: f64,
    field: String,
    instrument: String,
    close_on_end: bool,
}

const CONFIG_SECTION: &str = "backtest";

fn apply_config(settings: &mut BacktestSettings, config: &dyn ConfigPort) {
    settings.short = config.get_int(CONFIG_SECTION, "short_window", settings.short as i64) as usize;
    settings.long = config.get_int(CONFIG_SECTION, "long_window", settings.long as i64) as usize;
    if let Some(v) = config.get_string(CONFIG_SECTION, "start") {
        settings.start = Some(v);
    }
    if let Some(v) = config.get_string(CONFIG_SECTION, "end") {
        settings.end = Some(v);
    }
    settings.fee = config.get_float(CONFIG_SECTION, "fee", settings.fee);
    if let Some(v) = config.get_string(CONFIG_SECTION, "price_field") {
        settings.field = v;
    }
    if let Some(v) = config.get_string(CONFIG_SECTION, "instrument") {
        settings.instrument = v;
    }
    settings.close_on_end =
        config.get_bool(CONFIG_SECTION, "close_on_range_end", settings.close_on_end);
}

fn load_history(data: &Path, ohlc: bool) -> Result<TradingHistory, VelatraderError> {
    let adapter = CsvAdapter::new();
    if ohlc {
        adapter.load_ohlc(data)
    } else {
        let rows = adapter.load_spread(data)?;
        spread_to_history(&rows, "spread")
    }
}

fn run_stats(data: &Path) -> Result<(), VelatraderError> {
    eprintln!("Loading spread data from {}", data.display());
    let rows = CsvAdapter::new().load_spread(data)?;
    let closes_a: Vec<f64> = rows.iter().map(|r| r.close_a).collect();
    let closes_b: Vec<f64> = rows.iter().map(|r| r.close_b).collect();

    let show = |label: &str, value: Result<f64, _>| match value {
        Ok(v) => println!("{label}: {v}"),
        Err(e) => println!("{label}: n/a ({e})"),
    };

    println!("Samples: {}", rows.len());
    show("Mean of first leg", stats::univariate(&closes_a, "mean"));
    show("Mean of second leg", stats::univariate(&closes_b, "mean"));
    show(
        "Variance of first leg",
        stats::univariate(&closes_a, "variance"),
    );
    show(
        "Variance of second leg",
        stats::univariate(&closes_b, "variance"),
    );
    show("Dot product", stats::dot(&closes_a, &closes_b));
    show(
        "Covariance",
        stats::bivariate(&closes_a, &closes_b, "covariance"),
    );
    show(
        "Pearson correlation",
        stats::bivariate(&closes_a, &closes_b, "pearson"),
    );
    Ok(())
}

fn run_signals(data: &Path, short: usize, long: usize, ohlc: bool) -> Result<(), VelatraderError> {
    eprintln!("Loading data from {}", data.display());
    let history = load_history(data, ohlc)?;
    eprintln!("Loaded {} records", history.len());

    let strategy = MovingAverageCross::new(short, long)?;
    // Constructed with Buy support, so the map is always present.
    let map = strategy.buy_signals(&history).unwrap_or_default();
    for (date, fired) in &map {
        println!("{date} {}", u8::from(*fired));
    }
    Ok(())
}

fn run_backtest(
    data: &Path,
    config: Option<&Path>,
    settings: &mut BacktestSettings,
    ohlc: bool,
    output: Option<&Path>,
) -> Result<(), VelatraderError> {
    if let Some(path) = config {
        eprintln!("Loading config from {}", path.display());
        let adapter =
            FileConfigAdapter::from_file(path).map_err(|e| VelatraderError::ConfigParse {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;
        apply_config(settings, &adapter);
    }

    eprintln!("Loading data from {}", data.display());
    let history = load_history(data, ohlc)?;
    if history.is_empty() {
        return Err(VelatraderError::Data {
            reason: format!("no records in {}", data.display()),
        });
    }
    eprintln!("Loaded {} records", history.len());

    let start = match &settings.start {
        Some(s) => TradeDate::parse(s)?,
        None => history.first_date().cloned().ok_or_else(|| VelatraderError::Data {
            reason: "empty history".into(),
        })?,
    };
    let end = match &settings.end {
        Some(s) => TradeDate::parse(s)?,
        None => history.last_date().cloned().ok_or_else(|| VelatraderError::Data {
            reason: "empty history".into(),
        })?,
    };

    let strategy = MovingAverageCross::new(settings.short, settings.long)?;
    let params = BacktestParams {
        start,
        end,
        fee_per_trade: settings.fee,
        instrument: Instrument::from_str(&settings.instrument)?,
        price_field: PriceField::from_str(&settings.field)?,
        close_on_range_end: settings.close_on_end,
    };

    eprintln!(
        "Backtesting {}/{} crossover on {} from {} to {}",
        strategy.short_window(),
        strategy.long_window(),
        params.instrument,
        params.start,
        params.end
    );
    let ledger = run_long(&strategy, &history, &params, &CapitalPolicy::default())?;
    let report_stats = TradingStats::from_ledger(&ledger);
    ConsoleReportAdapter::new().write(&report_stats, &ledger, output)
}

#[allow(clippy::too_many_arguments)]
fn run_price(
    spot: f64,
    strike: f64,
    rate: f64,
    dividend: f64,
    sigma: f64,
    maturity: f64,
    samples: u64,
    random: bool,
    seed: u64,
) -> Result<(), VelatraderError> {
    let dynamics = MarketDynamics::new(spot, rate, dividend, sigma)?;
    let contract = OptionContract::new(dynamics, strike, maturity)?;

    let method = if random { "pseudo-random" } else { "Halton" };
    eprintln!("Pricing with {samples} {method} samples");
    let points: Vec<f64> = if random {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..samples).map(|_| rng.r#gen()).collect()
    } else {
        (1..=samples)
            .map(|i| van_der_corput(2, i))
            .collect::<Result<_, _>>()?
    };

    let payoffs = contract.european_call_payoffs(&points);
    let estimate = contract.european_call_mc(&points)?;
    let analytical = contract.call_price();

    println!("Estimate:       {estimate:.4}");
    println!("Black-Scholes:  {analytical:.4}");
    println!("Abs error:      {:.6}", (estimate - analytical).abs());
    println!("Std error:      {:.6}", gbm::standard_error(&payoffs));
    println!("Call delta:     {:.4}", contract.call_delta());
    println!("Call vega:      {:.4}", contract.call_vega());
    Ok(())
}
