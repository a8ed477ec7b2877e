//! Option pricing: analytical Black-Scholes and MC/QMC estimates.
//!
//! An [`OptionContract`] pairs a strike and maturity with the underlying's
//! [`MarketDynamics`]. European calls and puts have closed forms; the
//! Monte Carlo pricers take uniform draws in `[0, 1)` (pseudo-random or a
//! low-discrepancy set from [`crate::domain::sequence`]) and push them
//! through the probit transform and the exact GBM solution. Path-dependent
//! payoffs (arithmetic Asian, discrete lookback) take one row of draws per
//! simulated path.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf;

use crate::domain::error::VelatraderError;
use crate::domain::gbm::{self, MarketDynamics};
use crate::domain::stats;

fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// An option on a single underlying: strike, maturity and the dynamics
/// they are priced under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionContract {
    pub dynamics: MarketDynamics,
    pub strike: f64,
    pub maturity: f64,
}

impl OptionContract {
    pub fn new(
        dynamics: MarketDynamics,
        strike: f64,
        maturity: f64,
    ) -> Result<Self, VelatraderError> {
        if strike <= 0.0 || maturity <= 0.0 {
            return Err(VelatraderError::InvalidOption {
                reason: format!(
                    "strike and maturity must be positive, got {strike} and {maturity}"
                ),
            });
        }
        Ok(OptionContract {
            dynamics,
            strike,
            maturity,
        })
    }

    fn d1(&self) -> f64 {
        let d = &self.dynamics;
        let vol_sqrt_t = d.volatility * self.maturity.sqrt();
        ((d.spot / self.strike).ln()
            + (d.rate - d.dividend_yield + 0.5 * d.volatility * d.volatility) * self.maturity)
            / vol_sqrt_t
    }

    fn d2(&self) -> f64 {
        self.d1() - self.dynamics.volatility * self.maturity.sqrt()
    }

    fn discount(&self) -> f64 {
        (-self.dynamics.rate * self.maturity).exp()
    }

    fn dividend_discount(&self) -> f64 {
        (-self.dynamics.dividend_yield * self.maturity).exp()
    }

    /// Black-Scholes price of the European call.
    pub fn call_price(&self) -> f64 {
        self.dynamics.spot * self.dividend_discount() * norm_cdf(self.d1())
            - self.strike * self.discount() * norm_cdf(self.d2())
    }

    /// Black-Scholes price of the European put.
    pub fn put_price(&self) -> f64 {
        self.strike * self.discount() * norm_cdf(-self.d2())
            - self.dynamics.spot * self.dividend_discount() * norm_cdf(-self.d1())
    }

    /// Call delta: sensitivity of the price to the spot.
    pub fn call_delta(&self) -> f64 {
        self.dividend_discount() * norm_cdf(self.d1())
    }

    /// Call gamma: curvature of the price in the spot.
    pub fn call_gamma(&self) -> f64 {
        self.dividend_discount() * norm_pdf(self.d1())
            / (self.dynamics.volatility * self.dynamics.spot * self.maturity.sqrt())
    }

    /// Call vega: sensitivity of the price to the volatility.
    pub fn call_vega(&self) -> f64 {
        self.maturity.sqrt() * self.dynamics.spot * self.dividend_discount()
            * norm_pdf(self.d1())
    }

    /// Discounted European call payoff for each uniform draw. The mean of
    /// these samples is the Monte Carlo price estimate; their spread feeds
    /// [`gbm::standard_error`].
    pub fn european_call_payoffs(&self, points: &[f64]) -> Vec<f64> {
        let discount = self.discount();
        points
            .iter()
            .map(|&u| {
                let z = gbm::uniform_to_normal(u);
                let terminal = self.dynamics.terminal_price(self.maturity, z);
                discount * (terminal - self.strike).max(0.0)
            })
            .collect()
    }

    /// European call price by MC/QMC over uniform draws.
    pub fn european_call_mc(&self, points: &[f64]) -> Result<f64, VelatraderError> {
        Ok(stats::mean(&self.european_call_payoffs(points))?)
    }

    /// Arithmetic-average Asian call: the payoff averages the monitored
    /// prices along each path, one path per row of draws.
    pub fn asian_call_mc(&self, points: &[Vec<f64>]) -> Result<f64, VelatraderError> {
        let steps = Self::path_steps(points)?;
        let payoffs: Vec<f64> = points
            .iter()
            .map(|row| {
                let path = self.simulate_row(row);
                let average = path[1..].iter().sum::<f64>() / steps as f64;
                (average - self.strike).max(0.0)
            })
            .collect();
        Ok(self.discount() * stats::mean(&payoffs)?)
    }

    /// Discrete lookback call: the payoff strikes against the running
    /// maximum of each path, the spot included.
    pub fn lookback_call_mc(&self, points: &[Vec<f64>]) -> Result<f64, VelatraderError> {
        Self::path_steps(points)?;
        let payoffs: Vec<f64> = points
            .iter()
            .map(|row| {
                let path = self.simulate_row(row);
                let maximum = path.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                (maximum - self.strike).max(0.0)
            })
            .collect();
        Ok(self.discount() * stats::mean(&payoffs)?)
    }

    /// Discrete lookback put: strikes against the running minimum.
    pub fn lookback_put_mc(&self, points: &[Vec<f64>]) -> Result<f64, VelatraderError> {
        Self::path_steps(points)?;
        let payoffs: Vec<f64> = points
            .iter()
            .map(|row| {
                let path = self.simulate_row(row);
                let minimum = path.iter().cloned().fold(f64::INFINITY, f64::min);
                (self.strike - minimum).max(0.0)
            })
            .collect();
        Ok(self.discount() * stats::mean(&payoffs)?)
    }

    fn simulate_row(&self, row: &[f64]) -> Vec<f64> {
        let z: Vec<f64> = row.iter().map(|&u| gbm::uniform_to_normal(u)).collect();
        self.dynamics.exact_path(self.maturity, &z)
    }

    fn path_steps(points: &[Vec<f64>]) -> Result<usize, VelatraderError> {
        let steps = points.first().map_or(0, Vec::len);
        if steps == 0 {
            return Err(VelatraderError::InvalidOption {
                reason: "path pricing needs at least one draw row with one step".into(),
            });
        }
        if points.iter().any(|row| row.len() != steps) {
            return Err(VelatraderError::InvalidOption {
                reason: "all draw rows must have the same number of steps".into(),
            });
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sequence::{halton, van_der_corput};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const MONITOR_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    fn sample_contract() -> OptionContract {
        let dynamics = MarketDynamics::new(100.0, 0.05, 0.02, 0.2).unwrap();
        OptionContract::new(dynamics, 100.0, 1.0).unwrap()
    }

    fn unit_halton(count: u64) -> Vec<f64> {
        (1..=count).map(|i| van_der_corput(2, i).unwrap()).collect()
    }

    #[test]
    fn rejects_degenerate_contract() {
        let dynamics = MarketDynamics::new(100.0, 0.05, 0.02, 0.2).unwrap();
        assert!(OptionContract::new(dynamics, 0.0, 1.0).is_err());
        assert!(OptionContract::new(dynamics, 100.0, -1.0).is_err());
    }

    #[test]
    fn black_scholes_call_known_value() {
        // S=K=100, r=5%, q=2%, sigma=20%, T=1: d1=0.25, d2=0.05.
        assert_relative_eq!(sample_contract().call_price(), 9.227, epsilon = 1e-2);
    }

    #[test]
    fn put_call_parity() {
        let contract = sample_contract();
        let lhs = contract.call_price() - contract.put_price();
        let rhs = 100.0 * (-0.02f64).exp() - 100.0 * (-0.05f64).exp();
        assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
    }

    #[test]
    fn deep_itm_delta_approaches_one() {
        let dynamics = MarketDynamics::new(150.0, 0.05, 0.02, 0.2).unwrap();
        let contract = OptionContract::new(dynamics, 100.0, 1.0).unwrap();
        let delta = contract.call_delta();
        assert!(delta > 0.95 && delta < 1.0);
    }

    #[test]
    fn greeks_have_expected_signs() {
        let contract = sample_contract();
        let delta = contract.call_delta();
        assert!(delta > 0.0 && delta < 1.0);
        assert!(contract.call_gamma() > 0.0);
        assert!(contract.call_vega() > 0.0);
    }

    #[test]
    fn qmc_call_matches_black_scholes() {
        let contract = sample_contract();
        let estimate = contract.european_call_mc(&unit_halton(4096)).unwrap();
        let analytical = contract.call_price();
        assert!((estimate - analytical).abs() / analytical < 0.02);
    }

    #[test]
    fn pseudo_random_call_matches_black_scholes() {
        let contract = sample_contract();
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<f64> = (0..20_000).map(|_| rng.r#gen()).collect();
        let estimate = contract.european_call_mc(&points).unwrap();
        let analytical = contract.call_price();
        assert!((estimate - analytical).abs() / analytical < 0.05);
    }

    #[test]
    fn mc_without_samples_is_error() {
        let contract = sample_contract();
        assert!(contract.european_call_mc(&[]).is_err());
        assert!(contract.asian_call_mc(&[]).is_err());
        assert!(contract.asian_call_mc(&[vec![0.5], vec![0.5, 0.5]]).is_err());
    }

    #[test]
    fn asian_call_is_cheaper_than_european() {
        let contract = sample_contract();
        let points = halton(&MONITOR_BASES, 1000).unwrap();
        let asian = contract.asian_call_mc(&points).unwrap();
        assert!(asian > 0.0);
        assert!(asian < contract.call_price());
    }

    #[test]
    fn lookback_call_dominates_european() {
        // The running maximum is at least the terminal price, so the
        // lookback payoff dominates pathwise.
        let contract = sample_contract();
        let points = halton(&MONITOR_BASES, 1000).unwrap();
        let lookback = contract.lookback_call_mc(&points).unwrap();
        assert!(lookback > contract.call_price());
    }

    #[test]
    fn lookback_put_is_positive() {
        let contract = sample_contract();
        let points = halton(&MONITOR_BASES, 1000).unwrap();
        assert!(contract.lookback_put_mc(&points).unwrap() > 0.0);
    }

    #[test]
    fn payoff_samples_mean_is_the_estimate() {
        let contract = sample_contract();
        let points = unit_halton(256);
        let samples = contract.european_call_payoffs(&points);
        let estimate = contract.european_call_mc(&points).unwrap();
        assert_relative_eq!(
            samples.iter().sum::<f64>() / samples.len() as f64,
            estimate,
            epsilon = 1e-12
        );
        assert!(gbm::standard_error(&samples) > 0.0);
    }
}
