//! Geometric Brownian Motion simulation and Monte Carlo utilities.
//!
//! [`MarketDynamics`] holds the risk-neutral parameters of one underlying
//! and turns standard normal draws into prices, either at maturity or
//! along a discretized path. Uniform draws from the sequence generators go
//! through [`uniform_to_normal`] first.

use std::f64::consts::{SQRT_2, TAU};

use rand::Rng;
use statrs::function::erf;

use crate::domain::error::VelatraderError;
use crate::domain::stats;

/// Risk-neutral dynamics of a single underlying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketDynamics {
    pub spot: f64,
    pub rate: f64,
    pub dividend_yield: f64,
    pub volatility: f64,
}

impl MarketDynamics {
    pub fn new(
        spot: f64,
        rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, VelatraderError> {
        if spot <= 0.0 || volatility <= 0.0 {
            return Err(VelatraderError::InvalidOption {
                reason: format!("spot and volatility must be positive, got {spot} and {volatility}"),
            });
        }
        Ok(MarketDynamics {
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    fn log_drift(&self) -> f64 {
        self.rate - self.dividend_yield - 0.5 * self.volatility * self.volatility
    }

    /// Price at `maturity` under the exact GBM solution, driven by one
    /// standard normal draw.
    pub fn terminal_price(&self, maturity: f64, z: f64) -> f64 {
        self.spot
            * (self.log_drift() * maturity + self.volatility * maturity.sqrt() * z).exp()
    }

    /// Exact GBM path on a uniform grid: one step per normal draw,
    /// `z.len() + 1` prices starting at the spot.
    pub fn exact_path(&self, maturity: f64, z: &[f64]) -> Vec<f64> {
        let mut path = Vec::with_capacity(z.len() + 1);
        path.push(self.spot);
        if z.is_empty() {
            return path;
        }
        let dt = maturity / z.len() as f64;
        let step_drift = self.log_drift() * dt;
        let step_diffusion = self.volatility * dt.sqrt();
        let mut price = self.spot;
        for &zi in z {
            price *= (step_drift + step_diffusion * zi).exp();
            path.push(price);
        }
        path
    }

    /// Euler-Maruyama path: first-order discretization of the same SDE,
    /// `z.len() + 1` prices starting at the spot.
    pub fn euler_path(&self, maturity: f64, z: &[f64]) -> Vec<f64> {
        let mut path = Vec::with_capacity(z.len() + 1);
        path.push(self.spot);
        if z.is_empty() {
            return path;
        }
        let dt = maturity / z.len() as f64;
        let mut price = self.spot;
        for &zi in z {
            price *= 1.0 + (self.rate - self.dividend_yield) * dt
                + self.volatility * dt.sqrt() * zi;
            path.push(price);
        }
        path
    }
}

/// Map a uniform `[0, 1)` draw to a standard normal via the probit
/// transform. Inputs are clamped away from 0 and 1, where the inverse CDF
/// diverges.
pub fn uniform_to_normal(u: f64) -> f64 {
    let clamped = u.clamp(1e-10, 1.0 - 1e-10);
    SQRT_2 * erf::erf_inv(2.0 * clamped - 1.0)
}

/// Standard normal samples via the Box-Muller transform.
pub fn sample_normals<R: Rng>(rng: &mut R, count: usize) -> Vec<f64> {
    (0..count)
        .map(|_| {
            // 1 - u keeps the logarithm argument in (0, 1].
            let u1 = 1.0 - rng.r#gen::<f64>();
            let u2: f64 = rng.r#gen();
            (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
        })
        .collect()
}

/// Standard error of a Monte Carlo estimate: sample standard deviation
/// over the square root of the sample count.
pub fn standard_error(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    match stats::covariance(samples, samples) {
        Ok(variance) => (variance / samples.len() as f64).sqrt(),
        Err(_) => 0.0,
    }
}
