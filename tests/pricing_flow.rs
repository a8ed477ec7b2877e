//! Integration tests: low-discrepancy generators driving option pricing.

use velatrader::domain::gbm::{self, MarketDynamics};
use velatrader::domain::pricing::OptionContract;
use velatrader::domain::sequence::{good_lattice_points, halton, random_shift, van_der_corput};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample_contract() -> OptionContract {
    let dynamics = MarketDynamics::new(100.0, 0.05, 0.02, 0.2).unwrap();
    OptionContract::new(dynamics, 100.0, 1.0).unwrap()
}

#[test]
fn halton_driven_call_converges_to_black_scholes() {
    let contract = sample_contract();
    let analytical = contract.call_price();

    let coarse: Vec<f64> = (1..=512u64)
        .map(|i| van_der_corput(2, i).unwrap())
        .collect();
    let fine: Vec<f64> = (1..=8192u64)
        .map(|i| van_der_corput(2, i).unwrap())
        .collect();

    let coarse_err = (contract.european_call_mc(&coarse).unwrap() - analytical).abs();
    let fine_err = (contract.european_call_mc(&fine).unwrap() - analytical).abs();

    assert!(coarse_err / analytical < 0.05);
    assert!(fine_err / analytical < 0.01);
}

#[test]
fn shifted_point_set_still_prices_sanely() {
    let contract = sample_contract();
    let points = halton(&[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37], 1000).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let shifted = random_shift(&points, &mut rng);

    let base = contract.asian_call_mc(&points).unwrap();
    let reshuffled = contract.asian_call_mc(&shifted).unwrap();
    assert!(base > 0.0 && reshuffled > 0.0);
    // Two uniform point sets of the same size estimate the same integral.
    assert!((base - reshuffled).abs() / base < 0.15);
}

#[test]
fn fibonacci_lattice_prices_two_step_path_options() {
    let contract = sample_contract();
    // fibonacci(16) lattice: 987 points in the unit square, one
    // two-step path per point.
    let points: Vec<Vec<f64>> = good_lattice_points(16)
        .unwrap()
        .into_iter()
        .map(|p| p.to_vec())
        .collect();

    let lookback_call = contract.lookback_call_mc(&points).unwrap();
    let lookback_put = contract.lookback_put_mc(&points).unwrap();
    // The running maximum includes the terminal price, so the lookback
    // call dominates the European one.
    assert!(lookback_call > contract.call_price());
    assert!(lookback_put > 0.0);
}

#[test]
fn standard_error_shrinks_with_sample_count() {
    let contract = sample_contract();
    let small: Vec<f64> = (1..=256u64)
        .map(|i| van_der_corput(2, i).unwrap())
        .collect();
    let large: Vec<f64> = (1..=16384u64)
        .map(|i| van_der_corput(2, i).unwrap())
        .collect();

    let small_se = gbm::standard_error(&contract.european_call_payoffs(&small));
    let large_se = gbm::standard_error(&contract.european_call_payoffs(&large));
    assert!(large_se < small_se);
}
