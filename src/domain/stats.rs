//! Descriptive and bivariate statistics over ordered numeric series.
//!
//! Every named estimator is derived from the ones below it: variance from
//! mean and dot, covariance from mean and dot, pearson from covariance and
//! variance. None of them is recomputed independently, which keeps the
//! estimators numerically consistent with each other.
//!
//! Variance uses the sum-of-squares identity `dot(xs,xs)/n - mean^2` rather
//! than pairwise deviations. The identity cancels catastrophically when the
//! mean is large relative to the spread; callers feeding large-magnitude
//! series should centre them first.

use crate::domain::error::StatsError;

/// Arithmetic sum of the sequence.
pub fn sum(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(xs.iter().sum())
}

/// Dot product of two equal-length sequences.
pub fn dot(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    Ok(xs.iter().zip(ys.iter()).map(|(x, y)| x * y).sum())
}

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Result<f64, StatsError> {
    Ok(sum(xs)? / xs.len() as f64)
}

/// Population (biased) variance: `dot(xs,xs)/n - mean^2`.
pub fn variance(xs: &[f64]) -> Result<f64, StatsError> {
    let m = mean(xs)?;
    let n = xs.len() as f64;
    Ok(dot(xs, xs)? / n - m * m)
}

fn check_paired(xs: &[f64], ys: &[f64]) -> Result<(), StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(())
}

/// Unbiased covariance: `(dot(xs,ys) - n*mean(xs)*mean(ys)) / (n - 1)`.
///
/// Undefined for a single sample; fails with `InsufficientSamples`.
pub fn covariance(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    check_paired(xs, ys)?;
    if xs.len() < 2 {
        return Err(StatsError::InsufficientSamples {
            statistic: "covariance",
            minimum: 2,
            samples: xs.len(),
        });
    }
    let n = xs.len() as f64;
    Ok((dot(xs, ys)? - n * mean(xs)? * mean(ys)?) / (n - 1.0))
}

/// Biased covariance: same numerator as [`covariance`], divided by `n`.
pub fn covariance_biased(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    check_paired(xs, ys)?;
    let n = xs.len() as f64;
    Ok((dot(xs, ys)? - n * mean(xs)? * mean(ys)?) / n)
}

/// Pearson correlation coefficient.
///
/// Built from the biased covariance and the population standard deviations
/// so the divisor bias matches on both sides of the quotient. Mixing the
/// unbiased covariance with population deviations inflates the result by
/// `n/(n-1)` and pushes `pearson(xs, xs)` above 1.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    let cov = covariance_biased(xs, ys)?;
    let stddev_x = variance(xs)?.sqrt();
    let stddev_y = variance(ys)?.sqrt();
    if stddev_x == 0.0 || stddev_y == 0.0 {
        return Err(StatsError::DivisionByZero {
            reason: "pearson over a zero-variance series".into(),
        });
    }
    Ok(cov / (stddev_x * stddev_y))
}

/// Name-dispatched univariate estimator: `mean` or `variance`.
pub fn univariate(xs: &[f64], name: &str) -> Result<f64, StatsError> {
    match name {
        "mean" => mean(xs),
        "variance" => variance(xs),
        _ => Err(StatsError::UnknownStatistic { name: name.into() }),
    }
}

/// Name-dispatched bivariate estimator: `covariance`, `covariance-biased`
/// or `pearson`.
pub fn bivariate(xs: &[f64], ys: &[f64], name: &str) -> Result<f64, StatsError> {
    match name {
        "covariance" => covariance(xs, ys),
        "covariance-biased" => covariance_biased(xs, ys),
        "pearson" => pearson(xs, ys),
        _ => Err(StatsError::UnknownStatistic { name: name.into() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // Textbook population-variance example.
    const TEXTBOOK: [f64; 8] = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn sum_basic() {
        assert_relative_eq!(sum(&[1.0, 2.0, 3.5]).unwrap(), 6.5);
    }

    #[test]
    fn sum_empty_is_error() {
        assert_eq!(sum(&[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn sum_of_negative_one_is_not_an_error() {
        // -1 is an ordinary result, never a failure code.
        assert_relative_eq!(sum(&[-2.0, 1.0]).unwrap(), -1.0);
    }

    #[test]
    fn dot_known_value() {
        assert_relative_eq!(dot(&[1.0, 1.0], &[4.0, 5.0]).unwrap(), 9.0);
    }

    #[test]
    fn dot_length_mismatch() {
        assert_eq!(
            dot(&[1.0], &[1.0, 2.0]),
            Err(StatsError::LengthMismatch { left: 1, right: 2 })
        );
    }

    #[test]
    fn mean_textbook() {
        assert_relative_eq!(mean(&TEXTBOOK).unwrap(), 5.0);
    }

    #[test]
    fn variance_textbook() {
        assert_relative_eq!(variance(&TEXTBOOK).unwrap(), 4.0, epsilon = 1e-10);
    }

    #[test]
    fn variance_single_sample_is_zero() {
        assert_relative_eq!(variance(&[5.0]).unwrap(), 0.0);
    }

    #[test]
    fn covariance_of_series_with_itself_is_sample_variance() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        // Sample variance of 1..4 with the n-1 divisor.
        assert_relative_eq!(covariance(&xs, &xs).unwrap(), 5.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn covariance_single_sample_is_insufficient() {
        assert_eq!(
            covariance(&[1.0], &[2.0]),
            Err(StatsError::InsufficientSamples {
                statistic: "covariance",
                minimum: 2,
                samples: 1
            })
        );
    }

    #[test]
    fn covariance_empty_input() {
        assert_eq!(covariance(&[], &[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn biased_and_unbiased_differ_by_n_over_n_minus_1() {
        let xs = [1.0, 3.0, 2.0, 8.0, 5.0];
        let ys = [2.0, 2.0, 4.0, 7.0, 9.0];
        let n = xs.len() as f64;
        let unbiased = covariance(&xs, &ys).unwrap();
        let biased = covariance_biased(&xs, &ys).unwrap();
        assert_relative_eq!(unbiased, biased * n / (n - 1.0), epsilon = 1e-10);
    }

    #[test]
    fn pearson_of_series_with_itself_is_one() {
        let xs = [2.0, 4.0, 1.0, 7.0];
        assert_relative_eq!(pearson(&xs, &xs).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn pearson_perfect_inverse_is_minus_one() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [3.0, 2.0, 1.0];
        assert_relative_eq!(pearson(&xs, &ys).unwrap(), -1.0, epsilon = 1e-10);
    }

    #[test]
    fn pearson_zero_variance_is_error() {
        let flat = [4.0, 4.0, 4.0];
        let xs = [1.0, 2.0, 3.0];
        assert!(matches!(
            pearson(&flat, &xs),
            Err(StatsError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn univariate_dispatch() {
        assert_relative_eq!(univariate(&TEXTBOOK, "mean").unwrap(), 5.0);
        assert_relative_eq!(
            univariate(&TEXTBOOK, "variance").unwrap(),
            4.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn univariate_unknown_name() {
        assert_eq!(
            univariate(&TEXTBOOK, "median"),
            Err(StatsError::UnknownStatistic {
                name: "median".into()
            })
        );
    }

    #[test]
    fn bivariate_dispatch() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [2.0, 4.0, 6.0];
        assert_relative_eq!(
            bivariate(&xs, &ys, "covariance").unwrap(),
            covariance(&xs, &ys).unwrap()
        );
        assert_relative_eq!(
            bivariate(&xs, &ys, "covariance-biased").unwrap(),
            covariance_biased(&xs, &ys).unwrap()
        );
        assert_relative_eq!(bivariate(&xs, &ys, "pearson").unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn bivariate_unknown_name() {
        assert_eq!(
            bivariate(&[1.0], &[1.0], "kendall"),
            Err(StatsError::UnknownStatistic {
                name: "kendall".into()
            })
        );
    }

    #[test]
    fn idempotent_over_same_input() {
        let xs = vec![3.0, 1.0, 4.0, 1.0, 5.0];
        let first = variance(&xs).unwrap();
        let second = variance(&xs).unwrap();
        assert_eq!(first, second);
        assert_eq!(xs, vec![3.0, 1.0, 4.0, 1.0, 5.0]);
    }

    proptest! {
        #[test]
        fn mean_within_min_max(xs in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let m = mean(&xs).unwrap();
            let lo = xs.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(m >= lo - 1e-6);
            prop_assert!(m <= hi + 1e-6);
        }

        #[test]
        fn variance_non_negative(xs in prop::collection::vec(-1e3f64..1e3, 1..64)) {
            let v = variance(&xs).unwrap();
            prop_assert!(v >= -1e-6);
        }

        #[test]
        fn pearson_bounded(
            xs in prop::collection::vec(-1e3f64..1e3, 2..64),
            ys in prop::collection::vec(-1e3f64..1e3, 2..64),
        ) {
            let len = xs.len().min(ys.len());
            let (xs, ys) = (&xs[..len], &ys[..len]);
            prop_assume!(variance(xs).unwrap() > 1e-9);
            prop_assume!(variance(ys).unwrap() > 1e-9);
            let r = pearson(xs, ys).unwrap();
            prop_assert!(r >= -1.0 - 1e-6);
            prop_assert!(r <= 1.0 + 1e-6);
        }
    }
}
