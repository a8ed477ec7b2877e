//! Low-discrepancy point sets for quasi-Monte Carlo integration.
//!
//! Van der Corput and Halton sequences plus good lattice points. Every
//! generator emits points in `[0, 1)^d`; a random shift re-randomizes a
//! deterministic set while keeping its uniformity structure.

use rand::Rng;

use crate::domain::error::VelatraderError;

/// The `index`-th Van der Corput number in the given base (1-indexed):
/// the radical inverse of `index`.
pub fn van_der_corput(base: u32, index: u64) -> Result<f64, VelatraderError> {
    if base < 2 {
        return Err(VelatraderError::InvalidSequence {
            reason: format!("radix must be at least 2, got {base}"),
        });
    }
    let radix = f64::from(base);
    let mut value = 0.0;
    let mut digit_weight = 1.0 / radix;
    let mut remaining = index;
    while remaining > 0 {
        value += digit_weight * (remaining % u64::from(base)) as f64;
        remaining /= u64::from(base);
        digit_weight /= radix;
    }
    Ok(value)
}

/// Halton sequence of `count` points, one Van der Corput stream per base.
/// Bases must be pairwise coprime; the first few primes are the usual
/// choice.
pub fn halton(bases: &[u32], count: usize) -> Result<Vec<Vec<f64>>, VelatraderError> {
    if bases.is_empty() {
        return Err(VelatraderError::InvalidSequence {
            reason: "at least one base is required".into(),
        });
    }
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let mut point = Vec::with_capacity(bases.len());
        for &base in bases {
            point.push(van_der_corput(base, (i + 1) as u64)?);
        }
        points.push(point);
    }
    Ok(points)
}

/// Two-dimensional good lattice points from the Fibonacci rule:
/// `fibonacci(m)` points with generating vector `(1, fibonacci(m - 1))`.
pub fn good_lattice_points(m: usize) -> Result<Vec<[f64; 2]>, VelatraderError> {
    if m < 3 {
        return Err(VelatraderError::InvalidSequence {
            reason: format!("Fibonacci index must be at least 3, got {m}"),
        });
    }
    let mut fibonacci = vec![0u64; m];
    fibonacci[0] = 1;
    fibonacci[1] = 1;
    for i in 2..m {
        fibonacci[i] = fibonacci[i - 1] + fibonacci[i - 2];
    }

    let count = fibonacci[m - 1];
    let z = [1u64, fibonacci[m - 2]];
    let mut points = Vec::with_capacity(count as usize);
    for i in 1..=count {
        points.push([
            (i * z[0]) as f64 / count as f64 % 1.0,
            (i * z[1]) as f64 / count as f64 % 1.0,
        ]);
    }
    Ok(points)
}

/// Rank-1 lattice in arbitrary dimension. `generating_vector` defaults to
/// `(1, 2, ..., dim)` when not given; a tuned vector improves uniformity.
pub fn good_lattice_points_nd(
    count: usize,
    dim: usize,
    generating_vector: Option<&[u64]>,
) -> Result<Vec<Vec<f64>>, VelatraderError> {
    if count == 0 || dim == 0 {
        return Err(VelatraderError::InvalidSequence {
            reason: format!("lattice needs positive size, got {count} points in dimension {dim}"),
        });
    }
    let default_z: Vec<u64>;
    let z = match generating_vector {
        Some(z) if z.len() == dim => z,
        Some(z) => {
            return Err(VelatraderError::InvalidSequence {
                reason: format!(
                    "generating vector has length {}, dimension is {dim}",
                    z.len()
                ),
            });
        }
        None => {
            default_z = (1..=dim as u64).collect();
            &default_z
        }
    };

    let mut points = Vec::with_capacity(count);
    for i in 1..=count as u64 {
        points.push(
            z.iter()
                .map(|&zj| (i * zj) as f64 / count as f64 % 1.0)
                .collect(),
        );
    }
    Ok(points)
}

/// Cranley-Patterson shift: add one uniform offset per coordinate, modulo
/// one. The shifted set stays in `[0, 1)^d`.
pub fn random_shift<R: Rng>(points: &[Vec<f64>], rng: &mut R) -> Vec<Vec<f64>> {
    let dim = points.first().map_or(0, Vec::len);
    let shift: Vec<f64> = (0..dim).map(|_| rng.r#gen::<f64>()).collect();
    points
        .iter()
        .map(|point| {
            point
                .iter()
                .zip(&shift)
                .map(|(x, s)| (x + s) % 1.0)
                .collect()
        })
        .collect()
}
