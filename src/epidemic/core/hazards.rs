//! Hazard discretization and vectorized random draws.
//!
//! Purpose
//! -------
//! Provide the numerical building blocks shared by every kernel: turning a
//! continuous-time hazard into a per-step transition probability, drawing
//! one binomial / Poisson variate per particle, evolving a geometric random
//! walk, and clamping an updated table to non-negative values.
//!
//! Key behaviors
//! -------------
//! - [`hazard_probability`] computes `1 − exp(−rate·dt)` via `exp_m1`, which
//!   stays in `[0, 1)` for any non-negative rate.
//! - Column draws consume the caller's RNG in particle order, one variate per
//!   particle, so a fixed seed reproduces a whole step exactly.
//! - [`geometric_walk`] always consumes one standard-normal variate per
//!   particle, even when the volatility is zero, so the stream position does
//!   not depend on parameter values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Binomial trial counts are the compartment sizes truncated toward zero;
//!   fractional sizes arise under SIRS demography.
//! - A non-positive Poisson mean yields a draw of exactly 0.
//! - Poisson means above [`MAX_POISSON_MEAN`] (including `+inf`, which a
//!   product of large finite factors can reach) are rejected; the
//!   `rand_distr` rejection sampler does not terminate reliably there.
//!
//! Conventions
//! -----------
//! - Inputs have been validated upstream (finite, non-negative); these helpers
//!   only surface distribution-construction failures.
use crate::epidemic::errors::{KernelError, KernelResult};
use ndarray::{Array1, Array2, ArrayView1, Zip};
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson, StandardNormal};

/// Per-step transition probability for a hazard `rate` over `dt`.
///
/// Returns `1 − exp(−rate·dt)`.
#[inline]
pub fn hazard_probability(rate: f64, dt: f64) -> f64 {
    -(-rate * dt).exp_m1()
}

/// Draw `Binomial(⌊trials⌋, p)` as `f64`.
///
/// # Errors
/// - `KernelError::Distribution` if `p` lies outside `[0, 1]`.
pub fn draw_binomial<R: Rng + ?Sized>(trials: f64, p: f64, rng: &mut R) -> KernelResult<f64> {
    let n = trials.max(0.0).trunc() as u64;
    if n == 0 {
        return Ok(0.0);
    }
    let draw: u64 = Binomial::new(n, p)?.sample(rng);
    Ok(draw as f64)
}

/// Draw one binomial variate per particle.
///
/// `trials` and `probs` must have equal length.
///
/// # Errors
/// - `KernelError::Distribution` for the first invalid probability.
pub fn draw_binomial_column<R: Rng + ?Sized>(
    trials: ArrayView1<'_, f64>, probs: ArrayView1<'_, f64>, rng: &mut R,
) -> KernelResult<Array1<f64>> {
    debug_assert_eq!(trials.len(), probs.len());
    trials
        .iter()
        .zip(probs.iter())
        .map(|(&n, &p)| draw_binomial(n, p, rng))
        .collect::<KernelResult<Vec<f64>>>()
        .map(Array1::from)
}

/// Largest Poisson mean accepted by [`draw_poisson`].
pub const MAX_POISSON_MEAN: f64 = 1.0e12;

/// Draw `Poisson(mean)` as `f64`; non-positive means give 0.
///
/// # Errors
/// - `KernelError::Distribution` if the mean is NaN, infinite, or exceeds
///   [`MAX_POISSON_MEAN`].
pub fn draw_poisson<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> KernelResult<f64> {
    if mean <= 0.0 {
        return Ok(0.0);
    }
    if !mean.is_finite() || mean > MAX_POISSON_MEAN {
        return Err(KernelError::Distribution {
            reason: format!("poisson: mean {mean} outside (0, {MAX_POISSON_MEAN:e}]"),
        });
    }
    let draw: f64 = Poisson::new(mean)?.sample(rng);
    Ok(draw)
}

/// Draw one Poisson variate per particle.
///
/// # Errors
/// - `KernelError::Distribution` for the first NaN, infinite, or oversized
///   mean.
pub fn draw_poisson_column<R: Rng + ?Sized>(
    means: ArrayView1<'_, f64>, rng: &mut R,
) -> KernelResult<Array1<f64>> {
    means
        .iter()
        .map(|&mean| draw_poisson(mean, rng))
        .collect::<KernelResult<Vec<f64>>>()
        .map(Array1::from)
}

/// Geometric random walk `x · exp(ν · Z · dt)`, `Z ~ N(0, 1)` per particle.
///
/// With `ν = 0` the output equals the input exactly.
pub fn geometric_walk<R: Rng + ?Sized>(
    values: ArrayView1<'_, f64>, volatility: ArrayView1<'_, f64>, dt: f64, rng: &mut R,
) -> Array1<f64> {
    Zip::from(values).and(volatility).map_collect(|&x, &nu| {
        let z: f64 = rng.sample(StandardNormal);
        x * (nu * z * dt).exp()
    })
}

/// Clamp every entry of `table` to `≥ 0` in place.
pub fn clamp_non_negative(table: &mut Array2<f64>) {
    table.mapv_inplace(|x| x.max(0.0));
}
