//! D-FAF and P-FAF iterative transforms.
//!
//! Both variants compute the recurrence
//!
//! ```text
//! y_0     = x
//! y_{k+1} = x * sin(a * y_k)            (D-FAF)
//! y_{k+1} = x * sin(a * y_k) + e_k      (P-FAF, e_k ~ N(0, noise_level²))
//! ```
//!
//! elementwise, for a fixed number of iterations. The noisy variant takes
//! its generator as an argument; nothing here touches global RNG state.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::trace;

use crate::array::NdArray;
use crate::error::{FafError, FafResult};

pub const DEFAULT_A: f64 = 1.0;
pub const DEFAULT_N_ITERATIONS: u32 = 10;
pub const DEFAULT_NOISE_LEVEL: f64 = 0.1;

/// One step of the recurrence: `x * sin(a * y)`.
fn step(x: &NdArray, y: &NdArray, a: f64) -> FafResult<NdArray> {
    x.zip_with(y, |xi, yi| xi * (a * yi).sin())
}

/// Deterministic transform.
///
/// `n_iterations == 0` returns a copy of `x`. NaN and infinities propagate
/// per IEEE-754.
pub fn d_faf(x: &NdArray, a: f64, n_iterations: u32) -> FafResult<NdArray> {
    let mut y = x.clone();
    for i in 0..n_iterations {
        y = step(x, &y, a)?;
        trace!(iteration = i, "d_faf step");
    }
    Ok(y)
}

/// Noisy transform.
///
/// Each iteration draws a fresh noise array of `x`'s shape from
/// `Normal(0, noise_level)`. A zero `noise_level` draws nothing and gives
/// exactly the [`d_faf`] result.
///
/// # Errors
///
/// Returns [`FafError::InvalidParameter`] if `noise_level` is negative,
/// NaN, or infinite.
pub fn p_faf<R: Rng + ?Sized>(
    x: &NdArray,
    a: f64,
    n_iterations: u32,
    noise_level: f64,
    rng: &mut R,
) -> FafResult<NdArray> {
    let normal = noise_distribution(noise_level)?;
    if noise_level == 0.0 {
        return d_faf(x, a, n_iterations);
    }

    let mut y = x.clone();
    for i in 0..n_iterations {
        let noise = NdArray::from_fn(x.shape(), || normal.sample(rng))?;
        y = step(x, &y, a)?.zip_with(&noise, |v, e| v + e)?;
        trace!(iteration = i, "p_faf step");
    }
    Ok(y)
}

/// Check that `noise_level` is a usable standard deviation.
///
/// # Errors
///
/// Returns [`FafError::InvalidParameter`] if it is negative, NaN, or
/// infinite.
pub fn validate_noise_level(noise_level: f64) -> FafResult<()> {
    if !noise_level.is_finite() || noise_level < 0.0 {
        return Err(FafError::InvalidParameter(format!(
            "`noise_level` must be finite and >= 0, got {noise_level}"
        )));
    }
    Ok(())
}

fn noise_distribution(noise_level: f64) -> FafResult<Normal<f64>> {
    validate_noise_level(noise_level)?;
    Normal::new(0.0, noise_level).map_err(|e| FafError::InvalidParameter(e.to_string()))
}
