//! Densities over a discretized hypothesis grid.

use crate::closed_form::GaussianPrior;
use crate::errors::{ensure_positive, EstimationError};
use crate::lentil_common::*;

use matrix_util::ndarray_util::linspace;

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// `n` evenly spaced hypotheses over the closed interval `range`
pub fn hypothesis_grid(range: (f64, f64), n: usize) -> Result<Grid1, EstimationError> {
    if n == 0 {
        return Err(EstimationError::EmptyGrid);
    }
    Ok(linspace(range.0, range.1, n))
}

/// `log N(v; mean, var)`
pub fn gaussian_log_density(v: f64, mean: f64, var: f64) -> f64 {
    -0.5 * ((v - mean).powi(2) / var + LN_2PI + var.ln())
}

/// `N(v; mean, var)`
pub fn gaussian_density(v: f64, mean: f64, var: f64) -> f64 {
    gaussian_log_density(v, mean, var).exp()
}

/// Log-likelihood of i.i.d. observations under every hypothesis
///
/// `Σ_n log N(y_n; f(x_i), σy²)`: the samples share one hidden state.
/// Hypotheses are evaluated in parallel, and each one sums its
/// observations in order, so the result does not depend on scheduling.
///
/// * `grid` - hypotheses `x_i`
/// * `y` - observations
/// * `f` - generating function
/// * `std_y` - noise standard deviation
///
pub fn log_likelihood<F>(grid: &Grid1, y: &[f64], f: F, std_y: f64) -> Result<Grid1, EstimationError>
where
    F: Fn(f64) -> f64 + Sync,
{
    if y.is_empty() {
        return Err(EstimationError::EmptyData);
    }
    let var = ensure_positive("std_y", std_y)?.powi(2);
    let mut llik = grid.mapv(&f);
    llik.par_mapv_inplace(|m| y.iter().map(|&y_n| gaussian_log_density(y_n, m, var)).sum());

    Ok(llik)
}

/// Linear-space likelihood of a single observation
pub fn likelihood<F>(grid: &Grid1, y: f64, f: F, std_y: f64) -> Result<Grid1, EstimationError>
where
    F: Fn(f64) -> f64,
{
    let var = ensure_positive("std_y", std_y)?.powi(2);
    Ok(grid.mapv(|x| gaussian_density(y, f(x), var)))
}

/// Gaussian log prior over the grid; a flat prior is all zeros
pub fn log_prior(grid: &Grid1, prior: Option<&GaussianPrior>) -> Result<Grid1, EstimationError> {
    match prior {
        Some(p) => {
            let s_x = ensure_positive("s_x", p.s_x)?;
            Ok(grid.mapv(|x| gaussian_log_density(x, p.m_x, s_x)))
        }
        None => Ok(Grid1::zeros(grid.len())),
    }
}
