//! Unnormalized posteriors over a hypothesis grid.

use crate::errors::{EstimationError, LinalgError};
use crate::lentil_common::*;

use matrix_util::ndarray_util::{argmax, exp_minus_max};

/// Everything an exact grid agent computes for one batch of data
#[derive(Debug, Clone)]
pub struct GridPosterior {
    pub grid: Grid1,
    pub log_likelihood: Grid1,
    pub log_prior: Grid1,
    /// `exp(llik + lprior - max)`: peaks at exactly one
    pub posterior: Grid1,
}

/// `exp(llik[i] + lprior[i] - max_j(llik[j] + lprior[j]))`
///
/// The result is shaped like the posterior but not normalized; its
/// largest element is one. A prior that does not overlap the
/// likelihood yields a nearly-zero array, which is still returned.
pub fn combine_log_space(log_likelihood: &Grid1, log_prior: &Grid1) -> anyhow::Result<Grid1> {
    if log_likelihood.len() != log_prior.len() {
        return Err(LinalgError::Shape {
            what: "log prior",
            expected: (log_likelihood.len(), 1),
            found: (log_prior.len(), 1),
        }
        .into());
    }
    if log_likelihood.is_empty() {
        return Err(EstimationError::EmptyGrid.into());
    }
    let log_joint = log_likelihood + log_prior;
    Ok(exp_minus_max(&log_joint).ok_or(EstimationError::NoFinitePosterior)?)
}

impl GridPosterior {
    pub fn new(grid: Grid1, log_likelihood: Grid1, log_prior: Grid1) -> anyhow::Result<Self> {
        if grid.len() != log_likelihood.len() {
            return Err(LinalgError::Shape {
                what: "log likelihood",
                expected: (grid.len(), 1),
                found: (log_likelihood.len(), 1),
            }
            .into());
        }
        let posterior = combine_log_space(&log_likelihood, &log_prior)?;
        Ok(Self {
            grid,
            log_likelihood,
            log_prior,
            posterior,
        })
    }

    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Grid value with the highest posterior; the first one on ties
    pub fn mode(&self) -> f64 {
        match argmax(&self.posterior) {
            Some((i, _)) => self.grid[i],
            None => f64::NAN,
        }
    }

    fn spacing(&self) -> f64 {
        if self.grid.len() > 1 {
            self.grid[1] - self.grid[0]
        } else {
            1.0
        }
    }

    /// Density that sums to one over the grid, `Σ p_i Δ = 1`
    pub fn normalized(&self) -> Grid1 {
        let mass = self.posterior.sum() * self.spacing();
        &self.posterior / mass
    }

    /// `Σ x_i p_i / Σ p_i`
    pub fn mean(&self) -> f64 {
        (&self.grid * &self.posterior).sum() / self.posterior.sum()
    }

    /// Columns: hypothesis, log-likelihood, log-prior, posterior
    pub fn to_mat(&self) -> Mat {
        let n = self.len();
        Mat::from_fn(n, 4, |i, j| match j {
            0 => self.grid[i],
            1 => self.log_likelihood[i],
            2 => self.log_prior[i],
            _ => self.posterior[i],
        })
    }
}
