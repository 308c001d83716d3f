//! Exact posterior of a vector state in a linear-Gaussian system.
//!
//! With prior `x ~ N(μx, Σx)` and `n` observations
//! `y_i ~ N(Θx + b, Σy)` the posterior is Gaussian:
//!
//! ```text
//! Σ_post = (Σx⁻¹ + n Θᵗ Σy⁻¹ Θ)⁻¹
//! μ_post = Σ_post (Θᵗ Σy⁻¹ n (ȳ - b) + Σx⁻¹ μx)
//! ```
//!
//! The identity-mixing case drops `Θ` and `b`.

use crate::lentil_common::*;
use crate::linalg::{expect_len, expect_shape, inverse};

use matrix_util::traits::StatOps;

#[derive(Debug, Clone, PartialEq)]
pub struct GaussianPosterior {
    pub mean: DVec,
    pub cov: Mat,
}

/// Known prior and noise of a linear-Gaussian system
#[derive(Debug, Clone)]
pub struct LinearGaussianSystem {
    pub prior_mean: DVec,
    pub prior_cov: Mat,
    pub sigma_y: Mat,
    /// `(Θ, b)`; identity and zero when absent
    pub mixing: Option<(Mat, DVec)>,
}

impl LinearGaussianSystem {
    pub fn identity(prior_mean: DVec, prior_cov: Mat, sigma_y: Mat) -> Self {
        Self {
            prior_mean,
            prior_cov,
            sigma_y,
            mixing: None,
        }
    }

    pub fn with_mixing(mut self, theta: Mat, b: DVec) -> Self {
        self.mixing = Some((theta, b));
        self
    }

    /// Posterior given observations as the columns of `y` (d x n)
    pub fn posterior(&self, y: &Mat) -> anyhow::Result<GaussianPosterior> {
        match &self.mixing {
            None => conditional_gaussian(y, &self.prior_mean, &self.prior_cov, &self.sigma_y),
            Some((theta, b)) => conditional_gaussian_affine(
                y,
                theta,
                b,
                &self.prior_mean,
                &self.prior_cov,
                &self.sigma_y,
            ),
        }
    }
}

/// Posterior with identity mixing
///
/// * `y` - observations (d x n)
/// * `prior_mean` - μx (d)
/// * `prior_cov` - Σx (d x d)
/// * `sigma_y` - Σy (d x d)
///
pub fn conditional_gaussian(
    y: &Mat,
    prior_mean: &DVec,
    prior_cov: &Mat,
    sigma_y: &Mat,
) -> anyhow::Result<GaussianPosterior> {
    let dd = prior_mean.len();
    expect_shape(y, "observations", dd, y.ncols())?;
    if y.ncols() == 0 {
        anyhow::bail!("no observations");
    }
    expect_shape(prior_cov, "Σx", dd, dd)?;
    expect_shape(sigma_y, "Σy", dd, dd)?;

    let nn = y.ncols() as f64;
    let ybar = y.row_means();

    let prior_precision = inverse(prior_cov, "Σx")?;
    let noise_precision = inverse(sigma_y, "Σy")?;

    let cov = inverse(&(&prior_precision + &noise_precision * nn), "posterior precision")?;
    let mean = &cov * (&noise_precision * (ybar * nn) + &prior_precision * prior_mean);

    Ok(GaussianPosterior { mean, cov })
}

/// Posterior with a known mixing matrix and offset
///
/// * `y` - observations (d x n)
/// * `theta` - Θ (d x k)
/// * `b` - offset (d)
/// * `prior_mean` - μx (k)
/// * `prior_cov` - Σx (k x k)
/// * `sigma_y` - Σy (d x d)
///
pub fn conditional_gaussian_affine(
    y: &Mat,
    theta: &Mat,
    b: &DVec,
    prior_mean: &DVec,
    prior_cov: &Mat,
    sigma_y: &Mat,
) -> anyhow::Result<GaussianPosterior> {
    let (dd, kk) = theta.shape();
    expect_shape(y, "observations", dd, y.ncols())?;
    if y.ncols() == 0 {
        anyhow::bail!("no observations");
    }
    expect_len(b, "b", dd)?;
    expect_len(prior_mean, "μx", kk)?;
    expect_shape(prior_cov, "Σx", kk, kk)?;
    expect_shape(sigma_y, "Σy", dd, dd)?;

    let nn = y.ncols() as f64;
    let resid = (y.row_means() - b) * nn;

    let prior_precision = inverse(prior_cov, "Σx")?;
    let noise_precision = inverse(sigma_y, "Σy")?;
    let theta_t_prec = theta.transpose() * &noise_precision;

    let cov = inverse(
        &(&prior_precision + &theta_t_prec * theta * nn),
        "posterior precision",
    )?;
    let mean = &cov * (&theta_t_prec * resid + &prior_precision * prior_mean);

    Ok(GaussianPosterior { mean, cov })
}
