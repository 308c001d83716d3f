//! Factor analysis by expectation-maximization.
//!
//! Observations `y ~ N(Θz, Σy)` with latent `z ~ N(0, I)` and a
//! diagonal `Σy`. Each iteration computes the posterior of every
//! column's latent vector (E-step) under the current `Θ, Σy`, then
//! refits `Θ` and the diagonal of `Σy` in closed form (M-step). All
//! iterates are kept.

use crate::errors::EstimationError;
use crate::lentil_common::*;
use crate::linalg::{expect_shape, inverse, log_det_spd};

use indicatif::{ProgressBar, ProgressDrawTarget};
use matrix_util::dmatrix_util::sample_mvn;
use matrix_util::traits::SampleOps;

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// largest row mean accepted by `fit`, relative to `1 + rms` of the row
const CENTRE_TOL: f64 = 1e-8;

#[derive(Debug, Clone)]
pub struct FactorAnalysis {
    pub num_iterations: usize,
    /// stop once the log-likelihood gain falls below this; `None` runs
    /// the full budget
    pub tolerance: Option<f64>,
    pub show_progress: bool,
    pub verbose: bool,
}

impl Default for FactorAnalysis {
    fn default() -> Self {
        Self {
            num_iterations: DEFAULT_EM_ITER,
            tolerance: None,
            show_progress: false,
            verbose: false,
        }
    }
}

/// Starting point of the EM iterations
#[derive(Debug, Clone)]
pub struct FactorAnalysisInit {
    /// Θ (d x k)
    pub theta: Mat,
    /// diagonal Σy (d x d)
    pub sigma_y: Mat,
}

impl FactorAnalysisInit {
    /// `Θ ~ N(0, 1)` entries, `Σy = diag(U(0.5, 1.5))`
    pub fn random<R: Rng + ?Sized>(dim_obs: usize, dim_latent: usize, rng: &mut R) -> Self {
        let theta = Mat::rnorm(dim_obs, dim_latent, rng);
        let diag = Mat::runif(dim_obs, 1, rng).add_scalar(0.5);
        let sigma_y = Mat::from_diagonal(&diag.column(0).into_owned());
        Self { theta, sigma_y }
    }
}

/// Per-iteration estimates; index `j` holds iteration `j`
#[derive(Debug, Clone, Default)]
pub struct FactorAnalysisTrace {
    /// latent posterior mean averaged over columns (k)
    pub posterior_mean: Vec<DVec>,
    /// latent posterior covariance, shared by all columns (k x k)
    pub posterior_cov: Vec<Mat>,
    /// Θ used by the E-step of iteration `j`
    pub theta: Vec<Mat>,
    /// Σy used by the E-step of iteration `j`
    pub sigma_y: Vec<Mat>,
    /// marginal log-likelihood at `theta[j], sigma_y[j]`
    pub log_likelihood: Vec<f64>,
}

impl FactorAnalysisTrace {
    pub fn num_iterations(&self) -> usize {
        self.log_likelihood.len()
    }

    pub fn last_theta(&self) -> Option<&Mat> {
        self.theta.last()
    }

    pub fn last_sigma_y(&self) -> Option<&Mat> {
        self.sigma_y.last()
    }
}

/// `log N(Y; 0, ΘΘᵗ + Σy)` summed over the columns of `y`
///
/// `-n/2 (d log 2π + log|C| + tr(C⁻¹ S))`, with `S = YYᵗ / n` the
/// second moment about zero
pub fn marginal_log_likelihood(y: &Mat, theta: &Mat, sigma_y: &Mat) -> anyhow::Result<f64> {
    let (dd, nn) = y.shape();
    expect_shape(theta, "Θ", dd, theta.ncols())?;
    expect_shape(sigma_y, "Σy", dd, dd)?;

    let cc = theta * theta.transpose() + sigma_y;
    let log_det = log_det_spd(&cc, "ΘΘᵗ + Σy")?;
    let cc_inv = inverse(&cc, "ΘΘᵗ + Σy")?;
    let trace = (cc_inv * second_moment(y)).trace();

    Ok(-0.5 * nn as f64 * (dd as f64 * LN_2PI + log_det + trace))
}

/// `YYᵗ / n`
fn second_moment(y: &Mat) -> Mat {
    y * y.transpose() / y.ncols() as f64
}

/// Every row of `y` should have zero mean
fn check_centred(y: &Mat) -> Result<(), EstimationError> {
    let nn = y.ncols() as f64;
    for (i, row) in y.row_iter().enumerate() {
        let mean = row.sum() / nn;
        let rms = (row.norm_squared() / nn).sqrt();
        if !(mean.abs() <= CENTRE_TOL * (1.0 + rms)) {
            return Err(EstimationError::NotCentred { row: i, mean });
        }
    }
    Ok(())
}

/// Diagonal noise covariance from `diag(resid)`
fn diagonal_noise(resid: &Mat) -> Result<Mat, EstimationError> {
    let diag = resid.diagonal();
    if let Some(&value) = diag.iter().find(|&&v| !(v > 0.0)) {
        return Err(EstimationError::NonPositive {
            what: "noise variance",
            value,
        });
    }
    Ok(Mat::from_diagonal(&diag))
}

impl FactorAnalysis {
    /// Run EM on the columns of `y` (d x n)
    ///
    /// * `y` - observations with centred rows, ideally z-scored
    /// * `init` - starting `Θ` and `Σy`
    ///
    pub fn fit(&self, y: &Mat, init: FactorAnalysisInit) -> anyhow::Result<FactorAnalysisTrace> {
        let (dd, nn) = y.shape();
        let kk = init.theta.ncols();
        expect_shape(&init.theta, "Θ", dd, kk)?;
        expect_shape(&init.sigma_y, "Σy", dd, dd)?;
        if nn == 0 {
            anyhow::bail!("no observations");
        }
        check_centred(y)?;

        let nn_f = nn as f64;
        let s_yy = second_moment(y);
        let eye_k = Mat::identity(kk, kk);

        let pb = ProgressBar::new(self.num_iterations as u64);
        if !self.show_progress || self.verbose {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let mut trace = FactorAnalysisTrace::default();
        let mut theta = init.theta;
        let mut sigma_y = init.sigma_y;

        for iter in 0..self.num_iterations {
            // E-step
            let cc = &theta * theta.transpose() + &sigma_y;
            let beta = theta.transpose() * inverse(&cc, "ΘΘᵗ + Σy")?;
            let z_kn = &beta * y;
            let post_cov = &eye_k - &beta * &theta;

            let llik = marginal_log_likelihood(y, &theta, &sigma_y)?;

            // sufficient statistics
            let delta = y * z_kn.transpose();
            let gamma = &z_kn * z_kn.transpose() + &post_cov * nn_f;

            trace.posterior_mean.push(z_kn.column_mean());
            trace.posterior_cov.push(post_cov);
            trace.theta.push(theta.clone());
            trace.sigma_y.push(sigma_y.clone());
            trace.log_likelihood.push(llik);

            if self.verbose {
                info!("[{}] log-likelihood: {}", iter + 1, llik);
            } else {
                debug!("[{}] log-likelihood: {}", iter + 1, llik);
            }
            pb.inc(1);

            if let [.., prev, curr] = trace.log_likelihood[..] {
                if curr < prev - 1e-8 * prev.abs().max(1.0) {
                    warn!(
                        "log-likelihood decreased at iteration {}: {} -> {}",
                        iter + 1,
                        prev,
                        curr
                    );
                }
                if let Some(tol) = self.tolerance {
                    if curr - prev < tol {
                        info!("converged after {} iterations", iter + 1);
                        break;
                    }
                }
            }

            if iter + 1 == self.num_iterations {
                break;
            }

            // M-step
            theta = &delta * inverse(&gamma, "E[zzᵗ]")?;
            let resid = &s_yy - &theta * delta.transpose() / nn_f;
            // channels are conditionally independent given z
            sigma_y = diagonal_noise(&resid)?;
        }
        pb.finish_and_clear();

        if let Some(llik) = trace.log_likelihood.last() {
            info!(
                "factor analysis: {} iterations, final log-likelihood {}",
                trace.num_iterations(),
                llik
            );
        }

        Ok(trace)
    }
}

/// Draw `n` columns `y = Θz + ε`, `z ~ N(0, I)`, `ε ~ N(0, diag(noise_var))`
///
/// Returns `(z, y)` with shapes (k x n) and (d x n)
pub fn simulate_factor_data<R: Rng + ?Sized>(
    theta: &Mat,
    noise_var: &DVec,
    n: usize,
    rng: &mut R,
) -> anyhow::Result<(Mat, Mat)> {
    let (dd, kk) = theta.shape();
    let z = Mat::rnorm(kk, n, rng);
    let noise = sample_mvn(&DVec::zeros(dd), &Mat::from_diagonal(noise_var), n, rng)?;
    let y = theta * &z + noise;
    Ok((z, y))
}
