//! State estimation by gradient descent on the negative log joint.
//!
//! The loss is `-Σ_n log N(y_n; f(x), σy²) - log p(x)`, differentiated
//! by candle. The prior term is dropped when no prior is given, in
//! which case the minimum is the maximum likelihood estimate.

use crate::closed_form::GaussianPrior;
use crate::environment::{Link, LinearParams};
use crate::errors::ensure_positive;
use crate::lentil_common::*;
use crate::linalg::{expect_len, expect_shape, inverse, log_det_spd};

use candle_core::{Device, Result as CandleResult, Tensor};
use candle_util::candle_gradient_descent::{gradient_descent, DescentTrace};
use candle_util::candle_inference::DescentConfig;
use candle_util::candle_loss_functions::{
    gaussian_likelihood, gaussian_prior_log_prob, gaussian_prior_log_prob_full,
};
use candle_util::candle_model_traits::StateLossT;

/// Negative log joint of a scalar state
pub struct ScalarStateLoss {
    y_n: Tensor,
    link: Link,
    params: LinearParams,
    var_y: f64,
    prior: Option<(Tensor, f64)>,
}

impl ScalarStateLoss {
    pub fn new(
        y: &[f64],
        link: Link,
        params: LinearParams,
        std_y: f64,
        prior: Option<&GaussianPrior>,
    ) -> anyhow::Result<Self> {
        if y.is_empty() {
            anyhow::bail!("no observations");
        }
        let device = Device::Cpu;
        let var_y = ensure_positive("std_y", std_y)?.powi(2);
        let prior = match prior {
            Some(p) => {
                let s_x = ensure_positive("s_x", p.s_x)?;
                Some((Tensor::from_slice(&[p.m_x], 1, &device)?, s_x))
            }
            None => None,
        };
        Ok(Self {
            y_n: Tensor::from_slice(y, y.len(), &device)?,
            link,
            params,
            var_y,
            prior,
        })
    }
}

impl StateLossT for ScalarStateLoss {
    fn loss(&self, x_k: &Tensor) -> CandleResult<Tensor> {
        let LinearParams { beta_0, beta_1 } = self.params;
        let hat = match self.link {
            Link::Linear => x_k.affine(beta_1, beta_0)?,
            Link::Quadratic => x_k.sqr()?.affine(beta_1, beta_0)?,
        };
        let nll = gaussian_likelihood(&self.y_n, &hat, self.var_y)?.neg()?;
        match &self.prior {
            Some((m_x, s_x)) => nll.sub(&gaussian_prior_log_prob(x_k, m_x, *s_x)?),
            None => Ok(nll),
        }
    }

    fn dim_state(&self) -> usize {
        1
    }
}

/// Gaussian prior on a vector state, `x ~ N(mean, cov)`
#[derive(Debug, Clone)]
pub struct StatePrior {
    pub mean: DVec,
    pub cov: Mat,
}

/// Negative log joint of a vector state seen through `y = Θx + b + ε`
/// with isotropic noise
pub struct AffineStateLoss {
    y_nd: Tensor,
    theta_dk: Tensor,
    b_d: Tensor,
    var_y: f64,
    dim_state: usize,
    prior: Option<(Tensor, Tensor, f64)>,
}

impl AffineStateLoss {
    /// * `y` - observations (d x n)
    /// * `theta` - Θ (d x k)
    /// * `b` - offset (d)
    /// * `std_y` - noise standard deviation, shared by all channels
    pub fn new(
        y: &Mat,
        theta: &Mat,
        b: &DVec,
        std_y: f64,
        prior: Option<&StatePrior>,
    ) -> anyhow::Result<Self> {
        let (dd, kk) = theta.shape();
        let nn = y.ncols();
        expect_shape(y, "observations", dd, nn)?;
        expect_len(b, "b", dd)?;
        if nn == 0 {
            anyhow::bail!("no observations");
        }
        let var_y = ensure_positive("std_y", std_y)?.powi(2);

        let device = Device::Cpu;
        // column-major d x n storage reads as row-major n x d
        let y_nd = Tensor::from_slice(y.as_slice(), (nn, dd), &device)?;
        let theta_t = theta.transpose();
        let theta_dk = Tensor::from_slice(theta_t.as_slice(), (dd, kk), &device)?;
        let b_d = Tensor::from_slice(b.as_slice(), dd, &device)?;

        let prior = match prior {
            Some(p) => {
                expect_len(&p.mean, "prior mean", kk)?;
                let precision = inverse(&p.cov, "prior covariance")?;
                let log_det_precision = -log_det_spd(&p.cov, "prior covariance")?;
                Some((
                    Tensor::from_slice(p.mean.as_slice(), kk, &device)?,
                    Tensor::from_slice(precision.as_slice(), (kk, kk), &device)?,
                    log_det_precision,
                ))
            }
            None => None,
        };

        Ok(Self {
            y_nd,
            theta_dk,
            b_d,
            var_y,
            dim_state: kk,
            prior,
        })
    }
}

impl StateLossT for AffineStateLoss {
    fn loss(&self, x_k: &Tensor) -> CandleResult<Tensor> {
        let hat_d = self
            .theta_dk
            .matmul(&x_k.unsqueeze(1)?)?
            .squeeze(1)?
            .add(&self.b_d)?;
        let nll = gaussian_likelihood(&self.y_nd, &hat_d, self.var_y)?.neg()?;
        match &self.prior {
            Some((mean_k, precision_kk, log_det)) => {
                nll.sub(&gaussian_prior_log_prob_full(x_k, mean_k, precision_kk, *log_det)?)
            }
            None => Ok(nll),
        }
    }

    fn dim_state(&self) -> usize {
        self.dim_state
    }
}

/// Iterates of a scalar descent run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescentHistory {
    /// state after each update
    pub x: Vec<f64>,
    /// loss at the state each update started from
    pub loss: Vec<f64>,
}

impl DescentHistory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Final state, or `None` after zero iterations
    pub fn estimate(&self) -> Option<f64> {
        self.x.last().copied()
    }

    /// Columns: iteration, x, loss
    pub fn to_mat(&self) -> Mat {
        Mat::from_fn(self.len(), 3, |i, j| match j {
            0 => (i + 1) as f64,
            1 => self.x[i],
            _ => self.loss[i],
        })
    }
}

impl From<DescentTrace> for DescentHistory {
    fn from(trace: DescentTrace) -> Self {
        Self {
            x: trace.x.into_iter().flatten().collect(),
            loss: trace.loss,
        }
    }
}

/// Iterates of a vector descent run
#[derive(Debug, Clone, Default)]
pub struct VectorDescentHistory {
    pub x: Vec<DVec>,
    pub loss: Vec<f64>,
}

impl VectorDescentHistory {
    pub fn estimate(&self) -> Option<&DVec> {
        self.x.last()
    }

    /// Columns: iteration, loss, x_1 ... x_k
    pub fn to_mat(&self) -> Mat {
        let kk = self.x.first().map(|x| x.len()).unwrap_or(0);
        Mat::from_fn(self.x.len(), kk + 2, |i, j| match j {
            0 => (i + 1) as f64,
            1 => self.loss[i],
            _ => self.x[i][j - 2],
        })
    }
}

impl From<DescentTrace> for VectorDescentHistory {
    fn from(trace: DescentTrace) -> Self {
        Self {
            x: trace.x.into_iter().map(DVec::from_vec).collect(),
            loss: trace.loss,
        }
    }
}

/// Descend on a scalar state from `x_init`
pub fn descend_scalar(
    y: &[f64],
    link: Link,
    params: LinearParams,
    std_y: f64,
    prior: Option<&GaussianPrior>,
    x_init: f64,
    config: &DescentConfig,
) -> anyhow::Result<DescentHistory> {
    let model = ScalarStateLoss::new(y, link, params, std_y, prior)?;
    let history = DescentHistory::from(gradient_descent(&model, &[x_init], config)?);
    if let (Some(x), Some(loss)) = (history.estimate(), history.loss.last()) {
        info!(
            "gradient descent: {} iterations, x = {}, loss = {}",
            history.len(),
            x,
            loss
        );
    }
    Ok(history)
}

/// Descend on a vector state observed through `Θx + b`
pub fn descend_affine(
    y: &Mat,
    theta: &Mat,
    b: &DVec,
    std_y: f64,
    prior: Option<&StatePrior>,
    x_init: &DVec,
    config: &DescentConfig,
) -> anyhow::Result<VectorDescentHistory> {
    let model = AffineStateLoss::new(y, theta, b, std_y, prior)?;
    let trace = gradient_descent(&model, x_init.as_slice(), config)?;
    Ok(trace.into())
}
