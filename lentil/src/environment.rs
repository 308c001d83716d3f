//! Simulated environments.
//!
//! An environment hides a state `x` and emits noisy observations
//! `y = f(x) + ε`. The scalar environments come in two kinds, a
//! linear `f(x) = β0 + β1 x` and a quadratic `f(x) = β0 + β1 x²`; the
//! multivariate one is affine, `f(x) = Θx + b`, with correlated noise.
//! Every draw takes the random source explicitly.

use crate::config::{EnvironmentConfig, StaticEnvParams};
use crate::errors::{ensure_positive, ConfigError};
use crate::lentil_common::*;
use crate::linalg::{expect_len, expect_shape};

use matrix_util::dmatrix_util::sample_mvn;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Intercept and slope of the generating function
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub beta_0: f64,
    pub beta_1: f64,
}

/// Shape of the scalar generating function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    /// `β0 + β1 x`
    #[default]
    Linear,
    /// `β0 + β1 x²`
    Quadratic,
}

impl Link {
    pub fn apply(&self, params: &LinearParams, x: f64) -> f64 {
        match self {
            Link::Linear => params.beta_0 + params.beta_1 * x,
            Link::Quadratic => params.beta_0 + params.beta_1 * x * x,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    StaticLinear,
    StaticNonlinear,
}

impl EnvironmentKind {
    pub fn link(&self) -> Link {
        match self {
            EnvironmentKind::StaticLinear => Link::Linear,
            EnvironmentKind::StaticNonlinear => Link::Quadratic,
        }
    }
}

/// A static scalar environment: `build` fixes the hidden state,
/// `generate` draws observations of it
#[derive(Debug, Clone)]
pub struct Environment {
    kind: EnvironmentKind,
    params: LinearParams,
    noise: Normal<f64>,
    state: Option<f64>,
}

impl Environment {
    pub fn new(config: &EnvironmentConfig) -> anyhow::Result<Self> {
        match config {
            EnvironmentConfig::StaticLinear(p) => Self::with_kind(EnvironmentKind::StaticLinear, p),
            EnvironmentConfig::StaticNonlinear(p) => {
                Self::with_kind(EnvironmentKind::StaticNonlinear, p)
            }
            EnvironmentConfig::LinearRegression => {
                Err(ConfigError::Unsupported("linear_regression environment".into()).into())
            }
        }
    }

    pub fn with_kind(kind: EnvironmentKind, p: &StaticEnvParams) -> anyhow::Result<Self> {
        let params = LinearParams {
            beta_0: p.beta_0,
            beta_1: p.beta_1,
        };
        // σ = 0 would make the likelihood degenerate
        let std_y = ensure_positive("std_y", p.std_y)?;
        let noise = Normal::new(0.0, std_y).map_err(|e| anyhow::anyhow!("std_y: {}", e))?;
        Ok(Self {
            kind,
            params,
            noise,
            state: None,
        })
    }

    pub fn kind(&self) -> EnvironmentKind {
        self.kind
    }

    pub fn params(&self) -> &LinearParams {
        &self.params
    }

    pub fn std_y(&self) -> f64 {
        self.noise.std_dev()
    }

    pub fn state(&self) -> Option<f64> {
        self.state
    }

    /// Noise-free `f(x)`
    pub fn generating_function(&self, x: f64) -> f64 {
        self.kind.link().apply(&self.params, x)
    }

    /// One noisy observation at `x`
    pub fn sample<R: Rng + ?Sized>(&self, x: f64, rng: &mut R) -> f64 {
        self.generating_function(x) + self.noise.sample(rng)
    }

    /// `n` independent observations at the same `x`
    pub fn sample_n<R: Rng + ?Sized>(&self, x: f64, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.sample(x, rng)).collect()
    }

    /// One observation per state in `xs`
    pub fn sample_batch<R: Rng + ?Sized>(&self, xs: &[f64], rng: &mut R) -> Vec<f64> {
        xs.iter().map(|&x| self.sample(x, rng)).collect()
    }

    /// Fix the hidden state for subsequent `generate` calls
    pub fn build(&mut self, x: f64) {
        self.state = Some(x);
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> anyhow::Result<f64> {
        let x = self.built_state()?;
        Ok(self.sample(x, rng))
    }

    pub fn generate_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> anyhow::Result<Vec<f64>> {
        let x = self.built_state()?;
        Ok(self.sample_n(x, n, rng))
    }

    fn built_state(&self) -> anyhow::Result<f64> {
        self.state
            .ok_or_else(|| anyhow::anyhow!("call `build` with a hidden state before `generate`"))
    }
}

/// `y = Θx + b + ε`, `ε ~ N(0, Σy)`
#[derive(Debug, Clone)]
pub struct MultivariateEnvironment {
    theta: Mat,
    b: DVec,
    sigma_y: Mat,
    state: Option<DVec>,
}

impl MultivariateEnvironment {
    /// * `theta` - mixing matrix (d x k)
    /// * `b` - offset (d)
    /// * `sigma_y` - noise covariance (d x d)
    pub fn new(theta: Mat, b: DVec, sigma_y: Mat) -> anyhow::Result<Self> {
        let dd = theta.nrows();
        expect_len(&b, "b", dd)?;
        expect_shape(&sigma_y, "Σy", dd, dd)?;
        Ok(Self {
            theta,
            b,
            sigma_y,
            state: None,
        })
    }

    /// Identity mixing, zero offset
    pub fn identity(sigma_y: Mat) -> anyhow::Result<Self> {
        let dd = sigma_y.nrows();
        Self::new(Mat::identity(dd, dd), DVec::zeros(dd), sigma_y)
    }

    pub fn dim_obs(&self) -> usize {
        self.theta.nrows()
    }

    pub fn dim_state(&self) -> usize {
        self.theta.ncols()
    }

    pub fn theta(&self) -> &Mat {
        &self.theta
    }

    pub fn b(&self) -> &DVec {
        &self.b
    }

    pub fn sigma_y(&self) -> &Mat {
        &self.sigma_y
    }

    pub fn generating_function(&self, x: &DVec) -> anyhow::Result<DVec> {
        expect_len(x, "x", self.dim_state())?;
        Ok(&self.theta * x + &self.b)
    }

    /// `n` observations at `x` as the columns of a d x n matrix
    pub fn sample_n<R: Rng + ?Sized>(&self, x: &DVec, n: usize, rng: &mut R) -> anyhow::Result<Mat> {
        let mean = self.generating_function(x)?;
        sample_mvn(&mean, &self.sigma_y, n, rng)
    }

    /// One observation per column of `xs` (k x n)
    pub fn sample_batch<R: Rng + ?Sized>(&self, xs: &Mat, rng: &mut R) -> anyhow::Result<Mat> {
        expect_shape(xs, "states", self.dim_state(), xs.ncols())?;
        let dd = self.dim_obs();
        let mut yy = sample_mvn(&DVec::zeros(dd), &self.sigma_y, xs.ncols(), rng)?;
        yy += &self.theta * xs;
        for mut y_j in yy.column_iter_mut() {
            y_j += &self.b;
        }
        Ok(yy)
    }

    pub fn build(&mut self, x: DVec) -> anyhow::Result<()> {
        expect_len(&x, "x", self.dim_state())?;
        self.state = Some(x);
        Ok(())
    }

    pub fn generate_n<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> anyhow::Result<Mat> {
        let x = self
            .state
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("call `build` with a hidden state before `generate`"))?;
        self.sample_n(x, n, rng)
    }
}
