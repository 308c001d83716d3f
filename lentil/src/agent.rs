//! Agents: estimators of a hidden static state from observations.
//!
//! An agent is built from its typed configuration and answers one
//! question, `infer_state(y)`. Exact agents evaluate the posterior on
//! a grid of hypotheses; the closed-form agents return a point; the
//! descent agent returns every iterate of its optimization.

use crate::closed_form::{map_estimate, mle_estimate, GaussianPrior};
use crate::config::{AgentConfig, DescentParams, GridAgentParams, MapParams, MleParams};
use crate::environment::{Link, LinearParams};
use crate::gradient::{descend_scalar, DescentHistory};
use crate::grid::{hypothesis_grid, log_likelihood, log_prior};
use crate::lentil_common::*;
use crate::posterior::GridPosterior;

use candle_util::candle_inference::DescentConfig;

/// Grid posterior agent
#[derive(Debug, Clone)]
pub struct GridAgent {
    params: LinearParams,
    link: Link,
    std_y: f64,
    prior: Option<GaussianPrior>,
    grid: Grid1,
}

impl GridAgent {
    pub fn new(p: &GridAgentParams, link: Link, flat_prior: bool) -> anyhow::Result<Self> {
        p.validate()?;
        let prior = if flat_prior {
            None
        } else {
            Some(GaussianPrior {
                m_x: p.m_x,
                s_x: p.s_x,
            })
        };
        Ok(Self {
            params: LinearParams {
                beta_0: p.beta_0,
                beta_1: p.beta_1,
            },
            link,
            std_y: p.std_y,
            prior,
            grid: hypothesis_grid(p.x_range, p.n_grid)?,
        })
    }

    pub fn grid(&self) -> &Grid1 {
        &self.grid
    }

    pub fn infer_state(&self, y: &[f64]) -> anyhow::Result<GridPosterior> {
        let (params, link) = (self.params, self.link);
        let llik = log_likelihood(&self.grid, y, |x| link.apply(&params, x), self.std_y)?;
        let lprior = log_prior(&self.grid, self.prior.as_ref())?;
        GridPosterior::new(self.grid.clone(), llik, lprior)
    }
}

#[derive(Debug, Clone)]
pub struct DescentAgent {
    params: LinearParams,
    link: Link,
    std_y: f64,
    prior: Option<GaussianPrior>,
    x_init: f64,
    config: DescentConfig,
}

impl DescentAgent {
    pub fn new(p: &DescentParams) -> Self {
        Self {
            params: LinearParams {
                beta_0: p.beta_0,
                beta_1: p.beta_1,
            },
            link: p.link,
            std_y: p.std_y,
            prior: p.m_x.map(|m_x| GaussianPrior { m_x, s_x: p.s_x }),
            x_init: p.x_init,
            config: DescentConfig {
                learning_rate: p.kappa,
                num_iterations: p.n_iterations,
                ..Default::default()
            },
        }
    }

    pub fn with_progress(mut self, show_progress: bool, verbose: bool) -> Self {
        self.config.show_progress = show_progress;
        self.config.verbose = verbose;
        self
    }

    pub fn infer_state(&self, y: &[f64]) -> anyhow::Result<DescentHistory> {
        descend_scalar(
            y,
            self.link,
            self.params,
            self.std_y,
            self.prior.as_ref(),
            self.x_init,
            &self.config,
        )
    }
}

/// The closed set of estimators
#[derive(Debug, Clone)]
pub enum Agent {
    /// `exact_linear`, `exact_linear_flat_prior`, `exact_nonlinear`
    Grid(GridAgent),
    LinearMle(MleParams),
    LinearMap(MapParams),
    GradientDescent(DescentAgent),
}

/// What `infer_state` returns, by agent kind
#[derive(Debug, Clone)]
pub enum Inference {
    Point(f64),
    Grid(GridPosterior),
    Descent(DescentHistory),
}

impl Inference {
    /// Single-number summary: the point itself, the grid mode, or the
    /// last iterate
    pub fn estimate(&self) -> f64 {
        match self {
            Inference::Point(x) => *x,
            Inference::Grid(post) => post.mode(),
            Inference::Descent(history) => history.estimate().unwrap_or(f64::NAN),
        }
    }

    /// Tabular form for output, if there is more than a point
    pub fn to_mat(&self) -> Option<Mat> {
        match self {
            Inference::Point(_) => None,
            Inference::Grid(post) => Some(post.to_mat()),
            Inference::Descent(history) => Some(history.to_mat()),
        }
    }
}

impl Agent {
    pub fn new(config: &AgentConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let agent = match config {
            AgentConfig::ExactLinear(p) => Agent::Grid(GridAgent::new(p, Link::Linear, false)?),
            AgentConfig::ExactLinearFlatPrior(p) => {
                Agent::Grid(GridAgent::new(p, Link::Linear, true)?)
            }
            AgentConfig::ExactNonlinear(p) => {
                Agent::Grid(GridAgent::new(p, Link::Quadratic, false)?)
            }
            AgentConfig::LinearMle(p) => Agent::LinearMle(p.clone()),
            AgentConfig::LinearMap(p) => Agent::LinearMap(p.clone()),
            AgentConfig::GradientDescent(p) => Agent::GradientDescent(DescentAgent::new(p)),
        };
        debug!("agent: {:?}", agent);
        Ok(agent)
    }

    pub fn infer_state(&self, y: &[f64]) -> anyhow::Result<Inference> {
        let out = match self {
            Agent::Grid(agent) => Inference::Grid(agent.infer_state(y)?),
            Agent::LinearMle(p) => {
                let params = LinearParams {
                    beta_0: p.beta_0,
                    beta_1: p.beta_1,
                };
                Inference::Point(mle_estimate(y, &params)?)
            }
            Agent::LinearMap(p) => {
                let params = LinearParams {
                    beta_0: p.beta_0,
                    beta_1: p.beta_1,
                };
                let prior = GaussianPrior {
                    m_x: p.m_x,
                    s_x: p.s_x,
                };
                Inference::Point(map_estimate(y, &params, p.std_y, &prior)?)
            }
            Agent::GradientDescent(agent) => Inference::Descent(agent.infer_state(y)?),
        };
        Ok(out)
    }
}
