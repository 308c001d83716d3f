//! Typed configuration of agents and environments.
//!
//! Configurations are JSON documents of the shape
//! `{"name": "<variant>", "params": {...}}`. Each variant carries its
//! own record of recognized keys; unknown keys are rejected.

use crate::environment::Link;
use crate::errors::ConfigError;
use crate::lentil_common::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum EnvironmentConfig {
    StaticLinear(StaticEnvParams),
    StaticNonlinear(StaticEnvParams),
    /// recognized but not implemented
    LinearRegression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum AgentConfig {
    /// grid posterior, linear generating function, Gaussian prior
    ExactLinear(GridAgentParams),
    /// grid posterior, linear generating function, flat prior
    ExactLinearFlatPrior(GridAgentParams),
    /// grid posterior, quadratic generating function, Gaussian prior
    ExactNonlinear(GridAgentParams),
    #[serde(rename = "linear_mle_agent")]
    LinearMle(MleParams),
    #[serde(rename = "linear_map_agent")]
    LinearMap(MapParams),
    #[serde(rename = "gradient_descent_agent")]
    GradientDescent(DescentParams),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticEnvParams {
    pub beta_0: f64,
    pub beta_1: f64,
    pub std_y: f64,
}

impl Default for StaticEnvParams {
    fn default() -> Self {
        Self {
            beta_0: 3.0,
            beta_1: 2.0,
            std_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridAgentParams {
    pub beta_0: f64,
    pub beta_1: f64,
    pub std_y: f64,
    /// prior mean
    pub m_x: f64,
    /// prior variance
    pub s_x: f64,
    /// closed interval of hypotheses
    pub x_range: (f64, f64),
    pub n_grid: usize,
}

impl Default for GridAgentParams {
    fn default() -> Self {
        Self {
            beta_0: 3.0,
            beta_1: 2.0,
            std_y: 1.0,
            m_x: 4.0,
            s_x: 1.0,
            x_range: DEFAULT_X_RANGE,
            n_grid: DEFAULT_N_GRID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MleParams {
    pub beta_0: f64,
    pub beta_1: f64,
    pub std_y: f64,
}

impl Default for MleParams {
    fn default() -> Self {
        Self {
            beta_0: 3.0,
            beta_1: 2.0,
            std_y: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapParams {
    pub beta_0: f64,
    pub beta_1: f64,
    pub std_y: f64,
    pub m_x: f64,
    pub s_x: f64,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            beta_0: 3.0,
            beta_1: 2.0,
            std_y: 1.0,
            m_x: 4.0,
            s_x: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DescentParams {
    pub beta_0: f64,
    pub beta_1: f64,
    pub std_y: f64,
    pub link: Link,
    /// prior mean; no prior term in the loss when absent
    pub m_x: Option<f64>,
    pub s_x: f64,
    /// step size
    pub kappa: f64,
    pub n_iterations: usize,
    pub x_init: f64,
}

impl Default for DescentParams {
    fn default() -> Self {
        Self {
            beta_0: 3.0,
            beta_1: 2.0,
            std_y: 1.0,
            link: Link::Linear,
            m_x: None,
            s_x: 1.0,
            kappa: 0.01,
            n_iterations: 100,
            x_init: 5.0,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive and finite, found {}", value),
        })
    }
}

fn nonzero(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value != 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be non-zero and finite, found {}", value),
        })
    }
}

impl GridAgentParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("std_y", self.std_y)?;
        positive("s_x", self.s_x)?;
        let (lb, ub) = self.x_range;
        if !(lb < ub) {
            return Err(ConfigError::Invalid {
                field: "x_range",
                reason: format!("lower bound {} is not below upper bound {}", lb, ub),
            });
        }
        if self.n_grid < 2 {
            return Err(ConfigError::Invalid {
                field: "n_grid",
                reason: format!("need at least two points, found {}", self.n_grid),
            });
        }
        Ok(())
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AgentConfig::ExactLinear(p)
            | AgentConfig::ExactLinearFlatPrior(p)
            | AgentConfig::ExactNonlinear(p) => p.validate(),
            AgentConfig::LinearMle(p) => {
                positive("std_y", p.std_y)?;
                nonzero("beta_1", p.beta_1)
            }
            AgentConfig::LinearMap(p) => {
                positive("std_y", p.std_y)?;
                positive("s_x", p.s_x)
            }
            AgentConfig::GradientDescent(p) => {
                positive("std_y", p.std_y)?;
                positive("s_x", p.s_x)?;
                positive("kappa", p.kappa)?;
                if p.n_iterations == 0 {
                    return Err(ConfigError::Invalid {
                        field: "n_iterations",
                        reason: "need at least one iteration".into(),
                    });
                }
                Ok(())
            }
        }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.as_ref().display(), e))?;
        info!("Loaded agent config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl EnvironmentConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.as_ref().display(), e))?;
        info!("Loaded environment config from {}", path.as_ref().display());
        Ok(config)
    }
}
