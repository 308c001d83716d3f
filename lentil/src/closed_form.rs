//! Closed-form point estimates of a scalar state observed through
//! `y = β0 + β1 x + ε`, `ε ~ N(0, σy²)`.

use crate::environment::LinearParams;
use crate::errors::{ensure_positive, EstimationError};

use serde::{Deserialize, Serialize};

/// `x ~ N(m_x, s_x)`; `s_x` is a variance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianPrior {
    pub m_x: f64,
    pub s_x: f64,
}

pub fn sample_mean(y: &[f64]) -> Result<f64, EstimationError> {
    if y.is_empty() {
        return Err(EstimationError::EmptyData);
    }
    Ok(y.iter().sum::<f64>() / y.len() as f64)
}

/// Maximum likelihood estimate `x̂ = (ȳ - β0) / β1`
///
/// The noise variance only scales the log-likelihood, so it does not
/// move the maximum.
pub fn mle_estimate(y: &[f64], params: &LinearParams) -> Result<f64, EstimationError> {
    if params.beta_1 == 0.0 {
        return Err(EstimationError::ZeroSlope);
    }
    Ok((sample_mean(y)? - params.beta_0) / params.beta_1)
}

/// Posterior mode with unit prior and unit noise variance, treating
/// the sample mean as a single observation:
///
/// `x̂ = (β1 (ȳ - β0) + m_x) / (β1² + 1)`
pub fn map_estimate_unit_variance(
    y: &[f64],
    params: &LinearParams,
    m_x: f64,
) -> Result<f64, EstimationError> {
    let ybar = sample_mean(y)?;
    let LinearParams { beta_0, beta_1 } = *params;
    Ok((beta_1 * (ybar - beta_0) + m_x) / (beta_1 * beta_1 + 1.0))
}

/// Posterior mode, a precision-weighted average of the data and the
/// prior mean:
///
/// `x̂ = (n β1 (ȳ - β0) / σy² + m_x / s_x) / (n β1² / σy² + 1 / s_x)`
///
/// With one observation and unit variances this is
/// [`map_estimate_unit_variance`]; as `n` grows it approaches the MLE.
pub fn map_estimate(
    y: &[f64],
    params: &LinearParams,
    std_y: f64,
    prior: &GaussianPrior,
) -> Result<f64, EstimationError> {
    let ybar = sample_mean(y)?;
    let var_y = ensure_positive("std_y", std_y)?.powi(2);
    let s_x = ensure_positive("s_x", prior.s_x)?;
    let nn = y.len() as f64;
    let LinearParams { beta_0, beta_1 } = *params;

    let precision = nn * beta_1 * beta_1 / var_y + 1.0 / s_x;
    Ok((nn * beta_1 * (ybar - beta_0) / var_y + prior.m_x / s_x) / precision)
}

/// Posterior variance `(n β1² / σy² + 1 / s_x)⁻¹`; without a prior
/// this is the sampling variance of the MLE
pub fn posterior_variance(
    n: usize,
    params: &LinearParams,
    std_y: f64,
    prior: Option<&GaussianPrior>,
) -> Result<f64, EstimationError> {
    let var_y = ensure_positive("std_y", std_y)?.powi(2);
    let prior_precision = match prior {
        Some(p) => 1.0 / ensure_positive("s_x", p.s_x)?,
        None => 0.0,
    };
    let precision = n as f64 * params.beta_1.powi(2) / var_y + prior_precision;
    Ok(1.0 / ensure_positive("posterior precision", precision)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PARAMS: LinearParams = LinearParams {
        beta_0: 3.0,
        beta_1: 2.0,
    };

    #[test]
    fn mle_inverts_the_generating_function() -> anyhow::Result<()> {
        assert_abs_diff_eq!(mle_estimate(&[7.0], &PARAMS)?, 2.0);
        assert_abs_diff_eq!(mle_estimate(&[6.0, 8.0], &PARAMS)?, 2.0);
        Ok(())
    }

    #[test]
    fn textbook_map_example() -> anyhow::Result<()> {
        assert_abs_diff_eq!(
            map_estimate_unit_variance(&[7.0], &PARAMS, 4.0)?,
            2.4,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn general_map_reduces_to_textbook_case() -> anyhow::Result<()> {
        let prior = GaussianPrior { m_x: 4.0, s_x: 1.0 };
        let general = map_estimate(&[7.0], &PARAMS, 1.0, &prior)?;
        let textbook = map_estimate_unit_variance(&[7.0], &PARAMS, 4.0)?;
        assert_abs_diff_eq!(general, textbook, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn vague_prior_gives_mle() -> anyhow::Result<()> {
        let prior = GaussianPrior { m_x: 4.0, s_x: 1e12 };
        let y = [6.5, 7.2, 7.9];
        assert_abs_diff_eq!(
            map_estimate(&y, &PARAMS, 1.0, &prior)?,
            mle_estimate(&y, &PARAMS)?,
            epsilon = 1e-9
        );
        Ok(())
    }

    #[test]
    fn posterior_variance_shrinks_with_data() -> anyhow::Result<()> {
        let prior = GaussianPrior { m_x: 4.0, s_x: 1.0 };
        assert_abs_diff_eq!(
            posterior_variance(1, &PARAMS, 1.0, Some(&prior))?,
            0.2,
            epsilon = 1e-12
        );
        assert!(
            posterior_variance(30, &PARAMS, 1.0, Some(&prior))?
                < posterior_variance(1, &PARAMS, 1.0, Some(&prior))?
        );
        assert_abs_diff_eq!(
            posterior_variance(4, &PARAMS, 1.0, None)?,
            1.0 / 16.0,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn degenerate_inputs_are_errors() {
        assert_eq!(mle_estimate(&[], &PARAMS), Err(EstimationError::EmptyData));
        let flat = LinearParams {
            beta_0: 3.0,
            beta_1: 0.0,
        };
        assert_eq!(mle_estimate(&[1.0], &flat), Err(EstimationError::ZeroSlope));
        assert!(posterior_variance(0, &PARAMS, 1.0, None).is_err());
    }
}
