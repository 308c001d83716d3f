use candle_core::{Result, Tensor};

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Gaussian log-likelihood with a known variance, summed over every
/// element
///
/// llik = -0.5 * sum_{i,w} [ (y(i,w) - yhat(i,w))^2 / var + log(2π var) ]
///
/// * `y_nd` - data tensor (observed data)
/// * `hat_d` - predicted mean, broadcast against `y_nd`
/// * `var` - noise variance
///
pub fn gaussian_likelihood(y_nd: &Tensor, hat_d: &Tensor, var: f64) -> Result<Tensor> {
    let nelem = y_nd.elem_count() as f64;
    let sq = y_nd.broadcast_sub(hat_d)?.sqr()?.sum_all()?;
    sq.affine(-0.5 / var, -0.5 * nelem * (LN_2PI + var.ln()))
}

/// Log density of an isotropic Gaussian prior, summed over coordinates
///
/// log p(x) = -0.5 * sum_k [ (x(k) - m(k))^2 / var + log(2π var) ]
///
/// * `x_k` - state
/// * `mean_k` - prior mean, broadcast against `x_k`
/// * `var` - prior variance
///
pub fn gaussian_prior_log_prob(x_k: &Tensor, mean_k: &Tensor, var: f64) -> Result<Tensor> {
    gaussian_likelihood(x_k, mean_k, var)
}

/// Log density of a Gaussian prior with a full precision matrix
///
/// log p(x) = -0.5 * [ (x - m)ᵗ Λ (x - m) + k log(2π) - log|Λ| ]
///
/// * `x_k` - state (k)
/// * `mean_k` - prior mean (k)
/// * `precision_kk` - Λ = Σ⁻¹ (k x k)
/// * `log_det_precision` - log|Λ|, precomputed by the caller
///
pub fn gaussian_prior_log_prob_full(
    x_k: &Tensor,
    mean_k: &Tensor,
    precision_kk: &Tensor,
    log_det_precision: f64,
) -> Result<Tensor> {
    let kk = x_k.elem_count() as f64;
    let d_k1 = x_k.sub(mean_k)?.unsqueeze(1)?;
    let quad = d_k1.t()?.matmul(&precision_kk.matmul(&d_k1)?)?.sum_all()?;
    quad.affine(-0.5, -0.5 * (kk * LN_2PI - log_det_precision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use candle_core::Device;

    #[test]
    fn gaussian_likelihood_at_perfect_fit() -> Result<()> {
        let device = Device::Cpu;
        let y = Tensor::from_vec(vec![0.0f64, 1.0, 2.0], 3, &device)?;
        let llik = gaussian_likelihood(&y, &y, 1.0)?.to_scalar::<f64>()?;
        assert_abs_diff_eq!(llik, -1.5 * LN_2PI, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn gaussian_likelihood_broadcasts_mean() -> Result<()> {
        let device = Device::Cpu;
        // two samples of a 2-d observation, mean (1, 1), variance 2
        let y = Tensor::from_vec(vec![1.0f64, 3.0, -1.0, 1.0], (2, 2), &device)?;
        let mu = Tensor::from_vec(vec![1.0f64, 1.0], 2, &device)?;
        let llik = gaussian_likelihood(&y, &mu, 2.0)?.to_scalar::<f64>()?;
        let expected = -0.5 * (8.0 / 2.0) - 2.0 * (LN_2PI + 2f64.ln());
        assert_abs_diff_eq!(llik, expected, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn full_precision_matches_isotropic() -> Result<()> {
        let device = Device::Cpu;
        let x = Tensor::from_vec(vec![0.5f64, -1.0], 2, &device)?;
        let m = Tensor::from_vec(vec![1.0f64, 0.0], 2, &device)?;
        let var = 4.0;
        let lambda = Tensor::from_vec(vec![0.25f64, 0.0, 0.0, 0.25], (2, 2), &device)?;
        let full = gaussian_prior_log_prob_full(&x, &m, &lambda, 2.0 * 0.25f64.ln())?
            .to_scalar::<f64>()?;
        let iso = gaussian_prior_log_prob(&x, &m, var)?.to_scalar::<f64>()?;
        assert_abs_diff_eq!(full, iso, epsilon = 1e-12);
        Ok(())
    }
}
