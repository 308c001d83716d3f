use lentil::factor_analysis::*;
use lentil::lentil_common::*;

use approx::assert_abs_diff_eq;
use matrix_util::traits::{MatOps, StatOps};

fn loadings() -> Mat {
    Mat::from_column_slice(
        8,
        2,
        &[
            1.0, 0.9, 0.8, 0.7, 0.1, 0.0, -0.2, 0.3, // factor 1
            0.0, 0.2, -0.3, 0.1, 1.0, 0.9, 0.8, -0.7, // factor 2
        ],
    )
}

fn zscored_data(rng: &mut StdRng) -> anyhow::Result<Mat> {
    let (_, y) = simulate_factor_data(&loadings(), &DVec::from_element(8, 0.09), 300, rng)?;
    Ok(y.scale_rows())
}

#[test]
fn em_on_factor_data() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
    let y = zscored_data(&mut rng)?;
    let init = FactorAnalysisInit::random(8, 2, &mut rng);
    let trace = FactorAnalysis::default().fit(&y, init)?;

    assert_eq!(trace.num_iterations(), DEFAULT_EM_ITER);
    assert_eq!(trace.posterior_mean.len(), DEFAULT_EM_ITER);

    // centred rows give centred latent means
    for mean in &trace.posterior_mean {
        assert!(mean.iter().all(|v| v.abs() < 1e-8));
    }

    let post_cov = trace.posterior_cov.last().ok_or(anyhow::anyhow!("empty"))?;
    assert!(post_cov.diagonal().iter().all(|&v| v < 0.25));

    for w in trace.log_likelihood.windows(2) {
        assert!(w[1] >= w[0] - 1e-8 * w[0].abs(), "{} -> {}", w[0], w[1]);
    }
    Ok(())
}

#[test]
fn fitted_model_explains_sample_covariance() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let y = zscored_data(&mut rng)?;
    let init = FactorAnalysisInit::random(8, 2, &mut rng);
    let trace = FactorAnalysis {
        num_iterations: 300,
        ..Default::default()
    }
    .fit(&y, init)?;

    let theta = trace.last_theta().ok_or(anyhow::anyhow!("empty"))?;
    let sigma_y = trace.last_sigma_y().ok_or(anyhow::anyhow!("empty"))?;
    let fitted = theta * theta.transpose() + sigma_y;
    assert_abs_diff_eq!(fitted, y.row_covariance(), epsilon = 0.25);

    // noise variances stay positive
    assert!(sigma_y.diagonal().iter().all(|&v| v > 0.0));
    Ok(())
}

#[test]
fn tolerance_stops_early() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(2);
    let y = zscored_data(&mut rng)?;
    let init = FactorAnalysisInit::random(8, 2, &mut rng);
    let tol = 1e-3;
    let trace = FactorAnalysis {
        num_iterations: 2000,
        tolerance: Some(tol),
        ..Default::default()
    }
    .fit(&y, init)?;

    let n = trace.num_iterations();
    assert!(n < 2000);
    assert!(trace.log_likelihood[n - 1] - trace.log_likelihood[n - 2] < tol);
    Ok(())
}

#[test]
fn likelihood_is_higher_at_true_model_than_at_noise() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let (_, y) = simulate_factor_data(&loadings(), &DVec::from_element(8, 0.09), 300, &mut rng)?;
    let truth = marginal_log_likelihood(&y, &loadings(), &(Mat::identity(8, 8) * 0.09))?;
    let white = marginal_log_likelihood(&y, &Mat::zeros(8, 2), &Mat::identity(8, 8))?;
    assert!(truth > white);
    Ok(())
}
