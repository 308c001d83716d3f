use crate::run_common::*;

use lentil::factor_analysis::{simulate_factor_data, FactorAnalysis, FactorAnalysisInit};

#[derive(Args, Debug)]
pub struct FactorAnalysisArgs {
    /// observed dimension D
    #[arg(long, short = 'd', default_value_t = 10)]
    dim_obs: usize,

    /// latent dimension K
    #[arg(long, short = 'k', default_value_t = 2)]
    dim_latent: usize,

    /// number of samples N
    #[arg(short = 'n', long, default_value_t = 500)]
    num_samples: usize,

    /// noise variance of the simulated data
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    /// EM iterations
    #[arg(long, short = 'i', default_value_t = DEFAULT_EM_ITER)]
    iter: usize,

    /// stop early once the log-likelihood gain drops below this
    #[arg(long)]
    tol: Option<f64>,

    /// random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output header
    #[arg(long, short)]
    out: Option<Box<str>>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_factor_analysis(args: &FactorAnalysisArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    if args.noise <= 0.0 {
        anyhow::bail!("noise variance should be positive, found {}", args.noise);
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let (dd, kk) = (args.dim_obs, args.dim_latent);

    let theta_true = Mat::rnorm(dd, kk, &mut rng);
    let noise_var = DVec::from_element(dd, args.noise);
    let (_, y) = simulate_factor_data(&theta_true, &noise_var, args.num_samples, &mut rng)?;
    let y = y.scale_rows();
    info!("simulated {} x {} factor data, {} factors", dd, y.ncols(), kk);

    let em = FactorAnalysis {
        num_iterations: args.iter,
        tolerance: args.tol,
        show_progress: true,
        verbose: args.verbose,
    };
    let trace = em.fit(&y, FactorAnalysisInit::random(dd, kk, &mut rng))?;

    let (Some(theta), Some(sigma_y), Some(llik)) = (
        trace.last_theta(),
        trace.last_sigma_y(),
        trace.log_likelihood.last(),
    ) else {
        anyhow::bail!("no EM iterations were run");
    };
    println!("log-likelihood after {} iterations: {}", trace.num_iterations(), llik);

    if let Some(hdr) = args.out.as_deref() {
        theta.to_tsv(&output_file(hdr, "theta"))?;
        Mat::from_column_slice(dd, 1, sigma_y.diagonal().as_slice())
            .to_tsv(&output_file(hdr, "sigma_y"))?;
        Mat::from_column_slice(trace.num_iterations(), 1, &trace.log_likelihood)
            .to_tsv(&output_file(hdr, "llik"))?;
        theta_true.to_tsv(&output_file(hdr, "theta_true"))?;
        info!("wrote {}.*.tsv", hdr);
    }

    Ok(())
}
