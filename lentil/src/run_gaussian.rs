use crate::run_common::*;

use lentil::environment::MultivariateEnvironment;
use lentil::linear_gaussian::LinearGaussianSystem;

#[derive(Args, Debug)]
pub struct GaussianArgs {
    /// state dimension
    #[arg(long, short = 'd', default_value_t = 2)]
    dim: usize,

    /// number of observations
    #[arg(short = 'n', long, default_value_t = 10)]
    num_samples: usize,

    /// observation noise variance
    #[arg(long, default_value_t = 1.0)]
    noise: f64,

    /// prior variance
    #[arg(long, default_value_t = 1.0)]
    prior_var: f64,

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

pub fn run_gaussian(args: &GaussianArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let dd = args.dim;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let x_true = DVec::from_column_slice(Mat::rnorm(dd, 1, &mut rng).as_slice());
    let sigma_y = Mat::identity(dd, dd) * args.noise;

    let mut env = MultivariateEnvironment::identity(sigma_y.clone())?;
    env.build(x_true.clone())?;
    let y = env.generate_n(args.num_samples, &mut rng)?;

    let system = LinearGaussianSystem::identity(
        DVec::zeros(dd),
        Mat::identity(dd, dd) * args.prior_var,
        sigma_y,
    );
    let post = system.posterior(&y)?;

    println!("true state:{}", x_true.transpose());
    println!("posterior mean:{}", post.mean.transpose());
    println!("posterior covariance:{}", post.cov);

    if let Some(hdr) = args.out.as_deref() {
        Mat::from_column_slice(dd, 1, post.mean.as_slice()).to_tsv(&output_file(hdr, "mean"))?;
        post.cov.to_tsv(&output_file(hdr, "cov"))?;
        y.to_tsv(&output_file(hdr, "obs"))?;
        info!("wrote {}.*.tsv", hdr);
    }

    Ok(())
}
