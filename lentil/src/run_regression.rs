use crate::run_common::*;

use lentil::regression::*;

#[derive(Args, Debug)]
pub struct RegressArgs {
    /// TSV data file; the last column is the response
    #[arg(long, required = true)]
    data: Box<str>,

    /// header lines to skip
    #[arg(long)]
    skip: Option<usize>,

    /// fraction of rows held out for testing
    #[arg(long, default_value_t = 0.2)]
    test_fraction: f64,

    /// random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_regression(args: &RegressArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let data = Mat::from_tsv(&args.data, args.skip)?;
    let (nn, pp) = data.shape();
    if pp < 2 {
        anyhow::bail!("need at least one predictor and a response, found {} columns", pp);
    }
    info!("read {} x {} from {}", nn, pp, args.data);

    let x = design_matrix(&data.columns(0, pp - 1).into_owned());
    let y = data.column(pp - 1).into_owned();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let split = train_test_split(&x, &y, args.test_fraction, &mut rng)?;

    let theta = fit_normal_equation(&split.x_train, &split.y_train)?;
    let theta_svd = fit_least_squares(&split.x_train, &split.y_train)?;

    // without held-out rows, report the training error
    let (x_eval, y_eval) = if split.y_test.is_empty() {
        (&split.x_train, &split.y_train)
    } else {
        (&split.x_test, &split.y_test)
    };

    let rmse_normal = rmse(&predict(x_eval, &theta)?, y_eval)?;
    let rmse_svd = rmse(&predict(x_eval, &theta_svd)?, y_eval)?;

    println!("coefficients:{}", theta.transpose());
    println!("rmse (normal equation): {}", rmse_normal);
    println!("rmse (svd): {}", rmse_svd);
    println!("difference: {:e}", (rmse_normal - rmse_svd).abs());

    Ok(())
}
