mod run_common;
mod run_factor_analysis;
mod run_gaussian;
mod run_infer;
mod run_regression;

use run_common::*;
use run_factor_analysis::*;
use run_gaussian::*;
use run_infer::*;
use run_regression::*;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "LENTIL",
    long_about = "Latent ENvironment sTate Inference Library\n\
		  Estimate a hidden static state from noisy observations\n\
		  of a simulated environment."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Infer a scalar state with a configured agent",
        long_about = "Simulate observations of a scalar state and estimate it:\n\
		      (1) Build the environment and the agent from JSON configs\n\
		      (2) Draw `n` observations at the given state\n\
		      (3) Report the estimate and save the grid posterior\n\
		      or the descent history.\n"
    )]
    Infer(InferArgs),

    #[command(
        about = "Learn a factor model by expectation-maximization",
        long_about = "Simulate factor data, z-score the rows and run EM\n\
		      from a random starting point. Saves the loadings,\n\
		      the noise variances and the log-likelihood trace.\n",
        visible_alias = "fa"
    )]
    FactorAnalysis(FactorAnalysisArgs),

    /// exact posterior of a multivariate linear-Gaussian system
    Gaussian(GaussianArgs),

    /// linear regression by the normal equation, checked against SVD
    Regress(RegressArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Infer(args) => {
            run_infer(args)?;
        }
        Commands::FactorAnalysis(args) => {
            run_factor_analysis(args)?;
        }
        Commands::Gaussian(args) => {
            run_gaussian(args)?;
        }
        Commands::Regress(args) => {
            run_regression(args)?;
        }
    }

    info!("Done");
    Ok(())
}
