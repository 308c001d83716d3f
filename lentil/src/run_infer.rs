use crate::run_common::*;

use lentil::agent::{Agent, Inference};
use lentil::config::{AgentConfig, EnvironmentConfig};
use lentil::environment::Environment;

#[derive(Args, Debug)]
pub struct InferArgs {
    /// agent configuration (JSON)
    #[arg(long, short = 'a', required = true)]
    agent: Box<str>,

    /// environment configuration (JSON)
    #[arg(long, short = 'e', required = true)]
    env: Box<str>,

    /// hidden state of the environment
    #[arg(long, short = 'x', allow_negative_numbers = true)]
    state: f64,

    /// number of observations
    #[arg(short = 'n', long, default_value_t = 1)]
    num_samples: usize,

    /// random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output header
    #[arg(long, short)]
    out: Option<Box<str>>,

    /// show descent progress
    #[arg(long)]
    progress: bool,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

pub fn run_infer(args: &InferArgs) -> anyhow::Result<()> {
    init_logger(args.verbose);

    let env_config = EnvironmentConfig::from_json_file(&*args.env)?;
    let agent_config = AgentConfig::from_json_file(&*args.agent)?;

    let mut env = Environment::new(&env_config)?;
    let agent = match Agent::new(&agent_config)? {
        Agent::GradientDescent(descent) => {
            Agent::GradientDescent(descent.with_progress(args.progress, args.verbose))
        }
        other => other,
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    env.build(args.state);
    let y = env.generate_n(args.num_samples, &mut rng)?;
    info!(
        "{} observations at x = {} (σ = {})",
        y.len(),
        args.state,
        env.std_y()
    );

    let out = agent.infer_state(&y)?;

    match &out {
        Inference::Point(x) => info!("point estimate: {}", x),
        Inference::Grid(post) => info!(
            "grid posterior over {} hypotheses: mode {}, mean {}",
            post.len(),
            post.mode(),
            post.mean()
        ),
        Inference::Descent(history) => info!("{} descent iterations", history.len()),
    }
    println!("{}", out.estimate());

    if let Some(hdr) = args.out.as_deref() {
        Mat::from_column_slice(y.len(), 1, &y).to_tsv(&output_file(hdr, "obs"))?;

        if let Some(table) = out.to_mat() {
            let suffix = match &out {
                Inference::Grid(_) => "posterior",
                _ => "history",
            };
            let file = output_file(hdr, suffix);
            table.to_tsv(&file)?;
            info!("wrote {}", file);
        }
    }

    Ok(())
}
