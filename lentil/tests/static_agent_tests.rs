use lentil::agent::{Agent, Inference};
use lentil::closed_form::{map_estimate, mle_estimate, GaussianPrior};
use lentil::config::*;
use lentil::environment::{Environment, LinearParams};
use lentil::lentil_common::*;

use approx::assert_abs_diff_eq;

const PARAMS: LinearParams = LinearParams {
    beta_0: 3.0,
    beta_1: 2.0,
};

fn observe(std_y: f64, x: f64, n: usize, seed: u64) -> anyhow::Result<Vec<f64>> {
    let mut env = Environment::new(&EnvironmentConfig::StaticLinear(StaticEnvParams {
        beta_0: 3.0,
        beta_1: 2.0,
        std_y,
    }))?;
    env.build(x);
    env.generate_n(n, &mut StdRng::seed_from_u64(seed))
}

fn point(agent: &Agent, y: &[f64]) -> anyhow::Result<f64> {
    match agent.infer_state(y)? {
        Inference::Point(x) => Ok(x),
        other => anyhow::bail!("expected a point estimate, got {:?}", other),
    }
}

#[test]
fn mle_recovers_state_as_noise_vanishes() -> anyhow::Result<()> {
    let y = observe(1e-5, 2.0, 1, DEFAULT_SEED)?;
    let agent = Agent::new(&AgentConfig::LinearMle(MleParams::default()))?;
    assert_abs_diff_eq!(point(&agent, &y)?, 2.0, epsilon = 1e-3);
    Ok(())
}

#[test]
fn map_lies_between_mle_and_prior_mean() -> anyhow::Result<()> {
    let mle_agent = Agent::new(&AgentConfig::LinearMle(MleParams::default()))?;
    let map_agent = Agent::new(&AgentConfig::LinearMap(MapParams::default()))?;

    for seed in 0..10 {
        let y = observe(1.0, 2.0, 1, seed)?;
        let mle = point(&mle_agent, &y)?;
        let map = point(&map_agent, &y)?;
        let (lo, hi) = if mle < 4.0 { (mle, 4.0) } else { (4.0, mle) };
        assert!(lo < map && map < hi, "seed {}: {} not in ({}, {})", seed, map, lo, hi);
    }
    Ok(())
}

#[test]
fn textbook_map_example() -> anyhow::Result<()> {
    let agent = Agent::new(&AgentConfig::LinearMap(MapParams::default()))?;
    assert_abs_diff_eq!(point(&agent, &[7.0])?, 2.4, epsilon = 1e-12);
    Ok(())
}

#[test]
fn map_approaches_mle_with_more_data() -> anyhow::Result<()> {
    let prior = GaussianPrior { m_x: 4.0, s_x: 1.0 };
    let y_all = observe(1.0, 2.0, 30, 7)?;

    let gap = |y: &[f64]| -> anyhow::Result<f64> {
        Ok((map_estimate(y, &PARAMS, 1.0, &prior)? - mle_estimate(y, &PARAMS)?).abs())
    };

    assert!(gap(&y_all)? < gap(&y_all[..1])?);
    assert_abs_diff_eq!(map_estimate(&y_all, &PARAMS, 1.0, &prior)?, 2.0, epsilon = 0.35);
    Ok(())
}

#[test]
fn exact_agents_peak_at_one() -> anyhow::Result<()> {
    let y = observe(1.0, 2.0, 5, 3)?;
    let configs = [
        AgentConfig::ExactLinear(GridAgentParams::default()),
        AgentConfig::ExactLinearFlatPrior(GridAgentParams::default()),
        AgentConfig::ExactNonlinear(GridAgentParams::default()),
    ];
    for config in &configs {
        match Agent::new(config)?.infer_state(&y)? {
            Inference::Grid(post) => {
                assert_eq!(post.len(), DEFAULT_N_GRID);
                let mx = post.posterior.iter().cloned().fold(f64::MIN, f64::max);
                assert_eq!(mx, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
    Ok(())
}

#[test]
fn grid_mode_agrees_with_closed_form_map() -> anyhow::Result<()> {
    let y = observe(1.0, 2.0, 10, 11)?;
    let params = GridAgentParams::default();
    let spacing = (params.x_range.1 - params.x_range.0) / (params.n_grid - 1) as f64;

    let grid_agent = Agent::new(&AgentConfig::ExactLinear(params))?;
    let map_agent = Agent::new(&AgentConfig::LinearMap(MapParams::default()))?;

    let mode = grid_agent.infer_state(&y)?.estimate();
    assert_abs_diff_eq!(mode, point(&map_agent, &y)?, epsilon = spacing);
    Ok(())
}

#[test]
fn descent_agent_reaches_closed_form() -> anyhow::Result<()> {
    let y = observe(1.0, 2.0, 30, DEFAULT_SEED)?;

    let mle_params = DescentParams {
        kappa: 0.005,
        n_iterations: 200,
        x_init: 5.0,
        ..Default::default()
    };
    let agent = Agent::new(&AgentConfig::GradientDescent(mle_params.clone()))?;
    let out = agent.infer_state(&y)?;
    match &out {
        Inference::Descent(history) => {
            assert_eq!(history.len(), 200);
            assert_eq!(history.loss.len(), 200);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_abs_diff_eq!(out.estimate(), mle_estimate(&y, &PARAMS)?, epsilon = 0.1);

    let map_params = DescentParams {
        m_x: Some(4.0),
        ..mle_params
    };
    let agent = Agent::new(&AgentConfig::GradientDescent(map_params))?;
    let prior = GaussianPrior { m_x: 4.0, s_x: 1.0 };
    assert_abs_diff_eq!(
        agent.infer_state(&y)?.estimate(),
        map_estimate(&y, &PARAMS, 1.0, &prior)?,
        epsilon = 0.1
    );
    Ok(())
}

#[test]
fn empty_observations_are_an_error() -> anyhow::Result<()> {
    for config in [
        AgentConfig::LinearMle(MleParams::default()),
        AgentConfig::LinearMap(MapParams::default()),
        AgentConfig::ExactLinear(GridAgentParams::default()),
        AgentConfig::GradientDescent(DescentParams::default()),
    ] {
        assert!(Agent::new(&config)?.infer_state(&[]).is_err());
    }
    Ok(())
}
