use lentil::agent::{Agent, Inference};
use lentil::config::*;
use lentil::environment::{Environment, Link};
use lentil::errors::ConfigError;
use lentil::lentil_common::*;

use approx::assert_abs_diff_eq;

fn write_json(dir: &tempfile::TempDir, name: &str, json: &str) -> anyhow::Result<std::path::PathBuf> {
    let file = dir.path().join(name);
    std::fs::write(&file, json)?;
    Ok(file)
}

#[test]
fn simulate_and_infer_from_config_files() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let env_file = write_json(
        &dir,
        "env.json",
        r#"{"name": "static_linear", "params": {"beta_0": 3, "beta_1": 2, "std_y": 0.1}}"#,
    )?;
    let agent_file = write_json(
        &dir,
        "agent.json",
        r#"{"name": "exact_linear", "params": {"beta_0": 3, "beta_1": 2, "std_y": 0.1,
                                              "m_x": 4, "s_x": 1, "n_grid": 1000}}"#,
    )?;

    let mut env = Environment::new(&EnvironmentConfig::from_json_file(&env_file)?)?;
    let agent = Agent::new(&AgentConfig::from_json_file(&agent_file)?)?;

    env.build(1.5);
    let y = env.generate_n(20, &mut StdRng::seed_from_u64(DEFAULT_SEED))?;
    match agent.infer_state(&y)? {
        Inference::Grid(post) => {
            assert_eq!(post.len(), 1000);
            assert_abs_diff_eq!(post.mode(), 1.5, epsilon = 0.05);
        }
        other => panic!("unexpected {:?}", other),
    }
    Ok(())
}

#[test]
fn linear_regression_environment_is_not_supported() -> anyhow::Result<()> {
    let config = EnvironmentConfig::from_json_str(r#"{"name": "linear_regression"}"#)?;
    let err = Environment::new(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Unsupported(_))
    ));
    assert!(err.to_string().contains("not supported"));
    Ok(())
}

#[test]
fn malformed_file_names_the_path() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let file = write_json(&dir, "bad.json", r#"{"name": "exact_linear", "params": {"m": 1}}"#)?;
    let err = AgentConfig::from_json_file(&file).unwrap_err();
    assert!(err.to_string().contains("bad.json"));
    Ok(())
}

#[test]
fn config_survives_serialization() -> anyhow::Result<()> {
    let config = AgentConfig::GradientDescent(DescentParams {
        link: Link::Quadratic,
        m_x: Some(1.0),
        ..Default::default()
    });
    let json = config.to_json_string()?;
    assert_eq!(AgentConfig::from_json_str(&json)?, config);
    Ok(())
}
