use crate::candle_inference::DescentConfig;
use crate::candle_model_traits::StateLossT;

use candle_core::{Device, Tensor, Var};
use candle_nn::{Optimizer, SGD};
use indicatif::{ProgressBar, ProgressDrawTarget};
use log::{debug, info, warn};

/// Every iterate of a gradient descent run
#[derive(Debug, Clone, Default)]
pub struct DescentTrace {
    /// state after each update
    pub x: Vec<Vec<f64>>,
    /// loss evaluated at the state the update started from
    pub loss: Vec<f64>,
}

impl DescentTrace {
    pub fn num_iterations(&self) -> usize {
        self.loss.len()
    }

    pub fn last_x(&self) -> Option<&[f64]> {
        self.x.last().map(|x| x.as_slice())
    }
}

/// Minimize `model.loss(x)` by fixed-step gradient descent
///
/// Each step evaluates the loss at the current `x`, back-propagates
/// through it and applies `x <- x - κ ∇loss`. There is no stopping
/// rule other than the iteration budget: a step size that is too large
/// shows up as a diverging or oscillating trace.
///
/// * `model` - differentiable loss of the state
/// * `x_init` - starting state, `model.dim_state()` coordinates
/// * `config` - step size and iteration budget
///
pub fn gradient_descent<M>(
    model: &M,
    x_init: &[f64],
    config: &DescentConfig,
) -> anyhow::Result<DescentTrace>
where
    M: StateLossT,
{
    if x_init.len() != model.dim_state() {
        anyhow::bail!(
            "initial state has {} coordinates, but the model expects {}",
            x_init.len(),
            model.dim_state()
        );
    }

    let device = Device::Cpu;
    let x_var = Var::from_tensor(&Tensor::from_slice(x_init, x_init.len(), &device)?)?;
    let mut sgd = SGD::new(vec![x_var.clone()], config.learning_rate)?;

    let pb = ProgressBar::new(config.num_iterations as u64);
    if !config.show_progress || config.verbose {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    let mut trace = DescentTrace {
        x: Vec::with_capacity(config.num_iterations),
        loss: Vec::with_capacity(config.num_iterations),
    };

    let mut warned = false;

    for iter in 0..config.num_iterations {
        let loss = model.loss(x_var.as_tensor())?;
        let loss_val = loss.to_scalar::<f64>()?;
        sgd.backward_step(&loss)?;
        let x_now = x_var.as_tensor().to_vec1::<f64>()?;

        if !warned && !loss_val.is_finite() {
            warn!(
                "loss became {} at iteration {}; the step size {} may be too large",
                loss_val,
                iter + 1,
                config.learning_rate
            );
            warned = true;
        }

        if config.verbose {
            info!("[{}] loss: {}, x: {:?}", iter + 1, loss_val, x_now);
        } else {
            debug!("[{}] loss: {}", iter + 1, loss_val);
        }

        trace.x.push(x_now);
        trace.loss.push(loss_val);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(trace)
}
