pub mod candle_gradient_descent;
pub mod candle_inference;
pub mod candle_loss_functions;
pub mod candle_model_traits;

pub use candle_core;
pub use candle_nn;
