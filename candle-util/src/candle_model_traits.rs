use candle_core::{Result, Tensor};

pub trait StateLossT {
    /// A scalar loss of a hidden state, typically the negative log
    /// joint `-log p(y|x) - log p(x)` of observed data
    ///
    /// # Arguments
    /// * `x_k` - hidden state (k)
    ///
    /// # Returns
    /// rank-0 tensor, differentiable with respect to `x_k`
    fn loss(&self, x_k: &Tensor) -> Result<Tensor>;

    fn dim_state(&self) -> usize;
}
