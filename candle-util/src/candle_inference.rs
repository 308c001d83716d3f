/// Plain gradient descent settings
#[derive(Debug, Clone)]
pub struct DescentConfig {
    /// step size κ in `x <- x - κ ∇loss`
    pub learning_rate: f64,
    pub num_iterations: usize,
    pub show_progress: bool,
    pub verbose: bool,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            num_iterations: 100,
            show_progress: false,
            verbose: false,
        }
    }
}
