pub use log::{debug, info, warn};

pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};

pub type Mat = nalgebra::DMatrix<f64>;
pub type DVec = nalgebra::DVector<f64>;
pub type Grid1 = ndarray::Array1<f64>;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_X_RANGE: (f64, f64) = (0.01, 5.0);
pub const DEFAULT_N_GRID: usize = 500;
pub const DEFAULT_EM_ITER: usize = 100;

pub use candle_util::{candle_core, candle_nn};
