use crate::traits::*;
pub use nalgebra::{DMatrix, DVector};
use rand::Rng;
use rand_distr::StandardNormal;

impl SampleOps for DMatrix<f64> {
    type Mat = Self;
    type Scalar = f64;

    /// Sample d,n matrix from U(0,1)
    fn runif<R: Rng + ?Sized>(dd: usize, nn: usize, rng: &mut R) -> Self::Mat {
        let rvec = (0..(dd * nn)).map(|_| rng.random::<f64>()).collect();
        DMatrix::<f64>::from_vec(dd, nn, rvec)
    }

    /// Sample d,n matrix from N(0,1)
    fn rnorm<R: Rng + ?Sized>(dd: usize, nn: usize, rng: &mut R) -> Self::Mat {
        let rvec = (0..(dd * nn))
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect();
        DMatrix::<f64>::from_vec(dd, nn, rvec)
    }
}

impl MatOps for DMatrix<f64> {
    type Mat = Self;
    type Scalar = f64;

    fn centre_columns_inplace(&mut self) {
        for mut xx_j in self.column_iter_mut() {
            let mu = xx_j.mean();
            xx_j.add_scalar_mut(-mu);
        }
    }

    fn centre_columns(&self) -> Self::Mat {
        let mut ret = self.clone();
        ret.centre_columns_inplace();
        ret
    }

    fn scale_rows_inplace(&mut self) {
        let nn = self.ncols() as f64;
        for mut xx_i in self.row_iter_mut() {
            let mu = xx_i.mean();
            xx_i.add_scalar_mut(-mu);
            let sd = (xx_i.norm_squared() / nn).sqrt();
            if sd > 0.0 {
                xx_i /= sd;
            }
        }
    }

    fn scale_rows(&self) -> Self::Mat {
        let mut ret = self.clone();
        ret.scale_rows_inplace();
        ret
    }
}

impl StatOps for DMatrix<f64> {
    type Mat = Self;
    type DVec = DVector<f64>;

    fn row_means(&self) -> Self::DVec {
        self.column_mean()
    }

    fn row_covariance(&self) -> Self::Mat {
        let nn = self.ncols() as f64;
        let mu = self.row_means();
        let mut xx = self.clone();
        for mut x_j in xx.column_iter_mut() {
            x_j -= &mu;
        }
        (&xx * xx.transpose()) / nn
    }
}

/// Sample `n` columns from a multivariate normal `N(mean, cov)`
///
/// * `mean` - d-dimensional mean vector
/// * `cov` - d x d covariance matrix (must be positive definite)
/// * `nn` - number of samples
///
/// Returns a d x n matrix
pub fn sample_mvn<R: Rng + ?Sized>(
    mean: &DVector<f64>,
    cov: &DMatrix<f64>,
    nn: usize,
    rng: &mut R,
) -> anyhow::Result<DMatrix<f64>> {
    let dd = mean.len();
    if cov.nrows() != dd || cov.ncols() != dd {
        anyhow::bail!(
            "covariance {} x {} does not match mean dimension {}",
            cov.nrows(),
            cov.ncols(),
            dd
        );
    }

    let chol = cov
        .clone()
        .cholesky()
        .ok_or_else(|| anyhow::anyhow!("covariance is not positive definite"))?;

    let zz = DMatrix::<f64>::rnorm(dd, nn, rng);
    let mut ret = chol.l() * zz;
    for mut x_j in ret.column_iter_mut() {
        x_j += mean;
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn seeded_draws_are_reproducible() {
        let xx = DMatrix::<f64>::rnorm(3, 7, &mut StdRng::seed_from_u64(7));
        let yy = DMatrix::<f64>::rnorm(3, 7, &mut StdRng::seed_from_u64(7));
        assert_eq!(xx, yy);
    }

    #[test]
    fn row_covariance_of_known_matrix() {
        // two variables observed three times
        let xx = DMatrix::from_row_slice(2, 3, &[1., 2., 3., 2., 4., 6.]);
        let cov = xx.row_covariance();
        assert_abs_diff_eq!(cov[(0, 0)], 2. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(cov[(0, 1)], 4. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(cov[(1, 1)], 8. / 3., epsilon = 1e-12);
    }

    #[test]
    fn mvn_sample_moments() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let mean = DVector::from_vec(vec![1.0, -2.0]);
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 2.0]);
        let xx = sample_mvn(&mean, &cov, 20_000, &mut rng)?;

        assert_abs_diff_eq!(xx.row_means(), mean, epsilon = 0.05);
        assert_abs_diff_eq!(xx.row_covariance(), cov, epsilon = 0.1);
        Ok(())
    }

    #[test]
    fn mvn_rejects_indefinite_covariance() {
        let mut rng = StdRng::seed_from_u64(1);
        let mean = DVector::zeros(2);
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(sample_mvn(&mean, &cov, 5, &mut rng).is_err());
    }
}
