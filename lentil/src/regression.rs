//! Multivariate linear regression `y = Xθ + ε`.
//!
//! Rows of `X` are samples. The normal-equation solver is the one the
//! estimators share; the SVD solver serves as a numerically robust
//! reference to check it against.

use crate::errors::LinalgError;
use crate::lentil_common::*;
use crate::linalg::{expect_len, inverse};

use rand::seq::SliceRandom;

const SVD_EPS: f64 = 1e-12;

/// Prepend a column of ones: `[1 | X]`
pub fn design_matrix(x: &Mat) -> Mat {
    x.clone().insert_column(0, 1.0)
}

/// `θ = (XᵗX)⁻¹ Xᵗ y`
pub fn fit_normal_equation(x: &Mat, y: &DVec) -> anyhow::Result<DVec> {
    expect_len(y, "response", x.nrows())?;
    let xt = x.transpose();
    let gram_inv = inverse(&(&xt * x), "XᵗX")?;
    Ok(gram_inv * (xt * y))
}

/// Least squares through the singular value decomposition of `X`
pub fn fit_least_squares(x: &Mat, y: &DVec) -> anyhow::Result<DVec> {
    expect_len(y, "response", x.nrows())?;
    let svd = x.clone().svd(true, true);
    svd.solve(y, SVD_EPS)
        .map_err(|e| anyhow::anyhow!("SVD least squares: {}", e))
}

pub fn predict(x: &Mat, theta: &DVec) -> anyhow::Result<DVec> {
    expect_len(theta, "θ", x.ncols())?;
    Ok(x * theta)
}

/// Root mean squared difference of two equally long vectors
pub fn rmse(a: &DVec, b: &DVec) -> anyhow::Result<f64> {
    expect_len(b, "prediction", a.len())?;
    if a.is_empty() {
        anyhow::bail!("rmse of empty vectors");
    }
    Ok(((a - b).norm_squared() / a.len() as f64).sqrt())
}

/// A random partition of the rows of `(X, y)`
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Mat,
    pub y_train: DVec,
    pub x_test: Mat,
    pub y_test: DVec,
}

/// Shuffle rows with `rng` and hold out `round(n * test_fraction)`
/// of them for testing
pub fn train_test_split<R: Rng + ?Sized>(
    x: &Mat,
    y: &DVec,
    test_fraction: f64,
    rng: &mut R,
) -> anyhow::Result<TrainTestSplit> {
    let nn = x.nrows();
    expect_len(y, "response", nn)?;
    if !(0.0..1.0).contains(&test_fraction) {
        anyhow::bail!("test fraction should be in [0, 1), found {}", test_fraction);
    }

    let n_test = (nn as f64 * test_fraction).round() as usize;
    if n_test >= nn {
        return Err(LinalgError::Shape {
            what: "training set",
            expected: (1, x.ncols()),
            found: (0, x.ncols()),
        }
        .into());
    }

    let mut rows: Vec<usize> = (0..nn).collect();
    rows.shuffle(rng);
    let (test_rows, train_rows) = rows.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: x.select_rows(train_rows),
        y_train: y.select_rows(train_rows),
        x_test: x.select_rows(test_rows),
        y_test: y.select_rows(test_rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use matrix_util::traits::SampleOps;

    #[test]
    fn exact_fit_recovers_coefficients() -> anyhow::Result<()> {
        let mut rng = StdRng::seed_from_u64(DEFAULT_SEED);
        let x = design_matrix(&Mat::rnorm(20, 3, &mut rng));
        let theta = DVec::from_vec(vec![1.0, -2.0, 0.5, 3.0]);
        let y = &x * &theta;

        assert_abs_diff_eq!(fit_normal_equation(&x, &y)?, theta, epsilon = 1e-10);
        assert_abs_diff_eq!(fit_least_squares(&x, &y)?, theta, epsilon = 1e-10);
        Ok(())
    }

    #[test]
    fn collinear_columns_are_singular() {
        let x = Mat::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        let y = DVec::from_vec(vec![1.0, 2.0, 3.0]);
        let err = fit_normal_equation(&x, &y).unwrap_err();
        assert_eq!(
            err.downcast_ref::<LinalgError>(),
            Some(&LinalgError::Singular { what: "XᵗX" })
        );
    }

    #[test]
    fn split_partitions_rows() -> anyhow::Result<()> {
        let x = Mat::from_fn(10, 2, |i, j| (i * 10 + j) as f64);
        let y = DVec::from_fn(10, |i, _| i as f64);
        let split = train_test_split(&x, &y, 0.3, &mut StdRng::seed_from_u64(1))?;

        assert_eq!(split.x_test.nrows(), 3);
        assert_eq!(split.x_train.nrows(), 7);

        let mut seen: Vec<f64> = split.y_train.iter().chain(split.y_test.iter()).copied().collect();
        seen.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(seen, (0..10).map(|i| i as f64).collect::<Vec<_>>());

        // rows stay aligned with their responses
        for (row, &yi) in split.x_train.row_iter().zip(split.y_train.iter()) {
            assert_eq!(row[0], yi * 10.0);
        }
        Ok(())
    }

    #[test]
    fn rmse_of_known_difference() -> anyhow::Result<()> {
        let a = DVec::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        let b = DVec::from_vec(vec![2.0, 1.0, 4.0, 3.0]);
        assert_abs_diff_eq!(rmse(&a, &b)?, 1.0);
        assert!(rmse(&a, &DVec::zeros(3)).is_err());
        Ok(())
    }
}
