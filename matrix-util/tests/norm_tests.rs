use approx::assert_abs_diff_eq;
use matrix_util::dmatrix_util::*;
use matrix_util::traits::{MatOps, SampleOps, StatOps};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn scaled_rows_are_standardized() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut xx = DMatrix::<f64>::runif(8, 200, &mut rng) * 5.0;
    xx.scale_rows_inplace();

    for i in 0..xx.nrows() {
        let row = xx.row(i);
        assert_abs_diff_eq!(row.mean(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(row.norm_squared() / 200.0, 1.0, epsilon = 1e-12);
    }

    let cov = xx.row_covariance();
    for i in 0..8 {
        assert_abs_diff_eq!(cov[(i, i)], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn centred_columns_have_zero_mean() {
    let mut rng = StdRng::seed_from_u64(3);
    let xx = DMatrix::<f64>::rnorm(50, 4, &mut rng).add_scalar(3.0);
    let yy = xx.centre_columns();
    for j in 0..yy.ncols() {
        assert_abs_diff_eq!(yy.column(j).mean(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn constant_row_is_left_centred() {
    let mut xx = DMatrix::from_row_slice(1, 3, &[2.0, 2.0, 2.0]);
    xx.scale_rows_inplace();
    assert_eq!(xx, DMatrix::zeros(1, 3));
}
