use crate::errors::LinalgError;
use crate::lentil_common::*;

/// Inverse of a square matrix, failing loudly when it does not exist
pub fn inverse(mat: &Mat, what: &'static str) -> Result<Mat, LinalgError> {
    expect_square(mat, what)?;
    mat.clone()
        .try_inverse()
        .ok_or(LinalgError::Singular { what })
}

pub fn expect_shape(mat: &Mat, what: &'static str, nrows: usize, ncols: usize) -> Result<(), LinalgError> {
    if mat.shape() != (nrows, ncols) {
        return Err(LinalgError::Shape {
            what,
            expected: (nrows, ncols),
            found: mat.shape(),
        });
    }
    Ok(())
}

pub fn expect_square(mat: &Mat, what: &'static str) -> Result<(), LinalgError> {
    let n = mat.nrows();
    expect_shape(mat, what, n, n)
}

pub fn expect_len(vec: &DVec, what: &'static str, len: usize) -> Result<(), LinalgError> {
    if vec.len() != len {
        return Err(LinalgError::Shape {
            what,
            expected: (len, 1),
            found: (vec.len(), 1),
        });
    }
    Ok(())
}

/// `log |A|` of a symmetric positive definite matrix via Cholesky
pub fn log_det_spd(mat: &Mat, what: &'static str) -> Result<f64, LinalgError> {
    expect_square(mat, what)?;
    let chol = mat
        .clone()
        .cholesky()
        .ok_or(LinalgError::Singular { what })?;
    Ok(2.0 * chol.l().diagonal().map(|x| x.ln()).sum())
}
