pub use ndarray::prelude::*;

/// `n` evenly spaced points over the closed interval `[lb, ub]`
pub fn linspace(lb: f64, ub: f64, n: usize) -> Array1<f64> {
    Array1::linspace(lb, ub, n)
}

/// Largest finite element and its index; `None` if there is none
pub fn argmax(xx: &Array1<f64>) -> Option<(usize, f64)> {
    xx.iter()
        .copied()
        .enumerate()
        .filter(|(_, x)| !x.is_nan())
        .fold(None, |best, (i, x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
}

/// `exp(x_i - max_j x_j)`: the largest element becomes exactly one
pub fn exp_minus_max(xx: &Array1<f64>) -> Option<Array1<f64>> {
    let (_, mx) = argmax(xx)?;
    if !mx.is_finite() {
        return None;
    }
    Some(xx.mapv(|x| (x - mx).exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_skips_nan() {
        let xx = array![f64::NAN, -3.0, 2.0, 1.0];
        assert_eq!(argmax(&xx), Some((2, 2.0)));
    }

    #[test]
    fn exp_minus_max_peaks_at_one() {
        let xx = array![-800.0, -790.0, -805.0];
        let pp = exp_minus_max(&xx).unwrap();
        assert_eq!(pp[1], 1.0);
        assert!(pp[0] < 1.0 && pp[0] > 0.0);
    }

    #[test]
    fn exp_minus_max_rejects_all_negative_infinity() {
        let xx = array![f64::NEG_INFINITY, f64::NEG_INFINITY];
        assert!(exp_minus_max(&xx).is_none());
    }
}
