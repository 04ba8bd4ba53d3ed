//! Differencing and its inverse for ARIMA models.

/// Difference a series `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing for values that continue `original`.
///
/// `differenced` holds future values on the `d`-times differenced scale;
/// the result continues `original` on its own scale.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = difference(original, level).last().copied().unwrap_or(0.0);
        result = result
            .iter()
            .scan(anchor, |acc, &step| {
                *acc += step;
                Some(*acc)
            })
            .collect();
    }
    result
}

/// Coefficients `a_i` of `phi(B) (1 - B)^d = 1 - sum a_i B^i`.
///
/// `ar` holds the AR coefficients of the differenced series.
pub fn integrated_ar(ar: &[f64], d: usize) -> Vec<f64> {
    // Polynomial in B, constant term first.
    let mut poly: Vec<f64> = std::iter::once(1.0).chain(ar.iter().map(|a| -a)).collect();
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, &c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    poly[1..].iter().map(|c| -c).collect()
}
