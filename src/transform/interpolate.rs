//! Linear gap filling for regular series.

/// Fill NaN runs by linear interpolation between their neighbours.
///
/// With `fill_edges`, leading and trailing NaN runs take the nearest valid
/// value (interpolation in both directions). A slice with no valid value is
/// returned unchanged.
pub fn interpolate_gaps(values: &[f64], fill_edges: bool) -> Vec<f64> {
    let mut result = values.to_vec();
    let n = result.len();

    let mut i = 0;
    while i < n {
        if !result[i].is_nan() {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && result[i].is_nan() {
            i += 1;
        }
        let end = i;

        let left = start.checked_sub(1).map(|j| result[j]);
        let right = (end < n).then(|| result[end]);

        match (left, right) {
            (Some(l), Some(r)) => {
                let steps = (end - start + 1) as f64;
                for (offset, idx) in (start..end).enumerate() {
                    result[idx] = l + (r - l) * (offset + 1) as f64 / steps;
                }
            }
            (Some(l), None) if fill_edges => result[start..end].fill(l),
            (None, Some(r)) if fill_edges => result[start..end].fill(r),
            _ => {}
        }
    }

    result
}
