use ndarray::ArrayViewMut1;

/// Scales a row to unit L2 norm. All-zero rows are left untouched.
pub(crate) fn l2_normalize(mut row: ArrayViewMut1<f64>) {
    let norm = row.dot(&row).sqrt();
    if norm > 1e-12 {
        row /= norm;
    }
}

/// Index of the largest value; ties go to the first.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
