//! Household wealth inequality.

/// Gini coefficient of `wealths`.
///
/// Uses the sorted form `sum_{i<j} |x_i - x_j| / (n * total)`, which equals
/// the mean absolute pairwise difference over twice the mean. Values are
/// first divided by the largest magnitude, so the sums stay small however
/// large the holdings are; the coefficient is scale-free.
///
/// An empty population or a non-positive total yields zero. A non-finite
/// holding makes the coefficient undefined and yields NaN.
pub fn gini(wealths: &[f64]) -> f64 {
    if wealths.is_empty() {
        return 0.0;
    }
    if wealths.iter().any(|w| !w.is_finite()) {
        return f64::NAN;
    }
    let mut sorted = wealths.to_vec();
    sorted.sort_by(f64::total_cmp);

    let scale = sorted.iter().fold(0.0_f64, |acc, w| acc.max(w.abs()));
    if scale <= 0.0 {
        return 0.0;
    }
    let total: f64 = sorted.iter().map(|w| w / scale).sum();
    if total <= 0.0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = sorted.len() as f64;

    // The k-th smallest value is larger than k others and smaller than
    // n - 1 - k others, so it contributes (2k - n + 1) times.
    let mut rank = 0.0_f64;
    let mut pairwise = 0.0_f64;
    for w in &sorted {
        let weight = rank.mul_add(2.0, 1.0 - count);
        pairwise = weight.mul_add(w / scale, pairwise);
        rank += 1.0;
    }
    pairwise / (count * total)
}
