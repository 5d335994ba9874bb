//! Standard deviation and z-score.
//!
//! Population standard deviation over n closing prices:
//! STDDEV(n) = sqrt(sum((C[j] - mean)^2) / n). Fewer than two values give 0.

pub fn population_stddev<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let mut n = 0usize;
    let mut sum = 0.0;
    for v in iter.clone() {
        n += 1;
        sum += v;
    }
    if n < 2 {
        return 0.0;
    }

    let mean = sum / n as f64;
    let variance = iter
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n as f64;

    variance.sqrt()
}

/// (price - center) / stdev, defined as 0 when stdev is 0.
pub fn z_score(price: f64, center: f64, stdev: f64) -> f64 {
    if stdev > 0.0 {
        (price - center) / stdev
    } else {
        0.0
    }
}
