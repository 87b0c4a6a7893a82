use crate::model::{PricePoint, PriceSample};
use chrono::Duration;

pub const DEFAULT_HORIZON: usize = 7;

/// Projects `horizon` daily points past the last observed sample using a
/// single least-squares fit of price against sample index (not wall-clock
/// time). Fewer than two samples leave the fit degenerate, so the
/// projection is empty rather than an error.
pub fn project(samples: &[PriceSample], horizon: usize) -> Vec<PricePoint> {
    if samples.len() < 2 {
        return Vec::new();
    }

    let n = samples.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = samples.iter().map(|s| s.price).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, sample) in samples.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (sample.price - mean_y);
        denominator += dx * dx;
    }
    let slope = numerator / denominator;
    let intercept = mean_y - slope * mean_x;

    let last_observed = samples[samples.len() - 1].timestamp;
    (0..horizon)
        .map(|step| {
            let index = samples.len() + step;
            PricePoint {
                timestamp: last_observed + Duration::days(step as i64 + 1),
                price: intercept + slope * index as f64,
            }
        })
        .collect()
}
