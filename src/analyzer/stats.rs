use crate::model::{PriceSample, PriceStats};

/// Mean/max/min over every sample ever recorded. Nothing is windowed or
/// evicted; an empty or missing sequence yields `None`.
pub fn aggregate(samples: &[PriceSample]) -> Option<PriceStats> {
    if samples.is_empty() {
        return None;
    }

    let sum: f64 = samples.iter().map(|s| s.price).sum();
    let max = samples
        .iter()
        .map(|s| s.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let min = samples.iter().map(|s| s.price).fold(f64::INFINITY, f64::min);

    Some(PriceStats {
        mean: sum / samples.len() as f64,
        max,
        min,
    })
}
