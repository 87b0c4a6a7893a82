// Analyzer module: aggregate statistics and trend projection over samples.

pub mod forecast;
pub mod stats;

use crate::model::{PricePoint, PriceSample, PriceStats};

pub trait Analyzer {
    fn aggregate(&self, samples: &[PriceSample]) -> Option<PriceStats>;
    fn forecast(&self, samples: &[PriceSample], horizon: usize) -> Vec<PricePoint>;
}

pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for AnalyzerImpl {
    fn aggregate(&self, samples: &[PriceSample]) -> Option<PriceStats> {
        stats::aggregate(samples)
    }

    fn forecast(&self, samples: &[PriceSample], horizon: usize) -> Vec<PricePoint> {
        forecast::project(samples, horizon)
    }
}
