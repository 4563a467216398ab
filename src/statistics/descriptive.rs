// Descriptive statistics over observed AU intensities
//
// - trueno::Vector for SIMD mean and standard deviation (population, divide by n)
// - aprender::stats::DescriptiveStats for quantiles (R-7 method)
//
// Empty inputs produce NaN (or None) instead of an error: an AU with no
// observations in a group is a legitimate, reportable state.

use aprender::stats::DescriptiveStats;
use trueno::Vector;

/// Mean, population standard deviation and observation count of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptive {
    pub mean: f32,
    pub std: f32,
    pub count: usize,
}

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Vector::from_slice(values).mean().ok()
}

/// Population standard deviation, `None` for an empty sample
pub fn std_dev(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Vector::from_slice(values).stddev().ok()
}

/// Describe a sample; mean and std are NaN when it is empty
pub fn describe(values: &[f32]) -> Descriptive {
    Descriptive {
        mean: mean(values).unwrap_or(f32::NAN),
        std: std_dev(values).unwrap_or(f32::NAN),
        count: values.len(),
    }
}

/// First quartile, median and third quartile, `None` for an empty sample
pub fn quartiles(values: &[f32]) -> Option<[f32; 3]> {
    if values.is_empty() {
        return None;
    }
    let vector = Vector::from_slice(values);
    let stats = DescriptiveStats::new(&vector);
    Some([
        stats.quantile(0.25).ok()?,
        stats.quantile(0.5).ok()?,
        stats.quantile(0.75).ok()?,
    ])
}
