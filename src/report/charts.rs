//! Backend-free chart models
//!
//! Everything a renderer needs (density curves, box statistics, bar heights) is
//! computed here, so the same chart can go to a PNG or be inspected in memory.

use crate::dataset::MeasurementTable;
use crate::emotion::EmotionLabel;
use crate::statistics::{mean, quartiles};

/// Grid points per density curve
const DENSITY_GRID: usize = 100;

/// Density tails extend this many bandwidths past the data
const DENSITY_CUT: f64 = 2.0;

/// Whiskers reach the furthest point within this many IQRs of the box
const WHISKER_IQR: f32 = 1.5;

/// Kernel density estimate of one group's values
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub label: EmotionLabel,
    /// (value, density) pairs in ascending value order
    pub points: Vec<(f64, f64)>,
    pub median: Option<f32>,
}

/// Mirrored-density ("violin") chart of a single feature
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinChart {
    pub title: String,
    pub feature: String,
    pub curves: Vec<DensityCurve>,
}

/// Box-and-whisker statistics of one group
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: EmotionLabel,
    pub q1: f32,
    pub median: f32,
    pub q3: f32,
    pub whisker_low: f32,
    pub whisker_high: f32,
    pub outliers: Vec<f32>,
}

/// One panel of the box-plot figure
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanel {
    pub feature: String,
    pub boxes: Vec<BoxStats>,
}

/// Side-by-side box plots, one panel per feature
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPanelChart {
    pub title: String,
    pub labels: Vec<EmotionLabel>,
    pub panels: Vec<BoxPanel>,
}

/// Group means for every feature, bars grouped by feature
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedBarChart {
    pub title: String,
    pub features: Vec<String>,
    /// One entry per group; `means[i]` belongs to `features[i]`
    pub groups: Vec<(EmotionLabel, Vec<Option<f32>>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Violin(ViolinChart),
    BoxPanels(BoxPanelChart),
    GroupedBars(GroupedBarChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Violin(c) => &c.title,
            Chart::BoxPanels(c) => &c.title,
            Chart::GroupedBars(c) => &c.title,
        }
    }
}

/// Sample standard deviation (n - 1), used only for the KDE bandwidth
fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Gaussian KDE with Scott's rule bandwidth
///
/// Fewer than two points, or a constant sample, yields a single spike at the
/// value (density 1.0) rather than a curve.
pub fn gaussian_kde(values: &[f32]) -> Vec<(f64, f64)> {
    let data: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    if data.is_empty() {
        return Vec::new();
    }

    let bandwidth = if data.len() < 2 {
        0.0
    } else {
        sample_std(&data) * (data.len() as f64).powf(-0.2)
    };
    if bandwidth.is_nan() || bandwidth <= 0.0 {
        return vec![(data[0], 1.0)];
    }

    let lo = data.iter().copied().fold(f64::INFINITY, f64::min) - DENSITY_CUT * bandwidth;
    let hi = data.iter().copied().fold(f64::NEG_INFINITY, f64::max) + DENSITY_CUT * bandwidth;
    let step = (hi - lo) / (DENSITY_GRID - 1) as f64;
    let norm = 1.0 / (data.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..DENSITY_GRID)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = data
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Quartiles, 1.5 IQR whiskers and outliers of one group
pub fn box_stats(label: EmotionLabel, values: &[f32]) -> Option<BoxStats> {
    let [q1, median, q3] = quartiles(values)?;
    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

    let inside = values.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let whisker_low = inside.clone().fold(f32::INFINITY, f32::min).min(q1);
    let whisker_high = inside.fold(f32::NEG_INFINITY, f32::max).max(q3);

    let outliers = values
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxStats {
        label,
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Key features present in `features`, in priority order
pub fn available_key_features(features: &[String], key_features: &[String]) -> Vec<String> {
    key_features
        .iter()
        .filter(|key| features.contains(*key))
        .cloned()
        .collect()
}

/// Violin chart of the first available key feature
pub fn violin_chart(table: &MeasurementTable, feature: &str) -> Option<ViolinChart> {
    let idx = table.feature_index(feature)?;
    let curves = table
        .labels()
        .into_iter()
        .map(|label| {
            let values = table.group_values(label, idx);
            DensityCurve {
                label,
                points: gaussian_kde(&values),
                median: quartiles(&values).map(|q| q[1]),
            }
        })
        .collect();

    Some(ViolinChart {
        title: format!("{} Distribution by Emotion (OpenFace Real)", feature),
        feature: feature.to_string(),
        curves,
    })
}

/// One box-plot panel per feature
pub fn box_panel_chart(table: &MeasurementTable, features: &[String]) -> BoxPanelChart {
    let labels = table.labels();
    let panels = features
        .iter()
        .filter_map(|feature| {
            let idx = table.feature_index(feature)?;
            let boxes = labels
                .iter()
                .filter_map(|&label| box_stats(label, &table.group_values(label, idx)))
                .collect();
            Some(BoxPanel {
                feature: feature.clone(),
                boxes,
            })
        })
        .collect();

    BoxPanelChart {
        title: "AU Distributions by Emotion (OpenFace Real)".to_string(),
        labels,
        panels,
    }
}

/// Group means of every feature
pub fn mean_bar_chart(table: &MeasurementTable, features: &[String]) -> GroupedBarChart {
    let groups = table
        .labels()
        .into_iter()
        .map(|label| {
            let means = features
                .iter()
                .map(|feature| {
                    let idx = table.feature_index(feature)?;
                    mean(&table.group_values(label, idx))
                })
                .collect();
            (label, means)
        })
        .collect();

    GroupedBarChart {
        title: "Mean AU Intensities by Emotion (OpenFace Real)".to_string(),
        features: features.to_vec(),
        groups,
    }
}
