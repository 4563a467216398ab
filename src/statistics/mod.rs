// Group Statistics Engine
//
// Computes per-emotion descriptive statistics for every AU and tests whether
// happy and sad differ, one independent t-test per AU.
//
// Implementation:
// - trueno (crates.io) for SIMD mean / standard deviation
// - aprender (crates.io) for the t-test and quantiles
// - a feature is only tested when both groups have non-zero spread; constant
//   columns would make the t statistic undefined

mod descriptive;
mod significance;
mod summary;

pub use descriptive::{describe, mean, quartiles, std_dev, Descriptive};
pub use significance::{two_sample_t_test, two_sided_p_value, TestOutcome};
pub use summary::{
    group_summaries, significance_tests, summarize, Exclusion, GroupSummary, GroupSummaryTable,
    SignificanceRecord, SignificanceTable,
};
