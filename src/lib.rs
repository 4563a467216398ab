//! auscope - facial action unit statistics for happy vs sad expressions
//!
//! This library loads OpenFace AU intensity tables, labels each sample with an
//! emotion decoded from its file name, and compares the happy and sad groups
//! with per-AU descriptive statistics and two-sample t-tests. Results are
//! written as CSV tables and PNG charts.

pub mod cli;
pub mod config;
pub mod dataset;
pub mod emotion;
pub mod findings;
pub mod pipeline;
pub mod report;
pub mod statistics;
