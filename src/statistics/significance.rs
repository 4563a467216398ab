// Two-sample significance testing between emotion groups
//
// aprender's independent t-test supplies the statistic and degrees of freedom.
// With `equal_variance = true` this is Student's pooled-variance test; with
// `false` it is Welch's test. The two-sided p-value comes from the Student t
// survival function in f64, so strong effects keep tiny but non-zero p-values.

use anyhow::{Context, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Raw outcome of one t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestOutcome {
    /// t statistic (positive when group a has the larger mean)
    pub statistic: f64,
    /// Two-tailed p-value
    pub p_value: f64,
    /// Degrees of freedom
    pub df: f64,
}

/// Two-sided p-value of `t` under a Student t distribution with `df` degrees of freedom
pub fn two_sided_p_value(t: f64, df: f64) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| anyhow::anyhow!("Invalid degrees of freedom {}: {}", df, e))?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Compare two samples with an independent two-sample t-test
///
/// # Example
/// ```
/// use auscope::statistics::two_sample_t_test;
///
/// let happy = [2.4, 2.8, 2.1, 2.6, 2.5];
/// let sad = [0.4, 0.2, 0.6, 0.5, 0.3];
/// let outcome = two_sample_t_test(&happy, &sad, true).unwrap();
/// assert!(outcome.p_value < 0.05);
/// assert!(outcome.statistic > 0.0);
/// ```
pub fn two_sample_t_test(a: &[f32], b: &[f32], equal_variance: bool) -> Result<TestOutcome> {
    if a.len() < 2 || b.len() < 2 {
        anyhow::bail!(
            "Need at least 2 samples per group for t-test (got {} and {})",
            a.len(),
            b.len()
        );
    }

    let result = aprender::stats::hypothesis::ttest_ind(a, b, equal_variance)
        .context("Failed to compute t-test")?;

    let statistic = f64::from(result.statistic);
    let df = f64::from(result.df);
    if !statistic.is_finite() {
        anyhow::bail!("t statistic is not finite ({})", statistic);
    }

    Ok(TestOutcome {
        statistic,
        p_value: two_sided_p_value(statistic, df)?,
        df,
    })
}
