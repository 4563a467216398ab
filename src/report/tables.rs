//! CSV serialization of the summary and significance tables
//!
//! Summary: `emotion_label,au,mean,std,count` (mean/std rounded to 4 decimals,
//! NaN written as an empty cell).
//! Tests: `AU,group_a,group_b,t_statistic,p_value,significant,df` with
//! `significant` as `Yes`/`No`.

use super::ReportError;
use crate::dataset::{parse_records, CsvRecord};
use crate::emotion::EmotionLabel;
use crate::statistics::{GroupSummary, GroupSummaryTable, SignificanceRecord, SignificanceTable};
use std::path::Path;

const SUMMARY_HEADER: &str = "emotion_label,au,mean,std,count";
const TESTS_HEADER: &str = "AU,group_a,group_b,t_statistic,p_value,significant,df";

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Round for display: 4 decimals, empty for NaN
fn format_rounded(value: f32) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{:.4}", value)
    }
}

/// Shortest form that parses back to the same `f64`
///
/// Very small magnitudes use exponent notation so p-values stay readable.
fn format_exact(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value != 0.0 && value.abs() < 1e-4 {
        format!("{:e}", value)
    } else {
        value.to_string()
    }
}

/// Render the group summary table as CSV
pub fn format_summary(table: &GroupSummaryTable) -> String {
    let mut output = String::new();
    output.push_str(SUMMARY_HEADER);
    output.push('\n');

    for record in &table.records {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            record.label,
            escape_field(&record.feature),
            format_rounded(record.mean),
            format_rounded(record.std),
            record.count
        ));
    }

    output
}

/// Render the significance table as CSV
pub fn format_tests(table: &SignificanceTable) -> String {
    let mut output = String::new();
    output.push_str(TESTS_HEADER);
    output.push('\n');

    for record in &table.records {
        output.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            escape_field(&record.feature),
            record.group_a,
            record.group_b,
            format_exact(record.statistic),
            format_exact(record.p_value),
            if record.significant { "Yes" } else { "No" },
            format_exact(record.df)
        ));
    }

    output
}

/// Write `contents` to `path` via a sibling temp file and rename
///
/// Readers never observe a half-written artifact.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    std::fs::write(tmp, contents).map_err(io_err)?;
    std::fs::rename(tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(tmp);
        io_err(source)
    })
}

/// Write the group summary table to `path`
pub fn write_summary(table: &GroupSummaryTable, path: &Path) -> Result<(), ReportError> {
    write_atomic(path, format_summary(table).as_bytes())
}

/// Write the significance table to `path`
pub fn write_tests(table: &SignificanceTable, path: &Path) -> Result<(), ReportError> {
    write_atomic(path, format_tests(table).as_bytes())
}

fn read_records(path: &Path, header: &str) -> Result<Vec<CsvRecord>, ReportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let parse_err = |line: usize, message: String| ReportError::Parse {
        path: path.display().to_string(),
        line,
        message,
    };

    let records = parse_records(&text).map_err(|e| parse_err(0, format!("{:?}", e)))?;
    let mut records = records.into_iter();

    let first = records
        .next()
        .ok_or_else(|| parse_err(1, "missing header".to_string()))?;
    let expected: Vec<&str> = header.split(',').collect();
    let found: Vec<&str> = first.fields.iter().map(|f| f.trim()).collect();
    if found != expected {
        return Err(parse_err(first.line, format!("unexpected header: {}", found.join(","))));
    }

    let rows: Vec<CsvRecord> = records.collect();
    if let Some(bad) = rows.iter().find(|r| r.fields.len() != expected.len()) {
        return Err(parse_err(
            bad.line,
            format!("expected {} fields, found {}", expected.len(), bad.fields.len()),
        ));
    }
    Ok(rows)
}

fn parse_float(path: &Path, record: &CsvRecord, idx: usize) -> Result<f64, ReportError> {
    let raw = record.fields[idx].trim();
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse::<f64>().map_err(|_| ReportError::Parse {
        path: path.display().to_string(),
        line: record.line,
        message: format!("invalid number '{}'", raw),
    })
}

fn parse_label(path: &Path, record: &CsvRecord, idx: usize) -> Result<EmotionLabel, ReportError> {
    record.fields[idx]
        .trim()
        .parse()
        .map_err(|message| ReportError::Parse {
            path: path.display().to_string(),
            line: record.line,
            message,
        })
}

/// Read a summary table written by [`write_summary`]
pub fn read_summary(path: &Path) -> Result<GroupSummaryTable, ReportError> {
    let mut table = GroupSummaryTable::default();

    for record in read_records(path, SUMMARY_HEADER)? {
        let count = record.fields[4]
            .trim()
            .parse::<usize>()
            .map_err(|_| ReportError::Parse {
                path: path.display().to_string(),
                line: record.line,
                message: format!("invalid count '{}'", record.fields[4].trim()),
            })?;

        table.records.push(GroupSummary {
            label: parse_label(path, &record, 0)?,
            feature: record.fields[1].trim().to_string(),
            mean: parse_float(path, &record, 2)? as f32,
            std: parse_float(path, &record, 3)? as f32,
            count,
        });
    }

    Ok(table)
}

/// Read a significance table written by [`write_tests`]
///
/// The `significant` column is taken as written, not recomputed.
pub fn read_tests(path: &Path) -> Result<SignificanceTable, ReportError> {
    let mut table = SignificanceTable::default();

    for record in read_records(path, TESTS_HEADER)? {
        let significant = match record.fields[5].trim() {
            "Yes" => true,
            "No" => false,
            other => {
                return Err(ReportError::Parse {
                    path: path.display().to_string(),
                    line: record.line,
                    message: format!("invalid significance flag '{}'", other),
                })
            }
        };

        table.records.push(SignificanceRecord {
            feature: record.fields[0].trim().to_string(),
            group_a: parse_label(path, &record, 1)?,
            group_b: parse_label(path, &record, 2)?,
            statistic: parse_float(path, &record, 3)?,
            p_value: parse_float(path, &record, 4)?,
            significant,
            df: parse_float(path, &record, 6)?,
        });
    }

    Ok(table)
}
