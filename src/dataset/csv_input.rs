//! Minimal CSV reader for OpenFace output files
//!
//! Handles double-quoted fields (with `""` escapes and embedded newlines) and
//! CRLF line endings. Blank lines are skipped.

/// One parsed CSV record with the 1-based line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Reasons a CSV document cannot be tokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSyntaxError {
    /// A quoted field was still open at end of input
    UnterminatedQuote { line: usize },
}

/// Split a CSV document into records
pub fn parse_records(text: &str) -> Result<Vec<CsvRecord>, CsvSyntaxError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvSyntaxError::UnterminatedQuote { line: record_line });
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<CsvRecord>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push(CsvRecord { line, fields });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(records: &[CsvRecord]) -> Vec<Vec<&str>> {
        records
            .iter()
            .map(|r| r.fields.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_parse_simple() {
        let records = parse_records("a,b,c\n1,2,3\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let records = parse_records("a,b\n1,2").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_parse_crlf() {
        let records = parse_records("a,b\r\n1,2\r\n").unwrap();
        assert_eq!(fields(&records), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_parse_keeps_padding() {
        let records = parse_records("frame, AU01_r\n1, 0.5\n").unwrap();
        assert_eq!(records[0].fields[1], " AU01_r");
        assert_eq!(records[1].fields[1], " 0.5");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records = parse_records("name,note\n\"KA.HA1.29.jpg\",\"a, \"\"quoted\"\" note\"\n")
            .unwrap();
        assert_eq!(records[1].fields[0], "KA.HA1.29.jpg");
        assert_eq!(records[1].fields[1], "a, \"quoted\" note");
    }

    #[test]
    fn test_parse_quoted_newline_tracks_lines() {
        let records = parse_records("a,b\n\"x\ny\",1\nz,2\n").unwrap();
        assert_eq!(records[1].fields[0], "x\ny");
        assert_eq!(records[1].line, 2);
        assert_eq!(records[2].line, 4);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let records = parse_records("a,b\n\n1,2\n   \n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_parse_empty_fields() {
        let records = parse_records("a,b,c\n1,,3\n").unwrap();
        assert_eq!(records[1].fields, vec!["1", "", "3"]);
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let err = parse_records("a,b\n\"open,1\n").unwrap_err();
        assert_eq!(err, CsvSyntaxError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(parse_records("").unwrap().is_empty());
    }
}
