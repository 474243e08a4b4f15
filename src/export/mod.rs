//! CSV export of flight records.
//!
//! The header row is the record's field names in declaration order. Every
//! non-numeric field, header names included, is double-quoted with embedded
//! quotes doubled; numbers are written bare; `None` is an empty quoted cell.

use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Suggested file name for downloads.
pub const CSV_FILE_NAME: &str = "flight_data.csv";

/// MIME type for downloads.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Serialize records to CSV text, one `\n`-separated line per record.
pub fn to_csv<T: Serialize>(records: &[T]) -> AppResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record).map_err(|e| AppError::Export {
            message: format!("failed to write record: {}", e),
        })?;
    }

    let bytes = writer.into_inner().map_err(|e| AppError::Export {
        message: format!("failed to flush CSV: {}", e.error()),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| AppError::Export {
        message: format!("CSV is not valid UTF-8: {}", e),
    })?;

    // No terminator after the last line.
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Fare {
        route: &'static str,
        price: u32,
        airline: &'static str,
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Fare> = Vec::new();
        assert_eq!(to_csv(&records).unwrap(), "");
    }

    #[test]
    fn test_header_follows_declaration_order() {
        let records = vec![
            Fare { route: "JFK-LAX", price: 250, airline: "Delta" },
            Fare { route: "ORD-SFO", price: 199, airline: "United" },
        ];

        let text = to_csv(&records).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "\"route\",\"price\",\"airline\"");
        assert_eq!(lines[1], "\"JFK-LAX\",250,\"Delta\"");
        assert_eq!(lines[2], "\"ORD-SFO\",199,\"United\"");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let records = vec![Fare { route: "A, \"B\"", price: 10, airline: "The \"Best\" Air" }];
        let text = to_csv(&records).unwrap();
        assert_eq!(
            text,
            "\"route\",\"price\",\"airline\"\n\"A, \"\"B\"\"\",10,\"The \"\"Best\"\" Air\""
        );
    }

    #[test]
    fn test_none_is_empty_cell() {
        #[derive(Serialize)]
        struct Row {
            a: Option<&'static str>,
            b: Option<u32>,
        }

        let text = to_csv(&[Row { a: Some("x"), b: None }, Row { a: None, b: Some(2) }]).unwrap();
        let rows: Vec<csv::StringRecord> = csv::Reader::from_reader(text.as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "");
        assert_eq!(&rows[1][0], "");
        assert_eq!(&rows[1][1], "2");
    }

    #[test]
    fn test_nested_records_are_rejected() {
        #[derive(Serialize)]
        struct Nested {
            inner: std::collections::BTreeMap<String, u32>,
        }

        let err = to_csv(&[Nested { inner: [("a".to_string(), 1)].into() }]).unwrap_err();
        assert!(matches!(err, AppError::Export { .. }));
    }
}
