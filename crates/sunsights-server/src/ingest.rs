//! Comment extraction from uploaded spreadsheets

use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use sunsights_core::{Error, Result};

/// Header fragments that mark the comment column, in no particular order
pub const COMMENT_COLUMNS: &[&str] = &[
    "comment",
    "comments",
    "text",
    "feedback",
    "review",
    "message",
    "description",
];

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Excel,
}

impl FileKind {
    /// Format from a file name's extension, `None` if not accepted
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xls" | "xlsx" => Some(FileKind::Excel),
            _ => None,
        }
    }
}

/// Header row plus cell text
#[derive(Debug, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Non-empty cells of `column`, in row order
    pub fn column(&self, column: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|cell| !cell.is_empty())
            .cloned()
            .collect()
    }
}

/// Parse an upload into a table
pub fn read_table(kind: FileKind, bytes: &[u8]) -> Result<Table> {
    match kind {
        FileKind::Csv => read_csv(bytes),
        FileKind::Excel => read_excel(bytes),
    }
}

/// First header containing a comment-like name, else the first column
pub fn comment_column(headers: &[String]) -> Option<usize> {
    if headers.is_empty() {
        return None;
    }

    let matched = headers.iter().position(|header| {
        let header = header.to_lowercase();
        COMMENT_COLUMNS.iter().any(|name| header.contains(name))
    });

    Some(matched.unwrap_or(0))
}

fn read_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::ingest(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(Error::ingest("No columns to parse from file"));
    }

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| Error::ingest(e.to_string()))
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(Table { headers, rows })
}

fn read_excel(bytes: &[u8]) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|e| Error::ingest(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::ingest("Workbook has no sheets"))?
        .map_err(|e| Error::ingest(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let headers = rows
        .next()
        .ok_or_else(|| Error::ingest("No columns to parse from file"))?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    Ok(Table {
        headers,
        rows: rows.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_file_name("reviews.csv"), Some(FileKind::Csv));
        assert_eq!(FileKind::from_file_name("Q3.Feedback.XLSX"), Some(FileKind::Excel));
        assert_eq!(FileKind::from_file_name("legacy.xls"), Some(FileKind::Excel));
        assert_eq!(FileKind::from_file_name("notes.txt"), None);
        assert_eq!(FileKind::from_file_name("csv"), None);
    }

    #[test]
    fn test_comment_column_detection() {
        let headers = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        assert_eq!(comment_column(&headers(&["id", "Customer Feedback", "date"])), Some(1));
        assert_eq!(comment_column(&headers(&["id", "Review Text", "Comments"])), Some(1));
        assert_eq!(comment_column(&headers(&["id", "rating"])), Some(0));
        assert_eq!(comment_column(&[]), None);
    }

    #[test]
    fn test_csv_comments_skip_empty_cells() {
        let csv = b"id,comment\n1,Great service\n2,\n3,\"Slow, but friendly\"\n";
        let table = read_table(FileKind::Csv, csv).unwrap();

        let column = comment_column(&table.headers).unwrap();
        assert_eq!(
            table.column(column),
            vec!["Great service".to_string(), "Slow, but friendly".to_string()]
        );
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = b"id,feedback\n1\n2,Loved it\n";
        let table = read_table(FileKind::Csv, csv).unwrap();
        assert_eq!(table.column(1), vec!["Loved it".to_string()]);
    }

    #[test]
    fn test_empty_csv_is_an_error() {
        assert!(read_table(FileKind::Csv, b"").is_err());
    }

    #[test]
    fn test_excel_workbook_comments() {
        let workbook = include_bytes!("../tests/fixtures/feedback.xlsx");
        let table = read_table(FileKind::Excel, workbook).unwrap();

        assert_eq!(table.headers, vec!["id", "Customer Feedback", "rating"]);

        let column = comment_column(&table.headers).unwrap();
        assert_eq!(column, 1);
        // Missing cells are dropped, numeric cells become plain text
        assert_eq!(
            table.column(column),
            vec![
                "It doesn't work".to_string(),
                "The service wasn't bad at all".to_string(),
                "12345".to_string(),
            ]
        );
        assert_eq!(table.column(2), vec!["4.5", "3", "5", "1"]);
    }

    #[test]
    fn test_garbage_excel_is_an_error() {
        assert!(read_table(FileKind::Excel, b"definitely not a workbook").is_err());
    }
}
