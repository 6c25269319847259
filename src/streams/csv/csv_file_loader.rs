use crate::core::dataset::Dataset;
use crate::streams::csv::parser::{parse_header, parse_record};
use ::csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{Error, ErrorKind, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Label column name. `None` takes the last column.
    pub label_column: Option<String>,
    /// Feature column names, in the order they should appear in the dataset.
    /// `None` takes every column except the label.
    pub feature_columns: Option<Vec<String>>,
    pub delimiter: u8,
    /// Skip rows that fail to parse (reported on stderr) instead of failing.
    pub skip_invalid_rows: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            label_column: None,
            feature_columns: None,
            delimiter: b',',
            skip_invalid_rows: false,
        }
    }
}

/// Loads a labelled dataset from a CSV file with a header row. The relation
/// is named after the file stem.
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Dataset, Error> {
    let file = File::open(path)?;
    let relation = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed_relation".to_string());
    load_csv_from_reader(file, &relation, options)
}

/// Lines starting with `#` and blank lines are skipped. Cells are trimmed and
/// only `"` quotes.
pub fn load_csv_from_reader<R: Read>(
    reader: R,
    relation_name: &str,
    options: &CsvOptions,
) -> Result<Dataset, Error> {
    let mut rows = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(options.delimiter)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    let header = match rows.next() {
        Some(row) => row.map_err(csv_to_io)?,
        None => {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                "CSV file has no header row",
            ));
        }
    };
    let layout = parse_header(&header, options)?;

    let mut records: Vec<(Vec<f64>, String)> = Vec::new();
    for row in rows {
        let parsed = row
            .map_err(csv_to_io)
            .and_then(|r| parse_record(&layout, &r).map_err(|e| at_line(&r, e)));

        match parsed {
            Ok(record) => records.push(record),
            Err(e) if e.kind() == ErrorKind::InvalidData && options.skip_invalid_rows => {
                eprintln!("Skipping {e}");
            }
            Err(e) => return Err(e),
        }
    }

    if records.is_empty() {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            "CSV file has no data rows",
        ));
    }

    let feature_names: Vec<&str> = layout.feature_names.iter().map(String::as_str).collect();
    Dataset::from_records(relation_name, &feature_names, &layout.label_name, &records)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))
}

fn at_line(record: &StringRecord, e: Error) -> Error {
    match record.position() {
        Some(pos) => Error::new(e.kind(), format!("line {}: {e}", pos.line())),
        None => e,
    }
}

/// I/O failures keep their kind; anything the tokenizer rejects is bad data.
fn csv_to_io(e: ::csv::Error) -> Error {
    let line = e.position().map(|p| p.line());
    let message = e.to_string();
    match e.into_kind() {
        ::csv::ErrorKind::Io(io) => io,
        _ => Error::new(
            ErrorKind::InvalidData,
            match line {
                Some(n) => format!("line {n}: {message}"),
                None => message,
            },
        ),
    }
}
