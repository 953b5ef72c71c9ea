//! Raw tabular input
//!
//! A [`RawTable`] is a header row plus string cells, independent of whether
//! it came from CSV or a workbook. Headers are normalized (trimmed,
//! lowercased) on construction; blank cells are `None`.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto, Data, Reader};
use csv::{ReaderBuilder, Trim};
use dashcost_core::normalize_key;
use rust_decimal::Decimal;

use crate::{detect_format, FileFormat, LoadError};

/// Header-normalized table of optional string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Table name used in error messages
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(|h| normalize_key(h.as_ref())).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; blank cells become `None`
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let row = cells
            .into_iter()
            .map(|c| c.and_then(|s| non_blank(s.as_ref())))
            .collect();
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by (normalized) header
    pub fn column(&self, header: &str) -> Option<usize> {
        let wanted = normalize_key(header);
        self.headers.iter().position(|h| *h == wanted)
    }

    pub fn require_column(&self, header: &str) -> Result<usize, LoadError> {
        self.column(header).ok_or_else(|| LoadError::MissingColumn {
            table: self.name.clone(),
            column: normalize_key(header),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(|cells| RawRow { cells })
    }

    /// Parse CSV with a header row
    pub fn from_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, csv::Error> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut table = RawTable::new(name, headers.iter());

        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(Some));
        }

        Ok(table)
    }

    /// Build from calamine cells; the first row is the header
    pub fn from_cells<'a, I>(name: impl Into<String>, mut rows: I) -> Self
    where
        I: Iterator<Item = &'a [Data]>,
    {
        let headers: Vec<String> = rows
            .next()
            .map(|header| header.iter().map(|c| cell_text(c).unwrap_or_default()).collect())
            .unwrap_or_default();
        let mut table = RawTable::new(name, headers);

        for row in rows {
            table.push_row(row.iter().map(cell_text));
        }

        table
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [Option<String>],
}

impl<'a> RawRow<'a> {
    /// Cell text at a column, `None` when the column is absent or blank
    pub fn get(&self, column: Option<usize>) -> Option<&'a str> {
        column
            .and_then(|i| self.cells.get(i))
            .and_then(|c| c.as_deref())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// Read a table from disk, choosing the reader by extension
pub fn read_table(name: &str, path: &Path) -> Result<RawTable, LoadError> {
    let table = match detect_format(path) {
        FileFormat::Csv => {
            let file = File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            RawTable::from_csv(name, file).map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?
        }
        FileFormat::Spreadsheet => read_first_sheet(name, path)?,
    };

    tracing::debug!(
        table = name,
        path = %path.display(),
        rows = table.len(),
        columns = ?table.headers(),
        "table read"
    );

    Ok(table)
}

fn read_first_sheet(name: &str, path: &Path) -> Result<RawTable, LoadError> {
    // calamine wraps IO failures per format; surface a missing file as IO
    std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let spreadsheet_error = |source: calamine::Error| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(spreadsheet_error)?;

    Ok(RawTable::from_cells(name, range.rows()))
}

/// Text of a workbook cell; formula errors and empty cells are `None`
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => non_blank(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        other => non_blank(&other.to_string()),
    }
}

/// Whole floats print without a fractional part so "3.0" pages reads as "3"
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Strip a leading `$`, a trailing `%` and thousands separators
fn numeric_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed);
    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Best-effort float coercion; unparsable or non-finite input is `None`
pub fn coerce_number(raw: &str) -> Option<f64> {
    numeric_text(raw)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Best-effort decimal coercion; unparsable input is `None`
pub fn coerce_decimal(raw: &str) -> Option<Decimal> {
    let text = numeric_text(raw)?;
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
