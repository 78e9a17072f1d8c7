use crate::domain::model::ApplicationRecord;
use crate::utils::error::{JobMapError, Result};
use calamine::{Data, DataType, Reader, Xlsx};
use std::io::Cursor;
use std::path::Path;

pub const COL_DATE: &str = "Date Applied";
pub const COL_COMPANY: &str = "Company Name";
pub const COL_TITLE: &str = "Job Title";
pub const COL_LOCATION: &str = "Location";
pub const COL_STATUS: &str = "Status";
pub const COL_POSTING: &str = "Job Posting";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("xlsx") | Some("xlsm") => Ok(InputFormat::Xlsx),
            _ => Err(JobMapError::UnsupportedInputError {
                path: path.to_string(),
            }),
        }
    }
}

/// Decodes the whole input into records, in file order.
pub fn parse_records(data: &[u8], format: InputFormat) -> Result<Vec<ApplicationRecord>> {
    match format {
        InputFormat::Csv => parse_csv(data),
        InputFormat::Xlsx => parse_xlsx(data),
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    company: usize,
    title: usize,
    location: usize,
    status: usize,
    posting: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| JobMapError::MissingColumnError {
                    column: column.to_string(),
                })
        };

        Ok(Self {
            date: find(COL_DATE)?,
            company: find(COL_COMPANY)?,
            title: find(COL_TITLE)?,
            location: find(COL_LOCATION)?,
            status: find(COL_STATUS)?,
            posting: find(COL_POSTING)?,
        })
    }

    fn record(&self, row: usize, cells: &[String]) -> ApplicationRecord {
        let cell = |index: usize| {
            cells
                .get(index)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        ApplicationRecord {
            row,
            date_applied: cell(self.date),
            company: cell(self.company),
            title: cell(self.title),
            location: cell(self.location),
            status: cell(self.status),
            posting: cell(self.posting),
        }
    }
}

fn parse_csv(data: &[u8]) -> Result<Vec<ApplicationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row: Vec<String> = result?.iter().map(str::to_string).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(columns.record(i + 1, &row));
    }

    tracing::debug!("Parsed {} CSV rows", records.len());
    Ok(records)
}

fn parse_xlsx(data: &[u8]) -> Result<Vec<ApplicationRecord>> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| JobMapError::ProcessingError {
            message: "workbook contains no sheets".to_string(),
        })??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, cells) in rows.enumerate() {
        let row: Vec<String> = cells.iter().map(cell_to_string).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(columns.record(i + 1, &row));
    }

    tracing::debug!("Parsed {} spreadsheet rows", records.len());
    Ok(records)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => cell
            .as_datetime()
            .map(|dt: chrono::NaiveDateTime| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| value.as_f64().to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.replacen('T', " ", 1),
        Data::Error(err) => format!("#{:?}", err),
    }
}
