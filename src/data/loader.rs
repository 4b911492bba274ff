use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::model::{CellValue, RecordSet};
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Uploaded file
// ---------------------------------------------------------------------------

/// Bytes of one uploaded file together with its name (used for format dispatch).
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        SourceFile {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(SourceFile::new(name, bytes))
    }

    pub(crate) fn is_csv(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a [`RecordSet`].  Dispatch by extension.
///
/// * `.csv` – header row followed by data rows
/// * anything else – `.xls`, `.xlsx`, `.xlsb` or `.ods`, detected from content;
///   `sheet` selects a worksheet by name, otherwise the first one is used
pub fn load_file(file: &SourceFile, sheet: Option<&str>) -> Result<RecordSet, ParseError> {
    if file.is_csv() {
        load_csv(&file.bytes)
    } else {
        load_spreadsheet(&file.bytes, sheet)
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(bytes: &[u8], sheet: Option<&str>) -> Result<RecordSet, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let available = workbook.sheet_names();

    let name = match sheet {
        Some(wanted) => available
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ParseError::SheetNotFound {
                name: wanted.to_string(),
                available: available.clone(),
            })?,
        None => available.first().cloned().ok_or(ParseError::NoSheets)?,
    };

    let range = workbook.worksheet_range(&name)?;
    log::debug!("reading worksheet '{name}' ({} x {})", range.height(), range.width());
    Ok(range_to_records(&range))
}

fn range_to_records(range: &Range<Data>) -> RecordSet {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return RecordSet::default();
    };

    let raw_headers: Vec<String> = header
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.trim().to_string(),
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    let columns = unique_headers(raw_headers);

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    RecordSet::new(columns, data)
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Excel serial day number
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Blank headers become `Unnamed: <col>`; repeats get `.1`, `.2`, … suffixes.
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.into_iter()
        .enumerate()
        .map(|(col, name)| {
            let name = if name.is_empty() {
                format!("Unnamed: {col}")
            } else {
                name
            };
            let count = seen.entry(name.clone()).or_insert(0);
            let unique = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            unique
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one time sample per line.
fn load_csv(bytes: &[u8]) -> Result<RecordSet, ParseError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells: Vec<CellValue> = record.iter().map(guess_cell_type).collect();
        if cells.iter().any(|c| !c.is_empty()) {
            rows.push(cells);
        }
    }

    Ok(RecordSet::new(unique_headers(headers), rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}
