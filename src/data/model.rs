use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the cycler export
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a spreadsheet column can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer view; floats qualify only when they hold an integral value
    /// (spreadsheets store step and cycle numbers as doubles).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// Record – one time sample (one row of the sheet)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// 0-based data-row number in the source sheet, kept by every derived set.
    pub index: usize,
    /// One cell per column of the owning [`RecordSet`].
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// RecordSet – the loaded table
// ---------------------------------------------------------------------------

/// Ordered, immutable table of records. Every transformation returns a new set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Build a set from column names and rows; rows are indexed in order and
    /// padded (or truncated) to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, mut cells)| {
                cells.resize(width, CellValue::Empty);
                Record { index, cells }
            })
            .collect();
        RecordSet { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell of `record` in column `name`, if the column exists.
    pub fn value<'a>(&self, record: &'a Record, name: &str) -> Option<&'a CellValue> {
        self.column_index(name).and_then(|i| record.cells.get(i))
    }

    /// Remove the named columns. Names that are not present are ignored, so
    /// applying the same list twice gives the same set as applying it once.
    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> RecordSet {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !names.iter().any(|n| n.as_ref() == c.as_str()))
            .map(|(i, _)| i)
            .collect();

        if keep.len() == self.columns.len() {
            return self.clone();
        }

        let columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        let records = self
            .records
            .iter()
            .map(|r| Record {
                index: r.index,
                cells: keep.iter().map(|&i| r.cells[i].clone()).collect(),
            })
            .collect();
        RecordSet { columns, records }
    }

    /// Records satisfying `predicate`, in their original order.
    pub fn filter<F>(&self, mut predicate: F) -> RecordSet
    where
        F: FnMut(&Record) -> bool,
    {
        RecordSet {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }

    /// The first `n` records, for the preview table.
    pub fn head(&self, n: usize) -> RecordSet {
        RecordSet {
            columns: self.columns.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Original row numbers of all records.
    pub fn indices(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.index).collect()
    }
}
