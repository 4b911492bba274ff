use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// The uploaded file could not be read as a table of measurements.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("not a readable spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("not a readable CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("worksheet '{name}' not found (available: {})", available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    #[error("workbook contains no worksheets")]
    NoSheets,
}

/// A column needed for plotting is absent after cleaning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },
}

/// Top-level error for everything the library does.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("PNG export failed: {0}")]
    Export(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_the_column() {
        let err: ViewerError = SchemaError::MissingColumn {
            column: "Voltage/V".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "required column 'Voltage/V' is missing");
    }

    #[test]
    fn missing_sheet_lists_alternatives() {
        let err = ParseError::SheetNotFound {
            name: "record".to_string(),
            available: vec!["Sheet1".to_string(), "step".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "worksheet 'record' not found (available: Sheet1, step)"
        );
    }
}
