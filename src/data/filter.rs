use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::{Record, RecordSet};
use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Column names written by the cycler
// ---------------------------------------------------------------------------

pub const STEP_STATUS: &str = "StepStatus";
pub const STEP_NO: &str = "StepNo";
pub const CYCLE_NO: &str = "CycleNo";
pub const SPECIFIC_CAPACITY: &str = "SpeCap/mAh/g";
pub const VOLTAGE: &str = "Voltage/V";

/// Columns the curves cannot be drawn without.
pub const REQUIRED_COLUMNS: [&str; 5] = [STEP_STATUS, STEP_NO, CYCLE_NO, SPECIFIC_CAPACITY, VOLTAGE];

/// Status code of a rest step.
pub const REST_STATUS: &str = "R";

// ---------------------------------------------------------------------------
// Direction – charge or discharge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Charge,
    Discharge,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Charge, Direction::Discharge];

    /// `StepStatus` value of the constant-current step in this direction.
    pub fn status_code(self) -> &'static str {
        match self {
            Direction::Charge => "CCC",
            Direction::Discharge => "CCD",
        }
    }

    pub fn from_status(status: &str) -> Option<Direction> {
        Direction::ALL.into_iter().find(|d| d.status_code() == status)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Charge => write!(f, "charge"),
            Direction::Discharge => write!(f, "discharge"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cleaner configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Columns removed before filtering; absent ones are ignored.
    pub dropped_columns: Vec<String>,
    /// First step number of the constant-current region. Instrument specific.
    pub cc_start_step: i64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            dropped_columns: [
                "Capacity/uAh",
                "SysTime",
                "StepTime",
                "SOC|DOD/%",
                "Energy/uWh",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            cc_start_step: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

/// Output of [`clean`]: the two plotted subsets and what they were cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedData {
    /// Records past the rest and early-step filters, any status.
    pub retained: RecordSet,
    pub charge: RecordSet,
    pub discharge: RecordSet,
    /// Retained records whose status is neither charge nor discharge.
    pub unplotted: usize,
}

impl CleanedData {
    pub fn subset(&self, direction: Direction) -> &RecordSet {
        match direction {
            Direction::Charge => &self.charge,
            Direction::Discharge => &self.discharge,
        }
    }
}

/// Check that every column in [`REQUIRED_COLUMNS`] is present.
pub fn require_columns(records: &RecordSet) -> Result<(), SchemaError> {
    match REQUIRED_COLUMNS.iter().find(|c| !records.has_column(c)) {
        Some(missing) => Err(SchemaError::MissingColumn {
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}

/// Drop unused columns, remove rest and pre-CC steps, and split the rest by
/// direction. `records` is left untouched.
///
/// A `StepNo` that is not numeric never passes the threshold.
pub fn clean(records: &RecordSet, config: &CleanerConfig) -> Result<CleanedData, SchemaError> {
    let trimmed = records.drop_columns(config.dropped_columns.as_slice());
    require_columns(&trimmed)?;

    let status_idx = column(&trimmed, STEP_STATUS)?;
    let step_idx = column(&trimmed, STEP_NO)?;
    let retained = trimmed
        .filter(|r| status_of(r, status_idx) != Some(REST_STATUS))
        .filter(|r| {
            r.cells[step_idx]
                .as_f64()
                .is_some_and(|step| step >= config.cc_start_step as f64)
        });

    let charge = retained.filter(|r| status_of(r, status_idx) == Some(Direction::Charge.status_code()));
    let discharge =
        retained.filter(|r| status_of(r, status_idx) == Some(Direction::Discharge.status_code()));

    let unplotted = retained.len() - charge.len() - discharge.len();
    if unplotted > 0 {
        log::debug!("{unplotted} retained rows have a step status other than CCC/CCD");
    }
    log::info!(
        "cleaned {} rows: {} retained, {} charge, {} discharge",
        records.len(),
        retained.len(),
        charge.len(),
        discharge.len()
    );

    Ok(CleanedData {
        retained,
        charge,
        discharge,
        unplotted,
    })
}

fn status_of(record: &Record, idx: usize) -> Option<&str> {
    record.cells[idx].as_str()
}

pub(crate) fn column(records: &RecordSet, name: &str) -> Result<usize, SchemaError> {
    records
        .column_index(name)
        .ok_or_else(|| SchemaError::MissingColumn {
            column: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(rows: &[(&str, i64, i64)]) -> RecordSet {
        RecordSet::new(
            vec![
                "SysTime".into(),
                STEP_STATUS.into(),
                STEP_NO.into(),
                CYCLE_NO.into(),
                SPECIFIC_CAPACITY.into(),
                VOLTAGE.into(),
            ],
            rows.iter()
                .enumerate()
                .map(|(i, (status, step, cycle))| {
                    vec![
                        CellValue::Text(format!("t{i}")),
                        CellValue::Text(status.to_string()),
                        CellValue::Int(*step),
                        CellValue::Int(*cycle),
                        CellValue::Float(i as f64 * 10.0),
                        CellValue::Float(2.0 + i as f64 * 0.01),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn early_steps_are_excluded() {
        let set = table(&[("CCC", 1, 1), ("CCC", 2, 1), ("CCD", 3, 1), ("CCD", 4, 1)]);
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert_eq!(cleaned.retained.indices(), vec![2, 3]);
        assert_eq!(cleaned.charge.len(), 0);
        assert_eq!(cleaned.discharge.indices(), vec![2, 3]);
    }

    #[test]
    fn rest_rows_are_excluded_everywhere() {
        let set = table(&[("R", 3, 1), ("R", 5, 1), ("R", 9, 2)]);
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert!(cleaned.retained.is_empty());
        assert!(cleaned.charge.is_empty());
        assert!(cleaned.discharge.is_empty());
    }

    #[test]
    fn unused_columns_are_dropped() {
        let set = table(&[("CCC", 3, 1)]);
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert!(!cleaned.charge.has_column("SysTime"));
        assert!(set.has_column("SysTime"));
    }

    #[test]
    fn other_statuses_are_counted_not_plotted() {
        let set = table(&[("CCC", 3, 1), ("CV", 4, 1), ("CCD", 5, 1), ("DCV", 6, 1)]);
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert_eq!(cleaned.retained.len(), 4);
        assert_eq!(cleaned.unplotted, 2);
        assert_eq!(cleaned.charge.indices(), vec![0]);
        assert_eq!(cleaned.discharge.indices(), vec![2]);
    }

    #[test]
    fn threshold_is_configurable() {
        let set = table(&[("CCC", 1, 1), ("CCD", 2, 1)]);
        let config = CleanerConfig {
            cc_start_step: 1,
            ..CleanerConfig::default()
        };
        let cleaned = clean(&set, &config).unwrap();
        assert_eq!(cleaned.charge.len(), 1);
        assert_eq!(cleaned.discharge.len(), 1);
    }

    #[test]
    fn non_numeric_step_never_passes() {
        let set = RecordSet::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![vec![
                CellValue::Text("CCC".into()),
                CellValue::Empty,
                CellValue::Int(1),
                CellValue::Float(1.0),
                CellValue::Float(2.0),
            ]],
        );
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert!(cleaned.retained.is_empty());
    }

    #[test]
    fn fractional_step_is_compared_numerically() {
        let row = |step: f64| {
            vec![
                CellValue::Text("CCC".into()),
                CellValue::Float(step),
                CellValue::Int(1),
                CellValue::Float(1.0),
                CellValue::Float(2.0),
            ]
        };
        let set = RecordSet::new(
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![row(3.5), row(2.5), row(f64::NAN)],
        );
        let cleaned = clean(&set, &CleanerConfig::default()).unwrap();
        assert_eq!(cleaned.charge.indices(), vec![0]);
    }

    #[test]
    fn missing_voltage_is_a_schema_error() {
        let set = table(&[("CCC", 3, 1)]).drop_columns(&[VOLTAGE]);
        assert_eq!(
            clean(&set, &CleanerConfig::default()),
            Err(SchemaError::MissingColumn {
                column: VOLTAGE.to_string()
            })
        );
    }

    #[test]
    fn dropping_a_required_column_by_config_is_a_schema_error() {
        let set = table(&[("CCC", 3, 1)]);
        let config = CleanerConfig {
            dropped_columns: vec![CYCLE_NO.to_string()],
            ..CleanerConfig::default()
        };
        assert!(clean(&set, &config).is_err());
    }
}
