use std::collections::BTreeMap;

use super::filter::{column, CleanedData, Direction, CYCLE_NO, SPECIFIC_CAPACITY, VOLTAGE};
use super::model::RecordSet;
use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Curve data
// ---------------------------------------------------------------------------

/// One sample on a voltage–capacity curve. Non-numeric cells become NaN and
/// break the drawn line at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub capacity: f64,
    pub voltage: f64,
}

impl CurvePoint {
    pub fn is_finite(&self) -> bool {
        self.capacity.is_finite() && self.voltage.is_finite()
    }
}

/// All records of one direction sharing a cycle number, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleGroup {
    pub direction: Direction,
    pub cycle: i64,
    pub points: Vec<CurvePoint>,
    /// Source row numbers, parallel to `points`.
    pub indices: Vec<usize>,
}

/// The cycle groups of one direction, ascending by cycle number.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionCurves {
    pub direction: Direction,
    pub groups: Vec<CycleGroup>,
    /// Lowest and highest cycle present, `None` when there are no groups.
    pub cycle_range: Option<(i64, i64)>,
    /// Records skipped because their `CycleNo` is not an integer.
    pub skipped: usize,
}

impl DirectionCurves {
    pub fn empty(direction: Direction) -> Self {
        DirectionCurves {
            direction,
            groups: Vec::new(),
            cycle_range: None,
            skipped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn cycles(&self) -> Vec<i64> {
        self.groups.iter().map(|g| g.cycle).collect()
    }
}

/// Both directions, ready for colouring and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCurves {
    pub charge: DirectionCurves,
    pub discharge: DirectionCurves,
}

impl GroupedCurves {
    pub fn get(&self, direction: Direction) -> &DirectionCurves {
        match direction {
            Direction::Charge => &self.charge,
            Direction::Discharge => &self.discharge,
        }
    }

    pub fn total_groups(&self) -> usize {
        self.charge.groups.len() + self.discharge.groups.len()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partition `records` by `CycleNo`. An empty input yields no groups.
pub fn group_cycles(records: &RecordSet, direction: Direction) -> Result<DirectionCurves, SchemaError> {
    let cycle_idx = column(records, CYCLE_NO)?;
    let cap_idx = column(records, SPECIFIC_CAPACITY)?;
    let volt_idx = column(records, VOLTAGE)?;

    let mut by_cycle: BTreeMap<i64, CycleGroup> = BTreeMap::new();
    let mut skipped = 0;

    for record in records.records() {
        let Some(cycle) = record.cells[cycle_idx].as_i64() else {
            skipped += 1;
            continue;
        };
        let point = CurvePoint {
            capacity: record.cells[cap_idx].as_f64().unwrap_or(f64::NAN),
            voltage: record.cells[volt_idx].as_f64().unwrap_or(f64::NAN),
        };
        let group = by_cycle.entry(cycle).or_insert_with(|| CycleGroup {
            direction,
            cycle,
            points: Vec::new(),
            indices: Vec::new(),
        });
        group.points.push(point);
        group.indices.push(record.index);
    }

    if skipped > 0 {
        log::warn!("{skipped} {direction} rows have no integer CycleNo and were skipped");
    }

    let cycle_range = match (by_cycle.keys().next(), by_cycle.keys().next_back()) {
        (Some(&lo), Some(&hi)) => Some((lo, hi)),
        _ => None,
    };

    Ok(DirectionCurves {
        direction,
        groups: by_cycle.into_values().collect(),
        cycle_range,
        skipped,
    })
}

/// Group both subsets of a cleaning result.
pub fn group_all(cleaned: &CleanedData) -> Result<GroupedCurves, SchemaError> {
    Ok(GroupedCurves {
        charge: group_cycles(cleaned.subset(Direction::Charge), Direction::Charge)?,
        discharge: group_cycles(cleaned.subset(Direction::Discharge), Direction::Discharge)?,
    })
}
