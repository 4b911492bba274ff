//! Invariants of cleaning and grouping over generated cycler tables.

use std::collections::BTreeSet;

use lis_curves::data::filter::{clean, CleanerConfig, Direction, CYCLE_NO, STEP_NO, STEP_STATUS};
use lis_curves::data::group::group_all;
use lis_curves::data::model::{CellValue, Record, RecordSet};
use proptest::prelude::*;

const COLUMNS: [&str; 8] = [
    "StepStatus",
    "StepNo",
    "CycleNo",
    "SpeCap/mAh/g",
    "Voltage/V",
    "SysTime",
    "Capacity/uAh",
    "Energy/uWh",
];

fn status() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        3 => Just("CCC"),
        3 => Just("CCD"),
        2 => Just("R"),
        1 => Just("CV"),
    ]
}

fn row() -> impl Strategy<Value = Vec<CellValue>> {
    (status(), 0i64..8, 1i64..6, 0.0f64..800.0, 1.5f64..2.8).prop_map(|(s, step, cycle, cap, volt)| {
        vec![
            CellValue::Text(s.to_string()),
            CellValue::Int(step),
            CellValue::Int(cycle),
            CellValue::Float(cap),
            CellValue::Float(volt),
            CellValue::Text(format!("t{step}")),
            CellValue::Float(cap * 10.0),
            CellValue::Float(cap * volt),
        ]
    })
}

fn table() -> impl Strategy<Value = RecordSet> {
    prop::collection::vec(row(), 0..60)
        .prop_map(|rows| RecordSet::new(COLUMNS.iter().map(|c| c.to_string()).collect(), rows))
}

fn text<'a>(records: &'a RecordSet, record: &'a Record, col: &str) -> &'a str {
    records.value(record, col).and_then(CellValue::as_str).unwrap_or("")
}

fn int(records: &RecordSet, record: &Record, col: &str) -> i64 {
    records.value(record, col).and_then(CellValue::as_i64).unwrap_or(i64::MIN)
}

proptest! {
    #[test]
    fn dropping_columns_is_idempotent(records in table()) {
        let names = CleanerConfig::default().dropped_columns;
        let once = records.drop_columns(names.as_slice());
        let twice = once.drop_columns(names.as_slice());
        prop_assert_eq!(&once, &twice);
        prop_assert!(names.iter().all(|n| !once.has_column(n)));
        prop_assert_eq!(once.len(), records.len());
    }

    #[test]
    fn retained_rows_are_constant_current(records in table(), threshold in 0i64..6) {
        let config = CleanerConfig { cc_start_step: threshold, ..CleanerConfig::default() };
        let cleaned = clean(&records, &config).unwrap();

        for record in cleaned.retained.records() {
            prop_assert_ne!(text(&cleaned.retained, record, STEP_STATUS), "R");
            prop_assert!(int(&cleaned.retained, record, STEP_NO) >= threshold);
        }
        for direction in Direction::ALL {
            let subset = cleaned.subset(direction);
            for record in subset.records() {
                prop_assert_eq!(text(subset, record, STEP_STATUS), direction.status_code());
            }
        }
    }

    #[test]
    fn directions_partition_plotted_rows(records in table()) {
        let cleaned = clean(&records, &CleanerConfig::default()).unwrap();
        let charge: BTreeSet<usize> = cleaned.charge.indices().into_iter().collect();
        let discharge: BTreeSet<usize> = cleaned.discharge.indices().into_iter().collect();
        let retained: BTreeSet<usize> = cleaned.retained.indices().into_iter().collect();

        prop_assert!(charge.is_disjoint(&discharge));
        prop_assert!(charge.is_subset(&retained) && discharge.is_subset(&retained));
        prop_assert_eq!(charge.len() + discharge.len() + cleaned.unplotted, retained.len());
    }

    #[test]
    fn cycle_groups_partition_each_direction(records in table()) {
        let cleaned = clean(&records, &CleanerConfig::default()).unwrap();
        let grouped = group_all(&cleaned).unwrap();

        for direction in Direction::ALL {
            let subset = cleaned.subset(direction);
            let curves = grouped.get(direction);

            let mut seen: Vec<usize> = curves.groups.iter().flat_map(|g| g.indices.iter().copied()).collect();
            seen.sort_unstable();
            prop_assert_eq!(seen, subset.indices());

            let cycles = curves.cycles();
            prop_assert!(cycles.windows(2).all(|w| w[0] < w[1]));

            for group in &curves.groups {
                prop_assert_eq!(group.points.len(), group.indices.len());
                prop_assert!(group.indices.windows(2).all(|w| w[0] < w[1]));
                for record in subset.records().iter().filter(|r| group.indices.contains(&r.index)) {
                    prop_assert_eq!(int(subset, record, CYCLE_NO), group.cycle);
                }
            }
        }
    }
}
