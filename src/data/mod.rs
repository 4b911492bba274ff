/// Data layer: core types, loading, cleaning and grouping.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordSet   (memoized by `cache`)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop columns, rest / early steps → charge, discharge
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  partition by CycleNo → CycleGroup per cycle
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod group;
pub mod loader;
pub mod model;
