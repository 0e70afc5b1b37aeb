/// Data layer: record types, loading, validation, and nearest-year lookup.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  coerce fields → Vec<TemperatureRecord>
///   └──────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ TemperatureDataset │  non-empty, unique years, baseline present
///   └────────────────────┘
///        │
///        ▼
///   resolve(year) → nearest record
/// ```

pub mod error;
pub mod loader;
pub mod model;
