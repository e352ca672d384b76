/// Data layer: core types, loading, label mapping and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (fails fast on schema errors)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Observation>, continent / metric option lists
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  continent+metric subset → options/bounds → final indices
///   └──────────┘
/// ```

pub mod filter;
pub mod labels;
pub mod loader;
pub mod model;
