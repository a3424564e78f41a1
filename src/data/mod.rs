/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Table per file identity, explicit invalidation
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema   │  expected columns per DataSource, checked once
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / date predicates → new Table
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod source;
