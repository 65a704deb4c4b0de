/// Data layer: record types, loading, and filter primitives.
///
/// Architecture:
/// ```text
///  Vec<Record> / URL / .json .csv .parquet
///        │
///        ▼
///   ┌──────────┐    ┌─────────┐
///   │  loader   │◄───│  fetch   │  URL → JSON text
///   └──────────┘    └─────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  Vec<Record>  │  attribute → Value
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  string/range predicates, page arithmetic
///   └──────────┘
/// ```

pub mod fetch;
pub mod filter;
pub mod loader;
pub mod model;
