/// Data layer: core types, loading, validation, filtering and export.
///
/// Architecture:
/// ```text
///   .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  read file → RawTable (text cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema  │  check columns, coerce cells → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  closed timestamp range → new Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export  │  Dataset → CSV bytes
///   └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
