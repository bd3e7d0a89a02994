/// Data layer: core types, loading, filtering and projection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (never empty)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  income band ∧ proximity ∧ price range → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection │  map points + centre, 30-bucket price histogram
///   └────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;

pub use filter::{FilterCriteria, PriceRange, filter_records};
pub use loader::load;
pub use model::{Dataset, IncomeBand, OceanProximity, Record};
pub use projection::{Bucket, FilteredView, GeoPoint, Histogram, HistogramRange, Projection};
