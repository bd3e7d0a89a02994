//! Housing dataset dashboard.
//!
//! The library holds everything that does not need a window:
//! - loading the housing table from CSV, JSON or Parquet
//! - the filter pipeline (ocean proximity, income band, price range)
//! - the map / histogram projections and the [`render::Presenter`] seam
//! - the optional JSON configuration
//!
//! ```no_run
//! use housing_dash::data::{self, FilterCriteria, IncomeBand};
//!
//! let dataset = data::load(std::path::Path::new("housing.csv")).unwrap();
//! let criteria = FilterCriteria::all(&dataset).with_income_band(IncomeBand::High);
//! let view = dataset.filter(&criteria).unwrap();
//! println!("{} points, center {:?}", view.points().len(), view.center());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod render;

pub use config::{DashboardConfig, MapStyle};
pub use error::DashboardError;
