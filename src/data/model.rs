use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// OceanProximity – the categorical location column
// ---------------------------------------------------------------------------

/// Location category of a block group relative to the coast.
///
/// The source column is free text; anything outside the known labels is
/// kept verbatim in [`OceanProximity::Other`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OceanProximity {
    NearBay,
    Inland,
    NearOcean,
    Island,
    /// `<1H OCEAN`: less than one hour from the ocean.
    UnderOneHourOcean,
    Other(String),
}

impl OceanProximity {
    /// Label exactly as it appears in the source file.
    pub fn label(&self) -> &str {
        match self {
            OceanProximity::NearBay => "NEAR BAY",
            OceanProximity::Inland => "INLAND",
            OceanProximity::NearOcean => "NEAR OCEAN",
            OceanProximity::Island => "ISLAND",
            OceanProximity::UnderOneHourOcean => "<1H OCEAN",
            OceanProximity::Other(s) => s,
        }
    }
}

impl From<&str> for OceanProximity {
    fn from(s: &str) -> Self {
        match s.trim() {
            "NEAR BAY" => OceanProximity::NearBay,
            "INLAND" => OceanProximity::Inland,
            "NEAR OCEAN" => OceanProximity::NearOcean,
            "ISLAND" => OceanProximity::Island,
            "<1H OCEAN" => OceanProximity::UnderOneHourOcean,
            other => OceanProximity::Other(other.to_string()),
        }
    }
}

impl From<String> for OceanProximity {
    fn from(s: String) -> Self {
        OceanProximity::from(s.as_str())
    }
}

impl From<OceanProximity> for String {
    fn from(p: OceanProximity) -> Self {
        match p {
            OceanProximity::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for OceanProximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// IncomeBand – three fixed ranges over median_income
// ---------------------------------------------------------------------------

/// Upper bound (inclusive) of [`IncomeBand::Low`].
pub const LOW_INCOME_MAX: f64 = 2.5;
/// Lower bound (inclusive) of [`IncomeBand::High`].
pub const HIGH_INCOME_MIN: f64 = 4.5;

/// Income selector. `Low` is `<= 2.5`, `High` is `>= 4.5`, `Medium` is
/// strictly between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeBand {
    Low,
    #[default]
    Medium,
    High,
}

impl IncomeBand {
    pub const ALL: [IncomeBand; 3] = [IncomeBand::Low, IncomeBand::Medium, IncomeBand::High];

    /// The band a median income falls into. `None` only for NaN.
    pub fn classify(median_income: f64) -> Option<IncomeBand> {
        if median_income <= LOW_INCOME_MAX {
            Some(IncomeBand::Low)
        } else if median_income > LOW_INCOME_MAX && median_income < HIGH_INCOME_MIN {
            Some(IncomeBand::Medium)
        } else if median_income >= HIGH_INCOME_MIN {
            Some(IncomeBand::High)
        } else {
            None
        }
    }

    pub fn contains(self, median_income: f64) -> bool {
        IncomeBand::classify(median_income) == Some(self)
    }

    pub fn label(self) -> &'static str {
        match self {
            IncomeBand::Low => "Low",
            IncomeBand::Medium => "Medium",
            IncomeBand::High => "High",
        }
    }
}

impl fmt::Display for IncomeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IncomeBand {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(IncomeBand::Low),
            "medium" => Ok(IncomeBand::Medium),
            "high" => Ok(IncomeBand::High),
            _ => Err(DashboardError::UnknownIncomeBand(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the housing file
// ---------------------------------------------------------------------------

/// A single block-group observation. Field names match the source header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    /// Blank in a few hundred rows of the public file.
    pub total_bedrooms: Option<f64>,
    pub population: f64,
    pub households: f64,
    /// Tens of thousands of USD.
    pub median_income: f64,
    /// USD.
    pub median_house_value: f64,
    pub ocean_proximity: OceanProximity,
}

impl Record {
    /// Minimal constructor for the attributes the pipeline reads.
    /// The remaining counts are zeroed.
    pub fn new(
        latitude: f64,
        longitude: f64,
        median_income: f64,
        median_house_value: f64,
        ocean_proximity: impl Into<OceanProximity>,
    ) -> Self {
        Record {
            longitude,
            latitude,
            housing_median_age: 0.0,
            total_rooms: 0.0,
            total_bedrooms: None,
            population: 0.0,
            households: 0.0,
            median_income,
            median_house_value,
            ocean_proximity: ocean_proximity.into(),
        }
    }

    /// First column the pipeline filters or plots on that is NaN or infinite.
    fn non_finite_field(&self) -> Option<(&'static str, f64)> {
        [
            ("longitude", self.longitude),
            ("latitude", self.latitude),
            ("median_income", self.median_income),
            ("median_house_value", self.median_house_value),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never empty; read-only after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    /// Distinct categories in order of first appearance.
    proximities: Vec<OceanProximity>,
    /// Smallest and largest `median_house_value`.
    price_bounds: (f64, f64),
}

impl Dataset {
    /// Wrap loaded records. `origin` names the source in the error message.
    ///
    /// Every record must carry finite coordinates, income and value, so each
    /// one falls into exactly one income band.
    pub fn from_records(records: Vec<Record>, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        if records.is_empty() {
            return Err(DashboardError::EmptyDataset { origin });
        }
        for (row, rec) in records.iter().enumerate() {
            if let Some((column, value)) = rec.non_finite_field() {
                return Err(DashboardError::Load {
                    path: PathBuf::from(origin),
                    message: format!("row {row}: '{column}' is not a finite number ({value})"),
                });
            }
        }

        let mut proximities: Vec<OceanProximity> = Vec::new();
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for rec in &records {
            if !proximities.contains(&rec.ocean_proximity) {
                proximities.push(rec.ocean_proximity.clone());
            }
            lo = lo.min(rec.median_house_value);
            hi = hi.max(rec.median_house_value);
        }

        Ok(Dataset {
            records,
            proximities,
            price_bounds: (lo, hi),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn proximities(&self) -> &[OceanProximity] {
        &self.proximities
    }

    pub fn price_bounds(&self) -> (f64, f64) {
        self.price_bounds
    }

    /// Number of records (always at least one).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
