use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, IncomeBand, OceanProximity, Record};
use super::projection::{FilteredView, HistogramRange};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Inclusive bounds on `median_house_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let range = PriceRange { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            return Err(DashboardError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// User-selected predicates, rebuilt on every control change.
///
/// A record passes when:
/// * its `ocean_proximity` is in `allowed_proximities` (empty set → nothing passes)
/// * its `median_income` falls in `income_band`
/// * `price_range` is absent, or contains its `median_house_value`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub allowed_proximities: BTreeSet<OceanProximity>,
    pub income_band: IncomeBand,
    pub price_range: Option<PriceRange>,
}

impl FilterCriteria {
    /// Every category selected, `Medium` income, no price limit.
    pub fn all(dataset: &Dataset) -> Self {
        FilterCriteria {
            allowed_proximities: dataset.proximities().iter().cloned().collect(),
            income_band: IncomeBand::default(),
            price_range: None,
        }
    }

    pub fn with_income_band(mut self, band: IncomeBand) -> Self {
        self.income_band = band;
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match &self.price_range {
            Some(range) => range.validate(),
            None => Ok(()),
        }
    }

    pub fn matches(&self, rec: &Record) -> bool {
        self.income_band.contains(rec.median_income)
            && self.allowed_proximities.contains(&rec.ocean_proximity)
            && self
                .price_range
                .map_or(true, |r| r.contains(rec.median_house_value))
    }
}

/// Keep the records passing `criteria`, in their original order.
///
/// Accepts any record iterator so a view can be re-filtered directly.
pub fn filter_records<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    criteria: &FilterCriteria,
    range: HistogramRange,
) -> Result<FilteredView<'a>> {
    criteria.validate()?;

    let kept: Vec<&Record> = if criteria.allowed_proximities.is_empty() {
        Vec::new()
    } else {
        records.into_iter().filter(|rec| criteria.matches(rec)).collect()
    };
    log::debug!(
        "filter {:?} / {} categories / {:?}: {} records kept",
        criteria.income_band,
        criteria.allowed_proximities.len(),
        criteria.price_range,
        kept.len()
    );

    Ok(FilteredView::new(kept, range))
}

impl Dataset {
    /// Run the pipeline with the default histogram layout.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<FilteredView<'_>> {
        self.filter_with(criteria, HistogramRange::default())
    }

    pub fn filter_with(
        &self,
        criteria: &FilterCriteria,
        range: HistogramRange,
    ) -> Result<FilteredView<'_>> {
        filter_records(self.records(), criteria, range)
    }
}
