use serde::{Deserialize, Serialize};

use super::model::Record;

// ---------------------------------------------------------------------------
// Map projection
// ---------------------------------------------------------------------------

/// A `(latitude, longitude)` pair fed to the map layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Record> for GeoPoint {
    fn from(rec: &Record) -> Self {
        GeoPoint {
            latitude: rec.latitude,
            longitude: rec.longitude,
        }
    }
}

/// Arithmetic mean of latitudes and longitudes, or `None` for no points.
pub fn mean_center(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
    Some(GeoPoint {
        latitude: lat / n,
        longitude: lon / n,
    })
}

// ---------------------------------------------------------------------------
// Histogram projection
// ---------------------------------------------------------------------------

/// Fixed bucket layout: `bins` equal-width half-open intervals over
/// `[lower, upper)`. Values outside the range are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HistogramRange {
    pub bins: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Default for HistogramRange {
    fn default() -> Self {
        // Matches the reporting cap of the source data; values at the cap
        // (500001) fall outside the last bucket.
        HistogramRange {
            bins: 30,
            lower: 200_000.0,
            upper: 500_001.0,
        }
    }
}

impl HistogramRange {
    pub fn width(&self) -> f64 {
        (self.upper - self.lower) / self.bins as f64
    }

    /// Lower edge of bucket `i`.
    pub fn edge(&self, i: usize) -> f64 {
        self.lower + i as f64 * self.width()
    }

    /// Index of the bucket containing `value`, if any.
    pub fn bucket_of(&self, value: f64) -> Option<usize> {
        if self.bins == 0 || !(value >= self.lower && value < self.upper) {
            return None;
        }
        let mut idx = (((value - self.lower) / self.width()).floor() as usize).min(self.bins - 1);
        // Float rounding can put a value sitting on an edge one bucket off.
        if value < self.edge(idx) {
            idx -= 1;
        } else if idx + 1 < self.bins && value >= self.edge(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }
}

/// One histogram bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bucket counts in ascending order; always `range.bins` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    range: HistogramRange,
    buckets: Vec<Bucket>,
}

impl Histogram {
    pub fn empty(range: HistogramRange) -> Self {
        let buckets = (0..range.bins)
            .map(|i| Bucket {
                lower: range.edge(i),
                upper: if i + 1 == range.bins {
                    range.upper
                } else {
                    range.edge(i + 1)
                },
                count: 0,
            })
            .collect();
        Histogram { range, buckets }
    }

    pub fn from_values(range: HistogramRange, values: impl IntoIterator<Item = f64>) -> Self {
        let mut hist = Histogram::empty(range);
        for v in values {
            if let Some(i) = range.bucket_of(v) {
                hist.buckets[i].count += 1;
            }
        }
        hist
    }

    pub fn range(&self) -> &HistogramRange {
        &self.range
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Values that landed in some bucket.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Projection / FilteredView
// ---------------------------------------------------------------------------

/// The owned, render-ready part of a filter result.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub points: Vec<GeoPoint>,
    pub histogram: Histogram,
    /// `None` when nothing matched.
    pub center: Option<GeoPoint>,
    /// Min / max house value of the retained records.
    pub price_bounds: Option<(f64, f64)>,
}

impl Projection {
    pub fn build<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        range: HistogramRange,
    ) -> Self {
        let records: Vec<&Record> = records.into_iter().collect();
        let points: Vec<GeoPoint> = records.iter().map(|rec| GeoPoint::from(*rec)).collect();
        let values = records.iter().map(|rec| rec.median_house_value);

        let histogram = Histogram::from_values(range, values.clone());
        let price_bounds = values.fold(None, |bounds, v| {
            Some(match bounds {
                Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
                None => (v, v),
            })
        });

        let center = mean_center(&points);
        Projection {
            points,
            histogram,
            center,
            price_bounds,
        }
    }

    /// Projection of an empty selection.
    pub fn empty(range: HistogramRange) -> Self {
        Projection {
            points: Vec::new(),
            histogram: Histogram::empty(range),
            center: None,
            price_bounds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Records matching a [`FilterCriteria`](super::filter::FilterCriteria),
/// borrowed from the dataset, plus their projection.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
    projection: Projection,
}

impl<'a> FilteredView<'a> {
    pub(crate) fn new(records: Vec<&'a Record>, range: HistogramRange) -> Self {
        let projection = Projection::build(records.iter().copied(), range);
        FilteredView {
            records,
            projection,
        }
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.projection.points
    }

    pub fn histogram(&self) -> &Histogram {
        &self.projection.histogram
    }

    pub fn center(&self) -> Option<GeoPoint> {
        self.projection.center
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Drop the borrowed rows, keeping what the renderers need.
    pub fn into_projection(self) -> Projection {
        self.projection
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_has_thirty_buckets() {
        let hist = Histogram::empty(HistogramRange::default());
        assert_eq!(hist.buckets().len(), 30);
        assert_eq!(hist.buckets()[0].lower, 200_000.0);
        assert_eq!(hist.buckets()[29].upper, 500_001.0);
        assert!(hist.buckets().windows(2).all(|w| w[0].lower < w[1].lower));
    }

    #[test]
    fn values_outside_range_are_dropped() {
        let range = HistogramRange::default();
        assert_eq!(range.bucket_of(199_999.0), None);
        assert_eq!(range.bucket_of(500_001.0), None);
        assert_eq!(range.bucket_of(650_000.0), None);
        assert_eq!(range.bucket_of(f64::NAN), None);
        assert_eq!(range.bucket_of(200_000.0), Some(0));
        assert_eq!(range.bucket_of(500_000.0), Some(29));
    }

    #[test]
    fn values_on_edges_open_the_next_bucket() {
        let range = HistogramRange {
            bins: 3,
            lower: 0.0,
            upper: 0.3,
        };
        assert_eq!(range.bucket_of(range.edge(1)), Some(1));
        assert_eq!(range.bucket_of(range.edge(2)), Some(2));
        assert_eq!(range.bucket_of(0.29999), Some(2));
    }

    #[test]
    fn bucket_containing_250k() {
        let hist = Histogram::from_values(HistogramRange::default(), [250_000.0]);
        let hit: Vec<_> = hist.buckets().iter().filter(|b| b.count > 0).collect();
        assert_eq!(hit.len(), 1);
        assert!(hit[0].lower <= 250_000.0 && 250_000.0 < hit[0].upper);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn mean_center_of_nothing_is_none() {
        assert_eq!(mean_center(&[]), None);
        let c = mean_center(&[
            GeoPoint { latitude: 34.0, longitude: -118.0 },
            GeoPoint { latitude: 38.0, longitude: -122.0 },
        ])
        .unwrap();
        assert_eq!(c.latitude, 36.0);
        assert_eq!(c.longitude, -120.0);
    }

    #[test]
    fn projection_tracks_price_bounds() {
        let records = [
            Record::new(34.0, -118.0, 3.0, 410_000.0, "<1H OCEAN"),
            Record::new(36.5, -119.5, 3.1, 95_000.0, "INLAND"),
        ];
        let proj = Projection::build(records.iter(), HistogramRange::default());
        assert_eq!(proj.len(), 2);
        assert_eq!(proj.price_bounds, Some((95_000.0, 410_000.0)));
        // 95k is below the histogram range.
        assert_eq!(proj.histogram.total(), 1);
    }

    #[test]
    fn projection_histogram_counts_each_value_once() {
        let records = [
            Record::new(34.0, -118.0, 3.0, 200_000.0, "<1H OCEAN"),
            Record::new(34.1, -118.1, 3.0, 200_000.0, "<1H OCEAN"),
            Record::new(36.5, -119.5, 3.1, 499_999.0, "INLAND"),
            Record::new(37.8, -122.3, 3.2, 500_001.0, "NEAR BAY"),
        ];
        let range = HistogramRange::default();
        let proj = Projection::build(records.iter(), range);
        assert_eq!(
            proj.histogram,
            Histogram::from_values(range, records.iter().map(|r| r.median_house_value))
        );
        assert_eq!(proj.histogram.buckets()[0].count, 2);
        assert_eq!(proj.histogram.buckets()[29].count, 1);
        assert_eq!(proj.histogram.total(), 3);
        assert_eq!(proj.price_bounds, Some((200_000.0, 500_001.0)));
    }
}
