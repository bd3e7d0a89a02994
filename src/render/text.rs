use super::Presenter;
use crate::data::{GeoPoint, Histogram};

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

/// Plain-text report for terminals and logs.
#[derive(Debug, Default)]
pub struct TextPresenter {
    out: String,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The report rendered so far.
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl Presenter for TextPresenter {
    fn render_map(&mut self, points: &[GeoPoint], center: Option<GeoPoint>) {
        self.line("Map Visualization");
        let detail = match center {
            Some(c) => format!(
                "  {} points, centred on ({:.4}, {:.4})",
                points.len(),
                c.latitude,
                c.longitude
            ),
            None => "  no points match the current filters".to_string(),
        };
        self.line(&detail);
    }

    fn render_histogram(&mut self, histogram: &Histogram) {
        let range = histogram.range();
        self.line(&format!(
            "House Price Distribution ({} buckets, {:.0}..{:.0}, {} values)",
            range.bins,
            range.lower,
            range.upper,
            histogram.total()
        ));

        let max = histogram.max_count();
        for bucket in histogram.buckets() {
            let bar = if max == 0 {
                0
            } else {
                (bucket.count * BAR_WIDTH).div_ceil(max)
            };
            self.line(&format!(
                "  {:>9.0} - {:>9.0} | {:<width$} {}",
                bucket.lower,
                bucket.upper,
                "#".repeat(bar),
                bucket.count,
                width = BAR_WIDTH
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HistogramRange, Projection, Record};

    #[test]
    fn empty_projection_reports_no_points() {
        let mut presenter = TextPresenter::new();
        Projection::empty(HistogramRange::default()).present(&mut presenter);
        let report = presenter.finish();

        assert!(report.contains("no points match"));
        assert!(report.contains("30 buckets"));
        assert!(!report.contains('#'));
        // Header lines plus one line per bucket.
        assert_eq!(report.lines().count(), 2 + 1 + 30);
    }

    #[test]
    fn busiest_bucket_gets_the_full_bar() {
        let records = [
            Record::new(34.0, -118.0, 3.0, 205_000.0, "INLAND"),
            Record::new(34.2, -118.2, 3.0, 206_000.0, "INLAND"),
            Record::new(34.4, -118.4, 3.0, 480_000.0, "INLAND"),
        ];
        let proj = Projection::build(records.iter(), HistogramRange::default());
        let mut presenter = TextPresenter::new();
        proj.present(&mut presenter);
        let report = presenter.finish();

        assert!(report.contains("3 points, centred on (34.2000, -118.2000)"));
        assert!(report.contains(&"#".repeat(BAR_WIDTH)));
        let single = report
            .lines()
            .filter(|line| line.ends_with(" 1") && line.contains('#'))
            .collect::<Vec<_>>();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].matches('#').count(), BAR_WIDTH / 2);
    }
}
