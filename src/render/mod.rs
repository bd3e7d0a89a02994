//! Presentation seam between the pipeline and whatever draws its output.

pub mod text;

pub use text::TextPresenter;

use crate::data::{GeoPoint, Histogram, Projection};

/// A sink for the two projections of a filter result.
///
/// Implementations must accept empty input: no points, no center, and a
/// histogram whose buckets are all zero.
pub trait Presenter {
    fn render_map(&mut self, points: &[GeoPoint], center: Option<GeoPoint>);

    fn render_histogram(&mut self, histogram: &Histogram);
}

impl Projection {
    /// Hand both views to `presenter`, map first.
    pub fn present<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        presenter.render_map(&self.points, self.center);
        presenter.render_histogram(&self.histogram);
    }
}
