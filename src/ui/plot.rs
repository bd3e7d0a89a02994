use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotBounds, PlotPoints, Points};

use housing_dash::MapStyle;
use housing_dash::data::{GeoPoint, Histogram};
use housing_dash::render::Presenter;

/// Histogram bar colour (matplotlib "steelblue").
const BAR_COLOR: Color32 = Color32::from_rgb(70, 130, 180);

// ---------------------------------------------------------------------------
// egui presenter: draws the pipeline output with egui_plot
// ---------------------------------------------------------------------------

pub struct EguiPresenter<'a> {
    ui: &'a mut Ui,
    style: &'a MapStyle,
    /// Reset the map bounds around the data centre on this frame.
    recenter: bool,
}

impl<'a> EguiPresenter<'a> {
    pub fn new(ui: &'a mut Ui, style: &'a MapStyle, recenter: bool) -> Self {
        Self { ui, style, recenter }
    }

    fn empty_hint(&mut self) {
        self.ui
            .label(RichText::new("No records match the current filters.").italics());
    }
}

impl Presenter for EguiPresenter<'_> {
    fn render_map(&mut self, points: &[GeoPoint], center: Option<GeoPoint>) {
        if points.is_empty() {
            self.empty_hint();
        }

        let [r, g, b, a] = self.style.fill_rgba;
        let fill = Color32::from_rgba_unmultiplied(r, g, b, a);
        let radius = self.style.marker_radius;
        let half_span = self.style.span_degrees() / 2.0;
        let recenter = self.recenter;

        Plot::new("map_plot")
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(self.ui, |plot_ui| {
                if let (true, Some(c)) = (recenter, center) {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [c.longitude - half_span, c.latitude - half_span],
                        [c.longitude + half_span, c.latitude + half_span],
                    ));
                }
                if points.is_empty() {
                    return;
                }

                let series: PlotPoints = points
                    .iter()
                    .map(|p| [p.longitude, p.latitude])
                    .collect();
                plot_ui.points(
                    Points::new(series)
                        .name("Block groups")
                        .color(fill)
                        .radius(radius)
                        .filled(true),
                );
            });
    }

    fn render_histogram(&mut self, histogram: &Histogram) {
        if histogram.total() == 0 {
            self.empty_hint();
        }

        let width = histogram.range().width();
        let bars: Vec<Bar> = histogram
            .buckets()
            .iter()
            .map(|b| {
                Bar::new(b.lower + width / 2.0, b.count as f64)
                    .width(width)
                    .name(format!("{:.0} – {:.0}", b.lower, b.upper))
            })
            .collect();

        Plot::new("price_histogram")
            .x_axis_label("Median House Value")
            .y_axis_label("Frequency")
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .show(self.ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Median house value"));
            });
    }
}
