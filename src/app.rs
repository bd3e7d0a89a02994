use eframe::egui::{self, RichText, Ui};
use egui_extras::{Size, StripBuilder};

use housing_dash::render::Presenter;

use crate::state::AppState;
use crate::ui::panels;
use crate::ui::plot::EguiPresenter;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousingDashApp {
    pub state: AppState,
}

impl HousingDashApp {
    /// The dataset (if any) is already loaded into `state` by `main`.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HousingDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: histogram | map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &mut self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            let text = match &state.status_message {
                Some(msg) => RichText::new(msg).color(egui::Color32::RED),
                None => RichText::new("Open a housing file to begin  (File → Open…)"),
            };
            ui.heading(text);
        });
        return;
    }

    let projection = &state.projection;
    let style = &state.config.map;
    let recenter = state.recenter;

    StripBuilder::new(ui)
        .size(Size::relative(0.5))
        .size(Size::remainder())
        .horizontal(|mut strip| {
            strip.cell(|ui: &mut Ui| {
                ui.heading("House Price Distribution");
                EguiPresenter::new(ui, style, false).render_histogram(&projection.histogram);
            });
            strip.cell(|ui: &mut Ui| {
                ui.heading("Map Visualization");
                EguiPresenter::new(ui, style, recenter)
                    .render_map(&projection.points, projection.center);
            });
        });

    state.recenter = false;
}
