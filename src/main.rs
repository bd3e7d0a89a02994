mod app;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{error, info, warn};

use app::HousingDashApp;
use housing_dash::DashboardConfig;
use housing_dash::data::{self, Dataset, FilterCriteria, IncomeBand, OceanProximity, PriceRange};
use housing_dash::render::TextPresenter;
use state::AppState;

#[derive(Parser)]
#[command(name = "housing-dash")]
#[command(about = "Filter a housing dataset and plot prices on a map and histogram", version)]
struct Cli {
    /// Housing data file (.csv, .json or .parquet)
    dataset: Option<PathBuf>,

    /// Path to JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a text summary instead of opening the window
    #[arg(long)]
    summary: bool,

    /// Income band: low, medium or high
    #[arg(long)]
    income: Option<IncomeBand>,

    /// Location type to keep (repeatable; default: all)
    #[arg(long = "proximity", value_name = "LABEL")]
    proximities: Vec<String>,

    /// Lowest median house value to keep
    #[arg(long)]
    min_price: Option<f64>,

    /// Highest median house value to keep
    #[arg(long)]
    max_price: Option<f64>,
}

impl Cli {
    /// Start from "everything, medium income" and apply the flags on top.
    fn criteria(&self, dataset: &Dataset) -> Result<FilterCriteria> {
        let mut criteria = FilterCriteria::all(dataset);
        if let Some(band) = self.income {
            criteria.income_band = band;
        }
        if !self.proximities.is_empty() {
            for label in self.unknown_proximities(dataset) {
                warn!("Location type '{label}' does not occur in the dataset");
            }
            criteria.allowed_proximities = self
                .proximities
                .iter()
                .map(|p| OceanProximity::from(p.as_str()))
                .collect();
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            let (lo, hi) = dataset.price_bounds();
            criteria.price_range = Some(PriceRange::new(
                self.min_price.unwrap_or(lo),
                self.max_price.unwrap_or(hi),
            )?);
        }
        Ok(criteria)
    }

    /// `--proximity` labels that match no category of the dataset.
    fn unknown_proximities(&self, dataset: &Dataset) -> Vec<&str> {
        self.proximities
            .iter()
            .map(String::as_str)
            .filter(|label| {
                !dataset
                    .proximities()
                    .contains(&OceanProximity::from(*label))
            })
            .collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };
    let dataset_path = cli.dataset.clone().or_else(|| config.dataset_path.clone());

    if cli.summary {
        let path = dataset_path
            .context("no dataset given: pass a file path or set dataset_path in the config")?;
        return run_summary(&cli, &config, &path);
    }
    run_window(&cli, config, dataset_path)
}

fn run_summary(cli: &Cli, config: &DashboardConfig, path: &Path) -> Result<()> {
    let dataset = data::load(path)?;
    let criteria = cli.criteria(&dataset)?;
    let view = dataset.filter_with(&criteria, config.histogram)?;

    let locations: Vec<&str> = criteria
        .allowed_proximities
        .iter()
        .map(|p| p.label())
        .collect();
    println!("Income level:   {}", criteria.income_band);
    println!("Location types: {}", locations.join(", "));
    if let Some(range) = criteria.price_range {
        println!("Price range:    {:.0} – {:.0}", range.min, range.max);
    }
    println!("Matched {} of {} records", view.len(), dataset.len());
    if let Some((lo, hi)) = view.projection().price_bounds {
        println!("Visible prices: {lo:.0} – {hi:.0}");
    }
    println!();

    let mut presenter = TextPresenter::new();
    view.projection().present(&mut presenter);
    print!("{}", presenter.finish());
    Ok(())
}

fn run_window(cli: &Cli, config: DashboardConfig, dataset_path: Option<PathBuf>) -> Result<()> {
    let mut state = AppState::new(config);

    // The dataset is loaded once here and owned by the app from then on.
    if let Some(path) = dataset_path {
        match data::load(&path) {
            Ok(dataset) => {
                let criteria = cli.criteria(&dataset);
                state.set_dataset(dataset);
                match criteria {
                    Ok(criteria) => state.set_criteria(criteria),
                    Err(e) => state.status_message = Some(format!("Error: {e:#}")),
                }
                info!("Opening window with {}", path.display());
            }
            Err(e) => {
                error!("{e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Housing Data App",
        options,
        Box::new(move |_cc| Ok(Box::new(HousingDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_dash::data::Record;

    fn dataset() -> Dataset {
        Dataset::from_records(
            vec![
                Record::new(37.88, -122.23, 8.3, 452_600.0, "NEAR BAY"),
                Record::new(36.70, -119.80, 3.0, 61_000.0, "INLAND"),
            ],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn flags_build_criteria() {
        let cli = Cli::parse_from([
            "housing-dash",
            "housing.csv",
            "--summary",
            "--income",
            "high",
            "--proximity",
            "NEAR BAY",
            "--min-price",
            "400000",
        ]);
        let criteria = cli.criteria(&dataset()).unwrap();
        assert_eq!(criteria.income_band, IncomeBand::High);
        assert_eq!(criteria.allowed_proximities.len(), 1);
        assert!(criteria.allowed_proximities.contains(&OceanProximity::NearBay));
        assert_eq!(
            criteria.price_range,
            Some(PriceRange { min: 400_000.0, max: 452_600.0 })
        );
    }

    #[test]
    fn unmatched_proximity_labels_are_reported() {
        let cli = Cli::parse_from([
            "housing-dash",
            "--proximity",
            "inland",
            "--proximity",
            " INLAND ",
            "--proximity",
            "ISLAND",
        ]);
        let ds = dataset();
        assert_eq!(cli.unknown_proximities(&ds), vec!["inland", "ISLAND"]);

        // Unknown labels still narrow the selection; they just match nothing.
        let criteria = cli.criteria(&ds).unwrap();
        let view = ds.filter(&criteria.with_income_band(IncomeBand::Medium)).unwrap();
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn no_flags_means_default_selection() {
        let cli = Cli::parse_from(["housing-dash"]);
        let ds = dataset();
        assert_eq!(cli.criteria(&ds).unwrap(), FilterCriteria::all(&ds));
    }

    #[test]
    fn inverted_price_flags_are_rejected() {
        let cli = Cli::parse_from(["housing-dash", "--min-price", "5", "--max-price", "1"]);
        let err = cli.criteria(&dataset()).unwrap_err();
        assert!(err.to_string().contains("invalid price range"));
    }

    #[test]
    fn unknown_income_band_fails_to_parse() {
        assert!(Cli::try_parse_from(["housing-dash", "--income", "huge"]).is_err());
    }
}
