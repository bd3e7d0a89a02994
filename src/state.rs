use housing_dash::DashboardConfig;
use housing_dash::data::{
    Dataset, FilterCriteria, IncomeBand, OceanProximity, PriceRange, Projection,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Dataset>,

    /// Current selection: proximities, income band and (validated) price range.
    pub criteria: FilterCriteria,

    /// Price editor state. Only turned into a `PriceRange` when enabled.
    pub price_limit: bool,
    pub price_min: f64,
    pub price_max: f64,

    /// Last successful pipeline result.
    pub projection: Projection,

    /// Set whenever the projection changes so the map re-centres once.
    pub recenter: bool,

    pub config: DashboardConfig,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            dataset: None,
            criteria: FilterCriteria::default(),
            price_limit: false,
            price_min: 0.0,
            price_max: 0.0,
            projection: Projection::empty(config.histogram),
            recenter: true,
            config,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to show every
    /// location type at the default income band.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.criteria = FilterCriteria::all(&dataset);
        let (lo, hi) = dataset.price_bounds();
        self.price_limit = false;
        self.price_min = lo;
        self.price_max = hi;

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Replace the whole selection, e.g. with filters given on the command line.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if let Some(range) = criteria.price_range {
            self.price_limit = true;
            self.price_min = range.min;
            self.price_max = range.max;
        } else {
            self.price_limit = false;
        }
        self.criteria = criteria;
        self.refilter();
    }

    /// Re-run the pipeline against the current controls.
    ///
    /// An inverted price range is rejected and the previous projection stays
    /// on screen.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };

        self.criteria.price_range = self.price_limit.then_some(PriceRange {
            min: self.price_min,
            max: self.price_max,
        });

        match ds.filter_with(&self.criteria, self.config.histogram) {
            Ok(view) => {
                self.projection = view.into_projection();
                self.recenter = true;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Filter rejected: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Top-bar text: dataset size, visible count and the visible price span.
    pub fn visible_summary(&self) -> Option<String> {
        let ds = self.dataset.as_ref()?;
        let mut text = format!(
            "{} records loaded, {} visible",
            ds.len(),
            self.projection.len()
        );
        if let Some((lo, hi)) = self.projection.price_bounds {
            text.push_str(&format!(", prices {lo:.0} to {hi:.0}"));
        }
        Some(text)
    }

    /// Toggle a single location type.
    pub fn toggle_proximity(&mut self, value: &OceanProximity) {
        let selected = &mut self.criteria.allowed_proximities;
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select every location type present in the dataset.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria.allowed_proximities = ds.proximities().iter().cloned().collect();
            self.refilter();
        }
    }

    /// Deselect every location type (empty map and histogram).
    pub fn select_none(&mut self) {
        self.criteria.allowed_proximities.clear();
        self.refilter();
    }

    pub fn set_income_band(&mut self, band: IncomeBand) {
        if self.criteria.income_band != band {
            self.criteria.income_band = band;
            self.refilter();
        }
    }
}
