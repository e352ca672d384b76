use std::path::PathBuf;

use crate::chart::{ChartSpec, build_chart, summary_text};
use crate::data::filter::{FilterView, Selection};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Input-change events
// ---------------------------------------------------------------------------

/// One user interaction with a control in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Continent(String),
    Metric(String),
    ShowData(bool),
    YearRange(i64, i64),
    ToggleCountry(String),
    AllCountries,
    NoCountries,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current filter choices. None while the dataset is empty.
    pub selection: Option<Selection>,

    /// Whether the raw data table is shown.
    pub show_data: bool,

    /// Derived state of the last recompute.
    pub view: FilterView,

    /// Chart of the last recompute.
    pub chart: Option<ChartSpec>,

    /// Descriptive sentence under the chart.
    pub summary: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(show_data: bool) -> Self {
        Self {
            show_data,
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset and select its first continent and metric.
    pub fn set_dataset(&mut self, dataset: Dataset, source: Option<PathBuf>) {
        if dataset.is_empty() {
            log::warn!("Dataset contains no observations");
        }
        self.selection = match (dataset.continents.first(), dataset.metrics.first()) {
            (Some(continent), Some(metric)) => {
                Some(Selection::defaults(&dataset, continent, metric))
            }
            _ => None,
        };
        self.dataset = Some(dataset);
        self.source = source;
        self.status_message = None;
        self.refresh();
    }

    /// Apply one input change and recompute the pipeline.
    pub fn handle(&mut self, event: SelectionEvent) {
        log::debug!("Selection event: {event:?}");
        let (Some(dataset), Some(selection)) = (&self.dataset, &mut self.selection) else {
            if let SelectionEvent::ShowData(show) = event {
                self.show_data = show;
            }
            return;
        };

        match event {
            // Option sets change with continent and metric, so the year
            // range and country selection go back to their defaults.
            SelectionEvent::Continent(continent) => {
                *selection = Selection::defaults(dataset, &continent, &selection.metric);
            }
            SelectionEvent::Metric(metric) => {
                *selection = Selection::defaults(dataset, &selection.continent, &metric);
            }
            SelectionEvent::ShowData(show) => {
                self.show_data = show;
                return;
            }
            SelectionEvent::YearRange(lo, hi) => {
                if let Some(bounds) = self.view.year_bounds {
                    selection.year_range = bounds.clamp((lo, hi));
                }
            }
            SelectionEvent::ToggleCountry(country) => {
                if let Some(pos) = selection.countries.iter().position(|c| *c == country) {
                    selection.countries.remove(pos);
                } else if self.view.country_options.contains(&country) {
                    selection.countries.push(country);
                }
            }
            SelectionEvent::AllCountries => {
                selection.countries = self.view.country_options.clone();
            }
            SelectionEvent::NoCountries => {
                selection.countries.clear();
            }
        }
        self.refresh();
    }

    /// Counts shown in the top bar: file, rows loaded, rows matching the
    /// continent and metric, rows plotted.
    pub fn status_line(&self) -> String {
        let Some(dataset) = &self.dataset else {
            return "No dataset loaded".to_string();
        };
        let source = self
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| format!("{}  ", n.to_string_lossy()))
            .unwrap_or_default();
        format!(
            "{source}{} observations loaded, {} in continent and metric, {} plotted",
            dataset.len(),
            self.view.subset.len(),
            self.view.visible.len()
        )
    }

    /// Recompute derived state, chart and summary from the current selection.
    pub fn refresh(&mut self) {
        let (Some(dataset), Some(selection)) = (&self.dataset, &self.selection) else {
            self.view = FilterView::default();
            self.chart = None;
            self.summary = "The dataset contains no observations.".to_string();
            return;
        };

        self.view = FilterView::compute(dataset, selection);
        let rendered = build_chart(dataset, &self.view, selection)
            .and_then(|chart| Ok((chart, summary_text(&self.view, selection)?)));

        match rendered {
            Ok((chart, summary)) => {
                self.chart = Some(chart);
                self.summary = summary;
            }
            Err(e) => {
                log::error!("Failed to render chart: {e}");
                self.chart = None;
                self.summary.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::YearBounds;
    use crate::data::model::tests::sample_dataset;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(sample_dataset(), None);
        state
    }

    fn selection(state: &AppState) -> &Selection {
        state.selection.as_ref().unwrap()
    }

    #[test]
    fn test_initial_selection_shows_everything() {
        let state = loaded();
        let sel = selection(&state);
        assert_eq!(sel.continent, "Europe");
        assert_eq!(sel.metric, "lifeExp");
        assert_eq!(sel.year_range, (1997, 2007));
        assert_eq!(state.view.visible.len(), 5);
        assert_eq!(state.chart.as_ref().unwrap().series.len(), 3);
        assert!(state.summary.ends_with("Europe: France, Germany, Spain"));
        assert!(!state.show_data);
    }

    #[test]
    fn test_continent_change_resets_range_and_countries() {
        let mut state = loaded();
        state.handle(SelectionEvent::NoCountries);
        state.handle(SelectionEvent::Continent("Africa".to_string()));

        let sel = selection(&state);
        assert_eq!(sel.continent, "Africa");
        assert_eq!(sel.metric, "lifeExp");
        assert_eq!(sel.year_range, (1992, 2007));
        assert_eq!(sel.countries, vec!["Kenya", "Ghana"]);
        assert_eq!(state.view.year_bounds, Some(YearBounds { min: 1992, max: 2007 }));
        assert_eq!(
            state.chart.as_ref().unwrap().title,
            "Average Life Expectancy for countries in Africa"
        );
    }

    #[test]
    fn test_metric_change_to_empty_subset_degrades() {
        let mut state = loaded();
        state.handle(SelectionEvent::Continent("Africa".to_string()));
        state.handle(SelectionEvent::Metric("pop".to_string()));

        assert_eq!(state.view.year_bounds, None);
        assert!(state.view.visible.is_empty());
        assert!(state.chart.as_ref().unwrap().is_empty());
        assert_eq!(state.summary, "No Population data is available for countries in Africa.");
        assert!(state.status_message.is_none());

        // Year-range input has nothing to clamp against and is ignored.
        state.handle(SelectionEvent::YearRange(1990, 2000));
        assert_eq!(selection(&state).year_range, (0, 0));
    }

    #[test]
    fn test_year_range_is_clamped_and_ordered() {
        let mut state = loaded();
        state.handle(SelectionEvent::YearRange(2005, 1900));
        assert_eq!(selection(&state).year_range, (1997, 2005));
        assert!(state
            .view
            .visible
            .iter()
            .all(|&i| state.dataset.as_ref().unwrap().observations[i].year <= 2005));
    }

    #[test]
    fn test_country_toggles() {
        let mut state = loaded();
        state.handle(SelectionEvent::ToggleCountry("Germany".to_string()));
        assert_eq!(selection(&state).countries, vec!["France", "Spain"]);
        assert_eq!(state.view.visible.len(), 3);

        state.handle(SelectionEvent::ToggleCountry("Germany".to_string()));
        assert_eq!(selection(&state).countries, vec!["France", "Spain", "Germany"]);
        assert!(state.summary.ends_with("France, Spain, Germany"));

        // Countries outside the current subset cannot be selected.
        state.handle(SelectionEvent::ToggleCountry("Kenya".to_string()));
        assert_eq!(selection(&state).countries.len(), 3);

        state.handle(SelectionEvent::NoCountries);
        assert!(state.view.visible.is_empty());
        assert!(state.chart.as_ref().unwrap().is_empty());

        state.handle(SelectionEvent::AllCountries);
        assert_eq!(state.view.visible.len(), 5);
    }

    #[test]
    fn test_show_data_toggle() {
        let mut state = loaded();
        state.handle(SelectionEvent::ShowData(true));
        assert!(state.show_data);

        let mut empty = AppState::new(false);
        empty.handle(SelectionEvent::ShowData(true));
        assert!(empty.show_data);
    }

    #[test]
    fn test_empty_dataset_has_no_selection() {
        let mut state = AppState::default();
        state.set_dataset(Dataset::default(), None);
        assert!(state.selection.is_none());
        assert!(state.chart.is_none());
        assert_eq!(state.summary, "The dataset contains no observations.");
        state.handle(SelectionEvent::AllCountries);
        assert!(state.view.visible.is_empty());
    }

    #[test]
    fn test_same_selection_same_result() {
        let mut state = loaded();
        let before = (state.view.clone(), state.chart.clone(), state.summary.clone());
        state.refresh();
        assert_eq!(before, (state.view.clone(), state.chart.clone(), state.summary.clone()));
    }

    #[test]
    fn test_status_line_counts() {
        let mut state = AppState::default();
        assert_eq!(state.status_line(), "No dataset loaded");

        state.set_dataset(sample_dataset(), Some(PathBuf::from("data/gapminder_tidy.csv")));
        state.handle(SelectionEvent::ToggleCountry("France".to_string()));
        assert_eq!(
            state.status_line(),
            "gapminder_tidy.csv  9 observations loaded, 5 in continent and metric, 3 plotted"
        );
    }
}
