use super::model::Dataset;

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// The user's current filter choices.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub continent: String,
    /// Raw metric key.
    pub metric: String,
    /// Inclusive `(lower, upper)` year bounds.
    pub year_range: (i64, i64),
    /// Selected countries in the order they were picked.
    pub countries: Vec<String>,
}

impl Selection {
    /// Fresh selection for a continent+metric pair: the full year range and
    /// every country of the subset.
    pub fn defaults(dataset: &Dataset, continent: &str, metric: &str) -> Self {
        let subset = subset_indices(dataset, continent, metric);
        let year_range = year_bounds(dataset, &subset)
            .map(|b| (b.min, b.max))
            .unwrap_or((0, 0));
        Selection {
            continent: continent.to_string(),
            metric: metric.to_string(),
            year_range,
            countries: country_options(dataset, &subset),
        }
    }
}

/// Min/max year of a continent+metric subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i64,
    pub max: i64,
}

impl YearBounds {
    /// Order the pair and clamp both ends into the bounds.
    pub fn clamp(&self, (lo, hi): (i64, i64)) -> (i64, i64) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        (lo.clamp(self.min, self.max), hi.clamp(self.min, self.max))
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Step 1: indices of observations matching continent and metric.
pub fn subset_indices(dataset: &Dataset, continent: &str, metric: &str) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| obs.continent == continent && obs.metric == metric)
        .map(|(i, _)| i)
        .collect()
}

/// Step 2: distinct countries of the subset, first-seen order.
pub fn country_options(dataset: &Dataset, subset: &[usize]) -> Vec<String> {
    let mut countries: Vec<String> = Vec::new();
    for &idx in subset {
        let country = &dataset.observations[idx].country;
        if !countries.contains(country) {
            countries.push(country.clone());
        }
    }
    countries
}

/// Step 3: year bounds of the subset. `None` when the subset is empty.
pub fn year_bounds(dataset: &Dataset, subset: &[usize]) -> Option<YearBounds> {
    let mut years = subset.iter().map(|&i| dataset.observations[i].year);
    let first = years.next()?;
    let (min, max) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    Some(YearBounds { min, max })
}

/// Step 4: restrict the subset to the selected countries and year range.
///
/// Source order is preserved. An empty country selection yields nothing.
pub fn apply_selection(dataset: &Dataset, subset: &[usize], selection: &Selection) -> Vec<usize> {
    let (lo, hi) = selection.year_range;
    subset
        .iter()
        .copied()
        .filter(|&i| {
            let obs = &dataset.observations[i];
            (lo..=hi).contains(&obs.year) && selection.countries.contains(&obs.country)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Derived state for one render pass
// ---------------------------------------------------------------------------

/// Everything derived from the base table and a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterView {
    /// Continent+metric subset.
    pub subset: Vec<usize>,
    pub country_options: Vec<String>,
    pub year_bounds: Option<YearBounds>,
    /// Final render set.
    pub visible: Vec<usize>,
}

impl FilterView {
    pub fn compute(dataset: &Dataset, selection: &Selection) -> Self {
        let subset = subset_indices(dataset, &selection.continent, &selection.metric);
        let country_options = country_options(dataset, &subset);
        let year_bounds = year_bounds(dataset, &subset);
        let visible = apply_selection(dataset, &subset, selection);
        log::debug!(
            "Filter {}/{}: {} in subset, {} visible",
            selection.continent,
            selection.metric,
            subset.len(),
            visible.len()
        );
        FilterView {
            subset,
            country_options,
            year_bounds,
            visible,
        }
    }
}
