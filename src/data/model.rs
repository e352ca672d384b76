use crate::error::DashboardError;

use super::labels::metric_label;

/// Canonical column names, in the order the data table shows them.
pub const COLUMNS: [&str; 5] = ["country", "continent", "metric", "year", "value"];

// ---------------------------------------------------------------------------
// Observation – one row of the tidy table
// ---------------------------------------------------------------------------

/// A single observation: one metric for one country in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub continent: String,
    /// Raw metric key, see [`super::labels::METRIC_LABELS`].
    pub metric: String,
    pub year: i64,
    pub value: f64,
}

impl Observation {
    /// Cell text for the given column index of [`COLUMNS`].
    pub fn cell(&self, column: usize) -> String {
        match column {
            0 => self.country.clone(),
            1 => self.continent.clone(),
            2 => self.metric.clone(),
            3 => self.year.to_string(),
            _ => self.value.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable base table plus the option lists derived from it once.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All observations in source order.
    pub observations: Vec<Observation>,
    /// Distinct continents, first-seen order.
    pub continents: Vec<String>,
    /// Distinct metric keys, first-seen order.
    pub metrics: Vec<String>,
}

impl Dataset {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let mut continents: Vec<String> = Vec::new();
        let mut metrics: Vec<String> = Vec::new();

        for obs in &observations {
            if !continents.contains(&obs.continent) {
                continents.push(obs.continent.clone());
            }
            if !metrics.contains(&obs.metric) {
                metrics.push(obs.metric.clone());
            }
        }

        Dataset {
            observations,
            continents,
            metrics,
        }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Every metric key in the data must have a display label.
    pub fn validate_metrics(&self) -> Result<(), DashboardError> {
        for metric in &self.metrics {
            metric_label(metric)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn obs(
        country: &str,
        continent: &str,
        metric: &str,
        year: i64,
        value: f64,
    ) -> Observation {
        Observation {
            country: country.to_string(),
            continent: continent.to_string(),
            metric: metric.to_string(),
            year,
            value,
        }
    }

    /// Small fixture covering two continents and two metrics.
    pub(crate) fn sample_dataset() -> Dataset {
        Dataset::from_observations(vec![
            obs("France", "Europe", "lifeExp", 1997, 78.0),
            obs("France", "Europe", "lifeExp", 2002, 79.0),
            obs("Germany", "Europe", "lifeExp", 1997, 77.3),
            obs("Germany", "Europe", "lifeExp", 2002, 78.7),
            obs("France", "Europe", "pop", 1997, 58_000_000.0),
            obs("Kenya", "Africa", "lifeExp", 1992, 59.3),
            obs("Kenya", "Africa", "lifeExp", 1997, 54.4),
            obs("Ghana", "Africa", "lifeExp", 2007, 60.0),
            obs("Spain", "Europe", "lifeExp", 2007, 80.9),
        ])
    }

    #[test]
    fn test_option_lists_are_first_seen_order() {
        let ds = sample_dataset();
        assert_eq!(ds.continents, vec!["Europe", "Africa"]);
        assert_eq!(ds.metrics, vec!["lifeExp", "pop"]);
        assert_eq!(ds.len(), 9);
        assert!(!ds.is_empty());
    }

    #[test]
    fn test_validate_metrics_rejects_unmapped_key() {
        let ds = Dataset::from_observations(vec![obs("Chile", "Americas", "co2", 2000, 1.0)]);
        assert_eq!(
            ds.validate_metrics(),
            Err(DashboardError::UnknownMetric("co2".to_string()))
        );
        assert!(sample_dataset().validate_metrics().is_ok());
    }

    #[test]
    fn test_cells_follow_column_order() {
        let o = obs("France", "Europe", "lifeExp", 1997, 78.5);
        let cells: Vec<String> = (0..COLUMNS.len()).map(|i| o.cell(i)).collect();
        assert_eq!(cells, vec!["France", "Europe", "lifeExp", "1997", "78.5"]);
    }
}
