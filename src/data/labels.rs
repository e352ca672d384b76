use crate::error::DashboardError;

/// Raw metric key → human-readable label.
pub const METRIC_LABELS: &[(&str, &str)] = &[
    ("gdpPercap", "GDP Per Capita"),
    ("lifeExp", "Average Life Expectancy"),
    ("pop", "Population"),
];

/// Look up the display label for a metric key.
pub fn metric_label(key: &str) -> Result<&'static str, DashboardError> {
    METRIC_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .ok_or_else(|| DashboardError::UnknownMetric(key.to_string()))
}
