use std::io::Write;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::{Serialize, Serializer};

use crate::color::{ColorMap, to_hex};
use crate::data::filter::{FilterView, Selection};
use crate::data::labels::metric_label;
use crate::data::model::{COLUMNS, Dataset, Observation};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Line chart specification
// ---------------------------------------------------------------------------

/// One line of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub country: String,
    #[serde(serialize_with = "serialize_color")]
    pub color: Color32,
    /// `[year, value]` pairs sorted by year.
    pub points: Vec<[f64; 2]>,
}

/// Renderer-independent description of the line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

fn serialize_color<S: Serializer>(color: &Color32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&to_hex(*color))
}

pub fn chart_title(label: &str, continent: &str) -> String {
    format!("{label} for countries in {continent}")
}

/// Build the chart for the final render set: one series per country present,
/// in country-option order.
pub fn build_chart(
    dataset: &Dataset,
    view: &FilterView,
    selection: &Selection,
) -> Result<ChartSpec, DashboardError> {
    let label = metric_label(&selection.metric)?;
    let color_map = ColorMap::new(&view.country_options);

    let series = view
        .country_options
        .iter()
        .filter_map(|country| {
            let mut points: Vec<[f64; 2]> = view
                .visible
                .iter()
                .map(|&i| &dataset.observations[i])
                .filter(|obs| &obs.country == country)
                .map(|obs| [obs.year as f64, obs.value])
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
            Some(Series {
                country: country.clone(),
                color: color_map.color_for(country),
                points,
            })
        })
        .collect();

    Ok(ChartSpec {
        title: chart_title(label, &selection.continent),
        x_label: "year".to_string(),
        y_label: label.to_string(),
        series,
    })
}

// ---------------------------------------------------------------------------
// Summary sentence
// ---------------------------------------------------------------------------

/// Describe the current selection in one sentence.
pub fn summary_text(view: &FilterView, selection: &Selection) -> Result<String, DashboardError> {
    let label = metric_label(&selection.metric)?;
    let continent = &selection.continent;

    if view.year_bounds.is_none() {
        return Ok(format!(
            "No {label} data is available for countries in {continent}."
        ));
    }
    if selection.countries.is_empty() {
        return Ok(format!(
            "No countries in {continent} are selected; choose at least one to plot the {label}."
        ));
    }

    let (lo, hi) = selection.year_range;
    Ok(format!(
        "This plot shows the {label} from {lo} to {hi} for the following countries in {continent}: {}",
        selection.countries.join(", ")
    ))
}

// ---------------------------------------------------------------------------
// Table and exports
// ---------------------------------------------------------------------------

/// The exact final render set, source order.
pub fn table_rows<'a>(dataset: &'a Dataset, visible: &[usize]) -> Vec<&'a Observation> {
    visible.iter().map(|&i| &dataset.observations[i]).collect()
}

pub fn write_chart_json<W: Write>(spec: &ChartSpec, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, spec).context("writing chart spec")
}

/// Write the final render set as CSV with the canonical columns.
pub fn write_rows_csv<W: Write>(rows: &[&Observation], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS).context("writing CSV header")?;
    for obs in rows {
        let record: Vec<String> = (0..COLUMNS.len()).map(|c| obs.cell(c)).collect();
        wtr.write_record(&record).context("writing CSV row")?;
    }
    wtr.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{obs, sample_dataset};

    fn selection(
        continent: &str,
        metric: &str,
        years: (i64, i64),
        countries: &[&str],
    ) -> Selection {
        Selection {
            continent: continent.to_string(),
            metric: metric.to_string(),
            year_range: years,
            countries: countries.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_france_life_expectancy_chart() {
        let ds = Dataset::from_observations(vec![
            obs("France", "Europe", "lifeExp", 2002, 79.0),
            obs("France", "Europe", "lifeExp", 1997, 78.0),
        ]);
        let sel = selection("Europe", "lifeExp", (1997, 2002), &["France"]);
        let view = FilterView::compute(&ds, &sel);
        let chart = build_chart(&ds, &view, &sel).unwrap();

        assert_eq!(chart.title, "Average Life Expectancy for countries in Europe");
        assert_eq!(chart.y_label, "Average Life Expectancy");
        assert_eq!(chart.x_label, "year");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].country, "France");
        assert_eq!(chart.series[0].points, vec![[1997.0, 78.0], [2002.0, 79.0]]);
        assert_eq!(table_rows(&ds, &view.visible).len(), 2);
    }

    #[test]
    fn test_one_series_per_visible_country() {
        let ds = sample_dataset();
        let sel = selection("Europe", "lifeExp", (1997, 2002), &["Spain", "Germany", "France"]);
        let view = FilterView::compute(&ds, &sel);
        let chart = build_chart(&ds, &view, &sel).unwrap();

        // Spain only has 2007 data, so it drops out of the range.
        let names: Vec<&str> = chart.series.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["France", "Germany"]);
    }

    #[test]
    fn test_colors_stable_across_toggles() {
        let ds = sample_dataset();
        let all = selection("Europe", "lifeExp", (1997, 2007), &["France", "Germany"]);
        let one = selection("Europe", "lifeExp", (1997, 2007), &["Germany"]);
        let chart_all = build_chart(&ds, &FilterView::compute(&ds, &all), &all).unwrap();
        let chart_one = build_chart(&ds, &FilterView::compute(&ds, &one), &one).unwrap();
        assert_eq!(chart_all.series[1].color, chart_one.series[0].color);
    }

    #[test]
    fn test_empty_selection_renders_empty_chart() {
        let ds = sample_dataset();
        let sel = selection("Europe", "lifeExp", (1997, 2007), &[]);
        let view = FilterView::compute(&ds, &sel);
        let chart = build_chart(&ds, &view, &sel).unwrap();
        assert!(chart.is_empty());
        assert_eq!(chart.title, "Average Life Expectancy for countries in Europe");
        assert!(table_rows(&ds, &view.visible).is_empty());

        let summary = summary_text(&view, &sel).unwrap();
        assert!(summary.starts_with("No countries in Europe are selected"));
    }

    #[test]
    fn test_summary_sentence() {
        let ds = sample_dataset();
        let sel = selection("Europe", "lifeExp", (1997, 2002), &["France", "Germany"]);
        let view = FilterView::compute(&ds, &sel);
        assert_eq!(
            summary_text(&view, &sel).unwrap(),
            "This plot shows the Average Life Expectancy from 1997 to 2002 for the following countries in Europe: France, Germany"
        );
    }

    #[test]
    fn test_summary_for_empty_subset() {
        let ds = sample_dataset();
        let sel = selection("Africa", "pop", (0, 0), &[]);
        let view = FilterView::compute(&ds, &sel);
        assert_eq!(
            summary_text(&view, &sel).unwrap(),
            "No Population data is available for countries in Africa."
        );
    }

    #[test]
    fn test_unknown_metric_fails_rendering() {
        let ds = sample_dataset();
        let sel = selection("Europe", "co2", (1997, 2002), &["France"]);
        let view = FilterView::compute(&ds, &sel);
        assert_eq!(
            build_chart(&ds, &view, &sel),
            Err(DashboardError::UnknownMetric("co2".to_string()))
        );
    }

    #[test]
    fn test_exports() {
        let ds = sample_dataset();
        let sel = selection("Europe", "lifeExp", (1997, 1997), &["France"]);
        let view = FilterView::compute(&ds, &sel);

        let mut csv_out = Vec::new();
        write_rows_csv(&table_rows(&ds, &view.visible), &mut csv_out).unwrap();
        assert_eq!(
            String::from_utf8(csv_out).unwrap(),
            "country,continent,metric,year,value\nFrance,Europe,lifeExp,1997,78\n"
        );

        let chart = build_chart(&ds, &view, &sel).unwrap();
        let mut json_out = Vec::new();
        write_chart_json(&chart, &mut json_out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json_out).unwrap();
        assert_eq!(value["title"], "Average Life Expectancy for countries in Europe");
        assert_eq!(value["series"][0]["country"], "France");
        assert!(value["series"][0]["color"].as_str().unwrap().starts_with('#'));
    }
}
