use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Per-country noise source (splitmix64), seeded from the country name so a
/// country's series does not depend on the order of the table below.
struct Noise(u64);

impl Noise {
    fn for_country(seed: u64, country: &str) -> Self {
        let h = country
            .bytes()
            .fold(seed, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));
        Noise(h)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[-1, 1)`.
    fn jitter(&mut self) -> f64 {
        ((self.next_u64() >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

/// `(start, yearly growth)` of a metric from 1952 on.
type Trend = (f64, f64);

/// Country, continent, then life expectancy, population and GDP per capita.
const PROFILES: &[(&str, &str, Trend, Trend, Trend)] = &[
    ("France", "Europe", (67.4, 0.23), (42.4e6, 0.0062), (7030.0, 0.029)),
    ("Germany", "Europe", (67.5, 0.21), (69.1e6, 0.0031), (7144.0, 0.028)),
    ("Spain", "Europe", (64.9, 0.29), (28.5e6, 0.0087), (3834.0, 0.037)),
    ("Kenya", "Africa", (42.3, 0.20), (6.5e6, 0.033), (853.0, 0.004)),
    ("Ghana", "Africa", (43.1, 0.29), (5.6e6, 0.026), (911.0, 0.007)),
    ("Japan", "Asia", (63.0, 0.36), (86.5e6, 0.0069), (3217.0, 0.045)),
    ("India", "Asia", (37.4, 0.45), (372.0e6, 0.020), (547.0, 0.023)),
    ("Brazil", "Americas", (50.9, 0.31), (56.6e6, 0.022), (2109.0, 0.025)),
    ("Canada", "Americas", (68.8, 0.20), (14.8e6, 0.015), (11367.0, 0.022)),
    ("Australia", "Oceania", (69.1, 0.24), (8.7e6, 0.016), (10040.0, 0.022)),
];

struct Row {
    country: &'static str,
    continent: &'static str,
    metric: &'static str,
    year: i64,
    value: f64,
}

fn generate(seed: u64) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(country, continent, life_exp, pop, gdp) in PROFILES {
        let mut noise = Noise::for_country(seed, country);
        for year in (1952..=2007).step_by(5) {
            let t = (year - 1952) as f64;
            let life_exp = life_exp.0 + life_exp.1 * t + 0.4 * noise.jitter();
            let pop = (pop.0 * (1.0 + pop.1).powf(t)).round();
            let gdp = gdp.0 * (1.0 + gdp.1).powf(t) * (1.0 + 0.03 * noise.jitter());

            for (metric, value) in [("lifeExp", life_exp), ("pop", pop), ("gdpPercap", gdp)] {
                rows.push(Row {
                    country,
                    continent,
                    metric,
                    year,
                    value,
                });
            }
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    wtr.write_record(["country", "continent", "year", "metric", "value"])?;
    for r in rows {
        wtr.write_record([
            r.country.to_string(),
            r.continent.to_string(),
            r.year.to_string(),
            r.metric.to_string(),
            r.value.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("metric", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.country).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.continent).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.metric).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.value).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let rows = generate(42);

    write_csv(&rows, "gapminder_tidy.csv")?;
    write_parquet(&rows, "gapminder_tidy.parquet")?;

    println!(
        "Wrote {} observations for {} countries to gapminder_tidy.csv and gapminder_tidy.parquet",
        rows.len(),
        PROFILES.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_covers_every_country_metric_and_year() {
        let rows = generate(42);
        assert_eq!(rows.len(), PROFILES.len() * 12 * 3);
        assert!(rows.iter().all(|r| r.value.is_finite()));
        assert_eq!(rows.first().map(|r| r.year), Some(1952));
        assert_eq!(rows.last().map(|r| r.year), Some(2007));
    }

    #[test]
    fn test_noise_depends_on_country_not_position() {
        let mut a = Noise::for_country(42, "Kenya");
        let mut b = Noise::for_country(42, "Kenya");
        let mut c = Noise::for_country(42, "Ghana");
        let first = a.jitter();
        assert_eq!(first, b.jitter());
        assert_ne!(first, c.jitter());
        assert!((-1.0..1.0).contains(&first));
    }
}
