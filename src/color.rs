use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` distinct colours: evenly spaced hues, with lightness
/// alternating between neighbours so large continents stay readable.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = i as f32 * 360.0 / n as f32;
            let lightness = if i % 2 == 0 { 0.50 } else { 0.65 };
            let hsl = Hsl::new(hue, 0.75, lightness);
            let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsl).into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

/// `#rrggbb` notation for exported chart specs.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

// ---------------------------------------------------------------------------
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Maps the countries of a continent+metric subset to distinct colours.
///
/// Built from the full option list, so a country keeps its colour while
/// others are toggled on and off.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new(countries: &[String]) -> Self {
        let palette = generate_palette(countries.len());
        let mapping = countries.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a country; unknown countries are grey.
    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping.get(country).copied().unwrap_or(Color32::GRAY)
    }
}
