use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use solar_dashboard::Country;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct pastel colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (160.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.62);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: country → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per country so every chart agrees on the legend.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Country, Color32>,
    default_color: Color32,
}

impl Default for ColorMap {
    fn default() -> Self {
        let mapping = Country::ALL
            .into_iter()
            .zip(generate_palette(Country::ALL.len()))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl ColorMap {
    /// Look up the colour for a country.
    pub fn color_for(&self, country: Country) -> Color32 {
        self.mapping
            .get(&country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_country_gets_a_distinct_colour() {
        let map = ColorMap::default();
        let mut colours: Vec<_> = Country::ALL.iter().map(|c| map.color_for(*c)).collect();
        colours.dedup();
        assert_eq!(colours.len(), Country::ALL.len());
        assert!(colours.iter().all(|c| *c != Color32::GRAY));
    }
}
