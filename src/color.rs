use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::clean::Sentiment;
use crate::data::model::Rating;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const POSITIVE: Color32 = Color32::from_rgb(0x2c, 0xa0, 0x2c);
pub const NEGATIVE: Color32 = Color32::from_rgb(0xd6, 0x27, 0x28);
pub const NEUTRAL: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);

pub fn sentiment_color(sentiment: Sentiment) -> Color32 {
    match sentiment {
        Sentiment::Positive => POSITIVE,
        Sentiment::Negative => NEGATIVE,
        Sentiment::Neutral => NEUTRAL,
    }
}

/// Sequential teal ramp over the rating scale; `No disponible` is grey.
pub fn rating_color(rating: Rating) -> Color32 {
    let step = match rating.score() {
        Some(score) => (score as f32 - 1.0) / 4.0,
        None => return Color32::GRAY,
    };
    hsl_to_color32(Hsl::new(165.0, 0.55, 0.80 - 0.45 * step))
}

/// Colour of the `i`-th series in grouped charts (Res1, Res2, Res3, …).
pub fn series_color(i: usize) -> Color32 {
    const SERIES: [Color32; 3] = [
        Color32::from_rgb(0x63, 0x6e, 0xfa),
        Color32::from_rgb(0xef, 0x55, 0x3b),
        Color32::from_rgb(0x00, 0xcc, 0x96),
    ];
    SERIES[i % SERIES.len()]
}

// ---------------------------------------------------------------------------
// Color mapping: program → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a categorical column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        let unique: BTreeSet<[u8; 4]> = p.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn color_map_falls_back_to_grey() {
        let programs: BTreeSet<String> = ["ING", "MED"].map(String::from).into();
        let cm = ColorMap::new(&programs);
        assert_ne!(cm.color_for("ING"), cm.color_for("MED"));
        assert_eq!(cm.color_for("DER"), Color32::GRAY);
    }

    #[test]
    fn rating_ramp_darkens_with_score() {
        let light = rating_color(Rating::Insufficient);
        let dark = rating_color(Rating::Outstanding);
        let luma = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(luma(light) > luma(dark));
        assert_eq!(rating_color(Rating::NotAvailable), Color32::GRAY);
    }
}
