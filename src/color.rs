use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::analysis::classify::ThunderstormLikelihood;

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: series key → Color32
// ---------------------------------------------------------------------------

/// Maps each plotted series (profile variable, index bar, ...) to a distinct
/// colour.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Clone> ColorMap<K> {
    pub fn new(keys: &[K]) -> Self {
        let palette = generate_palette(keys.len());
        let mapping = keys.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, key: &K) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Headline colour of an overall assessment.
pub fn likelihood_color(likelihood: ThunderstormLikelihood) -> Color32 {
    match likelihood {
        ThunderstormLikelihood::High => Color32::from_rgb(0xb9, 0x1c, 0x1c),
        ThunderstormLikelihood::Moderate => Color32::from_rgb(0xca, 0x8a, 0x04),
        ThunderstormLikelihood::Low => Color32::from_rgb(0x15, 0x80, 0x3d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ProfileVariable;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
    }

    #[test]
    fn color_map_assigns_distinct_colors() {
        let map = ColorMap::new(&ProfileVariable::ALL);
        assert_ne!(
            map.color_for(&ProfileVariable::Temperature),
            map.color_for(&ProfileVariable::DewPoint)
        );
    }

    #[test]
    fn unknown_keys_fall_back_to_gray() {
        let map = ColorMap::new(&[1, 2]);
        assert_eq!(map.color_for(&7), Color32::GRAY);
    }
}
