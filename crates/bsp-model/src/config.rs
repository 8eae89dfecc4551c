//! Numeric tolerances and render options.
//!
//! Both structs deserialize with `serde`, and every field falls back to its
//! default when omitted, so a host application can keep only the overrides
//! in its own configuration file.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Epsilons used by plane intersection, straddle tests and subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Threshold for direction-vector degeneracy (parallel planes) and for
    /// snapping points onto an intersection line.
    pub direction: f64,
    /// Threshold for magnitude comparisons (zero-length normals, vanishing
    /// determinants).
    pub magnitude: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            direction: 1e-5,
            magnitude: 1e-14,
        }
    }
}

/// Options consumed by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Added to every projected vertex (after the y axis is flipped).
    pub center_offset: [f64; 2],
    pub stroke_color: Color,
    /// Draw the interior diagonals of each strip.
    pub show_sub_grid: bool,
    pub sub_grid_color: Color,
    pub sub_grid_alpha: u8,
    /// Distance at which shading falloff starts.
    pub standard_luminous_distance: f64,
    /// Direction the light travels, in model space.
    pub light_direction: [f64; 3],
    /// Minimum shading intensity in `[0, 1]`.
    pub ambient: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            center_offset: [0.0, 0.0],
            stroke_color: Color::BLACK,
            show_sub_grid: true,
            sub_grid_color: Color::GRAY,
            sub_grid_alpha: 127,
            standard_luminous_distance: 100.0,
            light_direction: [0.0, 0.0, -1.0],
            ambient: 0.2,
        }
    }
}

impl RenderOptions {
    /// Sub-grid color with the configured alpha applied.
    pub fn sub_grid_stroke(&self) -> Color {
        self.sub_grid_color.with_alpha(self.sub_grid_alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let tol = Tolerance::default();
        assert_eq!(tol.direction, 1e-5);
        assert_eq!(tol.magnitude, 1e-14);

        let options = RenderOptions::default();
        assert_eq!(options.center_offset, [0.0, 0.0]);
        assert_eq!(options.stroke_color, Color::BLACK);
        assert!(options.show_sub_grid);
        assert_eq!(options.standard_luminous_distance, 100.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let options: RenderOptions = toml::from_str(
            r#"
            center_offset = [320.0, 240.0]
            show_sub_grid = false

            [stroke_color]
            r = 255
            g = 0
            b = 0
            a = 255
            "#,
        )
        .unwrap();

        assert_eq!(options.center_offset, [320.0, 240.0]);
        assert!(!options.show_sub_grid);
        assert_eq!(options.stroke_color, Color::rgb(255, 0, 0));
        assert_eq!(options.standard_luminous_distance, 100.0);
        assert_eq!(options.sub_grid_alpha, 127);
    }

    #[test]
    fn tolerance_from_toml() {
        let tol: Tolerance = toml::from_str("direction = 1e-6").unwrap();
        assert_eq!(tol.direction, 1e-6);
        assert_eq!(tol.magnitude, 1e-14);
    }

    #[test]
    fn sub_grid_stroke_applies_alpha() {
        let options = RenderOptions {
            sub_grid_alpha: 10,
            ..Default::default()
        };
        assert_eq!(options.sub_grid_stroke(), Color::rgba(128, 128, 128, 10));
    }
}
