//! Scene geometry for the landing hill.
//!
//! The simulator scores against this geometry and the renderer draws its
//! markers from it, so "60 m" on screen and 60 m on the scoreboard are the
//! same pixel column by construction.

use crate::constants::PIXELS_PER_METRE;
use serde::{Deserialize, Serialize};

/// Tunable hill layout, in scene pixels and metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillConfig {
    pub origin_x_px: f64,
    pub origin_y_px: f64,
    pub ramp_height_m: f64,
    /// Landing surface drop per pixel of horizontal travel (screen y grows downward).
    pub slope: f64,
    pub max_distance_m: f64,
    pub k_point_m: f64,
    pub hill_size_m: f64,
}

/// A point in the 2D scene plane, pixels, y downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenePoint {
    pub x: f64,
    pub y: f64,
}

/// Kind of distance marker drawn on the hill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Regular,
    KPoint,
    HillSize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillMarker {
    pub metres: f64,
    pub position: ScenePoint,
    pub kind: MarkerKind,
}

/// Axis-aligned box beyond which a flight counts as a numerical runaway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl SceneBounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// Resolved hill geometry. Holds the one pixels-per-metre factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillGeometry {
    pub origin: ScenePoint,
    pub slope: f64,
    pub max_distance_m: f64,
    pub k_point_m: f64,
    pub hill_size_m: f64,
    pixels_per_metre: f64,
}

impl HillGeometry {
    pub fn from_config(config: &HillConfig) -> Self {
        Self {
            origin: ScenePoint {
                x: config.origin_x_px,
                y: config.origin_y_px,
            },
            slope: config.slope,
            max_distance_m: config.max_distance_m,
            k_point_m: config.k_point_m,
            hill_size_m: config.hill_size_m,
            pixels_per_metre: PIXELS_PER_METRE,
        }
    }

    pub fn pixels_per_metre(&self) -> f64 {
        self.pixels_per_metre
    }

    pub fn metres_to_px(&self, metres: f64) -> f64 {
        metres * self.pixels_per_metre
    }

    pub fn px_to_metres(&self, px: f64) -> f64 {
        px / self.pixels_per_metre
    }

    /// Landing surface height at scene column `x`.
    pub fn hill_y(&self, x: f64) -> f64 {
        self.origin.y + (x - self.origin.x) * self.slope
    }

    /// Horizontal distance from the lip in metres, clamped to `[0, max_distance]`.
    pub fn distance_at(&self, x: f64) -> f64 {
        self.px_to_metres(x - self.origin.x)
            .clamp(0.0, self.max_distance_m)
    }

    /// The landing surface point `metres` down the hill.
    pub fn point_at_distance(&self, metres: f64) -> ScenePoint {
        let x = self.origin.x + self.metres_to_px(metres);
        ScenePoint {
            x,
            y: self.hill_y(x),
        }
    }

    /// True once a point has reached the landing surface past the lip.
    pub fn touches_surface(&self, x: f64, y: f64) -> bool {
        x > self.origin.x && y >= self.hill_y(x)
    }

    /// Distance markers every `step_m` metres up to the maximum distance,
    /// with the K-point and hill size flagged.
    pub fn markers(&self, step_m: f64) -> Vec<HillMarker> {
        let mut markers = Vec::new();
        if step_m <= 0.0 {
            return markers;
        }

        let mut metres = step_m;
        while metres <= self.max_distance_m + f64::EPSILON {
            markers.push(HillMarker {
                metres,
                position: self.point_at_distance(metres),
                kind: MarkerKind::Regular,
            });
            metres += step_m;
        }

        for (metres, kind) in [
            (self.k_point_m, MarkerKind::KPoint),
            (self.hill_size_m, MarkerKind::HillSize),
        ] {
            if let Some(existing) = markers
                .iter_mut()
                .find(|m| (m.metres - metres).abs() < 1e-6)
            {
                existing.kind = kind;
            } else {
                markers.push(HillMarker {
                    metres,
                    position: self.point_at_distance(metres),
                    kind,
                });
            }
        }

        markers.sort_by(|a, b| a.metres.total_cmp(&b.metres));
        markers
    }

    /// Generous box around the hill; leaving it means the integrator ran away.
    pub fn scene_bounds(&self, factor: f64) -> SceneBounds {
        let reach = self.metres_to_px(self.max_distance_m) * factor;
        SceneBounds {
            min_x: self.origin.x - reach,
            max_x: self.origin.x + reach,
            min_y: self.origin.y - reach,
            max_y: self.origin.y + reach * self.slope.max(1.0),
        }
    }
}
