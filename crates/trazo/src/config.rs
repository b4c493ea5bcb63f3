//! Session configuration.

use serde::{Deserialize, Serialize};
use trazo_snap::{CastOptions, SnapFilter, SolverParams};
use trazo_units::UnitSystem;

use crate::SessionError;

/// User-facing configuration of a drafting session.
///
/// Round-trips through TOML so hosts can persist it with their own
/// settings. Everything has a sensible default; a partial TOML table
/// fills the rest from [`Default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftingConfig {
    /// Measurement system for input parsing and display formatting.
    pub unit_system: UnitSystem,
    /// Z elevation of the default construction plane.
    pub default_elevation: f64,
    /// Angular spacing of candidate lock directions in degrees.
    pub angle_step_deg: f64,
    /// Half-length of the rendered guide line in world units.
    pub guide_half_length: f64,
    /// Keep surface hits on every solid instead of only the nearest.
    pub x_ray: bool,
    /// Pixel margin added to projected bounding boxes before culling.
    pub cull_margin_px: f64,
    /// Pixel radius of the grazing-ray retry ring.
    pub offset_ring_px: f64,
    /// Perspective-mode cull distance in world units.
    pub max_view_distance: f64,
    /// Snap group and type visibility toggles.
    pub snap: SnapFilter,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            default_elevation: 0.0,
            angle_step_deg: 30.0,
            guide_half_length: 1000.0,
            x_ray: false,
            cull_margin_px: 10.0,
            offset_ring_px: 3.0,
            max_view_distance: 200.0,
            snap: SnapFilter::default(),
        }
    }
}

impl DraftingConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, SessionError> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The ray-cast tunables this configuration implies.
    pub(crate) fn cast_options(&self) -> CastOptions {
        CastOptions {
            x_ray: self.x_ray,
            cull_margin_px: self.cull_margin_px,
            offset_ring_px: self.offset_ring_px,
            max_view_distance: self.max_view_distance,
        }
    }

    /// The constraint-solver tunables this configuration implies.
    pub(crate) fn solver_params(&self) -> SolverParams {
        SolverParams {
            angle_step_deg: self.angle_step_deg,
            guide_half_length: self.guide_half_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_round_trip() {
        let mut config = DraftingConfig::default();
        config.unit_system = UnitSystem::Imperial;
        config.x_ray = true;
        config.snap.faces = false;
        let text = config.to_toml_string().unwrap();
        let back = DraftingConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.unit_system, UnitSystem::Imperial);
        assert!(back.x_ray);
        assert!(!back.snap.faces);
        assert!((back.angle_step_deg - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = DraftingConfig::from_toml_str("unit_system = \"imperial\"").unwrap();
        assert_eq!(config.unit_system, UnitSystem::Imperial);
        assert!((config.guide_half_length - 1000.0).abs() < 1e-12);
        assert!(config.snap.vertices);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(DraftingConfig::from_toml_str("unit_system = 3").is_err());
    }
}
