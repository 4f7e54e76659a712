//! Tunables for layout, viewport and gestures.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```json
//! { "layout": { "horizontal_spacing": 480 }, "viewport": { "max_scale": 4 } }
//! ```

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::gesture::GestureConfig;
use crate::layout::{LayoutConfig, MAX_BLOCKED_STEPS};
use crate::viewport::ViewportConfig;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub gesture: GestureConfig,
}

impl TimelineConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("Open {}", path))?;
        let cfg: TimelineConfig =
            serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path))?;
        cfg.validate().with_context(|| format!("Invalid config {}", path))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        if !(l.horizontal_spacing.is_finite() && l.vertical_spacing.is_finite())
            || !(l.horizontal_spacing > 0.0 && l.vertical_spacing > 0.0)
        {
            bail!("layout spacings must be positive and finite");
        }
        if !(l.root_anchor.x.is_finite() && l.root_anchor.y.is_finite()) {
            bail!("layout.root_anchor must be finite");
        }
        if !(l.collision_fraction.is_finite() && l.collision_fraction >= 0.0) {
            bail!("layout.collision_fraction must be finite and not negative");
        }
        if !(l.displacement_fraction.is_finite() && l.displacement_fraction > 0.0) {
            bail!("layout.displacement_fraction must be positive and finite");
        }
        let blocked = 2.0 * l.collision_fraction / l.displacement_fraction;
        if blocked > MAX_BLOCKED_STEPS as f32 {
            bail!(
                "layout.collision_fraction {} is too large for displacement_fraction {} \
                 (at most {} steps per node)",
                l.collision_fraction,
                l.displacement_fraction,
                MAX_BLOCKED_STEPS
            );
        }
        let v = &self.viewport;
        if !(v.min_scale > 0.0 && v.min_scale <= v.max_scale && v.max_scale.is_finite()) {
            bail!(
                "viewport scale range [{}, {}] is empty or not positive",
                v.min_scale,
                v.max_scale
            );
        }
        if !v.zoom_sensitivity.is_finite() || !v.grid_cell.is_finite() {
            bail!("viewport.zoom_sensitivity and viewport.grid_cell must be finite");
        }
        if !(v.zoom_step > 1.0 && v.zoom_step.is_finite()) {
            bail!("viewport.zoom_step must be greater than 1");
        }
        if !(self.gesture.click_slop.is_finite() && self.gesture.click_slop >= 0.0) {
            bail!("gesture.click_slop must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        TimelineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: TimelineConfig =
            serde_json::from_str(r#"{"viewport":{"max_scale":4.0}}"#).unwrap();
        assert_eq!(cfg.viewport.max_scale, 4.0);
        assert_eq!(cfg.viewport.min_scale, 0.1);
        assert_eq!(cfg.layout.horizontal_spacing, 400.0);
    }

    #[test]
    fn test_inverted_scale_range_rejected() {
        let mut cfg = TimelineConfig::default();
        cfg.viewport.min_scale = 5.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut cfg = TimelineConfig::default();
        cfg.layout.collision_fraction = f32::INFINITY;
        assert!(cfg.validate().is_err());
        let mut cfg = TimelineConfig::default();
        cfg.layout.vertical_spacing = f32::NAN;
        assert!(cfg.validate().is_err());
        let mut cfg = TimelineConfig::default();
        cfg.viewport.max_scale = f32::INFINITY;
        assert!(cfg.validate().is_err());
    }
}
