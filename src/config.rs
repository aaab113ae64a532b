//! Tunable game constants.
//!
//! Defaults reproduce the shipped feel of the game; JS can override any subset
//! through `start_game_with_config` when the `serde_json` feature is on.

use crate::error::BootError;

/// Heart layout and timing knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Base grid spacing in px.
    pub spacing: f64,
    /// Jitter bound of the full-viewport grids, as a fraction of spacing.
    pub grid_jitter: f64,
    /// Jitter bound of the target cover grid, as a fraction of spacing.
    pub cover_jitter: f64,
    /// Padding around the target box for the cover layer (fraction of spacing).
    pub cover_padding: f64,
    /// Cover layer spacing as a fraction of the base spacing.
    pub cover_density: f64,
    pub heart_size: (f64, f64),
    /// Rotation range in degrees.
    pub rotation: (f64, f64),
    /// Half-open stacking order range.
    pub z_index: (i32, i32),
    pub clear_delay_ms: f64,
    pub reduced_clear_delay_ms: f64,
    /// Length of the first-tap shake on touch devices.
    pub tap_shake_ms: f64,
    /// Inset of the target from the viewport edges, as a fraction of the viewport.
    pub corner_inset: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            spacing: 60.0,
            grid_jitter: 0.25,
            cover_jitter: 0.2,
            cover_padding: 0.6,
            cover_density: 0.9,
            heart_size: (45.0, 110.0),
            rotation: (-18.0, 18.0),
            z_index: (3, 8),
            clear_delay_ms: 380.0,
            reduced_clear_delay_ms: 100.0,
            tap_shake_ms: 280.0,
            corner_inset: 0.06,
        }
    }
}

impl GameConfig {
    /// Spacing of the dense layer covering the target.
    pub fn cover_spacing(&self) -> f64 {
        self.spacing * self.cover_density
    }

    pub fn clear_delay(&self, reduced_motion: bool) -> f64 {
        if reduced_motion {
            self.reduced_clear_delay_ms
        } else {
            self.clear_delay_ms
        }
    }

    pub fn validate(&self) -> Result<(), BootError> {
        if !(self.spacing > 0.0) || !(self.cover_spacing() > 0.0) {
            return Err(BootError::InvalidConfig(format!(
                "spacing must be positive (spacing={}, cover_density={})",
                self.spacing, self.cover_density
            )));
        }
        if self.heart_size.0 > self.heart_size.1 || self.heart_size.0 <= 0.0 {
            return Err(BootError::InvalidConfig(format!(
                "bad heart_size range {:?}",
                self.heart_size
            )));
        }
        if self.rotation.0 > self.rotation.1 {
            return Err(BootError::InvalidConfig(format!(
                "bad rotation range {:?}",
                self.rotation
            )));
        }
        if self.z_index.0 >= self.z_index.1 {
            return Err(BootError::InvalidConfig(format!(
                "empty z_index range {:?}",
                self.z_index
            )));
        }
        if !(0.0..0.5).contains(&self.corner_inset) {
            return Err(BootError::InvalidConfig(format!(
                "corner_inset {} outside [0, 0.5)",
                self.corner_inset
            )));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, BootError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}
