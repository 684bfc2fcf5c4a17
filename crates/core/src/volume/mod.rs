use serde::{Deserialize, Serialize};

use crate::{PlayerError, Result};

/// Highest position of the volume stepper (full volume).
pub const MAX_STEP: u8 = 10;

const NOTCH_TOLERANCE: f32 = 1e-4;

/// Playback gain in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f32);

impl Volume {
    pub const MAX: Volume = Volume(1.0);
    pub const MUTED: Volume = Volume(0.0);

    /// Clamps `value` into range. Non-finite input is rejected.
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(PlayerError::InvalidInput("volume must be a finite number"));
        }
        Ok(Self(value.clamp(0.0, 1.0)))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Nearest stepper position for this volume.
    pub fn step(self) -> u8 {
        (self.0 * f32::from(MAX_STEP)).round() as u8
    }

    pub fn from_step(step: u8) -> Self {
        Self(f32::from(step.min(MAX_STEP)) / f32::from(MAX_STEP))
    }

    /// One stepper notch louder. Anything at or above the ninth notch lands
    /// on full volume.
    pub fn step_up(self) -> Self {
        let notches = self.notches();
        let max = f32::from(MAX_STEP);
        Self::from_notches(if notches >= max - 1.0 { max } else { notches + 1.0 })
    }

    /// One stepper notch quieter. Anything at or below the first notch lands
    /// on mute.
    pub fn step_down(self) -> Self {
        let notches = self.notches();
        Self::from_notches(if notches <= 1.0 { 0.0 } else { notches - 1.0 })
    }

    /// Volume in notches, keeping any fraction between them. Values within
    /// float noise of a whole notch snap onto it.
    fn notches(self) -> f32 {
        let notches = self.0 * f32::from(MAX_STEP);
        let whole = notches.round();
        if (notches - whole).abs() < NOTCH_TOLERANCE {
            whole
        } else {
            notches
        }
    }

    fn from_notches(notches: f32) -> Self {
        Self((notches / f32::from(MAX_STEP)).clamp(0.0, 1.0))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(Volume::new(1.7).unwrap(), Volume::MAX);
        assert_eq!(Volume::new(-0.2).unwrap(), Volume::MUTED);
        assert!(Volume::new(f32::NAN).is_err());
    }

    #[test]
    fn stepper_caps_at_full_volume() {
        assert_eq!(Volume::MAX.step_up(), Volume::MAX);
        assert_eq!(Volume::from_step(9).step_up(), Volume::MAX);
        assert_eq!(Volume::from_step(4).step_up().step(), 5);
    }

    #[test]
    fn stepper_floors_at_mute() {
        assert_eq!(Volume::MUTED.step_down(), Volume::MUTED);
        assert_eq!(Volume::from_step(1).step_down(), Volume::MUTED);
        assert_eq!(Volume::MAX.step_down().step(), 9);
    }

    #[test]
    fn off_grid_volumes_keep_their_fraction() {
        let up = Volume::new(0.15).unwrap().step_up();
        assert!((up.get() - 0.25).abs() < 1e-6);

        let down = Volume::new(0.15).unwrap().step_down();
        assert!((down.get() - 0.05).abs() < 1e-6);
        assert_eq!(down.step_down(), Volume::MUTED);

        assert_eq!(Volume::new(0.95).unwrap().step_up(), Volume::MAX);
    }

    #[test]
    fn repeated_steps_do_not_drift() {
        let mut volume = Volume::MAX;
        for _ in 0..7 {
            volume = volume.step_down();
        }
        assert_eq!(volume.step(), 3);
        assert!((volume.get() - 0.3).abs() < f32::EPSILON);
    }
}
