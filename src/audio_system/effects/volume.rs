/// Master volume control
///
/// Tracks the master level with clamping and mute handling.

use serde::{Deserialize, Serialize};

/// What unmuting restores the master level to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmutePolicy {
    /// Always go back to the configured default level, discarding any
    /// level the user set before muting
    #[default]
    RestoreDefault,

    /// Go back to the level in effect when mute was applied
    RestorePrevious,
}

/// Master volume state
#[derive(Debug, Clone, Copy)]
pub struct MasterVolume {
    /// Volume multiplier (0.0-1.0)
    level: f32,
    default_level: f32,
    muted: bool,
    pre_mute: f32,
    policy: UnmutePolicy,
}

impl MasterVolume {
    /// Create a volume at `default_level`
    pub fn new(default_level: f32, policy: UnmutePolicy) -> Self {
        let default_level = clamp_level(default_level);
        Self {
            level: default_level,
            default_level,
            muted: false,
            pre_mute: default_level,
            policy,
        }
    }

    /// Get the volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn default_level(&self) -> f32 {
        self.default_level
    }

    pub fn policy(&self) -> UnmutePolicy {
        self.policy
    }

    /// Set the volume level, clamped to [0, 1]. Returns the applied level.
    pub fn set_level(&mut self, level: f32) -> f32 {
        self.level = clamp_level(level);
        self.muted = false;
        self.level
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute or unmute. Returns the applied level.
    pub fn set_muted(&mut self, muted: bool) -> f32 {
        if muted {
            if !self.muted {
                self.pre_mute = self.level;
            }
            self.muted = true;
            self.level = 0.0;
        } else {
            self.level = match self.policy {
                UnmutePolicy::RestoreDefault => self.default_level,
                UnmutePolicy::RestorePrevious if self.muted => self.pre_mute,
                UnmutePolicy::RestorePrevious => self.level,
            };
            self.muted = false;
        }
        self.level
    }
}

impl Default for MasterVolume {
    fn default() -> Self {
        Self::new(0.3, UnmutePolicy::RestoreDefault)
    }
}

/// Clamp to [0, 1]; NaN counts as silence
fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
