//! Output volume
//!
//! The listener picks a level in percent; the sink takes a linear gain in
//! `[0.0, 1.0]`, the same scale a media element's `volume` uses.

/// Volume level plus mute flag
///
/// Muting keeps the level, so unmuting restores what the listener had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    level: u8,
    muted: bool,
}

impl Volume {
    /// Highest level
    pub const MAX: u8 = 100;

    /// Create a volume at `level` percent (clamped to 100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(Self::MAX),
            muted: false,
        }
    }

    /// Set the level in percent (clamped to 100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(Self::MAX);
    }

    /// Level in percent, unaffected by mute
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn mute(&mut self) {
        self.muted = true;
    }

    pub fn unmute(&mut self) {
        self.muted = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain for the sink; 0.0 while muted
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            f32::from(self.level) / f32::from(Self::MAX)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(80)
    }
}
