//! Haptic/sound feedback cues
//!
//! The session fires cues and forgets them. Playback is up to the platform;
//! nothing here can fail back into the game.

/// Feedback cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackCue {
    /// Focus-coloured circle tapped
    CorrectTap,
    /// Distractor tapped
    WrongTap,
    /// Timer ran out with lives left
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Device vibration pattern for a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    ImpactLight,
    NotifyError,
    NotifySuccess,
    NotifyWarning,
}

impl FeedbackCue {
    pub fn haptic(&self) -> HapticPattern {
        match self {
            FeedbackCue::CorrectTap => HapticPattern::ImpactLight,
            FeedbackCue::WrongTap => HapticPattern::NotifyError,
            FeedbackCue::LevelComplete => HapticPattern::NotifySuccess,
            FeedbackCue::GameOver => HapticPattern::NotifyWarning,
        }
    }
}

/// Receiver for feedback cues
pub trait FeedbackSink {
    fn notify(&mut self, cue: FeedbackCue);
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &mut T {
    fn notify(&mut self, cue: FeedbackCue) {
        (**self).notify(cue);
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for Box<T> {
    fn notify(&mut self, cue: FeedbackCue) {
        (**self).notify(cue);
    }
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _cue: FeedbackCue) {}
}

/// Keeps every cue in order (replays, tests)
#[derive(Debug, Clone, Default)]
pub struct FeedbackLog {
    pub cues: Vec<FeedbackCue>,
}

impl FeedbackLog {
    pub fn count(&self, cue: FeedbackCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }
}

impl FeedbackSink for FeedbackLog {
    fn notify(&mut self, cue: FeedbackCue) {
        self.cues.push(cue);
    }
}

/// Feedback manager honouring the player's sound/haptics preferences
#[derive(Debug, Clone)]
pub struct FeedbackManager {
    sound_enabled: bool,
    haptics_enabled: bool,
    sfx_volume: f32,
    played: u64,
}

impl Default for FeedbackManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackManager {
    pub fn new() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
            sfx_volume: 1.0,
            played: 0,
        }
    }

    pub fn from_settings(settings: &crate::Settings) -> Self {
        Self {
            sound_enabled: settings.sound_enabled,
            haptics_enabled: settings.haptics_enabled,
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            played: 0,
        }
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn set_haptics_enabled(&mut self, enabled: bool) {
        self.haptics_enabled = enabled;
    }

    /// Set effects volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    pub fn is_enabled(&self) -> bool {
        (self.sound_enabled && self.sfx_volume > 0.0) || self.haptics_enabled
    }

    /// Cues actually delivered
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl FeedbackSink for FeedbackManager {
    fn notify(&mut self, cue: FeedbackCue) {
        if !self.is_enabled() {
            return;
        }
        self.played += 1;
        if self.haptics_enabled {
            log::debug!("haptic {:?} for {:?}", cue.haptic(), cue);
        }
        if self.sound_enabled && self.sfx_volume > 0.0 {
            log::debug!("sound {:?} at volume {:.2}", cue, self.sfx_volume);
        }
    }
}
