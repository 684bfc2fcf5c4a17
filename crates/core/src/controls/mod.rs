use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{DrawSurface, MediaHost, PlaybackController, PlayerError, Reschedule, Result};

const AUTO_ADVANCE_ON: char = '⚫';
const AUTO_ADVANCE_OFF: char = '⚪';

/// One widget button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    PlayPause,
    Stop,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    ToggleAutoAdvance,
}

impl FromStr for Control {
    type Err = PlayerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "play" | "pause" | "play-pause" | "toggle" => Ok(Self::PlayPause),
            "stop" => Ok(Self::Stop),
            "next" => Ok(Self::Next),
            "prev" | "previous" => Ok(Self::Previous),
            "vol+" | "volume-up" => Ok(Self::VolumeUp),
            "vol-" | "volume-down" => Ok(Self::VolumeDown),
            "auto" | "toggle-auto" => Ok(Self::ToggleAutoAdvance),
            other => Err(PlayerError::msg(format!("unknown control `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLevel {
    Info,
    Error,
}

/// Last outcome shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    fn error(err: &PlayerError) -> Self {
        Self {
            level: StatusLevel::Error,
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            StatusLevel::Info => f.write_str(&self.message),
            StatusLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Owns a controller and routes control presses to it.
#[derive(Debug)]
pub struct ControlPanel<H: MediaHost> {
    player: PlaybackController<H>,
    status: Status,
}

impl<H: MediaHost> ControlPanel<H> {
    pub fn new(player: PlaybackController<H>) -> Self {
        Self {
            player,
            status: Status::info("Ready"),
        }
    }

    pub fn player(&self) -> &PlaybackController<H> {
        &self.player
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Glyph shown on the auto-advance button.
    pub fn auto_advance_indicator(&self) -> char {
        if self.player.auto_advance() {
            AUTO_ADVANCE_ON
        } else {
            AUTO_ADVANCE_OFF
        }
    }

    /// Handles one press. Failures end up in the status line, never panics.
    pub fn press(&mut self, control: Control) -> &Status {
        self.status = match self.apply(control) {
            Ok(message) => Status::info(message),
            Err(err) => Status::error(&err),
        };
        &self.status
    }

    /// Runs one display refresh. Errors are reported and end the cycle.
    pub fn refresh<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> Reschedule {
        match self.player.refresh(surface) {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(%err, "spectrum drawing failed");
                self.status = Status::error(&err);
                Reschedule::Done
            }
        }
    }

    fn apply(&mut self, control: Control) -> Result<String> {
        let player = &mut self.player;
        match control {
            Control::PlayPause if player.is_playing() => {
                player.pause()?;
                Ok(format!("Paused {}", self.track_name()))
            }
            Control::PlayPause => {
                player.play()?;
                Ok(format!("Playing {}", self.track_name()))
            }
            Control::Stop => {
                player.stop()?;
                Ok(format!("Stopped {}", self.track_name()))
            }
            Control::Next => {
                player.next()?;
                Ok(format!("Next: {}", self.track_name()))
            }
            Control::Previous => {
                player.previous()?;
                Ok(format!("Previous: {}", self.track_name()))
            }
            Control::VolumeUp => {
                player.set_volume(player.volume().step_up().get())?;
                Ok(format!("Volume {}/10", self.player.volume().step()))
            }
            Control::VolumeDown => {
                player.set_volume(player.volume().step_down().get())?;
                Ok(format!("Volume {}/10", self.player.volume().step()))
            }
            Control::ToggleAutoAdvance => {
                let enabled = player.toggle_auto_advance();
                Ok(if enabled {
                    format!("{AUTO_ADVANCE_ON} Tracks play when switching")
                } else {
                    format!("{AUTO_ADVANCE_OFF} Tracks do not play when switching")
                })
            }
        }
    }

    fn track_name(&self) -> &str {
        self.player.current_name().unwrap_or("unknown track")
    }
}
