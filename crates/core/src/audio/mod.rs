use std::fmt;

use crate::{FrequencyAnalyser, Result, Track};

/// Settled outcome of a playback start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStart {
    Started,
    /// The host refused to start, e.g. an autoplay policy.
    Denied(String),
    /// The source cannot be decoded by the host.
    Unsupported(String),
}

impl PlaybackStart {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

impl fmt::Display for PlaybackStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("started"),
            Self::Denied(reason) => write!(f, "denied by host: {reason}"),
            Self::Unsupported(reason) => write!(f, "unsupported source: {reason}"),
        }
    }
}

/// A single playable media element bound to one track.
pub trait MediaElement {
    /// Requests playback start and reports how the request settled.
    fn play(&mut self) -> PlaybackStart;

    fn pause(&mut self) -> Result<()>;

    /// Moves the playback position, in seconds.
    fn seek(&mut self, seconds: f64) -> Result<()>;

    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;
}

/// Factory for media elements and the analysis graphs attached to them.
pub trait MediaHost {
    type Media: MediaElement;
    type Analyser: FrequencyAnalyser;

    /// Constructs a fresh media element for `track`.
    fn load(&mut self, track: &Track) -> Result<Self::Media>;

    /// Builds an analysis context and routes `media` through a new analysis
    /// node with the given transform window into the output sink.
    ///
    /// A media element can only feed one analysis graph for its lifetime, so
    /// callers bind each element at most once.
    fn connect_analyser(&mut self, media: &mut Self::Media, fft_size: usize)
        -> Result<Self::Analyser>;
}
