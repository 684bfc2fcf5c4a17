/// Result alias that carries the custom [`PlayerError`] type.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Common error type for the core crate.
///
/// Every variant is terminal to the single operation that produced it. None
/// of them leave the controller in a half-updated state.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Free-form message for failures reported by host collaborators.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// A value handed to the library was outside its accepted domain.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("playlist must contain at least one track")]
    EmptyPlaylist,
    /// The requested index does not resolve to a track.
    #[error("cannot find track at index {0}")]
    MissingTrack(usize),
    /// The host refused to start playback.
    #[error("cannot play track `{track}`: {reason}")]
    PlaybackRejected { track: String, reason: String },
    /// A pause or stop request raised inside the host.
    #[error("cannot {action} track `{track}`: {reason}")]
    Transport {
        track: String,
        action: &'static str,
        reason: String,
    },
}

impl PlayerError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}
