use std::fmt;

use crate::{
    AppConfig, DrawSurface, MediaElement, MediaHost, PlayerConfig, PlayerError, Playlist,
    Reschedule, Result, VisualizationSampler, VisualizerConfig, Volume,
};

/// Transport state of the active media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
    Paused,
}

/// Owns the track list and drives one media element at a time.
///
/// Switching tracks always constructs a fresh media element from the host,
/// applies the stored volume to it and drops the previous element's analysis
/// binding. The next `play` binds a new one.
pub struct PlaybackController<H: MediaHost> {
    host: H,
    playlist: Playlist,
    current: usize,
    media: H::Media,
    volume: Volume,
    transport: TransportState,
    auto_advance: bool,
    visualization: bool,
    sampler: VisualizationSampler<H::Analyser>,
}

impl<H: MediaHost> PlaybackController<H> {
    /// Creates a controller positioned on the first track.
    pub fn new(
        mut host: H,
        playlist: Playlist,
        options: &PlayerConfig,
        visualizer: VisualizerConfig,
    ) -> Result<Self> {
        visualizer.validate()?;
        let volume = Volume::new(options.volume)?;
        let mut media = host.load(playlist.track(0)?)?;
        media.set_volume(volume.get());

        Ok(Self {
            host,
            playlist,
            current: 0,
            media,
            volume,
            transport: TransportState::Stopped,
            auto_advance: options.auto_advance,
            visualization: options.visualization,
            sampler: VisualizationSampler::new(visualizer),
        })
    }

    pub fn from_config(host: H, config: &AppConfig) -> Result<Self> {
        let playlist = Playlist::new(config.track_list())?;
        Self::new(host, playlist, &config.player, config.visualizer)
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_name(&self) -> Option<&str> {
        self.playlist.get(self.current).map(|track| track.name.as_str())
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport == TransportState::Playing
    }

    pub fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    pub fn set_auto_advance(&mut self, enabled: bool) {
        self.auto_advance = enabled;
        tracing::info!(enabled, "auto-advance updated");
    }

    /// Flips auto-advance and returns the new setting.
    pub fn toggle_auto_advance(&mut self) -> bool {
        self.set_auto_advance(!self.auto_advance);
        self.auto_advance
    }

    pub fn sampler(&self) -> &VisualizationSampler<H::Analyser> {
        &self.sampler
    }

    pub fn media(&self) -> &H::Media {
        &self.media
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Starts the current track and, on success, the spectrum drawing.
    pub fn play(&mut self) -> Result<()> {
        let track = self.resolve_current("play")?;

        if self.visualization && !self.sampler.is_bound() {
            match self
                .host
                .connect_analyser(&mut self.media, self.sampler.fft_size())
            {
                Ok(analyser) => self.sampler.bind(analyser),
                Err(err) => {
                    tracing::warn!(%track, %err, "analysis graph unavailable, playing without visualization");
                }
            }
        }

        self.media.set_volume(self.volume.get());
        let outcome = self.media.play();
        if !outcome.is_started() {
            tracing::error!(%track, %outcome, "cannot play track");
            return Err(PlayerError::PlaybackRejected {
                track,
                reason: outcome.to_string(),
            });
        }

        self.transport = TransportState::Playing;
        self.sampler.start();
        tracing::info!(%track, volume = self.volume.get(), "track playing");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        let track = self.resolve_current("pause")?;

        if let Err(err) = self.media.pause() {
            tracing::error!(%track, %err, "cannot pause track");
            return Err(PlayerError::Transport {
                track,
                action: "pause",
                reason: err.to_string(),
            });
        }

        if self.transport == TransportState::Playing {
            self.transport = TransportState::Paused;
        }
        self.sampler.cancel();
        tracing::info!(%track, "track paused");
        Ok(())
    }

    /// Pauses and rewinds the current track.
    pub fn stop(&mut self) -> Result<()> {
        let track = self.resolve_current("stop")?;

        if let Err(err) = self.media.pause().and_then(|()| self.media.seek(0.0)) {
            tracing::error!(%track, %err, "cannot stop track");
            return Err(PlayerError::Transport {
                track,
                action: "stop",
                reason: err.to_string(),
            });
        }

        self.transport = TransportState::Stopped;
        self.sampler.cancel();
        tracing::info!(%track, "track stopped");
        Ok(())
    }

    pub fn next(&mut self) -> Result<()> {
        let target = self.playlist.next_index(self.current);
        self.switch_to(target, "next")
    }

    pub fn previous(&mut self) -> Result<()> {
        let target = self.playlist.previous_index(self.current);
        self.switch_to(target, "previous")
    }

    /// Activates the track at `index`. An index outside the list is reported
    /// as a missing track and leaves the controller untouched.
    pub fn select(&mut self, index: usize) -> Result<()> {
        self.switch_to(index, "select")
    }

    /// Applies `volume` to the current track and remembers it for every
    /// track activated afterwards. Out-of-range values are clamped.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        let track = self.resolve_current("change volume of")?;
        let volume = Volume::new(volume)?;

        self.media.set_volume(volume.get());
        self.volume = volume;
        tracing::info!(%track, volume = volume.get(), "volume changed");
        Ok(())
    }

    /// Runs one display refresh of the spectrum drawing.
    pub fn refresh<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Reschedule> {
        self.sampler.on_refresh(surface)
    }

    fn switch_to(&mut self, target: usize, direction: &'static str) -> Result<()> {
        let track = match self.playlist.track(target) {
            Ok(track) => track.clone(),
            Err(err) => {
                tracing::error!(index = target, "cannot find track");
                return Err(err);
            }
        };

        if let Err(err) = self.stop() {
            tracing::warn!(%err, "switching track without a clean stop");
        }

        let mut media = self.host.load(&track)?;
        media.set_volume(self.volume.get());
        self.media = media;
        self.current = target;
        self.transport = TransportState::Stopped;
        self.sampler.unbind();
        tracing::info!(track = %track.name, index = target, direction, "switched track");

        if self.auto_advance {
            self.play()?;
        }
        Ok(())
    }

    fn resolve_current(&self, action: &str) -> Result<String> {
        match self.playlist.track(self.current) {
            Ok(track) => Ok(track.name.clone()),
            Err(err) => {
                tracing::warn!(index = self.current, "cannot {action} unknown track");
                Err(err)
            }
        }
    }
}

impl<H: MediaHost> fmt::Debug for PlaybackController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackController")
            .field("current", &self.current)
            .field("tracks", &self.playlist.len())
            .field("volume", &self.volume)
            .field("transport", &self.transport)
            .field("auto_advance", &self.auto_advance)
            .field("visualization", &self.visualization)
            .field("sampler_running", &self.sampler.is_running())
            .finish()
    }
}
