use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    f32::consts::PI,
    rc::Rc,
};

use crate::{
    FrequencyAnalyser, MediaElement, MediaHost, PlaybackStart, PlayerError, Result,
    SpectrumAnalyser, Track,
};

const DEFAULT_TONE_HZ: f32 = 440.0;
const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Transport call observed by the simulated host.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    Loaded { track: String },
    Play { track: String },
    Pause { track: String },
    Seek { track: String, seconds: f64 },
    Volume { track: String, volume: f32 },
    AnalyserConnected { track: String, fft_size: usize },
}

/// Shared, append-only record of [`MediaEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct MediaLog(Rc<RefCell<Vec<MediaEvent>>>);

impl MediaLog {
    fn push(&self, event: MediaEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<MediaEvent> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&MediaEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|event| predicate(*event)).count()
    }

    /// Number of playback start requests issued so far.
    pub fn plays(&self) -> usize {
        self.count(|event| matches!(event, MediaEvent::Play { .. }))
    }
}

#[derive(Debug, Default)]
struct ElementState {
    playing: bool,
    volume: f32,
    /// Playback position in samples.
    position: u64,
}

/// Media host that plays sine tones instead of decoding files.
#[derive(Debug)]
pub struct SimulatedHost {
    log: MediaLog,
    sample_rate: u32,
    tones: HashMap<String, f32>,
    denied: HashSet<String>,
    unsupported: HashSet<String>,
    failing_pause: HashSet<String>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            log: MediaLog::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            tones: HashMap::new(),
            denied: HashSet::new(),
            unsupported: HashSet::new(),
            failing_pause: HashSet::new(),
        }
    }

    pub fn log(&self) -> MediaLog {
        self.log.clone()
    }

    /// Plays `track` as a tone of `hz` instead of the default 440 Hz.
    pub fn with_tone(mut self, track: impl Into<String>, hz: f32) -> Self {
        self.tones.insert(track.into(), hz);
        self
    }

    /// Makes playback requests for `track` be refused by the host.
    pub fn deny(mut self, track: impl Into<String>) -> Self {
        self.denied.insert(track.into());
        self
    }

    /// Marks `track` as a format the host cannot decode.
    pub fn unsupported(mut self, track: impl Into<String>) -> Self {
        self.unsupported.insert(track.into());
        self
    }

    /// Makes pause requests for `track` raise.
    pub fn fail_pause(mut self, track: impl Into<String>) -> Self {
        self.failing_pause.insert(track.into());
        self
    }
}

impl MediaHost for SimulatedHost {
    type Media = SimulatedMedia;
    type Analyser = SimulatedAnalyser;

    fn load(&mut self, track: &Track) -> Result<SimulatedMedia> {
        self.log.push(MediaEvent::Loaded {
            track: track.name.clone(),
        });

        let start = if self.denied.contains(&track.name) {
            PlaybackStart::Denied("playback requires a user gesture".into())
        } else if self.unsupported.contains(&track.name) {
            PlaybackStart::Unsupported(format!("no decoder for `{}`", track.source))
        } else {
            PlaybackStart::Started
        };

        Ok(SimulatedMedia {
            track: track.name.clone(),
            tone_hz: self.tones.get(&track.name).copied().unwrap_or(DEFAULT_TONE_HZ),
            start,
            fail_pause: self.failing_pause.contains(&track.name),
            connected: false,
            sample_rate: self.sample_rate,
            state: Rc::new(RefCell::new(ElementState {
                volume: 1.0,
                ..Default::default()
            })),
            log: self.log.clone(),
        })
    }

    fn connect_analyser(
        &mut self,
        media: &mut SimulatedMedia,
        fft_size: usize,
    ) -> Result<SimulatedAnalyser> {
        if media.connected {
            return Err(PlayerError::msg(format!(
                "media element for `{}` is already connected to an analysis graph",
                media.track
            )));
        }

        let analyser = SimulatedAnalyser {
            inner: SpectrumAnalyser::new(fft_size)?,
            state: media.state.clone(),
            tone_hz: media.tone_hz,
            sample_rate: self.sample_rate,
            block: vec![0.0; fft_size],
        };
        media.connected = true;
        self.log.push(MediaEvent::AnalyserConnected {
            track: media.track.clone(),
            fft_size,
        });
        Ok(analyser)
    }
}

/// Media element produced by [`SimulatedHost`].
#[derive(Debug)]
pub struct SimulatedMedia {
    track: String,
    tone_hz: f32,
    start: PlaybackStart,
    fail_pause: bool,
    connected: bool,
    sample_rate: u32,
    state: Rc<RefCell<ElementState>>,
    log: MediaLog,
}

impl SimulatedMedia {
    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn position_samples(&self) -> u64 {
        self.state.borrow().position
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) -> PlaybackStart {
        self.log.push(MediaEvent::Play {
            track: self.track.clone(),
        });
        if self.start.is_started() {
            self.state.borrow_mut().playing = true;
        }
        self.start.clone()
    }

    fn pause(&mut self) -> Result<()> {
        self.log.push(MediaEvent::Pause {
            track: self.track.clone(),
        });
        if self.fail_pause {
            return Err(PlayerError::msg("media element rejected pause"));
        }
        self.state.borrow_mut().playing = false;
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PlayerError::InvalidInput("seek position must be non-negative"));
        }
        self.log.push(MediaEvent::Seek {
            track: self.track.clone(),
            seconds,
        });
        self.state.borrow_mut().position = (seconds * f64::from(self.sample_rate)) as u64;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.push(MediaEvent::Volume {
            track: self.track.clone(),
            volume,
        });
        self.state.borrow_mut().volume = volume;
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }
}

/// Analysis node fed by the tone of the element it is connected to.
///
/// Each read advances the element by one analysis window while it plays and
/// feeds silence while it is paused.
#[derive(Debug)]
pub struct SimulatedAnalyser {
    inner: SpectrumAnalyser,
    state: Rc<RefCell<ElementState>>,
    tone_hz: f32,
    sample_rate: u32,
    block: Vec<f32>,
}

impl FrequencyAnalyser for SimulatedAnalyser {
    fn fft_size(&self) -> usize {
        self.inner.fft_size()
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if state.playing {
                let step = 2.0 * PI * self.tone_hz / self.sample_rate as f32;
                for (offset, sample) in self.block.iter_mut().enumerate() {
                    let n = (state.position + offset as u64) % u64::from(self.sample_rate);
                    *sample = state.volume * (step * n as f32).sin();
                }
                state.position += self.block.len() as u64;
            } else {
                self.block.fill(0.0);
            }
        }

        self.inner.push_samples(&self.block);
        self.inner.byte_frequency_data(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str) -> Track {
        Track::new(name, format!("music/{name}"))
    }

    #[test]
    fn records_transport_calls() {
        let mut host = SimulatedHost::new();
        let log = host.log();
        let mut media = host.load(&track("a.mp3")).unwrap();

        media.set_volume(0.5);
        assert_eq!(media.play(), PlaybackStart::Started);
        media.pause().unwrap();
        media.seek(0.0).unwrap();
        assert!(media.seek(-1.0).is_err());

        assert_eq!(
            log.events(),
            vec![
                MediaEvent::Loaded { track: "a.mp3".into() },
                MediaEvent::Volume { track: "a.mp3".into(), volume: 0.5 },
                MediaEvent::Play { track: "a.mp3".into() },
                MediaEvent::Pause { track: "a.mp3".into() },
                MediaEvent::Seek { track: "a.mp3".into(), seconds: 0.0 },
            ]
        );
    }

    #[test]
    fn honours_configured_failures() {
        let mut host = SimulatedHost::new()
            .deny("a.mp3")
            .unsupported("b.wma")
            .fail_pause("c.mp3");

        let mut denied = host.load(&track("a.mp3")).unwrap();
        assert!(matches!(denied.play(), PlaybackStart::Denied(_)));
        assert!(!denied.is_playing());

        let mut unsupported = host.load(&track("b.wma")).unwrap();
        assert!(matches!(unsupported.play(), PlaybackStart::Unsupported(_)));

        let mut stuck = host.load(&track("c.mp3")).unwrap();
        stuck.play();
        assert!(stuck.pause().is_err());
        assert!(stuck.is_playing());
    }

    #[test]
    fn media_binds_to_a_single_analysis_graph() {
        let mut host = SimulatedHost::new();
        let mut media = host.load(&track("a.mp3")).unwrap();

        let analyser = host.connect_analyser(&mut media, 256).unwrap();
        assert_eq!(analyser.bin_count(), 128);
        assert!(host.connect_analyser(&mut media, 256).is_err());
    }

    #[test]
    fn analyser_follows_the_playing_tone() {
        // 48 kHz / 256 = 187.5 Hz per bin, so 3 kHz lands in bin 16.
        let mut host = SimulatedHost::new().with_tone("a.mp3", 3_000.0);
        let mut media = host.load(&track("a.mp3")).unwrap();
        let mut analyser = host.connect_analyser(&mut media, 256).unwrap();
        let mut data = vec![0_u8; 128];

        analyser.byte_frequency_data(&mut data).unwrap();
        assert!(data.iter().all(|&value| value == 0));

        media.play();
        analyser.byte_frequency_data(&mut data).unwrap();
        assert_eq!(data[16], 255);
        assert_eq!(data[80], 0);
        assert_eq!(media.position_samples(), 256);
    }
}
