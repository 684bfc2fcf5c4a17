//! Core library for the Playlist Visualiser widget.
//!
//! A [`PlaybackController`] walks a fixed track list and drives one media
//! element at a time through the [`MediaHost`] seam. While a track plays, its
//! [`VisualizationSampler`] reads frequency snapshots from an analysis node and
//! strokes them onto a [`DrawSurface`] once per display refresh. The
//! [`ControlPanel`] maps button presses onto the controller and keeps a status
//! line, and [`SimulatedHost`] stands in for a real audio backend.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod controls;
pub mod error;
pub mod player;
pub mod playlist;
pub mod render;
pub mod sim;
pub mod visualizer;
pub mod volume;

pub use analysis::{FrequencyAnalyser, SpectrumAnalyser};
pub use audio::{MediaElement, MediaHost, PlaybackStart};
pub use config::{AppConfig, PlayerConfig, TrackConfig, VisualizerConfig};
pub use controls::{Control, ControlPanel, Status, StatusLevel};
pub use error::{PlayerError, Result};
pub use player::{PlaybackController, TransportState};
pub use playlist::{Playlist, Track};
pub use render::{DrawCommand, DrawSurface, Point, RecordingSurface};
pub use sim::{MediaEvent, MediaLog, SimulatedAnalyser, SimulatedHost, SimulatedMedia};
pub use visualizer::{Reschedule, VisualizationSampler};
pub use volume::Volume;
