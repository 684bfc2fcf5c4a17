use crate::{
    render::{draw_polyline, spectrum_polyline},
    DrawSurface, FrequencyAnalyser, Result, VisualizerConfig,
};

/// Whether the draw cycle wants another display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reschedule {
    Continue,
    Done,
}

/// Cooperative draw task that turns frequency snapshots into a line graph.
///
/// The host calls [`on_refresh`](Self::on_refresh) once per display refresh
/// and keeps scheduling it for as long as it answers [`Reschedule::Continue`].
/// The task only runs between [`start`](Self::start) and
/// [`cancel`](Self::cancel), and only while an analyser is bound.
#[derive(Debug)]
pub struct VisualizationSampler<A> {
    config: VisualizerConfig,
    analyser: Option<A>,
    magnitudes: Vec<u8>,
    running: bool,
    frames: u64,
}

impl<A: FrequencyAnalyser> VisualizationSampler<A> {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            analyser: None,
            magnitudes: Vec::new(),
            running: false,
            frames: 0,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Attaches an analyser and sizes the magnitude buffer to its bins.
    pub fn bind(&mut self, analyser: A) {
        self.magnitudes = vec![0; analyser.bin_count()];
        self.analyser = Some(analyser);
        tracing::debug!(bins = self.magnitudes.len(), "analysis node bound");
    }

    /// Drops the analyser of a media element that is no longer active.
    pub fn unbind(&mut self) {
        self.cancel();
        self.analyser = None;
        self.magnitudes.clear();
    }

    pub fn is_bound(&self) -> bool {
        self.analyser.is_some()
    }

    pub fn analyser(&self) -> Option<&A> {
        self.analyser.as_ref()
    }

    pub fn start(&mut self) {
        if self.is_bound() {
            self.running = true;
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Latest snapshot. Empty while unbound.
    pub fn magnitudes(&self) -> &[u8] {
        &self.magnitudes
    }

    /// Frames drawn since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Samples the analyser once and redraws the spectrum line.
    pub fn on_refresh<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> Result<Reschedule> {
        if !self.running {
            return Ok(Reschedule::Done);
        }
        let Some(analyser) = self.analyser.as_mut() else {
            self.running = false;
            return Ok(Reschedule::Done);
        };

        analyser.byte_frequency_data(&mut self.magnitudes)?;

        let VisualizerConfig { width, height, .. } = self.config;
        let points = spectrum_polyline(&self.magnitudes, width, height);
        draw_polyline(surface, &points, width, height);

        self.frames += 1;
        tracing::trace!(frame = self.frames, "spectrum frame drawn");
        Ok(Reschedule::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DrawCommand, RecordingSurface};

    /// Analyser that replays a fixed snapshot.
    struct FixedAnalyser {
        values: Vec<u8>,
        reads: usize,
    }

    impl FrequencyAnalyser for FixedAnalyser {
        fn fft_size(&self) -> usize {
            self.values.len() * 2
        }

        fn byte_frequency_data(&mut self, out: &mut [u8]) -> Result<()> {
            self.reads += 1;
            out.copy_from_slice(&self.values);
            Ok(())
        }
    }

    fn sampler_with(values: Vec<u8>) -> VisualizationSampler<FixedAnalyser> {
        let mut sampler = VisualizationSampler::new(VisualizerConfig::default());
        sampler.bind(FixedAnalyser { values, reads: 0 });
        sampler
    }

    #[test]
    fn idles_until_started() {
        let mut sampler = sampler_with(vec![128; 128]);
        let mut surface = RecordingSurface::new();

        assert_eq!(sampler.on_refresh(&mut surface).unwrap(), Reschedule::Done);
        assert!(surface.commands().is_empty());
        assert_eq!(sampler.analyser().unwrap().reads, 0);
    }

    #[test]
    fn draws_every_refresh_while_running() {
        let mut sampler = sampler_with(vec![128; 128]);
        let mut surface = RecordingSurface::new();
        sampler.start();

        for _ in 0..3 {
            assert_eq!(sampler.on_refresh(&mut surface).unwrap(), Reschedule::Continue);
        }

        assert_eq!(sampler.frames(), 3);
        assert_eq!(surface.strokes(), 3);
        let path = surface.last_path();
        assert_eq!(path.len(), 128);
        assert!(path.iter().all(|point| point.y == 50.0));
        assert!(matches!(surface.last_frame()[0], DrawCommand::ClearRect { width, height, .. } if width == 500.0 && height == 100.0));
    }

    #[test]
    fn cancel_stops_the_cycle() {
        let mut sampler = sampler_with(vec![0; 128]);
        let mut surface = RecordingSurface::new();
        sampler.start();
        sampler.on_refresh(&mut surface).unwrap();
        sampler.cancel();

        assert_eq!(sampler.on_refresh(&mut surface).unwrap(), Reschedule::Done);
        assert_eq!(surface.strokes(), 1);
    }

    #[test]
    fn buffer_keeps_the_bound_bin_count() {
        let mut sampler = sampler_with(vec![3; 128]);
        assert_eq!(sampler.magnitudes().len(), 128);
        sampler.start();
        sampler.on_refresh(&mut RecordingSurface::new()).unwrap();
        assert_eq!(sampler.magnitudes().len(), 128);
        assert_eq!(sampler.magnitudes()[5], 3);
    }

    #[test]
    fn cannot_start_without_an_analyser() {
        let mut sampler: VisualizationSampler<FixedAnalyser> =
            VisualizationSampler::new(VisualizerConfig::default());
        sampler.start();
        assert!(!sampler.is_running());

        let mut bound = sampler_with(vec![1; 128]);
        bound.start();
        bound.unbind();
        assert!(!bound.is_running());
        assert!(bound.magnitudes().is_empty());
    }
}
