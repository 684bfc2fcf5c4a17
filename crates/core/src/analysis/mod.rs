use std::{f32::consts::PI, fmt, sync::Arc};

use realfft::{num_complex::Complex32, RealFftPlanner, RealToComplex};

use crate::{PlayerError, Result};

/// Browser analysis node defaults, reproduced for output parity.
pub const DEFAULT_SMOOTHING: f32 = 0.8;
pub const DEFAULT_MIN_DECIBELS: f32 = -100.0;
pub const DEFAULT_MAX_DECIBELS: f32 = -30.0;

const BLACKMAN_ALPHA: f32 = 0.16;

/// Source of frequency-magnitude snapshots.
pub trait FrequencyAnalyser {
    /// Transform window size in samples.
    fn fft_size(&self) -> usize;

    /// Number of frequency bins in each snapshot, half the window size.
    fn bin_count(&self) -> usize {
        self.fft_size() / 2
    }

    /// Writes the current magnitudes, scaled to `0..=255`, into `out`.
    /// At most `min(out.len(), bin_count())` entries are written.
    fn byte_frequency_data(&mut self, out: &mut [u8]) -> Result<()>;
}

/// Software analysis node over pushed PCM samples.
///
/// Keeps the most recent `fft_size` samples, and on every read windows them
/// (Blackman), transforms them, smooths the magnitudes against the previous
/// read and maps the decibel range onto bytes.
pub struct SpectrumAnalyser {
    fft_size: usize,
    smoothing: f32,
    min_decibels: f32,
    max_decibels: f32,
    history: Vec<f32>,
    window: Vec<f32>,
    smoothed: Vec<f32>,
    fft: FftResources,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize) -> Result<Self> {
        if fft_size < 32 || !fft_size.is_power_of_two() {
            return Err(PlayerError::InvalidInput(
                "analysis window must be a power of two of at least 32 samples",
            ));
        }

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(fft_size);
        let fft = FftResources {
            scratch: plan.make_scratch_vec(),
            spectrum: plan.make_output_vec(),
            input: plan.make_input_vec(),
            plan,
        };

        Ok(Self {
            fft_size,
            smoothing: DEFAULT_SMOOTHING,
            min_decibels: DEFAULT_MIN_DECIBELS,
            max_decibels: DEFAULT_MAX_DECIBELS,
            history: vec![0.0; fft_size],
            window: (0..fft_size).map(|i| blackman_value(i, fft_size)).collect(),
            smoothed: vec![0.0; fft_size / 2],
            fft,
        })
    }

    /// Appends samples, discarding the oldest ones beyond the window.
    pub fn push_samples(&mut self, samples: &[f32]) {
        let len = self.fft_size;
        if samples.len() >= len {
            self.history
                .copy_from_slice(&samples[samples.len() - len..]);
            return;
        }

        self.history.copy_within(samples.len().., 0);
        self.history[len - samples.len()..].copy_from_slice(samples);
    }

    fn refresh_magnitudes(&mut self) -> Result<()> {
        let fft = &mut self.fft;
        for ((slot, sample), weight) in fft.input.iter_mut().zip(&self.history).zip(&self.window) {
            *slot = sample * weight;
        }

        fft.plan
            .process_with_scratch(&mut fft.input, &mut fft.spectrum, &mut fft.scratch)
            .map_err(|err| PlayerError::msg(format!("spectrum transform failed: {err}")))?;

        let scale = 1.0 / self.fft_size as f32;
        for (smoothed, bin) in self.smoothed.iter_mut().zip(&fft.spectrum) {
            let magnitude = bin.norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;
        }
        Ok(())
    }

    fn to_byte(&self, magnitude: f32) -> u8 {
        if magnitude <= 0.0 {
            return 0;
        }
        let decibels = 20.0 * magnitude.log10();
        let range = self.max_decibels - self.min_decibels;
        let scaled = 255.0 * (decibels - self.min_decibels) / range;
        scaled.clamp(0.0, 255.0) as u8
    }
}

impl FrequencyAnalyser for SpectrumAnalyser {
    fn fft_size(&self) -> usize {
        self.fft_size
    }

    fn byte_frequency_data(&mut self, out: &mut [u8]) -> Result<()> {
        self.refresh_magnitudes()?;
        for (slot, magnitude) in out.iter_mut().zip(&self.smoothed) {
            *slot = self.to_byte(*magnitude);
        }
        Ok(())
    }
}

struct FftResources {
    plan: Arc<dyn RealToComplex<f32>>,
    scratch: Vec<Complex32>,
    spectrum: Vec<Complex32>,
    input: Vec<f32>,
}

impl fmt::Debug for SpectrumAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyser")
            .field("fft_size", &self.fft_size)
            .field("smoothing", &self.smoothing)
            .field("min_decibels", &self.min_decibels)
            .field("max_decibels", &self.max_decibels)
            .finish()
    }
}

fn blackman_value(index: usize, len: usize) -> f32 {
    let a0 = (1.0 - BLACKMAN_ALPHA) * 0.5;
    let a1 = 0.5;
    let a2 = BLACKMAN_ALPHA * 0.5;
    let phase = 2.0 * PI * index as f32 / len as f32;
    a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos()
}
