//! FFT-based spectrum analyzer for real-time bar visualization

use crate::bins::FrequencyBinTable;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::profile::{Aggregation, ShapingProfile};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

/// Power of a bar with no FFT bins, also added before every logarithm
const POWER_EPSILON: f32 = 1e-9;

/// Weights of the 3-point neighbor average (left, center, right)
const NEIGHBOR_WEIGHTS: [f32; 3] = [0.25, 0.5, 0.25];

/// Per-bar magnitudes carried from one frame to the next
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarState {
    values: Vec<f32>,
}

impl BarState {
    /// All-zero state for `bar_count` bars
    pub fn new(bar_count: usize) -> Self {
        Self {
            values: vec![0.0; bar_count],
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest bar value (0.0 for an empty state)
    pub fn max(&self) -> f32 {
        self.values.iter().cloned().fold(0.0f32, f32::max)
    }

    pub fn reset(&mut self) {
        self.values.fill(0.0);
    }
}

/// Real-time FFT spectrum analyzer
///
/// Owns only precomputed tables and scratch buffers. The state that persists
/// between frames is the [`BarState`] passed to [`SpectrumAnalyzer::analyze`].
pub struct SpectrumAnalyzer {
    sample_rate: u32,
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    table: FrequencyBinTable,
    /// FFT bin indices falling inside each bar
    bar_bins: Vec<Range<usize>>,
    shaping: ShapingProfile,
    /// Pre-allocated buffers to avoid allocation in analyze()
    fft_buffer: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create a new spectrum analyzer
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let table = FrequencyBinTable::new(config.sample_rate, config.bar_count, &config.layout)?;
        let fft_size = config.block_size;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Symmetric Hann window
        let denom = (fft_size - 1) as f32;
        let window: Vec<f32> = (0..fft_size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / denom).cos())
            .collect();

        // Frequencies of the non-negative half of the spectrum
        let bin_count = fft_size / 2 + 1;
        let bin_width = config.sample_rate as f32 / fft_size as f32;
        let frequencies: Vec<f32> = (0..bin_count).map(|k| k as f32 * bin_width).collect();

        let bar_bins: Vec<Range<usize>> = (0..config.bar_count)
            .map(|bar| {
                let (low, high) = table.range(bar);
                let start = frequencies.partition_point(|&f| f < low);
                let end = frequencies.partition_point(|&f| f < high);
                start..end
            })
            .collect();

        let empty_bars = bar_bins.iter().filter(|bins| bins.is_empty()).count();
        debug!(fft_size, bin_width, empty_bars, "spectrum analyzer ready");

        let scratch_len = fft.get_inplace_scratch_len();

        Ok(Self {
            sample_rate: config.sample_rate,
            fft_size,
            fft,
            window,
            table,
            bar_bins,
            shaping: config.shaping,
            fft_buffer: vec![Complex::new(0.0, 0.0); fft_size],
            fft_scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0; bin_count],
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bar_count(&self) -> usize {
        self.bar_bins.len()
    }

    pub fn table(&self) -> &FrequencyBinTable {
        &self.table
    }

    /// FFT bin indices aggregated into a bar
    ///
    /// # Panics
    ///
    /// Panics if `bar >= self.bar_count()`.
    pub fn bins_for_bar(&self, bar: usize) -> Range<usize> {
        self.bar_bins[bar].clone()
    }

    /// Analyze one block of mono samples into `state`
    ///
    /// An absent or empty block leaves `state` untouched. Shorter blocks are
    /// zero-padded and longer ones truncated to the FFT size.
    pub fn analyze(&mut self, block: Option<&[f32]>, state: &mut BarState) {
        let samples = match block {
            Some(samples) if !samples.is_empty() => samples,
            _ => return,
        };

        let bar_count = self.bar_count();
        if state.values.len() != bar_count {
            state.values.resize(bar_count, 0.0);
        }

        self.compute_magnitudes(samples);

        for (i, bins) in self.bar_bins.iter().enumerate() {
            let t = self.table.position(i);
            let power = aggregate(&self.magnitudes[bins.clone()], self.shaping.aggregation);
            let raw = shape(&self.shaping, power, t);

            let smooth = self.shaping.smoothing.at(t);
            let prev = state.values[i];
            state.values[i] = prev * (1.0 - smooth) + raw * smooth;
        }

        if let Some(range) = self.shaping.neighbor_smoothing {
            // Both neighbors must exist
            let start = range.start.max(1);
            let end = range.end.min(bar_count - 1);
            let [left, center, right] = NEIGHBOR_WEIGHTS;
            for i in start..end {
                let v = &mut state.values;
                v[i] = v[i - 1] * left + v[i] * center + v[i + 1] * right;
            }
        }
    }

    /// Window, transform and take magnitudes of the first half of the spectrum
    fn compute_magnitudes(&mut self, samples: &[f32]) {
        let sample_count = samples.len().min(self.fft_size);
        for (i, &sample) in samples.iter().enumerate().take(sample_count) {
            self.fft_buffer[i] = Complex::new(sample * self.window[i], 0.0);
        }
        // Zero pad the rest
        for buf in self.fft_buffer.iter_mut().skip(sample_count) {
            *buf = Complex::new(0.0, 0.0);
        }

        self.fft.process_with_scratch(&mut self.fft_buffer, &mut self.fft_scratch);

        for (mag, bin) in self.magnitudes.iter_mut().zip(self.fft_buffer.iter()) {
            *mag = bin.norm();
        }
    }
}

/// Combine the magnitudes of the bins inside one bar
fn aggregate(magnitudes: &[f32], aggregation: Aggregation) -> f32 {
    if magnitudes.is_empty() {
        return POWER_EPSILON;
    }
    let n = magnitudes.len() as f32;
    match aggregation {
        Aggregation::Rms => (magnitudes.iter().map(|m| m * m).sum::<f32>() / n).sqrt(),
        Aggregation::Mean => magnitudes.iter().sum::<f32>() / n,
    }
}

/// Gate and shape one bar's power into its raw (unsmoothed) height
fn shape(profile: &ShapingProfile, power: f32, t: f32) -> f32 {
    let db = 20.0 * (power + POWER_EPSILON).log10();
    let effective_db = db - profile.noise_floor_db;

    if effective_db <= profile.gate_margin_db {
        return 0.0;
    }

    let norm = (effective_db / profile.noise_floor_db.abs()).clamp(0.0, 1.0);
    let k = profile.compression;
    let base = (norm * k).ln_1p() / k.ln_1p();

    let mut raw = base.powf(profile.exponent.at(t)) * profile.gain.at(t);
    if let Some(boost) = profile.low_boost {
        raw *= boost.factor(t);
    }
    raw
}
