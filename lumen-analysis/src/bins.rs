//! Hybrid linear/logarithmic frequency bin table
//!
//! The lower part of the spectrum is split into evenly spaced bars up to a
//! cutoff, the rest is split logarithmically up to Nyquist. Low frequencies get
//! more resolution than a pure log layout would give them without wasting half
//! the bars on the top octave.

use crate::config::ConfigError;
use tracing::debug;

/// Frequency layout parameters for the bin table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLayout {
    /// Lowest edge (Hz)
    pub min_freq: f32,
    /// Join between the linear and logarithmic segments (Hz)
    pub linear_cutoff: f32,
    /// Fraction of bars in the linear segment (0.0 - 1.0)
    pub linear_ratio: f32,
}

impl Default for BinLayout {
    fn default() -> Self {
        Self {
            min_freq: 20.0,
            linear_cutoff: 800.0,
            linear_ratio: 0.5,
        }
    }
}

impl BinLayout {
    /// Check the layout against a sample rate and bar count
    pub fn validate(&self, sample_rate: u32, bar_count: usize) -> Result<(), ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if bar_count < 2 {
            return Err(ConfigError::TooFewBars(bar_count));
        }
        if !(self.min_freq > 0.0) {
            return Err(ConfigError::InvalidMinFrequency(self.min_freq));
        }
        if !(0.0..=1.0).contains(&self.linear_ratio) {
            return Err(ConfigError::InvalidLinearRatio(self.linear_ratio));
        }
        if self.min_freq >= self.linear_cutoff {
            return Err(ConfigError::MinAboveCutoff {
                min: self.min_freq,
                cutoff: self.linear_cutoff,
            });
        }
        let nyquist = sample_rate as f32 / 2.0;
        if self.linear_cutoff >= nyquist {
            return Err(ConfigError::CutoffAboveNyquist {
                cutoff: self.linear_cutoff,
                nyquist,
            });
        }
        Ok(())
    }
}

/// Precomputed bar edges, `bar_count + 1` strictly increasing frequencies
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyBinTable {
    edges: Vec<f32>,
}

impl FrequencyBinTable {
    /// Build the table for a sample rate and bar count
    pub fn new(sample_rate: u32, bar_count: usize, layout: &BinLayout) -> Result<Self, ConfigError> {
        layout.validate(sample_rate, bar_count)?;

        let linear_bins = (bar_count as f64 * layout.linear_ratio as f64).floor() as usize;
        let log_bins = bar_count - linear_bins;

        let min = layout.min_freq as f64;
        let cutoff = layout.linear_cutoff as f64;
        let nyquist = sample_rate as f64 / 2.0;

        let mut edges = Vec::with_capacity(bar_count + 1);

        // Linear segment without its last point, which the log segment starts on
        for i in 0..linear_bins {
            let t = i as f64 / linear_bins as f64;
            edges.push((min + (cutoff - min) * t) as f32);
        }

        let log_min = cutoff.log10();
        let log_max = nyquist.log10();
        // Ends pinned to exactly the cutoff and Nyquist
        for i in 0..=log_bins {
            let edge = if i == 0 {
                cutoff
            } else if i == log_bins {
                nyquist
            } else {
                let t = i as f64 / log_bins as f64;
                10f64.powf(log_min + (log_max - log_min) * t)
            };
            edges.push(edge as f32);
        }

        // Narrow ranges with many bars can round adjacent edges together in f32
        if let Some(bar) = edges.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::DegenerateBins {
                bar,
                hz: edges[bar],
            });
        }

        debug!(sample_rate, bar_count, linear_bins, log_bins, "built frequency bin table");

        Ok(Self { edges })
    }

    /// All edges in Hz
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    pub fn bar_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// `[low, high)` frequency range of a bar
    ///
    /// # Panics
    ///
    /// Panics if `bar >= self.bar_count()`.
    pub fn range(&self, bar: usize) -> (f32, f32) {
        (self.edges[bar], self.edges[bar + 1])
    }

    /// Bar whose range contains `hz`, if any
    pub fn bar_for_frequency(&self, hz: f32) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if hz < first || hz >= last {
            return None;
        }
        Some(self.edges.partition_point(|&edge| edge <= hz) - 1)
    }

    /// Normalized position of a bar (0.0 for the lowest, 1.0 for the highest)
    #[inline]
    pub fn position(&self, bar: usize) -> f32 {
        bar as f32 / (self.bar_count() - 1) as f32
    }
}
