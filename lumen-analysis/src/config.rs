//! Analyzer configuration and validation

use crate::bins::BinLayout;
use crate::profile::{Preset, ShapingProfile};
use thiserror::Error;

/// Default number of bars
pub const DEFAULT_BAR_COUNT: usize = 128;
/// Default analysis block size (samples)
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Configuration errors, fatal at construction time
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    InvalidSampleRate,
    #[error("bar count must be at least 2, got {0}")]
    TooFewBars(usize),
    #[error("block size must be at least 2 samples, got {0}")]
    BlockTooSmall(usize),
    #[error("minimum frequency must be positive, got {0} Hz")]
    InvalidMinFrequency(f32),
    #[error("linear ratio must be within 0.0..=1.0, got {0}")]
    InvalidLinearRatio(f32),
    #[error("minimum frequency {min} Hz must be below the linear cutoff {cutoff} Hz")]
    MinAboveCutoff { min: f32, cutoff: f32 },
    #[error("linear cutoff {cutoff} Hz must be below Nyquist ({nyquist} Hz)")]
    CutoffAboveNyquist { cutoff: f32, nyquist: f32 },
    #[error("bar {bar} collapses to zero width at {hz} Hz; use fewer bars or a wider range")]
    DegenerateBins { bar: usize, hz: f32 },
    #[error("smoothing coefficient must be within 0.0..=1.0, got {0}")]
    InvalidSmoothing(f32),
    #[error("peak decay must be within (0.0, 1.0], got {0}")]
    InvalidPeakDecay(f32),
    #[error("peak floor and seed must be positive, got floor {floor} and seed {seed}")]
    InvalidPeakFloor { floor: f32, seed: f32 },
}

/// Peak tracker settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakConfig {
    /// Initial ceiling
    pub seed: f32,
    /// Per-frame multiplicative decay
    pub decay: f32,
    /// Lowest allowed ceiling
    pub floor: f32,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            seed: 0.15,
            decay: 0.985,
            floor: 0.1,
        }
    }
}

/// Complete static configuration of the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    pub sample_rate: u32,
    pub bar_count: usize,
    pub block_size: usize,
    pub layout: BinLayout,
    pub shaping: ShapingProfile,
    pub peak: PeakConfig,
}

impl AnalyzerConfig {
    /// Default bar count and block size with the given preset
    pub fn new(sample_rate: u32, preset: Preset) -> Self {
        Self {
            sample_rate,
            bar_count: DEFAULT_BAR_COUNT,
            block_size: DEFAULT_BLOCK_SIZE,
            layout: preset.layout(),
            shaping: preset.profile(),
            peak: PeakConfig::default(),
        }
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// Check every constraint the pipeline relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate(self.sample_rate, self.bar_count)?;

        if self.block_size < 2 {
            return Err(ConfigError::BlockTooSmall(self.block_size));
        }

        let smoothing = self.shaping.smoothing;
        for s in [smoothing.low, smoothing.high] {
            if !(0.0..=1.0).contains(&s) {
                return Err(ConfigError::InvalidSmoothing(s));
            }
        }

        let peak = self.peak;
        if !(peak.decay > 0.0 && peak.decay <= 1.0) {
            return Err(ConfigError::InvalidPeakDecay(peak.decay));
        }
        if !(peak.floor > 0.0 && peak.seed > 0.0) {
            return Err(ConfigError::InvalidPeakFloor {
                floor: peak.floor,
                seed: peak.seed,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        for preset in Preset::ALL {
            let config = AnalyzerConfig::new(48000, preset);
            assert_eq!(config.validate(), Ok(()), "preset {}", preset.name());
        }
    }

    #[test]
    fn test_rejects_small_block() {
        let config = AnalyzerConfig {
            block_size: 1,
            ..AnalyzerConfig::new(44100, Preset::Balanced)
        };
        assert_eq!(config.validate(), Err(ConfigError::BlockTooSmall(1)));
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let mut config = AnalyzerConfig::new(44100, Preset::Balanced);
        config.shaping.smoothing.low = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSmoothing(1.5)));
    }

    #[test]
    fn test_rejects_bad_peak_settings() {
        let mut config = AnalyzerConfig::new(44100, Preset::Balanced);
        config.peak.decay = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeakDecay(_))
        ));

        let mut config = AnalyzerConfig::new(44100, Preset::Balanced);
        config.peak.floor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeakFloor { .. })
        ));
    }

    #[test]
    fn test_low_sample_rate_rejects_default_cutoff() {
        // Nyquist of 1200 Hz leaves no room above the smooth preset's cutoff
        let config = AnalyzerConfig::new(2400, Preset::Smooth);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CutoffAboveNyquist { .. })
        ));
    }
}
