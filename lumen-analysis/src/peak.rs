//! Auto-gain peak normalizer
//!
//! Tracks a slowly decaying ceiling over the bar magnitudes. Loud passages lift
//! the ceiling immediately, quiet passages let it drift down over many frames.

use crate::config::PeakConfig;

/// Decaying maximum used to scale bars into 0.0 - 1.0
#[derive(Debug, Clone)]
pub struct PeakNormalizer {
    config: PeakConfig,
    peak: f32,
}

impl PeakNormalizer {
    pub fn new(config: PeakConfig) -> Self {
        Self {
            peak: config.seed.max(config.floor),
            config,
        }
    }

    /// Current ceiling
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Fold one frame's bars into the ceiling and return the new ceiling
    pub fn update(&mut self, bars: &[f32]) -> f32 {
        let current = bars.iter().cloned().fold(0.0f32, f32::max);
        self.peak = current
            .max(self.peak * self.config.decay)
            .max(self.config.floor);
        self.peak
    }

    /// Update the ceiling and write `bars / peak` clamped to 0.0 - 1.0 into `out`
    pub fn normalize(&mut self, bars: &[f32], out: &mut Vec<f32>) {
        let peak = self.update(bars);
        out.clear();
        out.extend(bars.iter().map(|&bar| (bar / peak).clamp(0.0, 1.0)));
    }

    /// Return to the seed ceiling
    pub fn reset(&mut self) {
        self.peak = self.config.seed.max(self.config.floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_peak_is_taken_exactly() {
        let mut normalizer = PeakNormalizer::new(PeakConfig::default());
        assert_eq!(normalizer.peak(), 0.15);

        assert_eq!(normalizer.update(&[0.2, 1.7, 0.4]), 1.7);
        assert_eq!(normalizer.peak(), 1.7);
    }

    #[test]
    fn test_decay_without_new_peaks() {
        let config = PeakConfig::default();
        let mut normalizer = PeakNormalizer::new(config);
        normalizer.update(&[2.0]);

        let mut previous = normalizer.peak();
        for frame in 0..2000 {
            let peak = normalizer.update(&[0.0; 8]);
            if previous * config.decay > config.floor {
                assert!(peak < previous, "frame {} did not decay", frame);
                assert!((peak - previous * config.decay).abs() < 1e-6);
            } else {
                assert_eq!(peak, config.floor);
            }
            assert!(peak >= config.floor);
            previous = peak;
        }
        assert_eq!(normalizer.peak(), config.floor);
    }

    #[test]
    fn test_output_is_bounded() {
        let mut normalizer = PeakNormalizer::new(PeakConfig::default());
        let mut out = Vec::new();

        for bars in [
            vec![0.0, 0.05, 0.02],
            vec![3.0, 1.5, 0.0],
            vec![0.5, 0.1, 0.2],
            vec![-0.5, 10.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ] {
            normalizer.normalize(&bars, &mut out);
            assert_eq!(out.len(), bars.len());
            for &v in &out {
                assert!((0.0..=1.0).contains(&v), "out of range: {}", v);
            }
        }
    }

    #[test]
    fn test_floor_limits_quiet_gain() {
        let mut normalizer = PeakNormalizer::new(PeakConfig::default());
        let mut out = Vec::new();

        for _ in 0..1000 {
            normalizer.normalize(&[0.01, 0.0], &mut out);
        }
        // 0.01 against the 0.1 floor, not blown up to full scale
        assert!((out[0] - 0.1).abs() < 1e-6, "got {}", out[0]);
    }

    #[test]
    fn test_loudest_bar_reaches_full_scale() {
        let mut normalizer = PeakNormalizer::new(PeakConfig::default());
        let mut out = Vec::new();
        normalizer.normalize(&[0.5, 2.0, 1.0], &mut out);
        assert_eq!(out, vec![0.25, 1.0, 0.5]);
    }

    #[test]
    fn test_reset() {
        let mut normalizer = PeakNormalizer::new(PeakConfig::default());
        normalizer.update(&[5.0]);
        normalizer.reset();
        assert_eq!(normalizer.peak(), 0.15);
    }
}
