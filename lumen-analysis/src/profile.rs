//! Bar shaping profiles and presets
//!
//! Every constant the analyzer uses to turn bin power into a bar height lives
//! in a [`ShapingProfile`]. Presets are just different values of it.

use crate::bins::BinLayout;

/// A value that interpolates linearly from the lowest bar to the highest bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPair {
    /// Value at bar position 0.0 (lowest frequency)
    pub low: f32,
    /// Value at bar position 1.0 (highest frequency)
    pub high: f32,
}

impl BandPair {
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Value at normalized bar position `t` (0.0 - 1.0)
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        self.low * (1.0 - t) + self.high * t
    }
}

/// How the magnitudes of the FFT bins inside one bar are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Root-mean-square of the bin magnitudes
    #[default]
    Rms,
    /// Arithmetic mean of the bin magnitudes
    Mean,
}

/// Extra linear gain on the lowest bars
///
/// Bars with position `t < end` are multiplied by a factor that falls from
/// `max` at `t = 0` to 1.0 at `t = end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowBoost {
    pub max: f32,
    pub end: f32,
}

impl LowBoost {
    /// Boost factor for bar position `t`
    #[inline]
    pub fn factor(&self, t: f32) -> f32 {
        if t < self.end {
            let ratio = 1.0 - t / self.end;
            1.0 + ratio * (self.max - 1.0)
        } else {
            1.0
        }
    }
}

/// 3-point neighbor averaging over a range of bar indices
///
/// `start..end` is half-open. The analyzer clamps it so both neighbors of
/// every smoothed bar exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborSmoothing {
    pub start: usize,
    pub end: usize,
}

/// All tunable constants of the bar shaping stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapingProfile {
    pub aggregation: Aggregation,
    /// Level (dB) treated as silence
    pub noise_floor_db: f32,
    /// Bars less than this many dB above the floor are gated to zero
    pub gate_margin_db: f32,
    /// Log compression constant `K` in `ln(1 + x*K) / ln(1 + K)`
    pub compression: f32,
    /// Shaping exponent (low bars more linear, high bars more aggressive)
    pub exponent: BandPair,
    /// Output gain (compensates high-frequency roll-off)
    pub gain: BandPair,
    /// Weight on the new value in the per-bar moving average
    pub smoothing: BandPair,
    pub low_boost: Option<LowBoost>,
    pub neighbor_smoothing: Option<NeighborSmoothing>,
}

impl ShapingProfile {
    /// RMS aggregation with low-end boost and neighbor smoothing
    pub const fn balanced() -> Self {
        Self {
            aggregation: Aggregation::Rms,
            noise_floor_db: -65.0,
            gate_margin_db: 8.0,
            compression: 8.0,
            exponent: BandPair::new(1.6, 3.2),
            gain: BandPair::new(1.0, 2.2),
            smoothing: BandPair::new(0.18, 0.03),
            low_boost: Some(LowBoost { max: 1.5, end: 0.35 }),
            neighbor_smoothing: Some(NeighborSmoothing { start: 1, end: 12 }),
        }
    }

    /// Mean aggregation, faster low bars, no boost or neighbor smoothing
    pub const fn smooth() -> Self {
        Self {
            aggregation: Aggregation::Mean,
            noise_floor_db: -65.0,
            gate_margin_db: 8.0,
            compression: 8.0,
            exponent: BandPair::new(1.4, 2.6),
            gain: BandPair::new(1.0, 1.8),
            smoothing: BandPair::new(0.30, 0.03),
            low_boost: None,
            neighbor_smoothing: None,
        }
    }
}

impl Default for ShapingProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Named tuning presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    #[default]
    Balanced,
    Smooth,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Balanced, Preset::Smooth];

    /// Get display name
    pub fn name(self) -> &'static str {
        match self {
            Preset::Balanced => "balanced",
            Preset::Smooth => "smooth",
        }
    }

    /// Parse a preset name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Cycle to next preset
    pub fn cycle(self) -> Self {
        match self {
            Preset::Balanced => Preset::Smooth,
            Preset::Smooth => Preset::Balanced,
        }
    }

    pub fn profile(self) -> ShapingProfile {
        match self {
            Preset::Balanced => ShapingProfile::balanced(),
            Preset::Smooth => ShapingProfile::smooth(),
        }
    }

    /// Frequency layout that goes with this preset
    pub fn layout(self) -> BinLayout {
        match self {
            Preset::Balanced => BinLayout {
                min_freq: 20.0,
                linear_cutoff: 800.0,
                linear_ratio: 0.5,
            },
            Preset::Smooth => BinLayout {
                min_freq: 20.0,
                linear_cutoff: 1200.0,
                linear_ratio: 0.4,
            },
        }
    }
}
