//! Spectrum analysis for Lumen
//!
//! Turns blocks of mono audio into perceptually shaped, temporally smoothed
//! bar magnitudes, and normalizes them for display.

mod bins;
mod buffer;
mod config;
mod peak;
mod pipeline;
mod profile;
mod spectrum;

pub use bins::{BinLayout, FrequencyBinTable};
pub use buffer::{PublishError, SampleBuffer};
pub use config::{AnalyzerConfig, ConfigError, PeakConfig, DEFAULT_BAR_COUNT, DEFAULT_BLOCK_SIZE};
pub use peak::PeakNormalizer;
pub use pipeline::SpectrumPipeline;
pub use profile::{Aggregation, BandPair, LowBoost, NeighborSmoothing, Preset, ShapingProfile};
pub use spectrum::{BarState, SpectrumAnalyzer};
