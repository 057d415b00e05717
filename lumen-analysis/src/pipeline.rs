//! Per-frame analysis pipeline: sample buffer → analyzer → peak normalizer

use crate::bins::FrequencyBinTable;
use crate::buffer::SampleBuffer;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::peak::PeakNormalizer;
use crate::spectrum::{BarState, SpectrumAnalyzer};

/// Everything the frame loop needs to turn the latest audio into bar heights
pub struct SpectrumPipeline {
    config: AnalyzerConfig,
    analyzer: SpectrumAnalyzer,
    bars: BarState,
    normalizer: PeakNormalizer,
    block: Vec<f32>,
    display: Vec<f32>,
    last_generation: Option<u64>,
}

impl SpectrumPipeline {
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let analyzer = SpectrumAnalyzer::new(&config)?;
        Ok(Self {
            analyzer,
            bars: BarState::new(config.bar_count),
            normalizer: PeakNormalizer::new(config.peak),
            block: Vec::with_capacity(config.block_size),
            display: vec![0.0; config.bar_count],
            last_generation: None,
            config,
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn table(&self) -> &FrequencyBinTable {
        self.analyzer.table()
    }

    /// Un-normalized bar state from the last frame
    pub fn bars(&self) -> &BarState {
        &self.bars
    }

    /// Current normalization ceiling
    pub fn peak(&self) -> f32 {
        self.normalizer.peak()
    }

    /// Generation of the block analyzed by the last frame
    pub fn last_generation(&self) -> Option<u64> {
        self.last_generation
    }

    /// Display magnitudes (0.0 - 1.0) from the last frame
    pub fn display(&self) -> &[f32] {
        &self.display
    }

    /// Run one frame from the latest block in `buffer`
    ///
    /// When no block arrived since the previous frame the previous block is
    /// analyzed again. Before the first block ever arrives the bars are held.
    pub fn frame(&mut self, buffer: &SampleBuffer) -> &[f32] {
        let generation = buffer.read_into(&mut self.block);
        if generation.is_some() {
            self.last_generation = generation;
        }

        let block = self.last_generation.map(|_| self.block.as_slice());
        self.analyzer.analyze(block, &mut self.bars);
        self.normalizer.normalize(self.bars.values(), &mut self.display);
        &self.display
    }

    /// Run one frame from an explicit block (`None` holds the bars)
    pub fn process_block(&mut self, block: Option<&[f32]>) -> &[f32] {
        self.analyzer.analyze(block, &mut self.bars);
        self.normalizer.normalize(self.bars.values(), &mut self.display);
        &self.display
    }

    /// Clear bar state and peak ceiling
    pub fn reset(&mut self) {
        self.bars.reset();
        self.normalizer.reset();
        self.display.fill(0.0);
        self.last_generation = None;
    }
}
