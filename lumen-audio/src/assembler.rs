//! Interleaved-to-mono block assembly for the capture callback

use lumen_analysis::SampleBuffer;
use std::sync::Arc;

/// Collects interleaved device samples into fixed-size mono blocks
///
/// Channels are averaged into one mono sample per frame. Each time
/// `block_size` mono samples are collected the block is published to the
/// [`SampleBuffer`] and collection starts over. No allocation after `new`.
pub struct BlockAssembler {
    buffer: Arc<SampleBuffer>,
    channels: usize,
    block: Vec<f32>,
    filled: usize,
    // Partial frame carried across callbacks
    frame_sum: f32,
    frame_pos: usize,
    dropped: u64,
}

impl BlockAssembler {
    pub fn new(buffer: Arc<SampleBuffer>, channels: u16) -> Self {
        let block_size = buffer.block_size();
        Self {
            buffer,
            channels: channels.max(1) as usize,
            block: vec![0.0; block_size],
            filled: 0,
            frame_sum: 0.0,
            frame_pos: 0,
            dropped: 0,
        }
    }

    /// Feed interleaved samples as delivered by the device
    pub fn push_interleaved<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = f32>,
    {
        for sample in samples {
            self.frame_sum += sample;
            self.frame_pos += 1;
            if self.frame_pos == self.channels {
                let mono = self.frame_sum / self.channels as f32;
                self.frame_sum = 0.0;
                self.frame_pos = 0;
                self.push_mono(mono);
            }
        }
    }

    /// Blocks that could not be published because the reader held the buffer
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    #[inline]
    fn push_mono(&mut self, sample: f32) {
        if self.block.is_empty() {
            return;
        }
        self.block[self.filled] = sample;
        self.filled += 1;
        if self.filled == self.block.len() {
            if self.buffer.publish(&mut self.block).is_err() {
                self.dropped += 1;
            }
            self.filled = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let buffer = SampleBuffer::new(4);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 1);

        assembler.push_interleaved([0.1, 0.2, 0.3]);
        assert_eq!(buffer.generation(), 0);

        assembler.push_interleaved([0.4, 0.5]);
        assert_eq!(buffer.generation(), 1);

        let mut out = Vec::new();
        buffer.read_into(&mut out);
        assert_eq!(out, vec![0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_stereo_is_averaged() {
        let buffer = SampleBuffer::new(2);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 2);

        assembler.push_interleaved([1.0, 0.0, -0.5, -0.5]);

        let mut out = Vec::new();
        assert_eq!(buffer.read_into(&mut out), Some(1));
        assert_eq!(out, vec![0.5, -0.5]);
    }

    #[test]
    fn test_frame_split_across_callbacks() {
        let buffer = SampleBuffer::new(2);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 3);

        assembler.push_interleaved([0.3, 0.3]);
        assembler.push_interleaved([0.3, 0.6, 0.6]);
        assembler.push_interleaved([0.6]);

        let mut out = Vec::new();
        assert_eq!(buffer.read_into(&mut out), Some(1));
        assert!((out[0] - 0.3).abs() < 1e-6);
        assert!((out[1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_consecutive_blocks_do_not_overlap() {
        let buffer = SampleBuffer::new(3);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 1);

        assembler.push_interleaved((1..=7).map(|v| v as f32));
        assert_eq!(buffer.generation(), 2);

        let mut out = Vec::new();
        buffer.read_into(&mut out);
        assert_eq!(out, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_zero_block_size_never_publishes() {
        let buffer = SampleBuffer::new(0);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 2);
        assembler.push_interleaved([0.1, 0.2, 0.3, 0.4]);
        assert_eq!(buffer.generation(), 0);
        assert_eq!(assembler.dropped(), 0);
    }

    #[test]
    fn test_zero_channels_treated_as_mono() {
        let buffer = SampleBuffer::new(1);
        let mut assembler = BlockAssembler::new(Arc::clone(&buffer), 0);
        assembler.push_interleaved([0.25]);
        assert_eq!(buffer.generation(), 1);
        assert_eq!(assembler.dropped(), 0);
    }
}
