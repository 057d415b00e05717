//! Latest-block sample buffer shared by the capture callback and the frame loop
//!
//! The writer swaps a whole block in, the reader copies a whole block out, both
//! under the same short lock. A reader never sees half of one block and half of
//! the next.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Why a block was not published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("block has {got} samples, expected {expected}")]
    WrongLength { expected: usize, got: usize },
    /// The reader held the lock; the block is dropped rather than waited on
    #[error("sample buffer busy")]
    Contended,
}

/// Single-slot holder of the most recent complete mono block
#[derive(Debug)]
pub struct SampleBuffer {
    block_size: usize,
    slot: Mutex<Vec<f32>>,
    generation: AtomicU64,
}

impl SampleBuffer {
    pub fn new(block_size: usize) -> Arc<Self> {
        Arc::new(Self {
            block_size,
            slot: Mutex::new(vec![0.0; block_size]),
            generation: AtomicU64::new(0),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks published so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Swap `block` in as the latest block
    ///
    /// On success `block` holds the previous resident buffer, ready to be
    /// refilled. Never blocks, so it is safe to call from an audio callback.
    pub fn publish(&self, block: &mut Vec<f32>) -> Result<(), PublishError> {
        if block.len() != self.block_size {
            return Err(PublishError::WrongLength {
                expected: self.block_size,
                got: block.len(),
            });
        }

        let mut slot = self.slot.try_lock().ok_or(PublishError::Contended)?;
        std::mem::swap(&mut *slot, block);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Copy the latest block into `out` and return its generation
    ///
    /// Returns `None` (leaving `out` alone) until the first block arrives.
    pub fn read_into(&self, out: &mut Vec<f32>) -> Option<u64> {
        let slot = self.slot.lock();
        let generation = self.generation.load(Ordering::Acquire);
        if generation == 0 {
            return None;
        }
        out.clear();
        out.extend_from_slice(&slot);
        Some(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_until_first_publish() {
        let buffer = SampleBuffer::new(4);
        let mut out = vec![9.0];
        assert_eq!(buffer.read_into(&mut out), None);
        assert_eq!(out, vec![9.0]);
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn test_publish_swaps_blocks() {
        let buffer = SampleBuffer::new(4);
        let mut block = vec![1.0, 2.0, 3.0, 4.0];
        buffer.publish(&mut block).unwrap();

        // Caller gets the old resident buffer back for reuse
        assert_eq!(block, vec![0.0; 4]);

        let mut out = Vec::new();
        assert_eq!(buffer.read_into(&mut out), Some(1));
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);

        // Reading again without a publish returns the same block
        assert_eq!(buffer.read_into(&mut out), Some(1));
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let buffer = SampleBuffer::new(4);
        let mut block = vec![1.0; 3];
        assert_eq!(
            buffer.publish(&mut block),
            Err(PublishError::WrongLength { expected: 4, got: 3 })
        );
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn test_contended_publish_is_dropped() {
        let buffer = SampleBuffer::new(2);
        let guard = buffer.slot.lock();
        let mut block = vec![1.0, 1.0];
        assert_eq!(buffer.publish(&mut block), Err(PublishError::Contended));
        drop(guard);

        assert_eq!(buffer.generation(), 0);
        assert_eq!(block, vec![1.0, 1.0]);
        assert!(buffer.publish(&mut block).is_ok());
    }

    #[test]
    fn test_reader_never_sees_torn_block() {
        let buffer = SampleBuffer::new(256);
        let writer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                let mut block = vec![0.0; 256];
                for value in 1..=2000 {
                    block.fill(value as f32);
                    let _ = buffer.publish(&mut block);
                }
            })
        };

        let mut out = Vec::new();
        for _ in 0..2000 {
            if buffer.read_into(&mut out).is_some() {
                let first = out[0];
                assert!(out.iter().all(|&v| v == first), "torn block");
            }
        }
        writer.join().unwrap();
    }
}
