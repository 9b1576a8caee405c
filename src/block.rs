//! Fixed-size PCM blocks and the pool they are drawn from.
//!
//! Models the contract the external audio graph imposes on every synth:
//! one block per scheduler period, or nothing at all when the pool is dry.

use crate::utils::clip_16;

/// Samples per audio block.
pub const BLOCK_SAMPLES: usize = 128;

/// Headroom constant applied when denormalizing float signals to 16-bit PCM.
pub const PCM_SCALE: f32 = 32000.0;

/// One block of signed 16-bit PCM.
#[derive(Debug)]
pub struct AudioBlock {
    data: Box<[i16; BLOCK_SAMPLES]>,
}

impl AudioBlock {
    pub fn data(&self) -> &[i16; BLOCK_SAMPLES] {
        &self.data
    }

    /// Denormalize a float signal into the block, scaling by [`PCM_SCALE`].
    pub fn write_from(&mut self, signal: &[f32]) {
        for (sample, value) in self.data.iter_mut().zip(signal.iter()) {
            *sample = clip_16((value * PCM_SCALE) as i32) as i16;
        }
    }
}

/// Fixed-capacity pool of audio blocks.
///
/// All block storage is allocated up front; `allocate` on an exhausted pool
/// returns `None` and the caller skips the cycle.
#[derive(Debug)]
pub struct BlockPool {
    free: Vec<Box<[i16; BLOCK_SAMPLES]>>,
}

impl BlockPool {
    pub fn new(capacity: usize) -> Self {
        let mut free = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            free.push(Box::new([0; BLOCK_SAMPLES]));
        }
        Self { free }
    }

    pub fn allocate(&mut self) -> Option<AudioBlock> {
        self.free.pop().map(|data| AudioBlock { data })
    }

    pub fn release(&mut self, block: AudioBlock) {
        self.free.push(block.data);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// A producer of audio blocks, invoked once per scheduler period.
pub trait BlockSource {
    /// Produce one block, or `None` when the pool is exhausted.
    fn produce_block(&mut self, pool: &mut BlockPool) -> Option<AudioBlock>;
}
