//! Additive/spectral synthesizer.
//!
//! Holds a frequency-domain partial table, converts it to one time-domain
//! cycle per block with an inverse FFT, and pitch-shifts that cycle into the
//! output stream with the windowed-sinc resampler. The playback phase is
//! carried across blocks, so the loop stays seamless at any block size.

use std::sync::Arc;

use crate::block::{AudioBlock, BlockPool, BlockSource, BLOCK_SAMPLES};
use crate::resampler::pitch_shift_single_cycle;
use crate::spectrum::{PartialStore, SpectralTransform};
use crate::utils::one_pole;
use crate::{NYQUIST, SAMPLE_RATE};

#[allow(unused_imports)]
use num_traits::float::Float;

/// Length of the partial table: packed frequency-domain slots.
pub const PARTIAL_TABLE_SIZE: usize = 4096;

/// Length of the time-domain signal table.
pub const SIGNAL_TABLE_SIZE: usize = PARTIAL_TABLE_SIZE;

/// Pitch of the raw signal table played back at the native sample rate.
pub const FUNDAMENTAL_FREQUENCY: f32 = SAMPLE_RATE / SIGNAL_TABLE_SIZE as f32;

// Transform sizes with a supported plan. Anything else is a configuration
// error, caught here instead of at runtime.
const _: () = assert!(
    PARTIAL_TABLE_SIZE == 256
        || PARTIAL_TABLE_SIZE == 1024
        || PARTIAL_TABLE_SIZE == 2048
        || PARTIAL_TABLE_SIZE == 4096,
    "unsupported partial table size",
);

/// Per-block smoothing coefficient for the target frequency.
const FREQUENCY_SLEW: f32 = 0.5;

/// The spectral synth.
#[derive(Debug)]
pub struct AdditiveSynth {
    partials: Arc<PartialStore>,
    working: Box<[f32; PARTIAL_TABLE_SIZE]>,
    signal: Box<[f32; SIGNAL_TABLE_SIZE]>,
    transform: SpectralTransform,
    playback_phase: f32,
    target_frequency: f32,
    frequency: f32,
}

impl Default for AdditiveSynth {
    fn default() -> Self {
        Self::new()
    }
}

impl AdditiveSynth {
    pub fn new() -> Self {
        Self {
            partials: Arc::new(PartialStore::new(PARTIAL_TABLE_SIZE)),
            working: Box::new([0.0; PARTIAL_TABLE_SIZE]),
            signal: Box::new([0.0; SIGNAL_TABLE_SIZE]),
            transform: SpectralTransform::new(PARTIAL_TABLE_SIZE),
            playback_phase: 0.0,
            target_frequency: 440.0,
            frequency: 440.0,
        }
    }

    /// Handle to the partial table, for the editor side.
    pub fn partials(&self) -> Arc<PartialStore> {
        Arc::clone(&self.partials)
    }

    /// The most recently rendered time-domain cycle.
    pub fn signal(&self) -> &[f32] {
        &self.signal[..]
    }

    /// Zero the whole partial table.
    pub fn clear_partials(&self) {
        self.partials.clear();
    }

    /// Set the target playback pitch in Hz.
    pub fn set_frequency(&mut self, f: f32) {
        self.target_frequency = f.clamp(1.0, NYQUIST);
    }

    /// Set the target pitch from a MIDI note number.
    pub fn note_on(&mut self, note: u8) {
        self.set_frequency(note_to_frequency(note));
    }

    /// Snapshot the partial table and rebuild the signal table from it.
    pub fn render_signal(&mut self) {
        self.partials.snapshot_into(&mut self.working[..]);
        self.transform
            .process(&self.working[..], &mut self.signal[..]);
    }

    /// Render one block of denormalized samples.
    pub fn render(&mut self, out: &mut [f32]) {
        self.render_signal();

        one_pole(&mut self.frequency, self.target_frequency, FREQUENCY_SLEW);

        self.playback_phase = pitch_shift_single_cycle(
            &self.signal[..],
            out,
            SAMPLE_RATE,
            self.frequency,
            self.playback_phase,
        );
    }
}

impl BlockSource for AdditiveSynth {
    fn produce_block(&mut self, pool: &mut BlockPool) -> Option<AudioBlock> {
        let mut block = pool.allocate()?;

        let mut out = [0.0; BLOCK_SAMPLES];
        self.render(&mut out);
        block.write_from(&out);

        Some(block)
    }
}

/// Equal-tempered frequency of a MIDI note.
pub fn note_to_frequency(note: u8) -> f32 {
    440.0 * ((note as f32 - 69.0) / 12.0).exp2()
}
