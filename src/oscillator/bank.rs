//! Bank-of-partials oscillator.
//!
//! A fixed number of banks, each a set of harmonically related 32-bit phase
//! accumulators, summed through a shared amplitude/phase-offset voice
//! profile. Harmonics above the Nyquist limit are excluded outright rather
//! than attenuated.

use crate::block::{AudioBlock, BlockPool, BlockSource, BLOCK_SAMPLES};
use crate::interpolator::SequenceInterpolator;
use crate::oscillator::fast_sine::sine_f32;
use crate::{NYQUIST, PHASE_CONSTANT};

/// Number of oscillator banks.
pub const NUM_BANKS: usize = 4;

/// Harmonics per bank.
pub const BANK_SIZE: usize = 16;

/// Keyframes in the voice animation sequence.
pub const NUM_CONTROL_POINTS: usize = 5;

/// Length of a keyframe vector: amplitudes followed by phase offsets.
pub const VOICE_VECTOR: usize = 2 * BANK_SIZE;

/// Shared harmonic profile applied to every active bank.
#[derive(Debug, Default)]
pub struct VoicePrototype {
    pub amplitudes: [f32; BANK_SIZE],
    pub phase_offsets: [u32; BANK_SIZE],
}

impl VoicePrototype {
    /// Apply a keyframe vector: amplitudes first, then phase offsets as
    /// cycle fractions.
    pub fn apply_frame(&mut self, frame: &[f32; VOICE_VECTOR]) {
        self.amplitudes.copy_from_slice(&frame[..BANK_SIZE]);
        for (offset, x) in self.phase_offsets.iter_mut().zip(frame[BANK_SIZE..].iter()) {
            *offset = ((x - x.floor()) * 4294967296.0) as u32;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Bank {
    fundamental: f32,
    accumulators: [u32; BANK_SIZE],
    phase_increments: [u32; BANK_SIZE],
    cutoff: usize,
    active: bool,
}

impl Default for Bank {
    fn default() -> Self {
        Self {
            fundamental: 172.0,
            accumulators: [0; BANK_SIZE],
            phase_increments: [0; BANK_SIZE],
            cutoff: 0,
            active: false,
        }
    }
}

impl Bank {
    fn set_frequency(&mut self, mut f: f32) {
        if f > NYQUIST {
            f = NYQUIST;
        }

        self.fundamental = f;
        self.cutoff = BANK_SIZE;

        for i in 0..BANK_SIZE {
            let harmonic_freq = f * (i + 1) as f32;
            self.phase_increments[i] = (harmonic_freq * PHASE_CONSTANT) as u32;

            if self.cutoff == BANK_SIZE && harmonic_freq > NYQUIST {
                self.cutoff = i;
            }
        }
    }

    #[inline]
    fn advance(&mut self) {
        for (acc, inc) in self
            .accumulators
            .iter_mut()
            .zip(self.phase_increments.iter())
        {
            *acc = acc.wrapping_add(*inc);
        }
    }
}

/// The oscillator bank synth.
#[derive(Debug)]
pub struct OscillatorBank {
    banks: [Bank; NUM_BANKS],
    voice: VoicePrototype,
    voice_sequence: SequenceInterpolator<VOICE_VECTOR, NUM_CONTROL_POINTS>,
    animate: bool,
}

impl Default for OscillatorBank {
    fn default() -> Self {
        Self::new()
    }
}

impl OscillatorBank {
    pub fn new() -> Self {
        let mut bank = Self {
            banks: [Bank::default(); NUM_BANKS],
            voice: VoicePrototype::default(),
            voice_sequence: SequenceInterpolator::new(),
            animate: false,
        };

        for i in 0..NUM_BANKS {
            bank.set_frequency(i, 440.0);
        }
        bank.voice.amplitudes[0] = 0.5;

        bank
    }

    /// Set a bank's fundamental, clamped to the Nyquist limit. Recomputes
    /// every harmonic increment and the bank's cutoff.
    pub fn set_frequency(&mut self, bank: usize, f: f32) {
        self.banks[bank].set_frequency(f);
    }

    /// Toggle a bank's contribution to the output. An inactive bank keeps
    /// advancing its accumulators so reactivation is phase-continuous.
    pub fn set_active(&mut self, bank: usize, active: bool) {
        self.banks[bank].active = active;
    }

    /// Fundamental currently assigned to a bank.
    pub fn frequency(&self, bank: usize) -> f32 {
        self.banks[bank].fundamental
    }

    /// First harmonic index whose frequency exceeds the Nyquist limit, or
    /// [`BANK_SIZE`] if every harmonic is audible.
    pub fn cutoff(&self, bank: usize) -> usize {
        self.banks[bank].cutoff
    }

    pub fn voice_mut(&mut self) -> &mut VoicePrototype {
        &mut self.voice
    }

    pub fn voice_sequence_mut(
        &mut self,
    ) -> &mut SequenceInterpolator<VOICE_VECTOR, NUM_CONTROL_POINTS> {
        &mut self.voice_sequence
    }

    /// Animate the voice from the keyframe sequence, one step per sample.
    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    #[inline]
    fn sample(voice: &VoicePrototype, bank: &Bank) -> f32 {
        let mut accum = 0.0;

        for i in 0..bank.cutoff {
            accum += voice.amplitudes[i]
                * sine_f32(bank.accumulators[i].wrapping_add(voice.phase_offsets[i]));
        }

        accum
    }

    /// Render one block of denormalized samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for out_sample in out.iter_mut() {
            if self.animate {
                let frame = self.voice_sequence.next();
                self.voice.apply_frame(frame);
            }

            let mut s = 0.0;
            for bank in self.banks.iter_mut() {
                bank.advance();
                if bank.active {
                    s += Self::sample(&self.voice, bank);
                }
            }

            *out_sample = s;
        }
    }

    /// Render exactly one fundamental cycle of the current voice across
    /// `out`, regardless of any live bank's frequency. Uses a throwaway
    /// bank; the live banks are untouched.
    pub fn preview_voice(&self, out: &mut [f32]) {
        let mut temp = Bank::default();
        let n = out.len();

        for i in 0..BANK_SIZE {
            temp.phase_increments[i] = ((i + 1) as f32 * (4294967296.0 / n as f32)) as u32;
        }
        temp.cutoff = BANK_SIZE;

        for out_sample in out.iter_mut() {
            temp.advance();
            *out_sample = Self::sample(&self.voice, &temp);
        }
    }
}

impl BlockSource for OscillatorBank {
    fn produce_block(&mut self, pool: &mut BlockPool) -> Option<AudioBlock> {
        let mut block = pool.allocate()?;

        let mut out = [0.0; BLOCK_SAMPLES];
        self.render(&mut out);
        block.write_from(&out);

        Some(block)
    }
}
