//! Shared partial table and the inverse transform that turns it into a
//! time-domain cycle.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Frequency-domain partial table shared between the editor and the audio
/// path.
///
/// Single writer (the editor), single reader (block production). Every f32
/// is stored as an atomic bit pattern, so an individual value can never
/// tear. A write landing between the reader's two loads of a (real,
/// imaginary) pair shows up as a transient mixed state, which the synthesis
/// path tolerates; writers are expected to keep values finite and to write
/// pairs through [`PartialStore::set_bin`].
#[derive(Debug)]
pub struct PartialStore {
    bins: Box<[AtomicU32]>,
}

impl PartialStore {
    pub fn new(len: usize) -> Self {
        let bins: Vec<AtomicU32> = (0..len).map(|_| AtomicU32::new(0)).collect();
        Self {
            bins: bins.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Read one raw slot.
    pub fn get(&self, index: usize) -> f32 {
        f32::from_bits(self.bins[index].load(Ordering::Relaxed))
    }

    /// Write one raw slot.
    pub fn set(&self, index: usize, value: f32) {
        self.bins[index].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Write the full (real, imaginary) pair of bin `k`.
    pub fn set_bin(&self, k: usize, re: f32, im: f32) {
        self.set(2 * k, re);
        self.set(2 * k + 1, im);
    }

    /// Zero the whole table.
    pub fn clear(&self) {
        for bin in self.bins.iter() {
            bin.store(0, Ordering::Relaxed);
        }
    }

    /// Copy the current table into `dst`.
    pub fn snapshot_into(&self, dst: &mut [f32]) {
        for (value, bin) in dst.iter_mut().zip(self.bins.iter()) {
            *value = f32::from_bits(bin.load(Ordering::Relaxed));
        }
    }
}

/// Inverse real FFT of a fixed size, planned once at construction.
///
/// The packed spectrum layout matches the partial table: slot 0 is the DC
/// bin, slot 1 the Nyquist bin, then (real, imaginary) pairs for bins
/// `1..len/2`. The transform includes the `1/len` normalization, so a DC
/// bin of `len` produces a constant signal of 1.
pub struct SpectralTransform {
    ifft: Arc<dyn Fft<f32>>,
    spectrum: Box<[Complex<f32>]>,
    scratch: Box<[Complex<f32>]>,
}

impl SpectralTransform {
    pub fn new(len: usize) -> Self {
        let ifft = FftPlanner::new().plan_fft_inverse(len);
        let scratch_len = ifft.get_inplace_scratch_len();

        Self {
            ifft,
            spectrum: vec![Complex::default(); len].into_boxed_slice(),
            scratch: vec![Complex::default(); scratch_len].into_boxed_slice(),
        }
    }

    /// Transform a packed spectrum into `len` time-domain samples.
    ///
    /// Reuses the buffers planned at construction; no allocation on this
    /// path.
    pub fn process(&mut self, packed: &[f32], signal: &mut [f32]) {
        let len = self.spectrum.len();
        let half = len / 2;

        // Rebuild the Hermitian-symmetric spectrum the packed layout implies.
        self.spectrum[0] = Complex::new(packed[0], 0.0);
        self.spectrum[half] = Complex::new(packed[1], 0.0);
        for k in 1..half {
            let bin = Complex::new(packed[2 * k], packed[2 * k + 1]);
            self.spectrum[k] = bin;
            self.spectrum[len - k] = bin.conj();
        }

        self.ifft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        let norm = 1.0 / len as f32;
        for (out, c) in signal.iter_mut().zip(self.spectrum.iter()) {
            *out = c.re * norm;
        }
    }
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("len", &self.spectrum.len())
            .finish()
    }
}
