//! Windowed-sinc resampling.
//!
//! Fractional-rate resampler over finite or looped input, used by the
//! spectral synth to pitch-shift a single-cycle waveform. The kernel is a
//! truncated sinc under a Blackman window, 8 samples wide, and the ending
//! read position is returned so playback can continue seamlessly across
//! independently sized output blocks.

use spin::Once;

use crate::oscillator::fast_sine::{cosine_turns, sine_turns};

#[allow(unused_imports)]
use num_traits::float::Float;

/// Kernel width in samples.
const WINDOW_SIZE: usize = 8;
const HALF_WINDOW: usize = WINDOW_SIZE / 2;

/// Rows in the window lookup table, covering fractional offsets in `[0, 1]`.
const WINDOW_ROWS: usize = 32;

/// How samples outside the input buffer are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplePolicy {
    /// The buffer is zero everywhere outside `[0, len)`.
    OneShot,
    /// The buffer is an infinite loop.
    Loop,
}

#[inline]
fn fetch(policy: SamplePolicy, wave: &[f32], k: i32) -> f32 {
    let len = wave.len() as i32;

    match policy {
        SamplePolicy::OneShot => {
            if k < 0 || k >= len {
                0.0
            } else {
                wave[k as usize]
            }
        }
        SamplePolicy::Loop => {
            // Power-of-two lengths reduce to a mask, valid for negative k
            // in two's complement.
            let k = if len.count_ones() == 1 {
                (k & (len - 1)) as usize
            } else {
                k.rem_euclid(len) as usize
            };
            wave[k]
        }
    }
}

/// The normalized sinc function. `sinc(0)` is exactly 1.
#[inline]
pub fn sinc(x: f32) -> f32 {
    if x.abs() <= f32::EPSILON {
        return 1.0;
    }

    sine_turns(x * 0.5) / (x * core::f32::consts::PI)
}

/// Blackman window over `[0, size]`, evaluated directly.
pub fn window(m: f32, size: usize) -> f32 {
    if m < 0.0 || m > size as f32 {
        return 0.0;
    }

    let turns = m / size as f32;
    0.42 - 0.5 * cosine_turns(turns) + 0.08 * cosine_turns(2.0 * turns)
}

struct WindowLut([[f32; WINDOW_SIZE + 1]; WINDOW_ROWS]);

static WINDOW_LUT: Once<WindowLut> = Once::new();

fn window_lut() -> &'static WindowLut {
    WINDOW_LUT.call_once(|| {
        let mut table = [[0.0; WINDOW_SIZE + 1]; WINDOW_ROWS];
        for (r, row) in table.iter_mut().enumerate() {
            let offset = r as f32 / (WINDOW_ROWS - 1) as f32;
            for (m, value) in row.iter_mut().enumerate() {
                *value = window(m as f32 - offset, WINDOW_SIZE);
            }
        }
        WindowLut(table)
    })
}

/// Window value at `m - fractional`, interpolated from the lookup table.
#[inline]
pub fn fast_window(fractional: f32, m: usize) -> f32 {
    let lut = window_lut();

    let y = fractional * (WINDOW_ROWS - 1) as f32;
    let row = (y as usize).min(WINDOW_ROWS - 2);
    let frac = y - row as f32;

    let a = lut.0[row][m];
    let b = lut.0[row + 1][m];

    a + (b - a) * frac
}

/// Resample `input` into `output` with the given sample rates.
///
/// `phase` is the fractional read position in the input at which playback
/// starts. The return value is the ending position modulo the input length;
/// passing it back as the next call's phase continues playback seamlessly.
/// When downsampling, the kernel is widened to band-limit the input and the
/// output is scaled to compensate for the energy change.
pub fn windowed_sinc_interpolation(
    input: &[f32],
    output: &mut [f32],
    input_rate: f32,
    output_rate: f32,
    policy: SamplePolicy,
    phase: f32,
) -> f32 {
    let sinc_scale = input_rate.min(output_rate) / input_rate;
    let ratio = input_rate / output_rate;
    let gain = (output_rate / input_rate).min(1.0);

    for (j, out_sample) in output.iter_mut().enumerate() {
        let pos = j as f32 * ratio + phase;
        let k_low = pos.floor() as i32 - HALF_WINDOW as i32;
        let fractional = pos - pos.floor();

        let mut accum = 0.0;
        for ki in 0..=WINDOW_SIZE {
            let k = k_low + ki as i32;
            let offset = k as f32 - pos;
            accum += sinc(sinc_scale * offset) * fast_window(fractional, ki) * fetch(policy, input, k);
        }

        *out_sample = gain * accum;
    }

    (output.len() as f32 * ratio + phase).rem_euclid(input.len() as f32)
}

/// Play a pitch-shifted loop of `loop_buffer` into `stream`.
///
/// Returns the playback phase, see [`windowed_sinc_interpolation`].
pub fn pitch_shift_looped(
    loop_buffer: &[f32],
    stream: &mut [f32],
    native_sample_rate: f32,
    original_pitch: f32,
    target_pitch: f32,
    phase: f32,
) -> f32 {
    let shifted_rate = native_sample_rate * (original_pitch / target_pitch);

    windowed_sinc_interpolation(
        loop_buffer,
        stream,
        native_sample_rate,
        shifted_rate,
        SamplePolicy::Loop,
        phase,
    )
}

/// Play a single-cycle waveform looped at `target_pitch`.
///
/// Returns the playback phase, see [`windowed_sinc_interpolation`].
pub fn pitch_shift_single_cycle(
    loop_buffer: &[f32],
    stream: &mut [f32],
    native_sample_rate: f32,
    target_pitch: f32,
    phase: f32,
) -> f32 {
    let original_pitch = native_sample_rate / loop_buffer.len() as f32;

    pitch_shift_looped(
        loop_buffer,
        stream,
        native_sample_rate,
        original_pitch,
        target_pitch,
        phase,
    )
}
