//! Tests for the additive synth

mod wav_writer;

use additive_voice_dsp::additive::{
    note_to_frequency, AdditiveSynth, FUNDAMENTAL_FREQUENCY, PARTIAL_TABLE_SIZE,
};
use additive_voice_dsp::block::{BlockPool, BlockSource, BLOCK_SAMPLES};
use additive_voice_dsp::spectrum::SpectralTransform;

#[test]
fn clear_partials_is_idempotent() {
    let synth = AdditiveSynth::new();
    let partials = synth.partials();

    partials.set_bin(3, 0.5, 0.25);
    partials.set(100, -1.0);

    synth.clear_partials();
    assert!((0..PARTIAL_TABLE_SIZE).all(|i| partials.get(i) == 0.0));

    synth.clear_partials();
    assert!((0..PARTIAL_TABLE_SIZE).all(|i| partials.get(i) == 0.0));
}

#[test]
fn zero_partials_render_silence() {
    let mut synth = AdditiveSynth::new();
    let mut pool = BlockPool::new(2);

    let block = synth.produce_block(&mut pool).unwrap();
    assert!(block.data().iter().all(|&s| s == 0));
}

#[test]
fn exhausted_pool_skips_the_cycle() {
    let mut synth = AdditiveSynth::new();
    let mut pool = BlockPool::new(1);

    let first = synth.produce_block(&mut pool).unwrap();
    assert!(synth.produce_block(&mut pool).is_none());

    pool.release(first);
    assert!(synth.produce_block(&mut pool).is_some());
}

#[test]
fn bin_round_trips_through_the_inverse_transform() {
    let mut synth = AdditiveSynth::new();
    let harmonic = 5;
    synth.partials().set_bin(harmonic, 1.0, 0.0);

    synth.render_signal();

    let signal = synth.signal();
    let crossings = signal.windows(2).filter(|w| w[0] * w[1] < 0.0).count();
    let measured = (crossings / 2) as i32;

    assert!(
        (measured - harmonic as i32).abs() <= 1,
        "measured {measured} cycles for bin {harmonic}"
    );
}

#[test]
fn dc_bin_renders_a_constant_signal() {
    let mut transform = SpectralTransform::new(256);
    let mut packed = [0.0; 256];
    packed[0] = 256.0;
    let mut signal = [0.0; 256];

    transform.process(&packed, &mut signal);

    for (i, s) in signal.iter().enumerate() {
        assert!((s - 1.0).abs() < 1e-4, "sample {i}: {s}");
    }
}

#[test]
fn nyquist_slot_alternates_sign() {
    let mut transform = SpectralTransform::new(256);
    let mut packed = [0.0; 256];
    packed[1] = 256.0;
    let mut signal = [0.0; 256];

    transform.process(&packed, &mut signal);

    for (i, s) in signal.iter().enumerate() {
        let expected = if i % 2 == 0 { 1.0 } else { -1.0 };
        assert!((s - expected).abs() < 1e-4, "sample {i}: {s}");
    }
}

#[test]
fn playback_phase_is_continuous_across_blocks() {
    let mut synth = AdditiveSynth::new();
    synth.partials().set_bin(32, 100.0, 0.0);
    synth.set_frequency(FUNDAMENTAL_FREQUENCY * 32.0);

    // Let the frequency dezipper settle on the target.
    let mut settle = [0.0; BLOCK_SAMPLES];
    for _ in 0..20 {
        synth.render(&mut settle);
    }

    let mut first = [0.0; BLOCK_SAMPLES];
    let mut second = [0.0; BLOCK_SAMPLES];
    synth.render(&mut first);
    synth.render(&mut second);

    let interior_max = first
        .windows(2)
        .chain(second.windows(2))
        .map(|w| (w[1] - w[0]).abs())
        .fold(0.0f32, f32::max);
    let boundary = (second[0] - first[BLOCK_SAMPLES - 1]).abs();

    assert!(
        boundary <= interior_max * 1.1 + 1e-6,
        "boundary {boundary} vs interior {interior_max}"
    );
}

#[test]
fn note_on_lands_on_equal_temperament() {
    assert!((note_to_frequency(69) - 440.0).abs() < 1e-3);
    assert!((note_to_frequency(57) - 220.0).abs() < 1e-3);
    assert!((note_to_frequency(60) - 261.63).abs() < 0.01);
}

#[test]
fn additive_chord_sweep() {
    let mut synth = AdditiveSynth::new();
    let partials = synth.partials();
    for (k, amplitude) in [(16, 60.0), (32, 100.0), (48, 40.0), (64, 25.0)] {
        partials.set_bin(k, amplitude, 0.0);
    }

    let mut wav_data = Vec::new();
    let mut out = [0.0; BLOCK_SAMPLES];

    for note in [45u8, 49, 52, 57] {
        synth.note_on(note);
        for _ in 0..170 {
            synth.render(&mut out);
            wav_data.extend_from_slice(&out);
        }
    }

    wav_writer::write("additive/chord_sweep.wav", &wav_data).ok();
}
