//! Render a short spectral-synth phrase to a WAV file.

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use additive_voice_dsp::additive::AdditiveSynth;
use additive_voice_dsp::block::{BlockPool, BlockSource, BLOCK_SAMPLES};
use additive_voice_dsp::SAMPLE_RATE;

fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let mut synth = AdditiveSynth::new();
    let partials = synth.partials();
    for (k, amplitude) in [(16, 60.0), (32, 100.0), (48, 40.0), (64, 25.0)] {
        partials.set_bin(k, amplitude, 0.0);
    }

    let mut pool = BlockPool::new(4);
    let spec = WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create("spectral_loop.wav", spec).unwrap();

    let blocks_per_note = (SAMPLE_RATE as usize / 2) / BLOCK_SAMPLES;
    for note in [57u8, 60, 64, 57] {
        synth.note_on(note);
        info!("note {note}");

        for _ in 0..blocks_per_note {
            if let Some(block) = synth.produce_block(&mut pool) {
                for &sample in block.data().iter() {
                    writer.write_sample(sample).unwrap();
                }
                pool.release(block);
            }
        }
    }

    writer.finalize().unwrap();
    info!("wrote spectral_loop.wav");
}
