//! Benchmarks for complete voices and the voice pool.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tales_synth::{
    dsp::Waveform,
    synth::{NoteEvent, Voice, VoicePool},
    AudioBuffer, TimbreParams,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let params = TimbreParams {
        filter_cutoff_hz: 2_500.0,
        filter_resonance: 1.5,
        release: 2.0,
        ..TimbreParams::default()
    };

    for &size in BLOCK_SIZES {
        let mut out = AudioBuffer::new(2, size);

        // === SINGLE VOICE ===
        // saw → envelope → lowpass, the baseline cost of one note
        let mut voice = Voice::new();
        voice.prepare_to_play(SAMPLE_RATE, size, 2);
        voice.apply(&params);
        voice.start_note(45, 1.0, 0);
        group.bench_with_input(BenchmarkId::new("voice_saw", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut out), 0, size);
            })
        });

        // === FULL POOL ===
        // eight sustained notes, all rendering
        let mut pool = VoicePool::new(8);
        pool.prepare(SAMPLE_RATE, size, 2);
        for note in [48, 52, 55, 59, 60, 64, 67, 71] {
            pool.note_on(note, 1.0);
        }
        group.bench_with_input(BenchmarkId::new("pool_8_voices", size), &size, |b, _| {
            b.iter(|| {
                out.clear();
                pool.render_block(black_box(&params), [], black_box(&mut out));
            })
        });

        // === STEALING ===
        // every block brings a fresh note into a saturated pool
        let square = TimbreParams {
            waveform: Waveform::Square,
            ..params
        };
        let mut pool = VoicePool::new(8);
        pool.prepare(SAMPLE_RATE, size, 2);
        let mut note = 36u8;
        group.bench_with_input(BenchmarkId::new("pool_stealing", size), &size, |b, _| {
            b.iter(|| {
                note = if note >= 96 { 36 } else { note + 1 };
                out.clear();
                pool.render_block(
                    black_box(&square),
                    [NoteEvent::note_on(note, 1.0)],
                    black_box(&mut out),
                );
            })
        });
    }

    group.finish();
}
