//! Benchmarks for the phase-accumulator oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tales_synth::dsp::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("saw", Waveform::Saw),
            ("square", Waveform::Square),
        ] {
            let mut osc = Oscillator::new();
            osc.set_sample_rate(48_000.0);
            osc.set_frequency(440.0);
            osc.set_waveform(waveform);

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
