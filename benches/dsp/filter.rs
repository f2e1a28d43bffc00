//! Benchmarks for the state-variable lowpass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tales_synth::{dsp::SVFilter, AudioBuffer};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let mut input = AudioBuffer::new(2, size);
        for ch in 0..2 {
            for (i, s) in input.channel_mut(ch).iter_mut().enumerate() {
                *s = (i as f32 / size as f32) * 2.0 - 1.0;
            }
        }

        for (name, resonance) in [("lowpass", 0.707), ("lowpass_resonant", 8.0)] {
            let mut filter = SVFilter::lowpass(1000.0);
            filter.set_resonance(resonance);
            filter.prepare(48_000.0, size, 2);
            let mut buffer = input.clone();

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.clone_from(&input);
                    filter.process(black_box(&mut buffer), 0..size);
                })
            });
        }

        // Cutoff moving every block forces a coefficient refresh
        let mut filter = SVFilter::lowpass(1000.0);
        filter.prepare(48_000.0, size, 2);
        let mut buffer = input.clone();
        let mut cutoff = 200.0f32;
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 8_000.0 { 200.0 } else { cutoff * 1.05 };
                filter.set_cutoff(cutoff);
                buffer.clone_from(&input);
                filter.process(black_box(&mut buffer), 0..size);
            })
        });
    }

    group.finish();
}
