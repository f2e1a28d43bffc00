//! Device setup and the demo phrase.

use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use tales_synth::{AudioBuffer, EngineConfig, EngineHandle, SynthEngine};

/// I - vi - IV - V in C, as arpeggiated triads (MIDI notes).
const PHRASE: [[u8; 3]; 4] = [[60, 64, 67], [57, 60, 64], [53, 57, 60], [55, 59, 62]];

pub struct Player {
    config: EngineConfig,
    bpm: f32,
    loops: usize,
}

impl Player {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            bpm: 110.0,
            loops: 2,
        }
    }

    pub fn bpm(mut self, bpm: f32) -> Self {
        self.bpm = bpm.clamp(20.0, 400.0);
        self
    }

    pub fn loops(mut self, loops: usize) -> Self {
        self.loops = loops.max(1);
        self
    }

    pub fn run(mut self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let supported = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let device_channels = supported.channels() as usize;
        self.config.sample_rate = supported.sample_rate().0 as f32;
        self.config.channels = device_channels;

        let max_block = self.config.max_block_size;
        let (mut engine, handle) =
            SynthEngine::new(self.config.clone()).wrap_err("failed to build synth engine")?;

        let mut block = AudioBuffer::new(device_channels, max_block);
        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _| {
                for chunk in data.chunks_mut(max_block * device_channels) {
                    block.set_num_samples(chunk.len() / device_channels);
                    block.clear();
                    engine.process_block(&mut block);
                    block.write_interleaved(chunk, device_channels);
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )?;
        stream.play()?;

        tracing::info!(
            sample_rate = self.config.sample_rate,
            channels = device_channels,
            bpm = self.bpm,
            "playing demo phrase"
        );
        self.perform(handle)?;

        // let the last release tail ring out
        thread::sleep(Duration::from_secs_f32(self.config.params.release + 0.2));
        Ok(())
    }

    fn perform(&self, mut handle: EngineHandle) -> EyreResult<()> {
        let step = Duration::from_secs_f32(60.0 / self.bpm / 2.0);
        let sweep_len = (self.loops * PHRASE.len() * 4) as f32;
        let base_cutoff = self.config.params.filter_cutoff_hz;
        let mut step_index = 0usize;

        for _ in 0..self.loops {
            for chord in PHRASE {
                // bass note under the chord
                handle.note_on(chord[0] - 12, 0.9)?;
                let arpeggio = [chord[0], chord[1], chord[2], chord[1] + 12];
                for note in arpeggio {
                    let sweep = step_index as f32 / sweep_len;
                    handle
                        .params()
                        .set_filter_cutoff(base_cutoff * (0.15 + 0.85 * sweep));
                    step_index += 1;

                    handle.note_on(note, 0.8)?;
                    thread::sleep(step);
                    handle.note_off(note, 0.0)?;
                }
                handle.note_off(chord[0] - 12, 0.0)?;
            }
        }

        handle.all_notes_off()?;
        Ok(())
    }
}
