//! The realtime entry point: a [`SynthEngine`] for the audio thread and an
//! [`EngineHandle`] for whoever sends notes and turns knobs.
//!
//! ```ignore
//! let (mut engine, mut handle) = SynthEngine::new(EngineConfig::default())?;
//!
//! // control thread
//! handle.note_on(60, 0.8)?;
//! handle.params().set_filter_cutoff(1_200.0);
//!
//! // audio thread
//! buffer.clear();
//! engine.process_block(&mut buffer);
//! ```

mod handle;

use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};

use crate::{
    config::EngineConfig,
    error::Error,
    io::AudioBuffer,
    params::SharedParams,
    synth::{MessageReceiver, NoteEvent, VoicePool},
};

pub use handle::EngineHandle;

pub struct SynthEngine {
    pool: VoicePool,
    rx: Consumer<NoteEvent>,
    params: Arc<SharedParams>,
    config: EngineConfig,
}

impl SynthEngine {
    /// Validate `config`, build and prepare every voice, and wire up the
    /// event queue. All allocation happens here.
    pub fn new(config: EngineConfig) -> Result<(Self, EngineHandle), Error> {
        config.validate()?;

        let mut pool = VoicePool::new(config.polyphony);
        pool.prepare(config.sample_rate, config.max_block_size, config.channels);

        let params = Arc::new(SharedParams::new(config.params));
        let (tx, rx) = RingBuffer::<NoteEvent>::new(config.event_capacity);

        tracing::info!(
            sample_rate = config.sample_rate,
            max_block_size = config.max_block_size,
            channels = config.channels,
            polyphony = config.polyphony,
            "synth engine ready"
        );

        let handle = EngineHandle::new(tx, Arc::clone(&params));
        let engine = Self {
            pool,
            rx,
            params,
            config,
        };
        Ok((engine, handle))
    }

    /// Render one block into `out`, which the caller has already cleared.
    ///
    /// Reads the parameter store once and drains every queued note event
    /// before rendering. Never allocates, blocks or fails.
    pub fn process_block(&mut self, out: &mut AudioBuffer) {
        let params = self.params.snapshot();
        let rx = &mut self.rx;
        let events = std::iter::from_fn(|| MessageReceiver::pop(rx));
        self.pool.render_block(&params, events, out);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn active_voices(&self) -> usize {
        self.pool.active_voices()
    }

    pub fn params(&self) -> &Arc<SharedParams> {
        &self.params
    }
}
