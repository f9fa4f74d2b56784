// src/core/processor.rs
//
// Host block adapter: decouples the host's block size from the engine's hop,
// mixes the faded freeze with the dry signal.

use super::dsp::RingBuffer;
use super::engine::FreezeEngine;
use super::envelope::FadeEnvelope;
use crate::config::{FreezeParams, ProcessorConfig};
use crate::error::{FreezeError, Result};

/// Block-based freeze effect as a plugin host would drive it.
///
/// Input is queued and handed to the engine one hop at a time; the mix of
/// dry and faded wet signal is queued again and returned in host-sized
/// blocks. Both paths share the queue delay, so the dry signal stays aligned
/// with the input the freeze was captured from.
pub struct FreezeProcessor {
    engine: FreezeEngine,
    sample_rate: u32,
    block_size: usize,
    input_queue: RingBuffer<f32>,
    output_queue: RingBuffer<f32>,
    chunk: Vec<f32>,
    wet: Vec<f32>,
    envelope: FadeEnvelope,
}

impl FreezeProcessor {
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        if config.sample_rate == 0 {
            return Err(FreezeError::Config("sample rate must be positive".to_string()));
        }
        if config.block_size == 0 {
            return Err(FreezeError::Config("block size must be positive".to_string()));
        }
        config.engine.validate()?;

        let hop = config.engine.hop_size();
        let engine = FreezeEngine::new(config.engine.clone().with_max_burst(hop))?;

        let channels = engine.channels();
        let chunk_len = hop * channels;
        let queue_len = 2 * (chunk_len + config.block_size * channels);

        Ok(Self {
            engine,
            sample_rate: config.sample_rate,
            block_size: config.block_size,
            input_queue: RingBuffer::with_capacity(queue_len),
            output_queue: RingBuffer::with_capacity(queue_len),
            chunk: vec![0.0; chunk_len],
            wet: Vec::with_capacity(chunk_len),
            envelope: FadeEnvelope::new(),
        })
    }

    /// Process one interleaved block. `output` receives as many samples as
    /// `input` holds; it is zero-filled while the queues are priming.
    pub fn process(&mut self, input: &[f32], output: &mut [f32], params: &FreezeParams) -> Result<()> {
        let channels = self.engine.channels();
        if input.len() != output.len() {
            return Err(FreezeError::InvalidArgument(format!(
                "input has {} samples but output has {}",
                input.len(),
                output.len()
            )));
        }
        if input.len() % channels != 0 {
            return Err(FreezeError::InvalidArgument(format!(
                "{} samples do not divide into {} channels",
                input.len(),
                channels
            )));
        }
        let frames = input.len() / channels;
        if frames > self.block_size {
            return Err(FreezeError::CapacityExceeded {
                requested: frames,
                available: self.block_size,
            });
        }

        if params.freeze && !self.engine.is_enabled() {
            self.engine.enable();
        } else if !params.freeze && self.engine.is_enabled() {
            self.engine.disable();
        }

        let freeze_gain = params.freeze_gain();
        let dry_gain = params.dry_gain();
        self.envelope
            .set_durations(params.fade_in_secs, params.fade_out_secs, self.sample_rate);
        if self.engine.is_enabled() {
            self.envelope.engage();
        } else {
            self.envelope.release();
        }

        self.input_queue.push_slice(input);

        let mut dropped = 0usize;
        while self.input_queue.len() > self.chunk.len() {
            self.input_queue.peek_slice(&mut self.chunk);
            self.input_queue.discard(self.chunk.len());

            self.engine.write(&self.chunk)?;
            self.engine.read_into(&mut self.wet);

            let pairs = self.chunk.chunks_exact(channels).zip(self.wet.chunks_exact(channels));
            for (dry_frame, wet_frame) in pairs {
                let gain = self.envelope.next_gain() * freeze_gain;
                for (&dry, &wet) in dry_frame.iter().zip(wet_frame) {
                    if !self.output_queue.push(gain * wet + dry_gain * dry) {
                        dropped += 1;
                    }
                }
            }
        }
        if dropped > 0 {
            log::warn!("output queue full, dropped {} samples", dropped);
        }

        for slot in output.iter_mut() {
            *slot = self.output_queue.pop().unwrap_or(0.0);
        }
        Ok(())
    }

    pub fn engine(&self) -> &FreezeEngine {
        &self.engine
    }

    pub fn is_frozen(&self) -> bool {
        self.engine.is_enabled()
    }

    /// Current wet envelope gain
    pub fn envelope_gain(&self) -> f32 {
        self.envelope.gain()
    }

    pub fn channels(&self) -> usize {
        self.engine.channels()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Queue delay shared by the dry and wet paths, in frames.
    ///
    /// Exact when the block size divides the hop.
    pub fn dry_latency_frames(&self) -> usize {
        self.engine.hop_size()
    }

    /// Delay between an input frame and the first wet output it feeds
    pub fn latency_frames(&self) -> usize {
        self.dry_latency_frames() + self.engine.latency()
    }
}
