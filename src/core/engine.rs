// src/core/engine.rs
//
// Phase-vocoder freeze engine. Interleaved audio goes in through `write` and
// the same number of samples comes back out of the next `read`; once a freeze
// snapshot is held, that output is the captured spectrum re-synthesised hop
// after hop.

use num_complex::Complex32;
use std::f32::consts::TAU;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::dsp::{synthesis_window, OverlapAddBuffer, RingBuffer, Transform};
use crate::config::{EngineConfig, SynthesisGate};
use crate::error::{FreezeError, Result};

/// Captured spectrum of one freeze activation, per channel and bin
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeSnapshot {
    /// Magnitude of each bin at the capture frame
    pub magnitude: Vec<Vec<f32>>,
    /// Phase advance of each bin over one hop, measured at the capture frame
    pub phase_velocity: Vec<Vec<f32>>,
}

/// Fixed shape of an engine, readable without taking the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    channels: usize,
    fft_size: usize,
    hop_size: usize,
    max_burst: usize,
}

impl Geometry {
    fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}

/// Per-channel freeze state, allocated once and overwritten at each capture
struct Capture {
    magnitude: Vec<Vec<f32>>,
    phase_velocity: Vec<Vec<f32>>,
    phase: Vec<Vec<f32>>,
}

struct EngineState {
    geometry: Geometry,
    gate: SynthesisGate,

    pending: Vec<RingBuffer<f32>>,
    analysis: Vec<RingBuffer<f32>>,
    output: Vec<OverlapAddBuffer>,
    window: Vec<f32>,
    transform: Transform,

    spectrum: Vec<Vec<Complex32>>,
    previous_spectrum: Vec<Vec<Complex32>>,
    frame: Vec<f32>,
    synth_spectrum: Vec<Complex32>,

    capture: Capture,
    has_capture: bool,
    active: bool,
    capture_armed: bool,
}

/// Spectral freeze engine.
///
/// All buffers are sized at construction: the pending input holds
/// `max_burst` frames per channel, and the analysis and output rings hold
/// `fft_size + max_burst`. `write` and `read_into` never allocate.
///
/// Output lags input by [`latency`](Self::latency) samples regardless of how
/// the stream is chunked.
pub struct FreezeEngine {
    geometry: Geometry,
    state: Mutex<EngineState>,
}

impl FreezeEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let geometry = Geometry {
            channels: config.channels,
            fft_size: config.fft_size,
            hop_size: config.hop_size(),
            max_burst: config.max_burst,
        };
        let transform = Transform::new(geometry.fft_size, config.plan_cache.as_deref())?;

        let channels = geometry.channels;
        let bins = geometry.bins();
        let ring_len = geometry.fft_size + geometry.max_burst;

        let mut analysis: Vec<RingBuffer<f32>> =
            (0..channels).map(|_| RingBuffer::with_capacity(ring_len)).collect();
        // One hop short of a frame, so the first frame completes after one hop of input
        let preload = vec![0.0f32; geometry.fft_size - geometry.hop_size];
        for ring in analysis.iter_mut() {
            ring.push_slice(&preload);
        }

        log::debug!(
            "freeze engine: {} ch, {}-point frames, hop {}, max burst {}, {:?} gate",
            channels,
            geometry.fft_size,
            geometry.hop_size,
            geometry.max_burst,
            config.synthesis_gate
        );

        let state = EngineState {
            geometry,
            gate: config.synthesis_gate,
            pending: (0..channels).map(|_| RingBuffer::with_capacity(geometry.max_burst)).collect(),
            analysis,
            output: (0..channels).map(|_| OverlapAddBuffer::with_capacity(ring_len)).collect(),
            window: synthesis_window(geometry.fft_size, geometry.hop_size),
            transform,
            spectrum: vec![vec![Complex32::new(0.0, 0.0); bins]; channels],
            previous_spectrum: vec![vec![Complex32::new(0.0, 0.0); bins]; channels],
            frame: vec![0.0; geometry.fft_size],
            synth_spectrum: vec![Complex32::new(0.0, 0.0); bins],
            capture: Capture {
                magnitude: vec![vec![0.0; bins]; channels],
                phase_velocity: vec![vec![0.0; bins]; channels],
                phase: vec![vec![0.0; bins]; channels],
            },
            has_capture: false,
            active: false,
            capture_armed: false,
        };

        Ok(Self {
            geometry,
            state: Mutex::new(state),
        })
    }

    /// Queue interleaved samples for the next [`read`](Self::read).
    ///
    /// Fails without touching any state if `samples` is not a whole number
    /// of frames, or if the frames written since the last read would exceed
    /// `max_burst`.
    pub fn write(&self, samples: &[f32]) -> Result<()> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let channels = state.geometry.channels;

        if samples.len() % channels != 0 {
            return Err(FreezeError::InvalidArgument(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        let frames = samples.len() / channels;
        let available = state.pending[0].available();
        if frames > available {
            return Err(FreezeError::CapacityExceeded {
                requested: frames,
                available,
            });
        }

        for frame in samples.chunks_exact(channels) {
            for (ring, &sample) in state.pending.iter_mut().zip(frame) {
                ring.push(sample);
            }
        }
        Ok(())
    }

    /// Process everything written since the previous read and return as many
    /// interleaved samples as were written.
    pub fn read(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.read_into(&mut out);
        out
    }

    /// Like [`read`](Self::read), reusing `out`'s allocation
    pub fn read_into(&self, out: &mut Vec<f32>) {
        let mut guard = self.lock();
        let state = &mut *guard;

        let frames = state.pending[0].len();
        for (analysis, pending) in state.analysis.iter_mut().zip(state.pending.iter_mut()) {
            analysis.extend_from(pending);
        }

        state.run_frames(frames);

        out.clear();
        out.reserve(frames * state.geometry.channels);
        for _ in 0..frames {
            for ring in state.output.iter_mut() {
                out.push(ring.pop_front());
            }
        }
    }

    /// Engage the freeze. A capture is armed only on the off-to-on edge.
    pub fn enable(&self) {
        let mut state = self.lock();
        if !state.active {
            state.capture_armed = true;
            log::debug!("freeze enabled, capture armed");
        }
        state.active = true;
    }

    /// Release the freeze, cancelling a capture that has not run yet
    pub fn disable(&self) {
        let mut state = self.lock();
        if state.active {
            log::debug!("freeze disabled");
        }
        state.active = false;
        state.capture_armed = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().active
    }

    /// The current freeze snapshot, if a capture has ever completed
    pub fn snapshot(&self) -> Option<FreezeSnapshot> {
        let state = self.lock();
        if !state.has_capture {
            return None;
        }
        Some(FreezeSnapshot {
            magnitude: state.capture.magnitude.clone(),
            phase_velocity: state.capture.phase_velocity.clone(),
        })
    }

    pub fn channels(&self) -> usize {
        self.geometry.channels
    }

    pub fn fft_size(&self) -> usize {
        self.geometry.fft_size
    }

    pub fn hop_size(&self) -> usize {
        self.geometry.hop_size
    }

    pub fn max_burst(&self) -> usize {
        self.geometry.max_burst
    }

    /// Samples between an input sample and the output slot it first feeds
    pub fn latency(&self) -> usize {
        self.geometry.fft_size - 1
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        // Plain sample data; a panic elsewhere cannot leave it half-valid
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EngineState {
    /// Run every complete frame in the analysis rings. `frames` new frames
    /// were just appended and will be emitted after this returns.
    fn run_frames(&mut self, frames: usize) {
        let Geometry { fft_size, hop_size, .. } = self.geometry;

        while self.analysis[0].len() >= fft_size {
            // Output slot lined up with this frame's newest input sample
            let offset = fft_size - 1 + frames - self.analysis[0].len();
            self.process_frame(offset);

            for ring in self.analysis.iter_mut() {
                ring.discard(hop_size);
            }
        }
    }

    fn process_frame(&mut self, offset: usize) {
        for ch in 0..self.geometry.channels {
            self.analysis[ch].peek_slice(&mut self.frame);
            for (x, &w) in self.frame.iter_mut().zip(&self.window) {
                *x *= w;
            }

            std::mem::swap(&mut self.spectrum[ch], &mut self.previous_spectrum[ch]);
            if let Err(err) = self.transform.forward(&self.frame, &mut self.spectrum[ch]) {
                log::error!("analysis frame skipped on channel {}: {}", ch, err);
            }
        }

        if self.capture_armed {
            self.capture_frame();
        }

        let synthesize = self.has_capture
            && match self.gate {
                SynthesisGate::Sticky => true,
                SynthesisGate::Active => self.active,
            };
        if synthesize {
            self.synthesize_frame(offset);
        }
    }

    fn capture_frame(&mut self) {
        let capture = &mut self.capture;
        for ch in 0..self.geometry.channels {
            let bins = self.spectrum[ch].iter().zip(&self.previous_spectrum[ch]);
            for (k, (current, previous)) in bins.enumerate() {
                let phase = current.arg();
                capture.magnitude[ch][k] = current.norm();
                capture.phase_velocity[ch][k] = phase - previous.arg();
                capture.phase[ch][k] = phase;
            }
        }

        self.capture_armed = false;
        self.has_capture = true;
        log::debug!("freeze snapshot captured");
    }

    fn synthesize_frame(&mut self, offset: usize) {
        for ch in 0..self.geometry.channels {
            let magnitude = &self.capture.magnitude[ch];
            let velocity = &self.capture.phase_velocity[ch];
            let phase = &mut self.capture.phase[ch];

            for k in 0..self.synth_spectrum.len() {
                phase[k] = wrap_phase(phase[k] + velocity[k]);
                self.synth_spectrum[k] = Complex32::from_polar(magnitude[k], phase[k]);
            }

            if let Err(err) = self.transform.inverse(&self.synth_spectrum, &mut self.frame) {
                log::error!("synthesis frame skipped on channel {}: {}", ch, err);
                continue;
            }
            for (x, &w) in self.frame.iter_mut().zip(&self.window) {
                *x *= w;
            }
            self.output[ch].accumulate(offset, &self.frame);
        }
    }
}

/// Wrap a phase into `[0, 2π)`
fn wrap_phase(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
