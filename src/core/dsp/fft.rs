//! Real-valued FFT pair with persistent plans

use num_complex::Complex32;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::path::Path;
use std::sync::Arc;

use crate::config::PlanCache;
use crate::error::{FreezeError, Result};

/// Where the transform's plans came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    /// A plan cache manifest covering this length was found and accepted
    Cache,
    /// Planned at construction without a usable cache
    Runtime,
}

/// Fixed-size forward (real to complex) and inverse (complex to real) FFT.
///
/// Plans and scratch buffers are built once and reused on every call. The
/// scratch buffers make both directions take `&mut self`, so a transform can
/// never run two frames at once.
pub struct Transform {
    fft_size: usize,
    forward_plan: Arc<dyn RealToComplex<f32>>,
    inverse_plan: Arc<dyn ComplexToReal<f32>>,
    forward_in: Vec<f32>,
    forward_out: Vec<Complex32>,
    forward_scratch: Vec<Complex32>,
    inverse_in: Vec<Complex32>,
    inverse_out: Vec<f32>,
    inverse_scratch: Vec<Complex32>,
    plan_source: PlanSource,
}

impl Transform {
    /// Plan a transform of `fft_size` points.
    ///
    /// A missing, unreadable or mismatched plan cache is logged and otherwise
    /// ignored; only an unusable `fft_size` is an error.
    pub fn new(fft_size: usize, plan_cache: Option<&Path>) -> Result<Self> {
        if fft_size < 2 || fft_size % 2 != 0 {
            return Err(FreezeError::Config(format!(
                "fft size must be even and at least 2, got {}",
                fft_size
            )));
        }

        let plan_source = match plan_cache {
            Some(path) => match PlanCache::load_for(path, fft_size) {
                Ok(_) => {
                    log::debug!("plan cache {} covers {}-point transform", path.display(), fft_size);
                    PlanSource::Cache
                }
                Err(err) => {
                    log::warn!("{}; planning {}-point transform at runtime", err, fft_size);
                    PlanSource::Runtime
                }
            },
            None => PlanSource::Runtime,
        };

        let mut planner = RealFftPlanner::<f32>::new();
        let forward_plan = planner.plan_fft_forward(fft_size);
        let inverse_plan = planner.plan_fft_inverse(fft_size);

        Ok(Self {
            fft_size,
            forward_in: forward_plan.make_input_vec(),
            forward_out: forward_plan.make_output_vec(),
            forward_scratch: forward_plan.make_scratch_vec(),
            inverse_in: inverse_plan.make_input_vec(),
            inverse_out: inverse_plan.make_output_vec(),
            inverse_scratch: inverse_plan.make_scratch_vec(),
            forward_plan,
            inverse_plan,
            plan_source,
        })
    }

    /// Spectrum of `input` (`fft_size` samples) into `output` (`bins()` values)
    pub fn forward(&mut self, input: &[f32], output: &mut [Complex32]) -> Result<()> {
        self.check_lengths(input.len(), output.len())?;

        self.forward_in.copy_from_slice(input);
        self.forward_plan.process_with_scratch(
            &mut self.forward_in,
            &mut self.forward_out,
            &mut self.forward_scratch,
        )?;
        output.copy_from_slice(&self.forward_out);
        Ok(())
    }

    /// Signal of `input` (`bins()` values) into `output` (`fft_size` samples),
    /// normalised so that `inverse(forward(x)) == x`
    pub fn inverse(&mut self, input: &[Complex32], output: &mut [f32]) -> Result<()> {
        self.check_lengths(output.len(), input.len())?;

        self.inverse_in.copy_from_slice(input);
        // DC and Nyquist of a real signal are real
        let last = self.inverse_in.len() - 1;
        self.inverse_in[0].im = 0.0;
        self.inverse_in[last].im = 0.0;

        self.inverse_plan.process_with_scratch(
            &mut self.inverse_in,
            &mut self.inverse_out,
            &mut self.inverse_scratch,
        )?;

        let n = self.fft_size as f32;
        for (out, &x) in output.iter_mut().zip(self.inverse_out.iter()) {
            *out = x / n;
        }
        Ok(())
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of spectral bins, `fft_size / 2 + 1`
    pub fn bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    pub fn plan_source(&self) -> PlanSource {
        self.plan_source
    }

    fn check_lengths(&self, samples: usize, bins: usize) -> Result<()> {
        if samples != self.fft_size || bins != self.bins() {
            return Err(FreezeError::Transform(format!(
                "expected {} samples and {} bins, got {} and {}",
                self.fft_size,
                self.bins(),
                samples,
                bins
            )));
        }
        Ok(())
    }
}
