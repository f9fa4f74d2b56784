//! Offline rendering of audio files through the freeze processor

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::args::RenderArgs;
use crate::config::ProcessorConfig;
use crate::core::decoder::{decode_audio, extract_mono, is_audio_file, write_wav};
use crate::core::dsp::{peak, rms, to_db, SpectralAnalyzer};
use crate::core::FreezeProcessor;

/// Analysis window used to measure the frozen section
const MEASURE_FFT_SIZE: usize = 8192;

/// Settling time after the fade-in before the frozen section is measured
const MEASURE_SETTLE_SECS: f32 = 0.25;

/// Result of rendering one file
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub input: String,
    pub output: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub input_secs: f64,
    pub output_secs: f64,
    pub fft_size: usize,
    pub hop_size: usize,
    pub latency_ms: f32,
    pub freeze_at: f32,
    pub release_at: Option<f32>,
    pub peak_db: f32,
    /// RMS of the measured frozen section
    pub frozen_rms_db: Option<f32>,
    /// Strongest frequency in the measured frozen section
    pub frozen_dominant_hz: Option<f32>,
}

/// Collect audio files from a file or directory
pub fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_audio_file(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_audio_file(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
    } else {
        anyhow::bail!("Input not found: {}", path.display());
    }

    Ok(files)
}

/// Render every file, in parallel when there is more than one
pub fn render_all(files: &[PathBuf], args: &RenderArgs) -> Vec<(PathBuf, Result<RenderReport>)> {
    if files.len() == 1 {
        return vec![(files[0].clone(), render_file(&files[0], args))];
    }

    let progress = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let result = render_file(file, args);
            progress.inc(1);
            (file.clone(), result)
        })
        .collect();

    progress.finish_and_clear();
    results
}

/// Decode, freeze and write one file
pub fn render_file(path: &Path, args: &RenderArgs) -> Result<RenderReport> {
    let audio = decode_audio(path)?;
    let channels = audio.channels;
    let sample_rate = audio.sample_rate;

    let engine_config = args.engine_config(channels)?;
    let config = ProcessorConfig::new(sample_rate, engine_config).with_block_size(args.block_size);
    let mut processor = FreezeProcessor::new(config)
        .with_context(|| format!("Failed to build processor for {}", path.display()))?;

    let dry_latency = processor.dry_latency_frames();
    let tail_frames = (args.tail.max(0.0) * sample_rate as f32) as usize;

    let input_secs = audio.duration_secs;
    let mut input = audio.samples;
    input.resize(input.len() + (tail_frames + dry_latency) * channels, 0.0);
    let mut rendered = vec![0.0f32; input.len()];

    let block_len = args.block_size * channels;
    for (index, (block_in, block_out)) in input
        .chunks(block_len)
        .zip(rendered.chunks_mut(block_len))
        .enumerate()
    {
        let time = (index * args.block_size) as f32 / sample_rate as f32;
        processor.process(block_in, block_out, &args.params_at(time))?;
    }

    // Realign with the input timeline.
    rendered.drain(..(dry_latency * channels).min(rendered.len()));

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Input file has no usable name")?;
    let output_path = args.output.join(format!("{}.frozen.wav", stem));
    write_wav(&output_path, &rendered, sample_rate, channels)?;

    let mono = extract_mono(&rendered, channels);
    let measure_start = args.freeze_at + args.fade_in + MEASURE_SETTLE_SECS
        + processor.engine().latency() as f32 / sample_rate as f32;
    let start = (measure_start * sample_rate as f32) as usize;
    let end = start + MEASURE_FFT_SIZE;
    let released_before_end = args
        .release_at
        .map(|t| ((t * sample_rate as f32) as usize) < end)
        .unwrap_or(false);

    let (frozen_rms_db, frozen_dominant_hz) = if end <= mono.len() && !released_before_end {
        let section = &mono[start..end];
        let mut analyzer = SpectralAnalyzer::new(MEASURE_FFT_SIZE);
        (Some(to_db(rms(section))), analyzer.dominant_frequency(section, sample_rate))
    } else {
        log::debug!("{}: frozen section too short to measure", path.display());
        (None, None)
    };

    Ok(RenderReport {
        input: path.display().to_string(),
        output: output_path.display().to_string(),
        sample_rate,
        channels,
        input_secs,
        output_secs: mono.len() as f64 / sample_rate as f64,
        fft_size: processor.engine().fft_size(),
        hop_size: processor.engine().hop_size(),
        latency_ms: processor.latency_frames() as f32 * 1000.0 / sample_rate as f32,
        freeze_at: args.freeze_at,
        release_at: args.release_at,
        peak_db: to_db(peak(&rendered)),
        frozen_rms_db,
        frozen_dominant_hz,
    })
}
