//! Output formatting for CLI results

use colorful::Colorful;

use super::render::RenderReport;
use crate::config::{FreezePreset, PlanCache};

/// Print a render report for the terminal
pub fn print_report(report: &RenderReport, verbose: bool) {
    println!("Rendered: {}", report.input.as_str().cyan());
    println!("  Output: {}", report.output);
    println!("  Sample Rate: {} Hz, {} ch", report.sample_rate, report.channels);
    println!("  Duration: {:.2}s -> {:.2}s", report.input_secs, report.output_secs);
    match report.release_at {
        Some(release) => println!("  Freeze: {:.2}s to {:.2}s", report.freeze_at, release),
        None => println!("  Freeze: from {:.2}s", report.freeze_at),
    }

    match (report.frozen_dominant_hz, report.frozen_rms_db) {
        (Some(hz), Some(level)) => println!(
            "  Frozen: {} ({:.1} dB RMS)",
            format!("{:.1} Hz", hz).green(),
            level
        ),
        _ => println!("  Frozen: {}", "not measured".yellow()),
    }

    if report.peak_db > 0.0 {
        println!("  Peak: {}", format!("{:.1} dBFS (clipping)", report.peak_db).red());
    } else if verbose {
        println!("  Peak: {:.1} dBFS", report.peak_db);
    }

    if verbose {
        println!("\n  Engine:");
        println!("    FFT Size: {}", report.fft_size);
        println!("    Hop: {}", report.hop_size);
        println!("    Latency: {:.1} ms", report.latency_ms);
    }
}

/// Print reports as a JSON array
pub fn print_json(reports: &[RenderReport]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

pub fn print_presets() {
    println!("{}", "Presets:".bold());
    for preset in FreezePreset::all() {
        println!(
            "  {:<10} fft {:>5}, overlap {:>3.0}%  {}",
            preset.name(),
            preset.fft_size(),
            preset.overlap_rate() * 100.0,
            preset.description()
        );
    }
}

pub fn print_plan_cache(cache: &PlanCache, path: &std::path::Path) {
    let sizes: Vec<String> = cache.lengths.iter().map(|n| n.to_string()).collect();
    println!("Plan cache written: {}", path.display().to_string().cyan());
    println!("  Lengths: {}", sizes.join(", "));
}
