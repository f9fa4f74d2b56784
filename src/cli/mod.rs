// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;
mod render;

pub use args::{Cli, Command, PlanCacheArgs, RenderArgs};
pub use output::{print_json, print_report};
pub use render::{collect_audio_files, render_all, render_file, RenderReport};

use anyhow::{Context, Result};
use colorful::Colorful;

use crate::config::PlanCache;
use crate::core::Transform;

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => run_render(&args, cli.verbose),
        Command::PlanCache(args) => run_plan_cache(&args),
        Command::Presets => {
            output::print_presets();
            Ok(())
        }
    }
}

fn run_render(args: &RenderArgs, verbose: bool) -> Result<()> {
    let files = collect_audio_files(&args.input)?;
    if files.is_empty() {
        println!("{}", "No audio files found!".red());
        return Ok(());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    if !args.json {
        println!("Found {} audio file(s)\n", files.len());
    }

    let mut reports = Vec::new();
    let mut failures = 0usize;
    for (file, result) in render_all(&files, args) {
        match result {
            Ok(report) => {
                if !args.json {
                    print_report(&report, verbose);
                    println!();
                }
                reports.push(report);
            }
            Err(e) => {
                failures += 1;
                log::error!("{}: {:#}", file.display(), e);
                if !args.json {
                    println!("{} {}: {:#}\n", "Failed:".red(), file.display(), e);
                }
            }
        }
    }

    if args.json {
        print_json(&reports)?;
    }

    if failures == files.len() {
        anyhow::bail!("All {} file(s) failed to render", failures);
    }
    Ok(())
}

fn run_plan_cache(args: &PlanCacheArgs) -> Result<()> {
    let path = match &args.output {
        Some(path) => path.clone(),
        None => PlanCache::default_path().context("No cache directory on this platform")?,
    };

    for &size in &args.sizes {
        // Planning up front surfaces unsupported lengths before they are recorded.
        Transform::new(size, None).with_context(|| format!("Cannot plan a {}-point transform", size))?;
    }

    let cache = PlanCache::new(args.sizes.iter().copied());
    cache.save(&path)?;
    output::print_plan_cache(&cache, &path);
    Ok(())
}
