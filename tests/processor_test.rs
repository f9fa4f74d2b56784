// tests/processor_test.rs
//
// Host-level behaviour: dry path alignment, fades and the wet/dry mix.

mod test_utils;

use mrfreeze::{EngineConfig, FreezeParams, FreezePreset, FreezeProcessor, ProcessorConfig};
use test_utils::*;

const BLOCK: usize = 128;

fn processor(channels: usize) -> FreezeProcessor {
    let engine = EngineConfig::from_preset(FreezePreset::Pedal, channels);
    FreezeProcessor::new(ProcessorConfig::new(SAMPLE_RATE, engine).with_block_size(BLOCK)).unwrap()
}

fn run(fx: &mut FreezeProcessor, input: &[f32], params: &FreezeParams) -> Vec<f32> {
    let block_len = BLOCK * fx.channels();
    let mut out = vec![0.0; input.len()];
    for (block_in, block_out) in input.chunks(block_len).zip(out.chunks_mut(block_len)) {
        fx.process(block_in, block_out, params).unwrap();
    }
    out
}

#[test]
fn test_dry_passthrough_delayed_by_hop() {
    let mut fx = processor(2);
    let delay = fx.dry_latency_frames();
    assert_eq!(delay, 512);

    let input = interleave(&[sine(440.0, 0.5, 4096), sine(1000.0, 0.25, 4096)]);
    let out = run(&mut fx, &input, &FreezeParams::default());

    assert!(out[..delay * 2].iter().all(|&s| s == 0.0));
    for (i, (&got, &want)) in out[delay * 2..].iter().zip(&input).enumerate() {
        assert_eq!(got, want, "sample {}", i);
    }
}

#[test]
fn test_fade_in_and_out_with_dry_muted() {
    let mut fx = processor(1);
    let one_second = SAMPLE_RATE as usize;
    let params = FreezeParams {
        dry_gain_db: -48.0,
        fade_in_secs: 0.1,
        fade_out_secs: 0.1,
        ..FreezeParams::default()
    };

    let quiet = run(&mut fx, &sine(440.0, 0.5, one_second), &params);
    assert!(quiet.iter().all(|&s| s == 0.0));

    let held = run(&mut fx, &sine_from(440.0, 0.5, one_second, one_second), &params.frozen(true));
    assert!(fx.is_frozen());
    assert_eq!(fx.envelope_gain(), 1.0);

    // Rising from the floor: the opening of the fade is far below the sustained level
    let start = fx.latency_frames();
    let opening = rms(&held[start..start + 480]);
    let sustained = rms(&held[one_second / 2..]);
    assert!(opening < sustained * 0.5, "opening {} sustained {}", opening, sustained);
    assert!(sustained > 0.2, "sustained {}", sustained);
    let peak = dominant_frequency(&held, 8192).unwrap();
    assert!((peak - 440.0).abs() <= bin_width(1024) + bin_width(8192), "peak at {} Hz", peak);

    let released = run(&mut fx, &sine_from(440.0, 0.5, 2 * one_second, one_second), &params);
    assert!(!fx.is_frozen());
    assert_eq!(fx.envelope_gain(), 0.0);
    assert!(rms(&released[..2400]) > 0.0);
    assert!(released[one_second / 2..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_freeze_gain_scales_wet() {
    let one_second = SAMPLE_RATE as usize;
    let mut levels = Vec::new();
    for gain_db in [0.0f32, -6.0] {
        let mut fx = processor(1);
        let params = FreezeParams {
            dry_gain_db: -60.0,
            freeze_gain_db: gain_db,
            fade_in_secs: 0.0,
            ..FreezeParams::default()
        };
        run(&mut fx, &sine(440.0, 0.5, 8192), &params);
        let out = run(&mut fx, &sine_from(440.0, 0.5, 8192, one_second), &params.frozen(true));
        levels.push(rms(&out[one_second / 2..]));
    }

    let ratio = levels[1] / levels[0];
    assert!((ratio - 0.501).abs() < 0.01, "ratio {}", ratio);
}

#[test]
fn test_mismatched_blocks_rejected() {
    let mut fx = processor(2);
    let mut out = vec![0.0; 64];
    assert!(fx.process(&[0.0; 63], &mut out[..63], &FreezeParams::default()).is_err());
    assert!(fx.process(&[0.0; 64], &mut out[..32], &FreezeParams::default()).is_err());
}
