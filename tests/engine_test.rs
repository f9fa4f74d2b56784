// tests/engine_test.rs
//
// Streaming behaviour of the freeze engine driven through its public API.

mod test_utils;

use mrfreeze::{EngineConfig, FreezeEngine, FreezeError, SynthesisGate, Transform};
use test_utils::*;

const BLOCK: usize = 128;

/// Write `samples` in chunks of `sizes` frames (cycled) and collect the output
fn stream(engine: &FreezeEngine, samples: &[f32], sizes: &[usize]) -> Vec<f32> {
    let channels = engine.channels();
    let mut out = Vec::with_capacity(samples.len());
    let mut pos = 0;
    for &frames in sizes.iter().cycle() {
        if pos >= samples.len() {
            break;
        }
        let end = (pos + frames * channels).min(samples.len());
        engine.write(&samples[pos..end]).unwrap();
        out.extend(engine.read());
        pos = end;
    }
    out
}

fn blocks(engine: &FreezeEngine, samples: &[f32]) -> Vec<f32> {
    stream(engine, samples, &[BLOCK])
}

#[test]
fn test_output_length_matches_input() {
    let engine = FreezeEngine::new(EngineConfig::new(2)).unwrap();
    for frames in [1usize, 7, 128, 1000, 2048] {
        engine.write(&vec![0.1; frames * 2]).unwrap();
        assert_eq!(engine.read().len(), frames * 2);
    }
    assert!(engine.read().is_empty());
}

#[test]
fn test_split_frame_rejected_without_side_effects() {
    let engine = FreezeEngine::new(EngineConfig::new(2)).unwrap();
    engine.write(&[0.1, 0.2]).unwrap();

    let err = engine.write(&[0.1, 0.2, 0.3]).unwrap_err();
    assert!(matches!(err, FreezeError::InvalidArgument(_)));
    assert_eq!(engine.read().len(), 2);
}

#[test]
fn test_capacity_exceeded() {
    let engine = FreezeEngine::new(EngineConfig::new(2).with_max_burst(256)).unwrap();

    let err = engine.write(&vec![0.0; 257 * 2]).unwrap_err();
    assert!(matches!(err, FreezeError::CapacityExceeded { requested: 257, available: 256 }));

    engine.write(&vec![0.0; 200 * 2]).unwrap();
    let err = engine.write(&vec![0.0; 100 * 2]).unwrap_err();
    assert!(matches!(err, FreezeError::CapacityExceeded { requested: 100, available: 56 }));

    // Exactly max_burst is accepted
    engine.write(&vec![0.0; 56 * 2]).unwrap();
    assert_eq!(engine.read().len(), 256 * 2);

    engine.write(&vec![0.0; 256 * 2]).unwrap();
    assert_eq!(engine.read().len(), 256 * 2);
}

#[test]
fn test_transform_round_trip() {
    let mut transform = Transform::new(1024, None).unwrap();
    let input = sine(440.0, 0.8, 1024);
    let mut spectrum = vec![Default::default(); transform.bins()];
    let mut output = vec![0.0; 1024];

    transform.forward(&input, &mut spectrum).unwrap();
    transform.inverse(&spectrum, &mut output).unwrap();

    for (a, b) in input.iter().zip(&output) {
        assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
    }
}

#[test]
fn test_silent_until_enabled() {
    let engine = FreezeEngine::new(EngineConfig::new(1)).unwrap();
    let out = blocks(&engine, &sine(440.0, 0.5, SAMPLE_RATE as usize));
    assert!(out.iter().all(|&s| s == 0.0));
    assert!(engine.snapshot().is_none());
}

#[test]
fn test_sustains_captured_tone() {
    let engine = FreezeEngine::new(EngineConfig::new(1)).unwrap();
    let one_second = SAMPLE_RATE as usize;

    blocks(&engine, &sine(440.0, 0.5, one_second));
    engine.enable();
    blocks(&engine, &sine_from(440.0, 0.5, one_second, 4096));
    assert!(engine.snapshot().is_some());

    // The input goes silent; the freeze keeps sounding
    let out = blocks(&engine, &vec![0.0; 3 * one_second]);
    let tolerance = bin_width(engine.fft_size()) + bin_width(8192);

    let early = dominant_frequency(&out[..one_second], 8192).unwrap();
    let late = dominant_frequency(&out, 8192).unwrap();
    assert!((early - 440.0).abs() <= tolerance, "early peak at {} Hz", early);
    assert!((late - 440.0).abs() <= tolerance, "late peak at {} Hz", late);
    assert!((late - early).abs() <= bin_width(8192), "drifted {} -> {}", early, late);

    let level = rms(&out[out.len() - one_second..]);
    assert!(level > 0.2 && level < 0.5, "rms {}", level);
    assert!(out.iter().all(|s| s.abs() < 2.0));
}

#[test]
fn test_reenable_keeps_snapshot() {
    let engine = FreezeEngine::new(EngineConfig::new(1)).unwrap();
    blocks(&engine, &sine(440.0, 0.5, 8192));
    engine.enable();
    blocks(&engine, &sine_from(440.0, 0.5, 8192, 4096));
    let first = engine.snapshot().unwrap();

    engine.enable();
    blocks(&engine, &sine(880.0, 0.5, 8192));
    assert_eq!(engine.snapshot().unwrap(), first);
}

#[test]
fn test_toggle_recaptures() {
    let engine = FreezeEngine::new(EngineConfig::new(1)).unwrap();
    blocks(&engine, &sine(440.0, 0.5, 8192));
    engine.enable();
    blocks(&engine, &sine_from(440.0, 0.5, 8192, 4096));
    let first = engine.snapshot().unwrap();

    engine.disable();
    blocks(&engine, &sine(880.0, 0.5, 24000));
    assert_eq!(engine.snapshot().unwrap(), first);

    engine.enable();
    blocks(&engine, &sine_from(880.0, 0.5, 24000, 4096));
    assert_ne!(engine.snapshot().unwrap(), first);

    let out = blocks(&engine, &vec![0.0; 24000]);
    let peak = dominant_frequency(&out, 8192).unwrap();
    assert!((peak - 880.0).abs() <= bin_width(2048) + bin_width(8192), "peak at {} Hz", peak);
}

#[test]
fn test_sticky_gate_sounds_after_disable() {
    let engine = FreezeEngine::new(EngineConfig::new(1)).unwrap();
    blocks(&engine, &sine(440.0, 0.5, 8192));
    engine.enable();
    blocks(&engine, &sine_from(440.0, 0.5, 8192, 4096));
    engine.disable();

    let out = blocks(&engine, &vec![0.0; 16384]);
    assert!(rms(&out[8192..]) > 0.1);
}

#[test]
fn test_active_gate_silences_after_disable() {
    let config = EngineConfig::new(1).with_synthesis_gate(SynthesisGate::Active);
    let engine = FreezeEngine::new(config).unwrap();
    blocks(&engine, &sine(440.0, 0.5, 8192));
    engine.enable();
    let held = blocks(&engine, &sine_from(440.0, 0.5, 8192, 8192));
    assert!(rms(&held[4096..]) > 0.1);

    engine.disable();
    let out = blocks(&engine, &vec![0.0; 8192]);
    // Frames already overlap-added drain within one frame length
    assert!(out[4096..].iter().all(|&s| s == 0.0));
}

#[test]
fn test_output_independent_of_chunking() {
    let channels = 2;
    let one_second = SAMPLE_RATE as usize;
    let before = interleave(&[sine(440.0, 0.5, one_second), sine(660.0, 0.3, one_second)]);
    let after = interleave(&[
        sine_from(440.0, 0.5, one_second, one_second),
        sine_from(660.0, 0.3, one_second, one_second),
    ]);

    let run = |sizes: &[usize]| {
        let engine = FreezeEngine::new(EngineConfig::new(channels)).unwrap();
        let mut out = stream(&engine, &before, sizes);
        engine.enable();
        out.extend(stream(&engine, &after, sizes));
        out
    };

    let regular = run(&[BLOCK]);
    let irregular = run(&[1, 37, 500, 90, 2048]);
    assert_eq!(regular.len(), irregular.len());
    for (i, (a, b)) in regular.iter().zip(&irregular).enumerate() {
        assert!((a - b).abs() < 1e-6, "sample {}: {} vs {}", i, a, b);
    }

    let left = channel(&regular, channels, 0);
    let right = channel(&regular, channels, 1);
    let tolerance = bin_width(2048) + bin_width(8192);
    assert!((dominant_frequency(&left, 8192).unwrap() - 440.0).abs() <= tolerance);
    assert!((dominant_frequency(&right, 8192).unwrap() - 660.0).abs() <= tolerance);
}

#[test]
fn test_engine_is_shareable_across_threads() {
    use std::sync::Arc;

    let engine = Arc::new(FreezeEngine::new(EngineConfig::new(1)).unwrap());
    let control = Arc::clone(&engine);
    let handle = std::thread::spawn(move || {
        control.enable();
    });
    handle.join().unwrap();

    blocks(&engine, &sine(440.0, 0.5, 8192));
    assert!(engine.is_enabled());
    assert!(engine.snapshot().is_some());
}
