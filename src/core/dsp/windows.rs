//! Window function implementations

use std::f32::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    Hann,
    /// Square root of a periodic Hann; analysis and synthesis share it so the
    /// overlap-add sees a Hann squared-window sum
    SqrtHann,
}

/// Create a periodic window of `size` samples
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    let n = size as f32;
    (0..size)
        .map(|i| {
            let x = i as f32;
            match window_type {
                WindowType::Hann => {
                    0.5 * (1.0 - (2.0 * PI * x / n).cos())
                }
                WindowType::SqrtHann => {
                    (0.5 - 0.5 * (2.0 * PI * x / n).cos()).max(0.0).sqrt()
                }
            }
        })
        .collect()
}

/// Sum of squared windows at each phase of one hop period.
///
/// Entry `k` is `sum_m w[k + m * hop]^2`, the gain the overlap-add applies to
/// sample `k` of every hop once analysis and synthesis windows are both `w`.
pub fn squared_overlap_sum(window: &[f32], hop: usize) -> Vec<f32> {
    let mut sums = vec![0.0f32; hop];
    for (i, &w) in window.iter().enumerate() {
        sums[i % hop] += w * w;
    }
    sums
}

/// Window whose squared overlap sum at `hop` is 1.
///
/// The square-root Hann is exact at 50% overlap; at other hops it is scaled by
/// the mean of [`squared_overlap_sum`], which is flat for any hop dividing
/// `size / 2`.
pub fn synthesis_window(size: usize, hop: usize) -> Vec<f32> {
    let mut window = create_window(size, WindowType::SqrtHann);
    let sums = squared_overlap_sum(&window, hop);
    let mean = sums.iter().sum::<f32>() / sums.len() as f32;

    if mean > 1e-9 {
        let scale = 1.0 / mean.sqrt();
        window.iter_mut().for_each(|w| *w *= scale);
    }
    window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = create_window(4, WindowType::Hann);
        assert!((window[0]).abs() < 0.01);  // Should be ~0 at edges
        assert!((window[2] - 1.0).abs() < 0.01);  // Should be ~1 at center
    }

    #[test]
    fn test_sqrt_hann_squares_to_hann() {
        let hann = create_window(64, WindowType::Hann);
        let sqrt_hann = create_window(64, WindowType::SqrtHann);
        for (h, s) in hann.iter().zip(sqrt_hann.iter()) {
            assert!((h - s * s).abs() < 1e-6);
        }
    }

    #[test]
    fn test_half_overlap_is_unscaled() {
        let raw = create_window(1024, WindowType::SqrtHann);
        let window = synthesis_window(1024, 512);
        for (r, w) in raw.iter().zip(window.iter()) {
            assert!((r - w).abs() < 1e-5);
        }
    }

    #[test]
    fn test_squared_overlap_sum_is_flat() {
        for &(size, hop) in &[(1024usize, 512usize), (2048, 512), (4096, 1024), (256, 256)] {
            let window = synthesis_window(size, hop);
            let sums = squared_overlap_sum(&window, hop);
            if hop == size {
                // No overlap: nothing to flatten, only the mean is normalised
                let mean = sums.iter().sum::<f32>() / sums.len() as f32;
                assert!((mean - 1.0).abs() < 1e-4);
                continue;
            }
            for s in sums {
                assert!((s - 1.0).abs() < 1e-4, "size {} hop {}: {}", size, hop, s);
            }
        }
    }
}
