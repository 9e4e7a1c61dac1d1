//! Centered moving average with clipped boundaries.
//!
//! Every output point is the mean of the input points inside a window centered on it. Near
//! either end the window is truncated to the samples that exist instead of being padded, so the
//! first and last half-window of a series keep their true local mean and the output has the same
//! length as the input.
//!
//! For a window `w` with half-width `h = w / 2`, point `i` averages `[lo, hi)` where
//!
//! * `lo = i - h` when `i > h`, else `0`
//! * `hi = i + h + w % 2` when `i + h < len`, else `len`
//!
//! An interior window holds exactly `w` samples; for even `w` it reaches one sample further left
//! than right. Cost is `O(len * w)`.

/// Smooths `values` with a centered window of `window` samples.
///
/// A window of zero leaves the series untouched.
pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return values.to_vec();
    }

    let len = values.len();
    let half = window / 2;

    (0..len)
        .map(|i| {
            let lo = if i > half { i - half } else { 0 };
            let hi = if i + half < len {
                i + half + window % 2
            } else {
                len
            };
            mean(&values[lo..hi])
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
