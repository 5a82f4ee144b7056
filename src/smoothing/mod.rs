use std::f64::consts::PI;

/// FIR kernel shapes supported by the trajectory smoother. `Flat` is a
/// moving average; the rest are the standard bell-shaped window
/// functions, sum-normalized before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingKernel {
    Flat,
    Hanning,
    Hamming,
    Bartlett,
    Blackman,
}

impl SmoothingKernel {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flat" => Some(Self::Flat),
            "hanning" => Some(Self::Hanning),
            "hamming" => Some(Self::Hamming),
            "bartlett" => Some(Self::Bartlett),
            "blackman" => Some(Self::Blackman),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Hanning => "hanning",
            Self::Hamming => "hamming",
            Self::Bartlett => "bartlett",
            Self::Blackman => "blackman",
        }
    }

    fn coefficients(self, len: usize) -> Vec<f64> {
        if len <= 1 {
            return vec![1.0; len];
        }
        let m = (len - 1) as f64;
        (0..len)
            .map(|k| {
                let x = k as f64;
                match self {
                    Self::Flat => 1.0,
                    Self::Hanning => 0.5 - 0.5 * (2.0 * PI * x / m).cos(),
                    Self::Hamming => 0.54 - 0.46 * (2.0 * PI * x / m).cos(),
                    Self::Bartlett => 2.0 / m * (m / 2.0 - (x - m / 2.0).abs()),
                    Self::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x / m).cos() + 0.08 * (4.0 * PI * x / m).cos()
                    }
                }
            })
            .collect()
    }
}

/// Why a channel came back unfiltered. Smoothing is cosmetic, so these
/// degrade instead of aborting the utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmoothingWarning {
    UnknownKernel { name: String },
    InputShorterThanWindow { input_len: usize, window_len: usize },
}

impl std::fmt::Display for SmoothingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKernel { name } => {
                write!(f, "unrecognized smoothing kernel {name:?}")
            }
            Self::InputShorterThanWindow {
                input_len,
                window_len,
            } => write!(
                f,
                "signal of {input_len} samples is shorter than the {window_len}-sample window"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedChannel {
    pub samples: Vec<f32>,
    /// Present when filtering degraded to a passthrough.
    pub warning: Option<SmoothingWarning>,
}

/// Upsamples one prediction channel by sample repetition and smooths it
/// with a sum-normalized FIR kernel over reflective padding. The output
/// always has `samples.len() * upsample_factor` samples.
///
/// Precondition violations degrade: the upsampled, unfiltered signal is
/// returned with a warning attached. `window_len < 3` skips filtering
/// by contract and carries no warning.
pub fn smooth_channel(
    samples: &[f32],
    upsample_factor: usize,
    window_len: usize,
    kernel_name: &str,
) -> SmoothedChannel {
    let upsampled = upsample_hold(samples, upsample_factor);

    if window_len < 3 {
        return SmoothedChannel {
            samples: upsampled,
            warning: None,
        };
    }
    if upsampled.len() < window_len {
        let warning = SmoothingWarning::InputShorterThanWindow {
            input_len: upsampled.len(),
            window_len,
        };
        tracing::warn!(
            input_len = upsampled.len(),
            window_len,
            "channel too short to smooth; returning unfiltered signal"
        );
        return SmoothedChannel {
            samples: upsampled,
            warning: Some(warning),
        };
    }
    let kernel = match SmoothingKernel::from_name(kernel_name) {
        Some(kernel) => kernel,
        None => {
            tracing::warn!(
                kernel = kernel_name,
                "unrecognized smoothing kernel; returning unfiltered signal"
            );
            return SmoothedChannel {
                samples: upsampled,
                warning: Some(SmoothingWarning::UnknownKernel {
                    name: kernel_name.to_string(),
                }),
            };
        }
    };

    SmoothedChannel {
        samples: filter(&upsampled, window_len, kernel),
        warning: None,
    }
}

fn upsample_hold(samples: &[f32], factor: usize) -> Vec<f32> {
    let factor = factor.max(1);
    let mut out = Vec::with_capacity(samples.len() * factor);
    for &value in samples {
        out.extend(std::iter::repeat(value).take(factor));
    }
    out
}

/// Valid-mode convolution over point-reflected padding, keeping the
/// central `x.len()` samples. Requires `x.len() >= window_len`.
fn filter(x: &[f32], window_len: usize, kernel: SmoothingKernel) -> Vec<f32> {
    let n = x.len();
    let pad = window_len - 1;

    // reflect interior values about each endpoint, endpoint excluded
    let mut padded = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        padded.push(x[i] as f64);
    }
    padded.extend(x.iter().map(|&v| v as f64));
    for i in 2..=pad + 1 {
        padded.push(x[n - i] as f64);
    }

    let weights = kernel.coefficients(window_len);
    let weight_sum: f64 = weights.iter().sum();
    let offset = (window_len - 1) / 2;

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let start = i + offset;
        let mut acc = 0.0f64;
        for (k, &w) in weights.iter().enumerate() {
            acc += w * padded[start + k];
        }
        out.push((acc / weight_sum) as f32);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-5, "sample {i}: {a} vs {e}");
        }
    }

    #[test]
    fn upsampling_repeats_each_value() {
        let out = smooth_channel(&[1.0, -2.0], 4, 1, "flat");
        assert_eq!(out.samples, vec![1.0, 1.0, 1.0, 1.0, -2.0, -2.0, -2.0, -2.0]);
        assert!(out.warning.is_none());
    }

    #[test]
    fn short_window_skips_filtering() {
        let input = [0.3, 0.7, -0.1];
        for window_len in [0, 1, 2] {
            let out = smooth_channel(&input, 2, window_len, "flat");
            assert_eq!(out.samples, vec![0.3, 0.3, 0.7, 0.7, -0.1, -0.1]);
            assert!(out.warning.is_none());
        }
    }

    #[test]
    fn output_length_is_input_times_upsample_factor() {
        let input: Vec<f32> = (0..100).map(|i| (i as f32 * 0.1).sin()).collect();
        for kernel in ["flat", "hanning", "hamming", "bartlett", "blackman"] {
            let out = smooth_channel(&input, 4, 11, kernel);
            assert_eq!(out.samples.len(), 400, "kernel {kernel}");
            assert!(out.warning.is_none());
        }
    }

    #[test]
    fn flat_kernel_preserves_constant_signal() {
        let out = smooth_channel(&[0.5; 30], 4, 11, "flat");
        assert_close(&out.samples, &[0.5; 120]);
    }

    #[test]
    fn flat_kernel_is_moving_average() {
        // reflective padding for [0,1,2,3] with L=3 is [1,0,1,2,3,2]
        let out = smooth_channel(&[0.0, 1.0, 2.0, 3.0], 1, 3, "flat");
        assert_close(&out.samples, &[2.0 / 3.0, 1.0, 2.0, 7.0 / 3.0]);
    }

    #[test]
    fn bell_kernels_preserve_constant_signal() {
        for kernel in ["hanning", "hamming", "bartlett", "blackman"] {
            let out = smooth_channel(&[1.0; 20], 1, 11, kernel);
            assert_close(&out.samples, &[1.0; 20]);
        }
    }

    #[test]
    fn unknown_kernel_degrades_with_warning() {
        let input = [0.1, 0.2, 0.3, 0.4, 0.5];
        let out = smooth_channel(&input, 1, 3, "gaussian");
        assert_eq!(out.samples, input.to_vec());
        assert_eq!(
            out.warning,
            Some(SmoothingWarning::UnknownKernel {
                name: "gaussian".to_string()
            })
        );
    }

    #[test]
    fn input_shorter_than_window_degrades_with_warning() {
        let out = smooth_channel(&[1.0, 2.0], 1, 11, "flat");
        assert_eq!(out.samples, vec![1.0, 2.0]);
        assert_eq!(
            out.warning,
            Some(SmoothingWarning::InputShorterThanWindow {
                input_len: 2,
                window_len: 11
            })
        );
    }

    #[test]
    fn hanning_coefficients_match_reference() {
        // np.hanning(5) = [0, 0.5, 1, 0.5, 0]
        let w = SmoothingKernel::Hanning.coefficients(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (a, e) in w.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn bartlett_coefficients_match_reference() {
        // np.bartlett(5) = [0, 0.5, 1, 0.5, 0]
        let w = SmoothingKernel::Bartlett.coefficients(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (a, e) in w.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12);
        }
    }

    #[test]
    fn kernels_are_symmetric() {
        for kernel in [
            SmoothingKernel::Hanning,
            SmoothingKernel::Hamming,
            SmoothingKernel::Bartlett,
            SmoothingKernel::Blackman,
        ] {
            let w = kernel.coefficients(11);
            for i in 0..11 {
                assert!((w[i] - w[10 - i]).abs() < 1e-12, "{}", kernel.name());
            }
        }
    }

    #[test]
    fn kernel_name_round_trip() {
        for name in ["flat", "hanning", "hamming", "bartlett", "blackman"] {
            let kernel = SmoothingKernel::from_name(name).expect("known kernel");
            assert_eq!(kernel.name(), name);
        }
        assert_eq!(SmoothingKernel::from_name("triangle"), None);
    }
}
