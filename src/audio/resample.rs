//! Sample-rate and channel conversion for the recognition path.
//!
//! The Whisper engine expects **16 kHz mono `f32`** PCM.  Capture devices
//! rarely deliver that natively, so the live recognizer runs every chunk
//! through [`downmix_mono`] and [`resample`] before accumulating it.
//!
//! The resampler is plain linear interpolation.  That is more than adequate
//! for speech heading into an STT model; a band-limited resampler would add
//! a dependency without changing recognition quality measurably.

/// Mix interleaved multi-channel PCM down to mono by averaging each frame.
///
/// Output length is `samples.len() / channels`.  Mono input is returned
/// unchanged (owned); zero channels yields an empty vector.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = usize::from(n);
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

/// Resample mono PCM from `from_hz` to `to_hz` by linear interpolation.
///
/// A no-op (cloned input) when the rates already match.  The output length
/// is `round(samples.len() * to_hz / from_hz)`.
pub fn resample(samples: &[f32], from_hz: u32, to_hz: u32) -> Vec<f32> {
    if from_hz == to_hz || samples.is_empty() {
        return samples.to_vec();
    }

    let step = from_hz as f64 / to_hz as f64;
    let out_len = (samples.len() as f64 / step).round() as usize;
    let mut out = Vec::with_capacity(out_len);

    let mut pos = 0.0f64;
    for _ in 0..out_len {
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;

        let sample = match (samples.get(idx), samples.get(idx + 1)) {
            (Some(&a), Some(&b)) => a + (b - a) * frac,
            (Some(&a), None) => a,
            _ => 0.0,
        };
        out.push(sample);
        pos += step;
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix_mono ------------------------------------------------------

    #[test]
    fn mono_input_passes_through() {
        let input = vec![0.25_f32, -0.5, 0.75];
        assert_eq!(downmix_mono(&input, 1), input);
    }

    #[test]
    fn stereo_frames_are_averaged() {
        let input = vec![1.0_f32, 0.0, -0.4, -0.6];
        let out = downmix_mono(&input, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert!((out[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_channels_yields_empty() {
        assert!(downmix_mono(&[0.1, 0.2], 0).is_empty());
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        // 5 samples at 2 channels: the dangling sample is ignored.
        let input = vec![0.0_f32; 5];
        assert_eq!(downmix_mono(&input, 2).len(), 2);
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn matching_rates_are_a_noop() {
        let input: Vec<f32> = (0..64).map(|i| i as f32 / 64.0).collect();
        assert_eq!(resample(&input, 16_000, 16_000), input);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(resample(&[], 48_000, 16_000).is_empty());
    }

    #[test]
    fn downsample_48k_to_16k_thirds_the_length() {
        let input = vec![0.5_f32; 480]; // 10 ms @ 48 kHz
        assert_eq!(resample(&input, 48_000, 16_000).len(), 160);
    }

    #[test]
    fn upsample_8k_to_16k_doubles_the_length() {
        let input = vec![0.0_f32; 80]; // 10 ms @ 8 kHz
        assert_eq!(resample(&input, 8_000, 16_000).len(), 160);
    }

    #[test]
    fn odd_ratio_length_is_close() {
        // 1 s @ 44.1 kHz → ~16 000 output samples (±1 for rounding)
        let input = vec![0.0_f32; 44_100];
        let out = resample(&input, 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1, "got {}", out.len());
    }

    #[test]
    fn dc_signal_keeps_its_amplitude() {
        let input = vec![0.3_f32; 480];
        for &s in &resample(&input, 48_000, 16_000) {
            assert!((s - 0.3).abs() < 1e-5, "amplitude drift: {s}");
        }
    }

    #[test]
    fn interpolation_lands_between_neighbours() {
        // Upsampling a ramp: every output sample must lie within the input range.
        let input: Vec<f32> = (0..10).map(|i| i as f32).collect();
        for &s in &resample(&input, 8_000, 16_000) {
            assert!((0.0..=9.0).contains(&s));
        }
    }
}
