use crate::{Result, TalkbackError};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// One-shot mono resampler for finalized captures.
///
/// Device capture rates vary (44.1/48 kHz are typical); uploads are a fixed
/// 16 kHz, so the whole buffer is converted once at finalize time.
pub fn downsample(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == 0 || output_rate == 0 {
        return Err(TalkbackError::Resample(
            "Sample rates must be greater than 0".into(),
        ));
    }

    if input.is_empty() || input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let resample_ratio = output_rate as f64 / input_rate as f64;

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let chunk_size = 1024;
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| TalkbackError::Resample(format!("Failed to create resampler: {}", e)))?;

    let mut output = Vec::with_capacity((input.len() as f64 * resample_ratio * 1.1) as usize);

    // SincFixedIn consumes exactly chunk_size frames per call; the tail chunk
    // is zero-padded and its output trimmed back to the real proportion.
    let mut offset = 0;
    while offset < input.len() {
        let remaining = input.len() - offset;
        let frames = remaining.min(chunk_size);

        let mut chunk = vec![0.0f32; chunk_size];
        chunk[..frames].copy_from_slice(&input[offset..offset + frames]);

        let processed = resampler
            .process(&[chunk], None)
            .map_err(|e| TalkbackError::Resample(format!("Resampling failed: {}", e)))?;

        let produced = processed[0].len();
        let take = if frames < chunk_size {
            ((frames as f64 * resample_ratio).ceil() as usize).min(produced)
        } else {
            produced
        };
        output.extend_from_slice(&processed[0][..take]);

        offset += frames;
    }

    debug!(
        "Downsampled {} frames @ {} Hz -> {} frames @ {} Hz",
        input.len(),
        input_rate,
        output.len(),
        output_rate
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_when_rates_match() {
        let input: Vec<f32> = (0..100).map(|i| (i as f32 * 0.01).sin()).collect();
        let output = downsample(&input, 16000, 16000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let output = downsample(&[], 48000, 16000).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_48k_to_16k_ratio() {
        let input: Vec<f32> = (0..48000).map(|i| (i as f32 * 0.001).sin()).collect();
        let output = downsample(&input, 48000, 16000).unwrap();

        // One second of audio should stay close to one second after conversion
        let expected = 16000.0;
        let actual = output.len() as f32;
        assert!(
            (actual - expected).abs() / expected < 0.05,
            "expected ~{} frames, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(downsample(&[0.0; 10], 0, 16000).is_err());
        assert!(downsample(&[0.0; 10], 48000, 0).is_err());
    }
}
