//! Clip decoding via Symphonia
//!
//! Decodes encoded bytes into interleaved stereo f32 at the output
//! device's sample rate, resampling with rubato when the source rate
//! differs.

use crate::fetch::FetchError;
use std::io::Cursor;
use std::sync::Arc;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Errors from loading one clip, tagged with its URL
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{url}: fetch failed: {source}")]
    Fetch { url: String, source: FetchError },
    #[error("{url}: no audio track found")]
    NoAudioTrack { url: String },
    #[error("{url}: decode failed: {reason}")]
    Decode { url: String, reason: String },
}

/// A decoded clip: interleaved stereo samples at the target rate.
/// Shared read-only between the cache and the audio thread.
#[derive(Debug)]
pub struct DecodedClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

/// Decoder producing [`DecodedClip`]s at a fixed output rate
pub struct ClipDecoder {
    target_sample_rate: u32,
}

impl ClipDecoder {
    pub fn new(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    /// Decode encoded bytes fetched from `url` (the URL is only used
    /// for error tagging and the format hint).
    pub fn decode(&self, url: &str, bytes: Vec<u8>) -> Result<Arc<DecodedClip>, DecodeError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        // Hint the container format from the URL's extension
        let mut hint = Hint::new();
        if let Some(ext) = url.rsplit('.').next() {
            if !ext.contains('/') {
                hint.with_extension(ext);
            }
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| DecodeError::NoAudioTrack {
                url: url.to_string(),
            })?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();
        let source_sample_rate = codec_params.sample_rate.unwrap_or(44100);
        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(_) => break,
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(_) => continue,
            };

            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
            sample_buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(sample_buf.samples());
        }

        if samples.is_empty() {
            return Err(DecodeError::Decode {
                url: url.to_string(),
                reason: "no decodable audio data".to_string(),
            });
        }

        // Everything downstream assumes interleaved stereo.
        let samples = to_stereo(samples, channels);

        let samples = if source_sample_rate != self.target_sample_rate {
            self.resample(url, &samples, source_sample_rate)?
        } else {
            samples
        };

        let duration_secs = samples.len() as f64 / (self.target_sample_rate as f64 * 2.0);

        Ok(Arc::new(DecodedClip {
            samples,
            sample_rate: self.target_sample_rate,
            duration_secs,
        }))
    }

    /// Resample interleaved stereo to the target sample rate
    fn resample(
        &self,
        url: &str,
        samples: &[f32],
        source_rate: u32,
    ) -> Result<Vec<f32>, DecodeError> {
        use rubato::{FftFixedInOut, Resampler};

        let decode_err = |reason: String| DecodeError::Decode {
            url: url.to_string(),
            reason,
        };

        let frames = samples.len() / 2;
        let mut resampler = FftFixedInOut::<f32>::new(
            source_rate as usize,
            self.target_sample_rate as usize,
            1024,
            2,
        )
        .map_err(|e| decode_err(e.to_string()))?;

        // Deinterleave
        let deinterleaved: Vec<Vec<f32>> = (0..2)
            .map(|ch| (0..frames).map(|f| samples[f * 2 + ch]).collect())
            .collect();

        let chunk_size = resampler.input_frames_next();
        let mut output: Vec<Vec<f32>> = vec![Vec::new(); 2];

        let mut pos = 0;
        while pos + chunk_size <= frames {
            let input_refs: Vec<&[f32]> = deinterleaved
                .iter()
                .map(|ch| &ch[pos..pos + chunk_size])
                .collect();

            let resampled = resampler
                .process(&input_refs, None)
                .map_err(|e| decode_err(e.to_string()))?;

            for (ch, data) in resampled.into_iter().enumerate() {
                output[ch].extend(data);
            }

            pos += chunk_size;
        }

        // Remaining partial chunk: pad with zeros, keep the
        // proportional share of the output.
        if pos < frames {
            let remaining = frames - pos;
            let padded: Vec<Vec<f32>> = deinterleaved
                .iter()
                .map(|ch| {
                    let mut v = ch[pos..].to_vec();
                    v.resize(chunk_size, 0.0);
                    v
                })
                .collect();

            let input_refs: Vec<&[f32]> = padded.iter().map(|v| v.as_slice()).collect();

            if let Ok(resampled) = resampler.process(&input_refs, None) {
                for (ch, data) in resampled.into_iter().enumerate() {
                    let output_frames =
                        (remaining * self.target_sample_rate as usize) / source_rate as usize;
                    output[ch].extend(&data[..output_frames.min(data.len())]);
                }
            }
        }

        // Reinterleave
        let output_frames = output[0].len().min(output[1].len());
        let mut interleaved = Vec::with_capacity(output_frames * 2);
        for frame_idx in 0..output_frames {
            interleaved.push(output[0][frame_idx]);
            interleaved.push(output[1][frame_idx]);
        }

        Ok(interleaved)
    }
}

/// Convert interleaved samples of any channel count to stereo.
/// Mono is duplicated, extra channels are dropped.
fn to_stereo(samples: Vec<f32>, channels: u16) -> Vec<f32> {
    match channels {
        2 => samples,
        1 => {
            let mut stereo = Vec::with_capacity(samples.len() * 2);
            for s in samples {
                stereo.push(s);
                stereo.push(s);
            }
            stereo
        }
        n => {
            let n = n as usize;
            let frames = samples.len() / n;
            let mut stereo = Vec::with_capacity(frames * 2);
            for f in 0..frames {
                stereo.push(samples[f * n]);
                stereo.push(samples[f * n + 1]);
            }
            stereo
        }
    }
}
