use std::path::Path;

use crate::assets::media::{MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32};
use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Interleaved floating-point PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl AudioTrack {
    /// Create a track from interleaved samples.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> StoryreelResult<Self> {
        if sample_rate == 0 {
            return Err(StoryreelError::validation("audio sample_rate must be > 0"));
        }
        if channels == 0 {
            return Err(StoryreelError::validation("audio channels must be > 0"));
        }
        if !samples.len().is_multiple_of(usize::from(channels)) {
            return Err(StoryreelError::validation(
                "interleaved sample count must be a multiple of the channel count",
            ));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Decode `path` into the pipeline mix format (48 kHz stereo).
    pub fn decode(path: &Path) -> StoryreelResult<Self> {
        let samples = decode_audio_f32(path, MIX_SAMPLE_RATE, MIX_CHANNELS)?;
        Self::new(MIX_SAMPLE_RATE, MIX_CHANNELS, samples)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// `true` when the track holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Write interleaved samples as raw little-endian `f32le`.
    pub fn write_f32le(&self, out: &mut impl std::io::Write) -> StoryreelResult<()> {
        let mut bytes = Vec::<u8>::with_capacity(self.samples.len() * 4);
        for &sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        out.write_all(&bytes)
            .map_err(|e| StoryreelError::evaluation(format!("failed to write f32le audio: {e}")))
    }

    /// Write the track as a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> StoryreelResult<()> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let wav_err = |e: hound::Error| {
            StoryreelError::evaluation(format!("failed to write wav '{}': {e}", path.display()))
        };
        let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
        for &s in &self.samples {
            writer.write_sample(s).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pcm.rs"]
mod tests;
