//! Microphone acquisition via `cpal`.
//!
//! [`MicSource::open`] resolves an input device (the system default, or one
//! selected by name from config) and queries its native stream format.
//! [`MicSource::stream`] starts capturing and delivers already-downmixed
//! mono [`MicChunk`]s over a tokio channel; the returned [`MicStream`] is a
//! RAII guard, and dropping it stops the hardware stream and releases the
//! device.
//!
//! The microphone is the exclusively-owned capture handle of the listening
//! session: exactly one `MicStream` exists per live attempt, and the session
//! drops it on stop or fallback.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;
use tokio::sync::mpsc;

use super::resample::downmix_mono;

// ---------------------------------------------------------------------------
// MicChunk
// ---------------------------------------------------------------------------

/// One buffer of captured audio, already downmixed to mono.
///
/// Samples are `f32` in `[-1.0, 1.0]` at the device's native rate; callers
/// resample with [`crate::audio::resample`] before handing audio to STT.
#[derive(Debug, Clone)]
pub struct MicChunk {
    /// Mono PCM samples.
    pub samples: Vec<f32>,
    /// Native sample rate of the capture device in Hz.
    pub sample_rate: u32,
}

// ---------------------------------------------------------------------------
// MicError
// ---------------------------------------------------------------------------

/// Errors raised while acquiring or starting the capture device.
#[derive(Debug, Error)]
pub enum MicError {
    #[error("no input device available on the default audio host")]
    NoDevice,

    #[error("input device {0:?} not found")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Enumerate(#[from] cpal::DevicesError),

    #[error("failed to query input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// MicStream
// ---------------------------------------------------------------------------

/// RAII guard for a running capture stream.
///
/// Dropping it drops the inner `cpal::Stream`, which stops the hardware
/// stream and releases the microphone.  Not `Send` on all platforms — keep
/// it on the thread that created it.
pub struct MicStream {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// MicSource
// ---------------------------------------------------------------------------

/// An input device plus its native stream configuration.
pub struct MicSource {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_rate: u32,
    channels: u16,
}

impl MicSource {
    /// Resolve an input device.
    ///
    /// With `preferred = None` the system default input device is used;
    /// otherwise the device whose cpal name matches `preferred` exactly.
    ///
    /// # Errors
    ///
    /// [`MicError::NoDevice`] when no default device exists,
    /// [`MicError::DeviceNotFound`] when a named device is absent, or
    /// [`MicError::DefaultConfig`] when the device cannot report a format.
    pub fn open(preferred: Option<&str>) -> Result<Self, MicError> {
        let host = cpal::default_host();

        let device = match preferred {
            None => host.default_input_device().ok_or(MicError::NoDevice)?,
            Some(name) => host
                .input_devices()?
                .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                .ok_or_else(|| MicError::DeviceNotFound(name.to_string()))?,
        };

        let supported = device.default_input_config()?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_rate,
            channels,
        })
    }

    /// Start capturing and forward mono [`MicChunk`]s on `tx`.
    ///
    /// The cpal callback downmixes each hardware buffer to mono before
    /// sending.  Send failures (receiver gone) are ignored so the audio
    /// thread never panics.
    pub fn stream(&self, tx: mpsc::UnboundedSender<MicChunk>) -> Result<MicStream, MicError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let chunk = MicChunk {
                    samples: downmix_mono(data, channels),
                    sample_rate,
                };
                let _ = tx.send(chunk);
            },
            |err: cpal::StreamError| {
                log::error!("capture stream error: {err}");
            },
            None,
        )?;

        stream.play()?;
        Ok(MicStream { _stream: stream })
    }

    /// Native sample rate of the device in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels the device delivers (before downmix).
    pub fn channels(&self) -> u16 {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mic_chunk_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<MicChunk>();
    }

    #[test]
    fn device_not_found_names_the_device() {
        let err = MicError::DeviceNotFound("USB Mic 7".into());
        assert!(err.to_string().contains("USB Mic 7"));
    }
}
