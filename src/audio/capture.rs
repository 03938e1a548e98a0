// Microphone capture via cpal
//
// The blocking record runs on a dedicated thread (spawn_blocking) so the
// async session loop stays responsive to shutdown between chunks.

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Audio capture capability
///
/// Implementations:
/// - `MicCapture`: default input device via cpal
/// - test fakes returning deterministic PCM (no hardware needed)
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Capture roughly `duration` of audio and return mono i16 PCM at the
    /// configured sample rate. Blocks (logically) for the full duration.
    async fn capture(&self, duration: Duration) -> Result<Vec<i16>>;

    /// Capture source name for logging
    fn name(&self) -> &str;
}

/// Default microphone backend.
///
/// Opens the default input device per chunk, converts whatever format the
/// hardware delivers (f32/i16/u16, any channel count) to mono i16, and
/// decimates to the target sample rate.
pub struct MicCapture {
    sample_rate: u32,
}

impl MicCapture {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

#[async_trait::async_trait]
impl AudioCapture for MicCapture {
    async fn capture(&self, duration: Duration) -> Result<Vec<i16>> {
        let target_rate = self.sample_rate;
        tokio::task::spawn_blocking(move || record_blocking(duration, target_rate))
            .await
            .context("capture task panicked")?
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

fn record_blocking(duration: Duration, target_rate: u32) -> Result<Vec<i16>> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("no default input device available")?;
    let device_name = device
        .name()
        .unwrap_or_else(|_| "unknown input device".to_string());

    let default_config = device
        .default_input_config()
        .context("failed to query input device configuration")?;
    let format = default_config.sample_format();
    let device_config: StreamConfig = default_config.into();
    let device_rate = device_config.sample_rate.0;
    let channels = usize::from(device_config.channels.max(1));

    debug!(
        "capture config: device={} format={:?} rate={}Hz channels={}",
        device_name, format, device_rate, channels
    );

    // cpal delivers samples on a callback thread; collect them in a shared
    // buffer and take ownership once the stream is torn down.
    let expected = (duration.as_secs_f64() * device_rate as f64).ceil() as usize;
    let buffer = Arc::new(Mutex::new(Vec::<i16>::with_capacity(expected)));
    let buffer_clone = Arc::clone(&buffer);

    let err_fn = |err| warn!("audio stream error: {err}");

    let stream = match format {
        SampleFormat::F32 => device.build_input_stream(
            &device_config,
            move |data: &[f32], _| {
                if let Ok(mut buf) = buffer_clone.lock() {
                    append_mono_samples(&mut buf, data, channels, |s| {
                        (s * 32_767.0).clamp(-32_768.0, 32_767.0) as i16
                    });
                }
            },
            err_fn,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            &device_config,
            move |data: &[i16], _| {
                if let Ok(mut buf) = buffer_clone.lock() {
                    append_mono_samples(&mut buf, data, channels, |s| s);
                }
            },
            err_fn,
            None,
        )?,
        SampleFormat::U16 => device.build_input_stream(
            &device_config,
            move |data: &[u16], _| {
                if let Ok(mut buf) = buffer_clone.lock() {
                    append_mono_samples(&mut buf, data, channels, |s| {
                        (i32::from(s) - 32_768) as i16
                    });
                }
            },
            err_fn,
            None,
        )?,
        other => bail!("unsupported input sample format: {other:?}"),
    };

    stream.play().context("failed to start input stream")?;
    std::thread::sleep(duration);
    if let Err(err) = stream.pause() {
        warn!("failed to pause input stream: {err}");
    }
    drop(stream);

    let samples = {
        let mut buf = buffer
            .lock()
            .map_err(|_| anyhow!("capture buffer lock poisoned"))?;
        std::mem::take(&mut *buf)
    };

    if samples.is_empty() {
        bail!(
            "no samples captured from '{device_name}'; \
             check microphone permissions and availability"
        );
    }

    downsample(samples, device_rate, target_rate)
}

/// Downmix interleaved frames to mono by averaging channels, converting each
/// sample to i16 with `convert` first.
fn append_mono_samples<T: Copy>(
    buf: &mut Vec<i16>,
    data: &[T],
    channels: usize,
    convert: impl Fn(T) -> i16,
) {
    if channels <= 1 {
        buf.extend(data.iter().map(|&s| convert(s)));
        return;
    }

    for frame in data.chunks_exact(channels) {
        let sum: i32 = frame.iter().map(|&s| i32::from(convert(s))).sum();
        let avg = sum / channels as i32;
        buf.push(avg.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
    }
}

/// Decimate to the target rate. Only integer ratios are supported; hardware
/// that reports a non-multiple rate is rejected rather than silently warped.
fn downsample(samples: Vec<i16>, source_rate: u32, target_rate: u32) -> Result<Vec<i16>> {
    if source_rate == target_rate {
        return Ok(samples);
    }
    if target_rate == 0 || source_rate < target_rate || source_rate % target_rate != 0 {
        bail!(
            "cannot convert device rate {source_rate}Hz to {target_rate}Hz \
             (only integer decimation is supported)"
        );
    }

    let ratio = (source_rate / target_rate) as usize;
    Ok(samples.into_iter().step_by(ratio).collect())
}
