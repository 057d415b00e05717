//! cpal input stream feeding the sample buffer

use crate::assembler::BlockAssembler;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use lumen_analysis::SampleBuffer;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Capacity of the capture event channel
const EVENT_CAPACITY: usize = 16;

/// Smallest block the analyzer can transform
const MIN_BLOCK_SIZE: usize = 2;

/// Capture setup errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Block size must be at least 2 samples, got {0}")]
    BlockTooSmall(usize),
    #[error("No audio input device found")]
    NoDevice,
    #[error("No input device matching '{0}'")]
    DeviceNotFound(String),
    #[error("Failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("Failed to get input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("Unsupported input sample format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to create input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("Failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Events reported by the running stream
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    Error(String),
}

/// A running input stream
///
/// Dropping it stops the stream. The [`SampleBuffer`] it fills outlives it
/// for as long as the frame loop holds a reference.
pub struct AudioCapture {
    _stream: Stream,
    buffer: Arc<SampleBuffer>,
    device_name: String,
    sample_rate: u32,
    channels: u16,
}

impl AudioCapture {
    /// Create the channel for capture events
    pub fn create_channel() -> (Sender<CaptureEvent>, Receiver<CaptureEvent>) {
        bounded(EVENT_CAPACITY)
    }

    /// Open an input device and start publishing `block_size` mono blocks
    ///
    /// `device` selects the first input device whose name contains it
    /// (case-insensitive); `None` uses the host's default input.
    pub fn start(
        device: Option<&str>,
        block_size: usize,
        events: Sender<CaptureEvent>,
    ) -> Result<Self, CaptureError> {
        check_block_size(block_size)?;

        let host = cpal::default_host();
        let device = select_device(&host, device)?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device.default_input_config()?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let buffer = SampleBuffer::new(block_size);
        let assembler = BlockAssembler::new(Arc::clone(&buffer), channels);

        let stream = build_stream(&device, &config, sample_format, assembler, events)?;
        stream.play()?;

        info!(
            device = %device_name,
            sample_rate,
            channels,
            format = ?sample_format,
            block_size,
            "audio capture started"
        );

        Ok(Self {
            _stream: stream,
            buffer,
            device_name,
            sample_rate,
            channels,
        })
    }

    /// Shared handle to the latest-block buffer
    pub fn buffer(&self) -> Arc<SampleBuffer> {
        Arc::clone(&self.buffer)
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

/// Names of all input devices on the default host
pub fn list_input_devices() -> Result<Vec<String>, CaptureError> {
    let host = cpal::default_host();
    let names = host
        .input_devices()?
        .filter_map(|device| device.name().ok())
        .collect();
    Ok(names)
}

fn select_device(host: &cpal::Host, hint: Option<&str>) -> Result<cpal::Device, CaptureError> {
    match hint {
        None => host.default_input_device().ok_or(CaptureError::NoDevice),
        Some(hint) => host
            .input_devices()?
            .find(|device| {
                device
                    .name()
                    .map(|name| name_matches(&name, hint))
                    .unwrap_or(false)
            })
            .ok_or_else(|| CaptureError::DeviceNotFound(hint.to_string())),
    }
}

fn check_block_size(block_size: usize) -> Result<(), CaptureError> {
    if block_size < MIN_BLOCK_SIZE {
        return Err(CaptureError::BlockTooSmall(block_size));
    }
    Ok(())
}

/// Case-insensitive substring match of a device name against a user hint
fn name_matches(name: &str, hint: &str) -> bool {
    name.to_lowercase().contains(&hint.trim().to_lowercase())
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    mut assembler: BlockAssembler,
    events: Sender<CaptureEvent>,
) -> Result<Stream, CaptureError> {
    let err_fn = move |err: cpal::StreamError| {
        warn!("audio stream error: {}", err);
        let _ = events.try_send(CaptureEvent::Error(err.to_string()));
    };

    let stream = match sample_format {
        SampleFormat::F32 => device.build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                assembler.push_interleaved(data.iter().copied());
            },
            err_fn,
            None,
        )?,
        SampleFormat::I16 => device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                let scale = i16::MAX as f32;
                assembler.push_interleaved(data.iter().map(|&s| s as f32 / scale));
            },
            err_fn,
            None,
        )?,
        SampleFormat::U16 => device.build_input_stream(
            config,
            move |data: &[u16], _: &cpal::InputCallbackInfo| {
                let scale = u16::MAX as f32;
                assembler.push_interleaved(data.iter().map(|&s| (s as f32 / scale) * 2.0 - 1.0));
            },
            err_fn,
            None,
        )?,
        other => return Err(CaptureError::UnsupportedFormat(format!("{:?}", other))),
    };

    Ok(stream)
}
