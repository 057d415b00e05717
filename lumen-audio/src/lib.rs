//! Audio capture for Lumen
//!
//! Opens an input device with cpal, downmixes to mono and publishes
//! fixed-size blocks into a [`lumen_analysis::SampleBuffer`].

mod assembler;
mod capture;

pub use assembler::BlockAssembler;
pub use capture::{list_input_devices, AudioCapture, CaptureError, CaptureEvent};
