//! Application state management (Elm architecture)

use crate::theme::Theme;
use lumen_analysis::Preset;

/// Message type for colored status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Error,
}

/// Number of frames a status message stays visible
const MESSAGE_FRAMES: u32 = 180;

/// Everything the UI renders from
#[derive(Debug, Clone)]
pub struct AppState {
    pub theme: Theme,
    pub preset: Preset,
    pub device_name: String,
    pub sample_rate: u32,
    pub block_size: usize,
    /// Display magnitudes (0.0 - 1.0) of the last unfrozen frame
    pub magnitudes: Vec<f32>,
    /// Normalization ceiling of the last unfrozen frame
    pub peak: f32,
    /// When set, new frames are analyzed but not shown
    pub frozen: bool,
    pub message: Option<(String, MessageType)>,
    message_frames: u32,
    pub frame_count: u64,
}

impl AppState {
    pub fn new(device_name: impl Into<String>, sample_rate: u32, block_size: usize, preset: Preset) -> Self {
        Self {
            theme: Theme::default(),
            preset,
            device_name: device_name.into(),
            sample_rate,
            block_size,
            magnitudes: Vec::new(),
            peak: 0.0,
            frozen: false,
            message: None,
            message_frames: 0,
            frame_count: 0,
        }
    }

    /// Take a new frame of display magnitudes (ignored while frozen)
    pub fn update_spectrum(&mut self, magnitudes: &[f32], peak: f32) {
        if self.frozen {
            return;
        }
        self.magnitudes.clear();
        self.magnitudes.extend_from_slice(magnitudes);
        self.peak = peak;
    }

    /// Advance per-frame timers (call once per frame)
    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
        if self.message_frames > 0 {
            self.message_frames -= 1;
            if self.message_frames == 0 {
                self.message = None;
            }
        }
    }

    pub fn toggle_freeze(&mut self) {
        self.frozen = !self.frozen;
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.set_message(format!("Theme: {}", self.theme.name));
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageType::Info));
        self.message_frames = MESSAGE_FRAMES;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageType::Error));
        self.message_frames = MESSAGE_FRAMES;
    }
}

/// Main application
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_keeps_last_frame() {
        let mut state = AppState::new("mic", 48000, 4096, Preset::Balanced);
        state.update_spectrum(&[0.2, 0.4], 1.0);
        state.toggle_freeze();
        state.update_spectrum(&[0.9, 0.9], 2.0);
        assert_eq!(state.magnitudes, vec![0.2, 0.4]);
        assert_eq!(state.peak, 1.0);

        state.toggle_freeze();
        state.update_spectrum(&[0.9, 0.9], 2.0);
        assert_eq!(state.magnitudes, vec![0.9, 0.9]);
    }

    #[test]
    fn test_message_expires() {
        let mut state = AppState::new("mic", 48000, 4096, Preset::Balanced);
        state.set_error("boom");
        for _ in 0..MESSAGE_FRAMES - 1 {
            state.tick();
        }
        assert!(state.message.is_some());
        state.tick();
        assert!(state.message.is_none());
    }

    #[test]
    fn test_cycle_theme_announces() {
        let mut state = AppState::new("mic", 48000, 4096, Preset::Balanced);
        state.cycle_theme();
        assert_eq!(state.theme.name, "phosphor-green");
        assert_eq!(
            state.message,
            Some(("Theme: phosphor-green".to_string(), MessageType::Info))
        );
    }
}
