//! Simple configuration persistence for Lumen
//!
//! Every key is optional; anything left unset falls back to the preset or the
//! built-in default when the analyzer config is assembled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use lumen_analysis::{AnalyzerConfig, Preset, DEFAULT_BAR_COUNT, DEFAULT_BLOCK_SIZE};
use lumen_tui::Theme;
use tracing::warn;

/// Default frame rate for the UI loop
pub const DEFAULT_FPS: u32 = 60;

/// Application configuration
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    /// Input device name (substring match)
    pub device: Option<String>,
    pub preset: Option<Preset>,
    pub theme: Option<Theme>,
    pub fps: Option<u32>,
    pub bars: Option<usize>,
    pub block_size: Option<usize>,
    pub min_freq: Option<f32>,
    pub linear_cutoff: Option<f32>,
    pub linear_ratio: Option<f32>,
    pub noise_floor_db: Option<f32>,
    pub gate_margin_db: Option<f32>,
    pub peak_decay: Option<f32>,
    pub peak_floor: Option<f32>,
}

impl Config {
    /// Load config from a path, or the default config if the file is missing
    ///
    /// An unreadable file is logged and treated as missing.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.serialize();
        fs::write(path, content)
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lumen")
            .join("config.txt")
    }

    pub fn preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone().unwrap_or_default()
    }

    pub fn fps(&self) -> u32 {
        self.fps.unwrap_or(DEFAULT_FPS).max(1)
    }

    pub fn block_size(&self) -> usize {
        self.block_size.unwrap_or(DEFAULT_BLOCK_SIZE)
    }

    /// Analyzer config for a stream, with this config's overrides on `preset`
    pub fn analyzer_config(&self, sample_rate: u32, preset: Preset) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::new(sample_rate, preset);
        config.bar_count = self.bars.unwrap_or(DEFAULT_BAR_COUNT);
        config.block_size = self.block_size();

        if let Some(v) = self.min_freq {
            config.layout.min_freq = v;
        }
        if let Some(v) = self.linear_cutoff {
            config.layout.linear_cutoff = v;
        }
        if let Some(v) = self.linear_ratio {
            config.layout.linear_ratio = v;
        }
        if let Some(v) = self.noise_floor_db {
            config.shaping.noise_floor_db = v;
        }
        if let Some(v) = self.gate_margin_db {
            config.shaping.gate_margin_db = v;
        }
        if let Some(v) = self.peak_decay {
            config.peak.decay = v;
        }
        if let Some(v) = self.peak_floor {
            config.peak.floor = v;
        }

        config
    }

    /// Parse config from simple key=value format
    fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("ignoring config line without '=': {}", line);
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "device" => {
                    if !value.is_empty() {
                        config.device = Some(value.to_string());
                    }
                }
                "preset" => {
                    config.preset = Preset::from_name(value);
                    if config.preset.is_none() {
                        warn!("unknown preset in config: {}", value);
                    }
                }
                "theme" => {
                    config.theme = Theme::by_name(value);
                    if config.theme.is_none() {
                        warn!("unknown theme in config: {}", value);
                    }
                }
                "fps" => config.fps = parse_value(key, value),
                "bars" => config.bars = parse_value(key, value),
                "block_size" => config.block_size = parse_value(key, value),
                "min_freq" => config.min_freq = parse_value(key, value),
                "linear_cutoff" => config.linear_cutoff = parse_value(key, value),
                "linear_ratio" => config.linear_ratio = parse_value(key, value),
                "noise_floor_db" => config.noise_floor_db = parse_value(key, value),
                "gate_margin_db" => config.gate_margin_db = parse_value(key, value),
                "peak_decay" => config.peak_decay = parse_value(key, value),
                "peak_floor" => config.peak_floor = parse_value(key, value),
                _ => {} // Ignore unknown keys
            }
        }

        config
    }

    /// Serialize config to simple key=value format
    fn serialize(&self) -> String {
        let mut lines = vec!["# Lumen Configuration".to_string()];

        if let Some(ref device) = self.device {
            lines.push(format!("device={}", device));
        }
        if let Some(preset) = self.preset {
            lines.push(format!("preset={}", preset.name()));
        }
        if let Some(ref theme) = self.theme {
            lines.push(format!("theme={}", theme.name));
        }
        push_value(&mut lines, "fps", self.fps);
        push_value(&mut lines, "bars", self.bars);
        push_value(&mut lines, "block_size", self.block_size);
        push_value(&mut lines, "min_freq", self.min_freq);
        push_value(&mut lines, "linear_cutoff", self.linear_cutoff);
        push_value(&mut lines, "linear_ratio", self.linear_ratio);
        push_value(&mut lines, "noise_floor_db", self.noise_floor_db);
        push_value(&mut lines, "gate_margin_db", self.gate_margin_db);
        push_value(&mut lines, "peak_decay", self.peak_decay);
        push_value(&mut lines, "peak_floor", self.peak_floor);

        lines.join("\n")
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid value for {}: {}", key, value);
            None
        }
    }
}

fn push_value<T: std::fmt::Display>(lines: &mut Vec<String>, key: &str, value: Option<T>) {
    if let Some(v) = value {
        lines.push(format!("{}={}", key, v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("");
        assert_eq!(config, Config::default());
        assert_eq!(config.preset(), Preset::Balanced);
        assert_eq!(config.fps(), DEFAULT_FPS);
        assert_eq!(config.block_size(), DEFAULT_BLOCK_SIZE);
    }

    #[test]
    fn test_parse_with_comments() {
        let content = "# Comment\ndevice = Monitor of Built-in\n# Another comment\npreset=SMOOTH";
        let config = Config::parse(content);
        assert_eq!(config.device.as_deref(), Some("Monitor of Built-in"));
        assert_eq!(config.preset, Some(Preset::Smooth));
    }

    #[test]
    fn test_parse_ignores_bad_values() {
        let content = "fps=fast\nbars=64\ntheme=sepia\npreset=loud\nwhatever=1\nnot a pair";
        let config = Config::parse(content);
        assert_eq!(config.fps, None);
        assert_eq!(config.bars, Some(64));
        assert_eq!(config.theme, None);
        assert_eq!(config.preset, None);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config {
            device: Some("USB Audio".to_string()),
            preset: Some(Preset::Smooth),
            theme: Theme::by_name("amber"),
            fps: Some(30),
            linear_ratio: Some(0.4),
            peak_floor: Some(0.05),
            ..Config::default()
        };

        let parsed = Config::parse(&config.serialize());
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_analyzer_config_overrides() {
        let config = Config {
            bars: Some(64),
            block_size: Some(2048),
            linear_cutoff: Some(1000.0),
            noise_floor_db: Some(-80.0),
            peak_decay: Some(0.99),
            ..Config::default()
        };

        let analyzer = config.analyzer_config(44100, Preset::Smooth);
        assert_eq!(analyzer.sample_rate, 44100);
        assert_eq!(analyzer.bar_count, 64);
        assert_eq!(analyzer.block_size, 2048);
        assert_eq!(analyzer.layout.linear_cutoff, 1000.0);
        assert_eq!(analyzer.layout.linear_ratio, Preset::Smooth.layout().linear_ratio);
        assert_eq!(analyzer.shaping.noise_floor_db, -80.0);
        assert_eq!(analyzer.peak.decay, 0.99);
        assert_eq!(analyzer.validate(), Ok(()));
    }

    #[test]
    fn test_fps_never_zero() {
        let config = Config {
            fps: Some(0),
            ..Config::default()
        };
        assert_eq!(config.fps(), 1);
    }
}
