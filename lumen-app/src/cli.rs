//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use lumen_analysis::Preset;
use lumen_tui::Theme;

use crate::config::Config;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "lumen")]
#[command(about = "Live terminal spectrum visualizer for audio input", long_about = None)]
pub struct Args {
    /// Input device (case-insensitive substring of the device name)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Tuning preset: balanced (default), smooth
    #[arg(long, value_name = "PRESET", value_parser = parse_preset)]
    pub preset: Option<Preset>,

    /// Color theme: pastel (default), phosphor-green, amber, cyberpunk
    #[arg(long, value_name = "THEME", value_parser = parse_theme)]
    pub theme: Option<Theme>,

    /// UI frame rate
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,

    /// Number of spectrum bars
    #[arg(long, value_name = "COUNT")]
    pub bars: Option<usize>,

    /// Analysis block size in samples
    #[arg(long, value_name = "SAMPLES")]
    pub block_size: Option<usize>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the available input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Write the merged configuration to the config file and exit
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    /// Config file path selected by `--config` or the default location
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }

    /// Override file settings with the flags given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref device) = self.device {
            config.device = Some(device.clone());
        }
        if let Some(preset) = self.preset {
            config.preset = Some(preset);
        }
        if let Some(ref theme) = self.theme {
            config.theme = Some(theme.clone());
        }
        if let Some(fps) = self.fps {
            config.fps = Some(fps);
        }
        if let Some(bars) = self.bars {
            config.bars = Some(bars);
        }
        if let Some(block_size) = self.block_size {
            config.block_size = Some(block_size);
        }
    }
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    Preset::from_name(s).ok_or_else(|| {
        let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
        format!("unknown preset '{}' (expected one of: {})", s, names.join(", "))
    })
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::by_name(s).ok_or_else(|| {
        let names: Vec<_> = lumen_tui::ALL_THEMES.iter().map(|t| t.name).collect();
        format!("unknown theme '{}' (expected one of: {})", s, names.join(", "))
    })
}
