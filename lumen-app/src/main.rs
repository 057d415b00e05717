//! Lumen - live spectrum visualizer
//!
//! Captures an audio input and renders it as spectrum bars in the terminal.

mod cli;
mod config;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lumen_analysis::{SampleBuffer, SpectrumPipeline};
use lumen_audio::{list_input_devices, AudioCapture, CaptureEvent};
use lumen_tui::{App, AppState, SpectrumWidget, StatusBarWidget};

use crate::cli::Args;
use crate::config::Config;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config_path = args.config_path();
    let mut config = Config::load_or_default(&config_path);
    args.apply_to(&mut config);

    if args.list_devices {
        for name in list_input_devices().context("failed to list input devices")? {
            println!("{}", name);
        }
        return Ok(());
    }

    if args.write_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let (evt_tx, evt_rx) = AudioCapture::create_channel();
    let capture = AudioCapture::start(config.device.as_deref(), config.block_size(), evt_tx)
        .context("failed to start audio capture")?;
    let buffer = capture.buffer();

    let preset = config.preset();
    let pipeline = SpectrumPipeline::new(config.analyzer_config(capture.sample_rate(), preset))
        .context("invalid analyzer configuration")?;

    let mut state = AppState::new(
        capture.device_name(),
        capture.sample_rate(),
        buffer.block_size(),
        preset,
    );
    state.theme = config.theme();
    let app = App::new(state);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, app, pipeline, &buffer, &evt_rx, &config);

    // Stop producing before the buffer goes away
    drop(capture);
    drop(buffer);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to a file under the data directory; the terminal belongs to the UI
fn init_logging() -> anyhow::Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lumen");
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("lumen.log");
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut pipeline: SpectrumPipeline,
    buffer: &SampleBuffer,
    events: &Receiver<CaptureEvent>,
    config: &Config,
) -> anyhow::Result<()> {
    let frame_duration = Duration::from_secs_f64(1.0 / config.fps() as f64);
    let sample_rate = pipeline.config().sample_rate;

    app.state
        .set_message(format!("Listening on {}", app.state.device_name));

    loop {
        let frame_start = Instant::now();
        if app.should_quit {
            break;
        }

        // Process capture events
        while let Ok(event) = events.try_recv() {
            match event {
                CaptureEvent::Error(msg) => app.state.set_error(format!("Stream error: {}", msg)),
            }
        }

        pipeline.frame(buffer);
        app.state.update_spectrum(pipeline.display(), pipeline.peak());
        app.state.tick();

        // Render
        terminal.draw(|frame| render_ui(frame, &app))?;

        // Handle input
        let timeout = frame_duration.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let previous = app.state.preset;
                if handle_key(&mut app, key) {
                    let preset = app.state.preset;
                    match SpectrumPipeline::new(config.analyzer_config(sample_rate, preset)) {
                        Ok(rebuilt) => {
                            pipeline = rebuilt;
                            info!(preset = preset.name(), "pipeline rebuilt");
                            app.state.set_message(format!("Preset: {}", preset.name()));
                        }
                        Err(e) => {
                            warn!("preset {} rejected: {}", preset.name(), e);
                            app.state.preset = previous;
                            app.state.set_error(format!("Preset {}: {}", preset.name(), e));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Apply a key press to the app, returns true when the preset changed
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('t') => app.state.cycle_theme(),
        KeyCode::Char(' ') => app.state.toggle_freeze(),
        KeyCode::Char('p') => {
            app.state.preset = app.state.preset.cycle();
            return true;
        }
        _ => {}
    }
    false
}

fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let theme = &app.state.theme;

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Spectrum
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let spectrum = SpectrumWidget::new(&app.state.magnitudes, theme).title(" LUMEN ");
    frame.render_widget(spectrum, chunks[0]);
    frame.render_widget(StatusBarWidget::new(&app.state), chunks[1]);
}
