//! Terminal UI for Lumen - spectrum bars, themes, and status bar

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, MessageType};
pub use theme::{Theme, ALL_THEMES, CRT_AMBER, CRT_GREEN, CYBERPUNK, PASTEL};
pub use widgets::{SpectrumWidget, StatusBarWidget};
