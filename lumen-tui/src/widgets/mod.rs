//! UI Widgets for Lumen

mod spectrum;
pub mod status_bar;

pub use spectrum::SpectrumWidget;
pub use status_bar::StatusBarWidget;
