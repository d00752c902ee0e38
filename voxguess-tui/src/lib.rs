//! Terminal UI for voxguess - views, widgets, and theme

mod theme;
mod views;
pub mod widgets;

pub use theme::Theme;
pub use views::{render, UiState};
pub use widgets::{ScoreBarWidget, StatusBarWidget, WaveWidget, PHASE_STEP};
