//! UI widgets for voxguess

mod score_bar;
mod status_bar;
mod wave;

pub use score_bar::ScoreBarWidget;
pub use status_bar::StatusBarWidget;
pub use wave::{WaveWidget, PHASE_STEP};
