//! Playback engine for voxguess
//!
//! One player voice for the round's clip, independent fire-and-forget
//! cue voices for guess feedback, and the command/event channels the
//! app uses to talk to the audio thread.

mod cue;
mod engine;
mod player;

pub use cue::{CueBank, CueKind};
pub use engine::{AudioCommand, AudioEngine, AudioEvent, EngineState};
pub use player::{Player, PlayerSnapshot, PlayerState, SCOPE_FRAMES};
