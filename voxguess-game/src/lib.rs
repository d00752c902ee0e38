//! Game logic for voxguess - question supply, session record, and the
//! round state machine.
//!
//! Nothing in this crate touches audio or the terminal; the app crate
//! wires guesses to playback and cue sounds.

mod game;
mod question;
mod session;
mod source;

pub use game::{Feedback, Game, GameState, MAX_ROUNDS};
pub use question::{Question, VoiceKind};
pub use session::{Session, Summary};
pub use source::{
    LocalSource, QuestionFetchError, QuestionSource, RemoteSource, AI_CATALOG, HUMAN_CATALOG,
};
