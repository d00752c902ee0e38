//! Round state machine: intro -> playing -> finished
//!
//! Every transition that is not legal in the current phase is a silent
//! no-op; callers never need to pre-check the phase.

use crate::question::{Question, VoiceKind};
use crate::session::{Session, Summary};
use crate::source::{QuestionFetchError, QuestionSource};

/// Upper bound for the intro round picker.
pub const MAX_ROUNDS: usize = 20;

/// Result of the player's most recent guess. Present only between a
/// guess and the advance to the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

/// Phase of the game. Each variant carries only the data that exists in
/// that phase, so e.g. feedback cannot outlive a session.
#[derive(Debug)]
pub enum GameState {
    Intro,
    Playing {
        session: Session,
        feedback: Option<Feedback>,
        /// Set once the current round's clip is decoded. Guesses and
        /// playback are rejected until then.
        clip_ready: bool,
    },
    Finished {
        summary: Summary,
    },
}

/// The game: selected round count plus the current phase.
pub struct Game {
    rounds: usize,
    state: GameState,
}

impl Game {
    pub fn new(default_rounds: usize) -> Self {
        Self {
            rounds: default_rounds.clamp(1, MAX_ROUNDS),
            state: GameState::Intro,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Adjust the round picker. Only meaningful on the intro screen.
    pub fn adjust_rounds(&mut self, delta: i64) {
        if matches!(self.state, GameState::Intro) {
            let rounds = self.rounds as i64 + delta;
            self.rounds = rounds.clamp(1, MAX_ROUNDS as i64) as usize;
        }
    }

    /// Fetch a question batch and enter the playing phase. On failure
    /// the error is returned and the game stays on the intro screen.
    ///
    /// Returns `Ok(false)` when not on the intro screen.
    pub fn start_session(
        &mut self,
        source: &mut dyn QuestionSource,
    ) -> Result<bool, QuestionFetchError> {
        if !matches!(self.state, GameState::Intro) {
            return Ok(false);
        }
        let questions = source.fetch(self.rounds)?;
        Ok(self.begin(questions))
    }

    /// Enter the playing phase with an already-fetched batch. Used by
    /// the app after an off-thread fetch resolves.
    pub fn begin(&mut self, questions: Vec<Question>) -> bool {
        if !matches!(self.state, GameState::Intro) || questions.is_empty() {
            return false;
        }
        self.state = GameState::Playing {
            session: Session::new(questions),
            feedback: None,
            clip_ready: false,
        };
        true
    }

    /// Mark the current round's clip as decoded and playable.
    pub fn clip_loaded(&mut self) {
        if let GameState::Playing { clip_ready, .. } = &mut self.state {
            *clip_ready = true;
        }
    }

    /// True once the current round's clip is ready to play.
    pub fn clip_ready(&self) -> bool {
        matches!(self.state, GameState::Playing { clip_ready: true, .. })
    }

    /// The question currently on screen, while playing.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            GameState::Playing { session, .. } => Some(session.current_question()),
            _ => None,
        }
    }

    /// Resolve the current round with a guess. Exactly one guess per
    /// round; repeats, guesses before the clip has loaded, and guesses
    /// outside the playing phase are rejected with `None`.
    pub fn guess(&mut self, choice: VoiceKind) -> Option<Feedback> {
        let GameState::Playing {
            session,
            feedback,
            clip_ready,
        } = &mut self.state
        else {
            return None;
        };
        if feedback.is_some() || !*clip_ready {
            return None;
        }

        let actual = session.current_question().kind;
        let result = if actual == choice {
            session.record_correct(actual);
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
        *feedback = Some(result);
        Some(result)
    }

    /// Clear feedback and move on: to the next round, or to the
    /// finished screen after the last one. No-op while feedback is
    /// unset.
    pub fn advance(&mut self) -> bool {
        let summary = match &mut self.state {
            GameState::Playing {
                session,
                feedback,
                clip_ready,
            } if feedback.is_some() => {
                *feedback = None;
                if session.is_last() {
                    session.summary()
                } else {
                    session.advance();
                    *clip_ready = false;
                    return true;
                }
            }
            _ => return false,
        };
        self.state = GameState::Finished { summary };
        true
    }

    /// Abandon or rematch: back to the intro from any phase.
    pub fn go_home(&mut self) {
        self.state = GameState::Intro;
    }
}
