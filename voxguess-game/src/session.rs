//! Session record - one question batch plus running tallies

use crate::question::{Question, VoiceKind};

/// Score breakdown carried into the finished screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub ai_score: u32,
    pub ai_total: u32,
    pub human_score: u32,
    pub human_total: u32,
}

impl Summary {
    pub fn total_score(&self) -> u32 {
        self.ai_score + self.human_score
    }

    pub fn total_rounds(&self) -> u32 {
        self.ai_total + self.human_total
    }
}

/// The mutable state of one play-through. Owned by the game state
/// machine and mutated only through its transitions.
///
/// Invariants: `current < questions.len()`,
/// `ai_total + human_total == questions.len()`,
/// `ai_score <= ai_total`, `human_score <= human_total`.
#[derive(Debug)]
pub struct Session {
    questions: Vec<Question>,
    current: usize,
    ai_score: u32,
    human_score: u32,
    ai_total: u32,
    human_total: u32,
}

impl Session {
    /// Build a session over a non-empty question batch.
    pub fn new(questions: Vec<Question>) -> Self {
        debug_assert!(!questions.is_empty());
        let ai_total = questions
            .iter()
            .filter(|q| q.kind == VoiceKind::Ai)
            .count() as u32;
        let human_total = questions.len() as u32 - ai_total;
        Self {
            questions,
            current: 0,
            ai_score: 0,
            human_score: 0,
            ai_total,
            human_total,
        }
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// The question after the current one, if any. Used for prefetch.
    pub fn next_question(&self) -> Option<&Question> {
        self.questions.get(self.current + 1)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.questions.len()
    }

    /// Credit a correct guess to the matching category.
    pub fn record_correct(&mut self, kind: VoiceKind) {
        match kind {
            VoiceKind::Ai => self.ai_score += 1,
            VoiceKind::Human => self.human_score += 1,
        }
    }

    /// Move to the next round. Caller checks `is_last()` first.
    pub fn advance(&mut self) {
        if !self.is_last() {
            self.current += 1;
        }
    }

    pub fn ai_score(&self) -> u32 {
        self.ai_score
    }

    pub fn human_score(&self) -> u32 {
        self.human_score
    }

    pub fn total_score(&self) -> u32 {
        self.ai_score + self.human_score
    }

    pub fn summary(&self) -> Summary {
        Summary {
            ai_score: self.ai_score,
            ai_total: self.ai_total,
            human_score: self.human_score,
            human_total: self.human_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, kind: VoiceKind) -> Question {
        Question {
            id,
            kind,
            audio_url: format!("clip_{id}.mp3"),
            video_url: None,
        }
    }

    #[test]
    fn test_totals_from_questions() {
        let session = Session::new(vec![
            question(1, VoiceKind::Ai),
            question(2, VoiceKind::Human),
            question(3, VoiceKind::Ai),
        ]);
        let summary = session.summary();
        assert_eq!(summary.ai_total, 2);
        assert_eq!(summary.human_total, 1);
        assert_eq!(summary.total_rounds(), 3);
    }

    #[test]
    fn test_advance_stops_at_last() {
        let mut session = Session::new(vec![
            question(1, VoiceKind::Ai),
            question(2, VoiceKind::Human),
        ]);
        assert!(!session.is_last());
        session.advance();
        assert!(session.is_last());
        session.advance();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_next_question_for_prefetch() {
        let mut session = Session::new(vec![
            question(1, VoiceKind::Ai),
            question(2, VoiceKind::Human),
        ]);
        assert_eq!(session.next_question().map(|q| q.id), Some(2));
        session.advance();
        assert!(session.next_question().is_none());
    }
}
