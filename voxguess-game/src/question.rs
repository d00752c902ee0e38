//! Question model

/// Who produced a clip: a speech synthesizer or a human speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKind {
    Ai,
    Human,
}

impl VoiceKind {
    pub fn label(self) -> &'static str {
        match self {
            VoiceKind::Ai => "AI",
            VoiceKind::Human => "HUMAN",
        }
    }
}

/// One audio trial. Immutable once generated; a session owns an ordered
/// batch of these.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: u32,
    pub kind: VoiceKind,
    pub audio_url: String,
    /// Present for some HUMAN clips, never for AI. Carried for
    /// completeness, not played back.
    pub video_url: Option<String>,
}
