//! Guess-feedback cue sounds
//!
//! Cues are one-shot voices mixed on top of whatever else is playing.
//! They share nothing with the player: no state, no scope tap, and any
//! number of them may overlap.

use std::sync::Arc;
use voxguess_library::DecodedClip;

/// Which cue to play after a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Correct,
    Wrong,
}

/// Cue playback volume, relative to the main clip
const CUE_GAIN: f32 = 0.5;

struct CueVoice {
    clip: Arc<DecodedClip>,
    position: usize,
}

/// Pre-decoded cue clips plus the currently sounding voices
#[derive(Default)]
pub struct CueBank {
    correct: Option<Arc<DecodedClip>>,
    wrong: Option<Arc<DecodedClip>>,
    voices: Vec<CueVoice>,
}

impl CueBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_clip(&mut self, kind: CueKind, clip: Arc<DecodedClip>) {
        match kind {
            CueKind::Correct => self.correct = Some(clip),
            CueKind::Wrong => self.wrong = Some(clip),
        }
    }

    /// Start a cue. Returns false when its clip never loaded, in which
    /// case the game simply proceeds without audible feedback.
    pub fn trigger(&mut self, kind: CueKind) -> bool {
        let clip = match kind {
            CueKind::Correct => self.correct.clone(),
            CueKind::Wrong => self.wrong.clone(),
        };
        match clip {
            Some(clip) => {
                self.voices.push(CueVoice { clip, position: 0 });
                true
            }
            None => false,
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Add all sounding cues into `output` (stereo interleaved),
    /// dropping voices that have finished.
    pub fn mix(&mut self, output: &mut [f32]) {
        for voice in &mut self.voices {
            let samples = &voice.clip.samples;
            for frame in output.chunks_mut(2) {
                if voice.position + 1 >= samples.len() {
                    break;
                }
                frame[0] += samples[voice.position] * CUE_GAIN;
                if frame.len() > 1 {
                    frame[1] += samples[voice.position + 1] * CUE_GAIN;
                }
                voice.position += 2;
            }
        }
        self.voices
            .retain(|v| v.position + 1 < v.clip.samples.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::tests::clip;

    fn constant_clip(frames: usize, value: f32) -> Arc<DecodedClip> {
        Arc::new(DecodedClip {
            samples: vec![value; frames * 2],
            sample_rate: 8000,
            duration_secs: frames as f64 / 8000.0,
        })
    }

    #[test]
    fn test_trigger_without_clip_is_refused() {
        let mut bank = CueBank::new();
        assert!(!bank.trigger(CueKind::Correct));
        assert_eq!(bank.active_voices(), 0);

        bank.set_clip(CueKind::Correct, clip(16));
        assert!(bank.trigger(CueKind::Correct));
        assert_eq!(bank.active_voices(), 1);
    }

    #[test]
    fn test_overlapping_cues_sum() {
        let mut bank = CueBank::new();
        bank.set_clip(CueKind::Correct, constant_clip(64, 0.2));
        bank.set_clip(CueKind::Wrong, constant_clip(64, 0.4));
        bank.trigger(CueKind::Correct);
        bank.trigger(CueKind::Wrong);

        let mut out = [0.0f32; 16];
        bank.mix(&mut out);
        for &s in &out {
            assert!((s - (0.2 + 0.4) * 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_finished_voice_is_dropped() {
        let mut bank = CueBank::new();
        bank.set_clip(CueKind::Wrong, constant_clip(4, 0.1));
        bank.trigger(CueKind::Wrong);

        let mut out = [0.0f32; 32];
        bank.mix(&mut out);
        assert_eq!(bank.active_voices(), 0);
        // Output past the cue's end is untouched.
        assert!(out[8..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_mix_adds_on_top_of_existing_output() {
        let mut bank = CueBank::new();
        bank.set_clip(CueKind::Correct, constant_clip(16, 0.2));
        bank.trigger(CueKind::Correct);

        let mut out = [0.5f32; 8];
        bank.mix(&mut out);
        for &s in &out {
            assert!((s - 0.6).abs() < 1e-6);
        }
    }
}
