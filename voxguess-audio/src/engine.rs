//! Audio engine - command handling and the app-side handle

use crate::cue::{CueBank, CueKind};
use crate::player::{Player, PlayerSnapshot};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use voxguess_library::DecodedClip;

/// Commands sent to the audio thread
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Install the decoded clip for the current round
    LoadClip(Arc<DecodedClip>),
    Play,
    Stop,
    /// Install a pre-decoded cue clip
    LoadCue(CueKind, Arc<DecodedClip>),
    PlayCue(CueKind),
    Shutdown,
}

/// Events sent from the audio thread
#[derive(Debug, Clone)]
pub enum AudioEvent {
    /// Periodic state for UI rendering
    StateUpdate(PlayerSnapshot),
    /// The clip played through to its natural end
    ClipEnded { generation: u64 },
    /// Error occurred
    Error(String),
}

/// Engine state held on the audio thread
#[derive(Default)]
pub struct EngineState {
    player: Player,
    cues: CueBank,
    ended: Option<u64>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::LoadClip(clip) => self.player.load(clip),
            AudioCommand::Play => {
                if !self.player.play() {
                    tracing::debug!("play ignored: no clip loaded");
                }
            }
            AudioCommand::Stop => self.player.stop(),
            AudioCommand::LoadCue(kind, clip) => self.cues.set_clip(kind, clip),
            AudioCommand::PlayCue(kind) => {
                if !self.cues.trigger(kind) {
                    tracing::warn!(?kind, "cue clip not loaded, skipping feedback sound");
                }
            }
            AudioCommand::Shutdown => {} // Handled at higher level
        }
    }

    /// Fill an output buffer: the player voice, then cues on top.
    pub fn process(&mut self, output: &mut [f32]) {
        if let Some(generation) = self.player.process(output) {
            self.ended = Some(generation);
        }
        self.cues.mix(output);
    }

    /// Take the pending end-of-clip notification, if any.
    pub fn take_ended(&mut self) -> Option<u64> {
        self.ended.take()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.player.snapshot()
    }
}

/// Handle to communicate with the audio thread
pub struct AudioEngine {
    command_tx: Sender<AudioCommand>,
    pub event_rx: Receiver<AudioEvent>,
}

impl AudioEngine {
    /// Create channels for engine communication. 256 gives headroom
    /// for command bursts without saturation.
    #[allow(clippy::type_complexity)]
    pub fn create_channels() -> (
        Sender<AudioCommand>,
        Receiver<AudioCommand>,
        Sender<AudioEvent>,
        Receiver<AudioEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    pub fn new(command_tx: Sender<AudioCommand>, event_rx: Receiver<AudioEvent>) -> Self {
        Self {
            command_tx,
            event_rx,
        }
    }

    /// Send a command to the audio thread, dropping it if the channel
    /// is saturated.
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.try_send(AudioCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::tests::clip;
    use crate::player::PlayerState;

    #[test]
    fn test_play_before_load_is_inert() {
        let mut engine = EngineState::new();
        engine.handle_command(AudioCommand::Play);
        assert_eq!(engine.snapshot().state, PlayerState::Idle);
    }

    #[test]
    fn test_load_play_stop_cycle() {
        let mut engine = EngineState::new();
        engine.handle_command(AudioCommand::LoadClip(clip(256)));
        engine.handle_command(AudioCommand::Play);
        assert_eq!(engine.snapshot().state, PlayerState::Playing);

        let mut out = [0.0f32; 64];
        engine.process(&mut out);
        assert!(out.iter().any(|&s| s != 0.0));

        engine.handle_command(AudioCommand::Stop);
        let snap = engine.snapshot();
        assert_eq!(snap.state, PlayerState::Idle);
        // Scope flatlines after stop.
        assert!(snap.scope_samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_natural_end_is_reported_once() {
        let mut engine = EngineState::new();
        engine.handle_command(AudioCommand::LoadClip(clip(8)));
        let generation = engine.snapshot().generation;
        engine.handle_command(AudioCommand::Play);

        let mut out = [0.0f32; 64];
        engine.process(&mut out);
        assert_eq!(engine.take_ended(), Some(generation));
        assert_eq!(engine.take_ended(), None);
    }

    #[test]
    fn test_cue_plays_over_main_clip() {
        let mut engine = EngineState::new();
        engine.handle_command(AudioCommand::LoadClip(clip(1024)));
        engine.handle_command(AudioCommand::LoadCue(CueKind::Correct, clip(1024)));
        engine.handle_command(AudioCommand::Play);
        engine.handle_command(AudioCommand::PlayCue(CueKind::Correct));

        let mut mixed = [0.0f32; 64];
        engine.process(&mut mixed);
        // Playing the same ramp through player and cue at half gain
        // gives 1.5x the plain clip amplitude.
        let c = clip(1024);
        assert!((mixed[10] - c.samples[10] * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_unloaded_cue_is_skipped() {
        let mut engine = EngineState::new();
        engine.handle_command(AudioCommand::PlayCue(CueKind::Wrong));
        let mut out = [0.0f32; 16];
        engine.process(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
