//! The single player voice for the current round's clip

use std::sync::Arc;
use voxguess_library::DecodedClip;

/// Frames of recent output kept for the visualizer (stereo).
pub const SCOPE_FRAMES: usize = 512;

/// Playback state for the player voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
}

/// Player state snapshot for UI rendering
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub position_secs: f64,
    pub duration_secs: f64,
    /// Epoch of the loaded clip; bumped on every load so the UI can
    /// discard snapshots from a superseded clip.
    pub generation: u64,
    /// Recent output for the visualizer (stereo interleaved)
    pub scope_samples: Box<[f32; SCOPE_FRAMES * 2]>,
}

/// Plays at most one decoded clip from offset zero. Loading a new clip
/// replaces the old one wholesale and bumps the generation counter.
pub struct Player {
    clip: Option<Arc<DecodedClip>>,
    /// Position in samples (interleaved stereo)
    position: usize,
    state: PlayerState,
    generation: u64,
    /// Ring buffer of the player's own output, excludes cues
    scope_buffer: Box<[f32; Self::SCOPE_BUFFER_SIZE]>,
    scope_write_pos: usize,
}

impl Player {
    const SCOPE_BUFFER_SIZE: usize = SCOPE_FRAMES * 2;

    pub fn new() -> Self {
        Self {
            clip: None,
            position: 0,
            state: PlayerState::Idle,
            generation: 0,
            scope_buffer: Box::new([0.0; Self::SCOPE_BUFFER_SIZE]),
            scope_write_pos: 0,
        }
    }

    /// Swap in the clip for a new round. Tears down whatever was
    /// playing and starts a new epoch.
    pub fn load(&mut self, clip: Arc<DecodedClip>) {
        self.clip = Some(clip);
        self.position = 0;
        self.state = PlayerState::Idle;
        self.generation += 1;
        self.scope_buffer.fill(0.0);
    }

    /// Start playback from offset zero. No-op without a loaded clip.
    pub fn play(&mut self) -> bool {
        if self.clip.is_none() {
            return false;
        }
        self.position = 0;
        self.state = PlayerState::Playing;
        true
    }

    /// Stop playback and reset. Harmless when already idle.
    pub fn stop(&mut self) {
        self.state = PlayerState::Idle;
        self.position = 0;
        self.scope_buffer.fill(0.0);
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.clip.is_some()
    }

    pub fn duration_secs(&self) -> f64 {
        self.clip.as_ref().map(|c| c.duration_secs).unwrap_or(0.0)
    }

    pub fn position_secs(&self) -> f64 {
        match &self.clip {
            Some(clip) => self.position as f64 / (clip.sample_rate as f64 * 2.0),
            None => 0.0,
        }
    }

    /// Fill `output` (stereo interleaved) with the clip, silence when
    /// idle. Returns the generation when the clip ran out inside this
    /// block.
    pub fn process(&mut self, output: &mut [f32]) -> Option<u64> {
        let playing_clip = match (&self.clip, self.state) {
            (Some(clip), PlayerState::Playing) => clip.clone(),
            _ => {
                output.fill(0.0);
                return None;
            }
        };

        let samples = &playing_clip.samples;
        let mut ended = false;

        for frame in output.chunks_mut(2) {
            if self.position + 1 >= samples.len() {
                ended = true;
                frame[0] = 0.0;
                if frame.len() > 1 {
                    frame[1] = 0.0;
                }
                continue;
            }

            frame[0] = samples[self.position];
            if frame.len() > 1 {
                frame[1] = samples[self.position + 1];
            }
            self.position += 2;

            // Feed the scope tap with the player's own output only
            self.scope_buffer[self.scope_write_pos] = frame[0];
            self.scope_write_pos = (self.scope_write_pos + 1) % Self::SCOPE_BUFFER_SIZE;
            self.scope_buffer[self.scope_write_pos] = samples[self.position - 1];
            self.scope_write_pos = (self.scope_write_pos + 1) % Self::SCOPE_BUFFER_SIZE;
        }

        if ended {
            self.stop();
            Some(self.generation)
        } else {
            None
        }
    }

    /// Copy the current state for the UI thread.
    pub fn snapshot(&self) -> PlayerSnapshot {
        // Read the ring in order, oldest sample first
        let mut scope_samples = Box::new([0.0f32; SCOPE_FRAMES * 2]);
        for i in 0..Self::SCOPE_BUFFER_SIZE {
            let src_idx = (self.scope_write_pos + i) % Self::SCOPE_BUFFER_SIZE;
            scope_samples[i] = self.scope_buffer[src_idx];
        }

        PlayerSnapshot {
            state: self.state,
            position_secs: self.position_secs(),
            duration_secs: self.duration_secs(),
            generation: self.generation,
            scope_samples,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn clip(frames: usize) -> Arc<DecodedClip> {
        let mut samples = Vec::with_capacity(frames * 2);
        for i in 0..frames {
            let v = (i as f32 / frames as f32) * 0.5;
            samples.push(v);
            samples.push(-v);
        }
        Arc::new(DecodedClip {
            samples,
            sample_rate: 8000,
            duration_secs: frames as f64 / 8000.0,
        })
    }

    #[test]
    fn test_play_requires_loaded_clip() {
        let mut player = Player::new();
        assert!(!player.play());
        assert_eq!(player.state(), PlayerState::Idle);

        player.load(clip(64));
        assert!(player.play());
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_idle_outputs_silence() {
        let mut player = Player::new();
        player.load(clip(64));
        let mut out = [1.0f32; 32];
        assert!(player.process(&mut out).is_none());
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_process_copies_samples_and_advances() {
        let mut player = Player::new();
        let c = clip(64);
        player.load(c.clone());
        player.play();

        let mut out = [0.0f32; 32];
        assert!(player.process(&mut out).is_none());
        assert_eq!(&out[..], &c.samples[..32]);
        assert!(player.position_secs() > 0.0);
    }

    #[test]
    fn test_natural_end_goes_idle_and_reports_generation() {
        let mut player = Player::new();
        player.load(clip(8));
        let generation = player.generation();
        player.play();

        let mut out = [0.0f32; 64];
        assert_eq!(player.process(&mut out), Some(generation));
        assert_eq!(player.state(), PlayerState::Idle);
        // The tail of the block past the clip end is silence.
        assert!(out[16..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_load_bumps_generation_and_stops() {
        let mut player = Player::new();
        player.load(clip(64));
        let first = player.generation();
        player.play();
        player.load(clip(32));
        assert_eq!(player.generation(), first + 1);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_stop_clears_scope() {
        let mut player = Player::new();
        player.load(clip(1024));
        player.play();
        let mut out = [0.0f32; 256];
        player.process(&mut out);
        assert!(player
            .snapshot()
            .scope_samples
            .iter()
            .any(|&s| s != 0.0));

        player.stop();
        assert!(player
            .snapshot()
            .scope_samples
            .iter()
            .all(|&s| s == 0.0));
    }
}
