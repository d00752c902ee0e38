//! voxguess - terminal listening quiz
//!
//! Listen to short clips and guess whether each voice is synthesized
//! or human. Wires the game state machine to the audio thread, the
//! clip loader, and the ratatui frontend.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use voxguess_audio::{AudioCommand, AudioEngine, AudioEvent, CueKind, EngineState, PlayerState};
use voxguess_game::{
    Feedback, Game, GameState, LocalSource, Question, QuestionFetchError, QuestionSource,
    RemoteSource, VoiceKind,
};
use voxguess_library::{
    spawn_loader, ClipCache, ClipDecoder, Config, LoadOutcome, LoadPriority, LoadRequest,
    UrlByteSource,
};
use voxguess_tui::{render, Theme, UiState, PHASE_STEP};

/// Frame rate for UI updates
const FPS: u64 = 30;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = Config::load();
    tracing::info!(api = ?config.api_url, assets = %config.asset_url, "starting");

    // The device rate decides what the decoder resamples to, so pick
    // the device before spawning either worker.
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no audio output device found")?;
    let stream_config = device
        .default_output_config()
        .context("failed to get audio output config")?;
    let sample_rate = stream_config.sample_rate().0;

    // Audio thread
    let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_audio = shutdown.clone();
    let audio_handle = thread::spawn(move || {
        run_audio_thread(device, stream_config, cmd_rx, evt_tx, shutdown_audio);
    });
    let engine = AudioEngine::new(cmd_tx, evt_rx);

    // Loader thread owns the decode cache
    let cache = ClipCache::new(
        Box::new(UrlByteSource::new()),
        ClipDecoder::new(sample_rate),
    );
    let (load_tx, load_rx) = unbounded::<LoadRequest>();
    let (outcome_tx, outcome_rx) = unbounded::<LoadOutcome>();
    let loader_handle = spawn_loader(cache, load_rx, outcome_tx);

    // Terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, engine, config, load_tx, outcome_rx);

    // Cleanup: stop the audio thread, close the loader's request
    // channel (dropped inside run_app), restore the terminal.
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = audio_handle.join();
    let _ = loader_handle.join();

    result
}

fn init_logging() -> anyhow::Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voxguess");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("voxguess.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_audio_thread(
    device: cpal::Device,
    stream_config: cpal::SupportedStreamConfig,
    cmd_rx: Receiver<AudioCommand>,
    evt_tx: Sender<AudioEvent>,
    shutdown: Arc<AtomicBool>,
) {
    let channels = stream_config.channels() as usize;

    let engine_state = Arc::new(Mutex::new(EngineState::new()));
    let engine_for_callback = engine_state.clone();

    // Pre-allocated stereo buffer for non-stereo device layouts
    let mut stereo_buffer = vec![0.0f32; 16384];

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // try_lock keeps the real-time callback from blocking; on
            // contention (rare) output silence for one buffer.
            if let Ok(mut state) = engine_for_callback.try_lock() {
                if channels == 2 {
                    state.process(data);
                } else {
                    let frames = data.len() / channels;
                    let stereo_len = frames * 2;
                    if stereo_len > stereo_buffer.len() {
                        stereo_buffer.resize(stereo_len, 0.0);
                    }
                    let stereo = &mut stereo_buffer[..stereo_len];
                    state.process(stereo);
                    for (i, frame) in data.chunks_mut(channels).enumerate() {
                        if channels == 1 {
                            frame[0] = (stereo[i * 2] + stereo[i * 2 + 1]) * 0.5;
                        } else {
                            frame[0] = stereo[i * 2];
                            frame[1] = stereo[i * 2 + 1];
                            for extra in frame.iter_mut().skip(2) {
                                *extra = 0.0;
                            }
                        }
                    }
                }
            } else {
                data.fill(0.0);
            }
        },
        |err| {
            tracing::error!(%err, "audio stream error");
        },
        None,
    );

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = evt_tx.send(AudioEvent::Error(format!(
                "failed to create audio stream: {e}"
            )));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = evt_tx.send(AudioEvent::Error(format!("failed to start audio: {e}")));
        return;
    }

    let mut last_state_update = Instant::now();
    let state_update_interval = Duration::from_millis(33); // ~30fps

    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(AudioCommand::Shutdown) => break,
            Ok(cmd) => {
                if let Ok(mut state) = engine_state.lock() {
                    state.handle_command(cmd);
                }
            }
            Err(_) => {}
        }

        if let Ok(mut state) = engine_state.lock() {
            if let Some(generation) = state.take_ended() {
                let _ = evt_tx.try_send(AudioEvent::ClipEnded { generation });
            }
            if last_state_update.elapsed() >= state_update_interval {
                let _ = evt_tx.try_send(AudioEvent::StateUpdate(state.snapshot()));
                last_state_update = Instant::now();
            }
        }
    }
}

/// Everything the event loop needs in one place
struct App {
    game: Game,
    ui: UiState,
    theme: Theme,
    config: Config,
    engine: AudioEngine,
    load_tx: Sender<LoadRequest>,
    /// Epoch of the clip the audio thread currently holds
    generation: u64,
    /// In-flight session fetch result channel
    session_rx: Option<Receiver<Result<Vec<Question>, QuestionFetchError>>>,
}

impl App {
    /// Kick off loading for the round on screen and warm up the next.
    fn enter_round(&mut self) {
        let Some(question) = self.game.current_question() else {
            return;
        };
        let url = question.audio_url.clone();
        let prefetch = match self.game.state() {
            GameState::Playing { session, .. } => {
                session.next_question().map(|q| q.audio_url.clone())
            }
            _ => None,
        };

        self.ui.loading_clip = true;
        self.ui.clip_error = None;
        self.ui.playing = false;
        self.engine.send(AudioCommand::Stop);

        let _ = self.load_tx.send(LoadRequest {
            url,
            priority: LoadPriority::Current,
        });
        if let Some(url) = prefetch {
            let _ = self.load_tx.send(LoadRequest {
                url,
                priority: LoadPriority::Prefetch,
            });
        }
    }

    fn start_session(&mut self) {
        if self.ui.loading_session || !matches!(self.game.state(), GameState::Intro) {
            return;
        }
        self.ui.alert = None;
        self.ui.loading_session = true;

        let rounds = self.game.rounds();
        let config = self.config.clone();
        let (tx, rx) = unbounded();
        self.session_rx = Some(rx);
        thread::spawn(move || {
            let mut source: Box<dyn QuestionSource> = match &config.api_url {
                Some(url) => Box::new(RemoteSource::new(url.clone())),
                None => Box::new(LocalSource::new(config.asset_url.clone())),
            };
            let _ = tx.send(source.fetch(rounds));
        });
    }

    fn poll_session(&mut self) {
        let Some(rx) = &self.session_rx else { return };
        let Ok(result) = rx.try_recv() else { return };
        self.session_rx = None;
        self.ui.loading_session = false;

        match result {
            Ok(questions) => {
                if self.game.begin(questions) {
                    self.enter_round();
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "session start failed");
                self.ui.alert = Some(format!("{e} - press ENTER to retry"));
            }
        }
    }

    fn poll_loader(&mut self, outcome_rx: &Receiver<LoadOutcome>) {
        for outcome in outcome_rx.try_iter() {
            match outcome {
                LoadOutcome::Ready { url, clip } => {
                    if url == self.config.cue_correct_url() {
                        self.engine
                            .send(AudioCommand::LoadCue(CueKind::Correct, clip));
                    } else if url == self.config.cue_wrong_url() {
                        self.engine.send(AudioCommand::LoadCue(CueKind::Wrong, clip));
                    } else if self.is_current_clip(&url) {
                        self.game.clip_loaded();
                        self.ui.loading_clip = false;
                        self.engine.send(AudioCommand::LoadClip(clip));
                    }
                    // Anything else was a prefetch; the cache is warm now.
                }
                LoadOutcome::Failed { url, .. } => {
                    if self.is_current_clip(&url) {
                        self.ui.loading_clip = false;
                        self.ui.clip_error =
                            Some("clip failed to load - press SPACE to retry".to_string());
                    }
                }
            }
        }
    }

    fn is_current_clip(&self, url: &str) -> bool {
        self.game
            .current_question()
            .map(|q| q.audio_url == url)
            .unwrap_or(false)
    }

    fn poll_audio(&mut self) {
        for event in self.engine.event_rx.try_iter() {
            match event {
                AudioEvent::StateUpdate(snapshot) => {
                    self.generation = snapshot.generation;
                    self.ui.playing = snapshot.state == PlayerState::Playing;
                    self.ui.scope = snapshot.scope_samples.to_vec();
                }
                AudioEvent::ClipEnded { generation } => {
                    // Ignore ends from a superseded clip
                    if generation == self.generation {
                        self.ui.playing = false;
                    }
                }
                AudioEvent::Error(e) => {
                    tracing::error!(error = %e, "audio thread error");
                }
            }
        }
    }

    fn toggle_play(&mut self) {
        if self.ui.playing {
            self.engine.send(AudioCommand::Stop);
            self.ui.playing = false;
        } else if self.game.clip_ready() {
            self.engine.send(AudioCommand::Play);
            self.ui.playing = true;
        } else if self.ui.clip_error.is_some() {
            // Fresh load attempt for a round whose clip failed
            self.enter_round();
        }
    }

    fn guess(&mut self, choice: VoiceKind) {
        if let Some(feedback) = self.game.guess(choice) {
            self.engine.send(AudioCommand::Stop);
            self.ui.playing = false;
            let cue = match feedback {
                Feedback::Correct => CueKind::Correct,
                Feedback::Wrong => CueKind::Wrong,
            };
            self.engine.send(AudioCommand::PlayCue(cue));
        }
    }

    fn advance(&mut self) {
        if self.game.advance() {
            match self.game.state() {
                GameState::Playing { .. } => self.enter_round(),
                _ => {
                    self.engine.send(AudioCommand::Stop);
                    self.ui.playing = false;
                }
            }
        }
    }

    fn go_home(&mut self) {
        self.game.go_home();
        self.engine.send(AudioCommand::Stop);
        self.ui.playing = false;
        self.ui.loading_clip = false;
        self.ui.clip_error = None;
        self.ui.alert = None;
    }

    /// Returns true when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => match self.game.state() {
                GameState::Intro => return true,
                _ => self.go_home(),
            },
            KeyCode::Left => self.game.adjust_rounds(-1),
            KeyCode::Right => self.game.adjust_rounds(1),
            KeyCode::Enter => match self.game.state() {
                GameState::Intro => self.start_session(),
                GameState::Playing { .. } => self.advance(),
                GameState::Finished { .. } => self.go_home(),
            },
            KeyCode::Char(' ') => self.toggle_play(),
            KeyCode::Char('a') => self.guess(VoiceKind::Ai),
            KeyCode::Char('h') => self.guess(VoiceKind::Human),
            KeyCode::Char('n') => self.advance(),
            _ => {}
        }
        false
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: AudioEngine,
    config: Config,
    load_tx: Sender<LoadRequest>,
    outcome_rx: Receiver<LoadOutcome>,
) -> anyhow::Result<()> {
    let mut app = App {
        game: Game::new(config.default_rounds),
        ui: UiState::default(),
        theme: Theme::default(),
        config,
        engine,
        load_tx,
        generation: 0,
        session_rx: None,
    };

    // Warm up the cue clips right away; failures are logged by the
    // loader and the game just plays silent feedback.
    for url in [app.config.cue_correct_url(), app.config.cue_wrong_url()] {
        let _ = app.load_tx.send(LoadRequest {
            url,
            priority: LoadPriority::Prefetch,
        });
    }

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                    app.engine.shutdown();
                    return Ok(());
                }
            }
        }

        app.poll_session();
        app.poll_loader(&outcome_rx);
        app.poll_audio();

        if last_frame.elapsed() >= frame_duration {
            if app.ui.playing {
                app.ui.phase_acc += PHASE_STEP;
            }
            terminal.draw(|frame| render(frame, &app.game, &app.ui, &app.theme))?;
            last_frame = Instant::now();
        }

        thread::sleep(Duration::from_millis(2));
    }
}
