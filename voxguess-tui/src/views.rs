//! Screen layouts for the three game phases

use crate::theme::Theme;
use crate::widgets::{ScoreBarWidget, StatusBarWidget, WaveWidget};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use voxguess_game::{Feedback, Game, GameState, Summary, VoiceKind};

/// Presentation state owned by the app loop, separate from game state.
#[derive(Debug, Default)]
pub struct UiState {
    /// Shared phase accumulator for the wave animation
    pub phase_acc: f32,
    /// Latest scope snapshot from the audio thread
    pub scope: Vec<f32>,
    /// Whether the player is currently producing sound
    pub playing: bool,
    /// A session fetch is in flight
    pub loading_session: bool,
    /// The current round's clip is still decoding
    pub loading_clip: bool,
    /// Session start failure shown on the intro screen
    pub alert: Option<String>,
    /// Current round's clip failure
    pub clip_error: Option<String>,
}

pub fn render(frame: &mut Frame, game: &Game, ui: &UiState, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme.normal()), area);

    match game.state() {
        GameState::Intro => render_intro(frame, area, game, ui, theme),
        GameState::Playing {
            session, feedback, ..
        } => {
            let round = session.current_index() + 1;
            render_playing(
                frame,
                area,
                round,
                session.len(),
                session.total_score(),
                session.current_question().kind,
                *feedback,
                ui,
                theme,
            );
        }
        GameState::Finished { summary } => render_finished(frame, area, summary, theme),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_intro(frame: &mut Frame, area: Rect, game: &Game, ui: &UiState, theme: &Theme) {
    let panel = centered(area, 52, 11);
    let rows = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(2), // subtitle
        Constraint::Length(2), // round picker
        Constraint::Length(2), // start hint / spinner
        Constraint::Length(2), // alert
        Constraint::Min(0),
    ])
    .split(panel);

    frame.render_widget(
        Paragraph::new(Span::styled("V O X G U E S S", theme.title()))
            .alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "can you tell AI voices from human ones?",
            theme.dim(),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("◀ ", theme.dim()),
            Span::styled(format!("{} rounds", game.rounds()), theme.normal()),
            Span::styled(" ▶", theme.dim()),
        ]))
        .alignment(Alignment::Center),
        rows[2],
    );

    let start_line = if ui.loading_session {
        Span::styled("fetching questions...", theme.dim())
    } else {
        Span::styled("press ENTER to start", theme.ai())
    };
    frame.render_widget(
        Paragraph::new(start_line).alignment(Alignment::Center),
        rows[3],
    );

    if let Some(alert) = &ui.alert {
        frame.render_widget(
            Paragraph::new(Span::styled(alert.as_str(), theme.error_text()))
                .alignment(Alignment::Center),
            rows[4],
        );
    }

    let hints: &[(&str, &str)] = &[("←/→", "rounds"), ("enter", "start"), ("q", "quit")];
    let status_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    frame.render_widget(StatusBarWidget::new(hints, theme), status_area);
}

#[allow(clippy::too_many_arguments)]
fn render_playing(
    frame: &mut Frame,
    area: Rect,
    round: usize,
    total_rounds: usize,
    score: u32,
    actual: VoiceKind,
    feedback: Option<Feedback>,
    ui: &UiState,
    theme: &Theme,
) {
    let rows = Layout::vertical([
        Constraint::Length(1), // score bar
        Constraint::Min(5),    // wave
        Constraint::Length(3), // guess / feedback
        Constraint::Length(1), // status bar
    ])
    .split(area);

    frame.render_widget(
        ScoreBarWidget::new(round, total_rounds, score, theme),
        rows[0],
    );
    frame.render_widget(
        WaveWidget::new(&ui.scope, ui.phase_acc, ui.playing, theme),
        rows[1],
    );

    let prompt: Line = match feedback {
        Some(Feedback::Correct) => Line::from(vec![
            Span::styled(" CORRECT ", theme.success()),
            Span::styled(format!("  it was {}", actual.label()), theme.dim()),
        ]),
        Some(Feedback::Wrong) => Line::from(vec![
            Span::styled(" WRONG ", theme.danger()),
            Span::styled(format!("  it was {}", actual.label()), theme.dim()),
        ]),
        None if ui.loading_clip => Line::from(Span::styled("decoding clip...", theme.dim())),
        None => match &ui.clip_error {
            Some(err) => Line::from(Span::styled(err.as_str(), theme.error_text())),
            None => Line::from(vec![
                Span::styled("[A]", theme.ai()),
                Span::styled(" synthesized   ", theme.dim()),
                Span::styled("[H]", theme.human()),
                Span::styled(" human", theme.dim()),
            ]),
        },
    };
    frame.render_widget(
        Paragraph::new(prompt)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP).border_style(theme.border())),
        rows[2],
    );

    let hints: &[(&str, &str)] = if feedback.is_some() {
        &[("n", "next"), ("esc", "home"), ("q", "quit")]
    } else {
        &[
            ("space", "play/stop"),
            ("a", "guess AI"),
            ("h", "guess human"),
            ("esc", "home"),
        ]
    };
    frame.render_widget(StatusBarWidget::new(hints, theme), rows[3]);
}

fn render_finished(frame: &mut Frame, area: Rect, summary: &Summary, theme: &Theme) {
    let panel = centered(area, 56, 14);
    let rows = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(2), // total accuracy
        Constraint::Length(1), // AI label
        Constraint::Length(1), // AI gauge
        Constraint::Length(1),
        Constraint::Length(1), // HUMAN label
        Constraint::Length(1), // HUMAN gauge
        Constraint::Length(2),
        Constraint::Length(1), // hint
        Constraint::Min(0),
    ])
    .split(panel);

    let rounds = summary.total_rounds().max(1);
    let percent = (summary.total_score() * 100) / rounds;

    frame.render_widget(
        Paragraph::new(Span::styled("ANALYSIS COMPLETE", theme.title()))
            .alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{percent}%"), theme.title()),
            Span::styled(
                format!(
                    "  total accuracy  ({}/{})",
                    summary.total_score(),
                    summary.total_rounds()
                ),
                theme.dim(),
            ),
        ]))
        .alignment(Alignment::Center),
        rows[1],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("AI voices    ", theme.ai()),
            Span::styled(
                format!("{}/{}", summary.ai_score, summary.ai_total),
                theme.normal(),
            ),
        ])),
        rows[2],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(theme.ai())
            .ratio(ratio(summary.ai_score, summary.ai_total))
            .label(""),
        rows[3],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("human voices ", theme.human()),
            Span::styled(
                format!("{}/{}", summary.human_score, summary.human_total),
                theme.normal(),
            ),
        ])),
        rows[5],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(theme.human())
            .ratio(ratio(summary.human_score, summary.human_total))
            .label(""),
        rows[6],
    );

    frame.render_widget(
        Paragraph::new(Span::styled(verdict(percent), theme.normal()))
            .alignment(Alignment::Center),
        rows[7],
    );
    frame.render_widget(
        Paragraph::new(Span::styled("press ENTER to play again", theme.dim()))
            .alignment(Alignment::Center),
        rows[8],
    );
}

fn verdict(percent: u32) -> &'static str {
    match percent {
        90..=100 => "golden ears. the machines can't fool you",
        70..=89 => "sharp. only the best fakes get through",
        50..=69 => "a coin flip would keep up with you",
        _ => "the synthesizers have won this round",
    }
}

fn ratio(score: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (score as f64 / total as f64).clamp(0.0, 1.0)
    }
}
