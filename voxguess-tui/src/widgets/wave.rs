//! Multi-wave amplitude visualizer
//!
//! Three superimposed travelling sine waves whose amplitude follows the
//! live signal level, tapered to zero at both edges by a parabolic
//! envelope. Idle state is a single flat baseline.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

/// Phase advance per rendered frame; the app owns the accumulator.
pub const PHASE_STEP: f32 = 0.15;

/// Signal-level boost so quiet passages stay visible
const VOLUME_GAIN: f32 = 4.0;
/// Cap so loud passages don't overflow the draw area
const VOLUME_CLAMP: f32 = 1.2;

/// Horizontal scale: terminal columns are far coarser than the pixels
/// the wave constants were tuned for.
const COLUMN_PX: f32 = 8.0;

/// Per-wave rendering parameters: amplitude multiplier, spatial
/// frequency, phase speed. Drawn in order, primary wave last.
const WAVES: [(f32, f32, f32); 3] = [
    (0.8, 0.01, 0.5),  // faint backdrop
    (1.0, 0.02, 0.8),  // secondary
    (1.2, 0.015, 1.0), // primary
];

/// Widget rendering the playback visualizer
pub struct WaveWidget<'a> {
    /// Recent player output (stereo interleaved, -1.0 to 1.0)
    scope: &'a [f32],
    /// Shared phase accumulator, advanced by the app each frame
    phase: f32,
    playing: bool,
    theme: &'a Theme,
}

impl<'a> WaveWidget<'a> {
    pub fn new(scope: &'a [f32], phase: f32, playing: bool, theme: &'a Theme) -> Self {
        Self {
            scope,
            phase,
            playing,
            theme,
        }
    }

    /// Instantaneous volume estimate: RMS deviation of the mono signal
    /// from the zero baseline, boosted and clamped.
    pub fn volume(scope: &[f32]) -> f32 {
        if scope.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0f32;
        let frames = scope.len() / 2;
        for frame in scope.chunks(2) {
            let mono = if frame.len() == 2 {
                (frame[0] + frame[1]) * 0.5
            } else {
                frame[0]
            };
            sum += mono * mono;
        }
        let rms = (sum / frames.max(1) as f32).sqrt();
        (rms * VOLUME_GAIN).min(VOLUME_CLAMP)
    }

    fn wave_color(&self, idx: usize) -> Color {
        match idx {
            0 => self.theme.faint,
            1 => self.theme.accent,
            _ => self.theme.highlight,
        }
    }
}

impl Widget for WaveWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border())
            .title(" signal ");
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let height = inner.height as usize;
        if width < 4 || height < 3 {
            return;
        }

        let mid_y = height / 2;

        // Baseline, always present
        for x in 0..width {
            buf[(inner.x + x as u16, inner.y + mid_y as u16)]
                .set_char('─')
                .set_style(self.theme.dim());
        }

        if !self.playing {
            return;
        }

        let volume = Self::volume(self.scope);

        for (idx, &(amp, freq, speed)) in WAVES.iter().enumerate() {
            let style = Style::default().fg(self.wave_color(idx));
            let primary = idx == WAVES.len() - 1;

            for x in 0..width {
                let xf = x as f32 * COLUMN_PX;
                let sine = (xf * freq + self.phase * speed).sin();

                // Parabolic envelope, zero at both edges
                let t = x as f32 / (width - 1) as f32;
                let envelope = 4.0 * t * (1.0 - t);

                let amplitude = height as f32 * 0.25 * volume * amp * envelope;
                let deflection = sine * amplitude;
                let y = (mid_y as i32 - deflection.round() as i32)
                    .clamp(0, height as i32 - 1) as usize;

                // Primary wave is drawn solid, the layers beneath get
                // lighter shades by deflection
                let norm = if amplitude > 0.0 {
                    (deflection.abs() / (height as f32 * 0.5)).min(1.0)
                } else {
                    0.0
                };
                let ch = if primary {
                    '█'
                } else if norm > 0.25 {
                    '▓'
                } else {
                    '░'
                };

                buf[(inner.x + x as u16, inner.y + y as u16)]
                    .set_char(ch)
                    .set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_of_silence_is_zero() {
        assert_eq!(WaveWidget::volume(&[0.0; 64]), 0.0);
        assert_eq!(WaveWidget::volume(&[]), 0.0);
    }

    #[test]
    fn test_volume_boost_and_clamp() {
        // Constant 0.1 signal: rms = 0.1, boosted to 0.4
        let quiet = [0.1f32; 128];
        assert!((WaveWidget::volume(&quiet) - 0.4).abs() < 1e-5);

        // Full-scale signal clamps at the ceiling
        let loud = [1.0f32; 128];
        assert_eq!(WaveWidget::volume(&loud), 1.2);
    }

    #[test]
    fn test_idle_renders_flat_baseline_only() {
        let theme = Theme::default();
        let widget = WaveWidget::new(&[0.5; 64], 3.0, false, &theme);
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let mid = 3u16; // inner mid row of a 7-row bordered box
        for x in 1..19u16 {
            assert_eq!(buf[(x, mid)].symbol(), "─");
        }
        // No wave glyphs anywhere
        for y in 1..6u16 {
            for x in 1..19u16 {
                assert_ne!(buf[(x, y)].symbol(), "█");
            }
        }
    }

    #[test]
    fn test_playing_renders_wave_glyphs() {
        let theme = Theme::default();
        let scope: Vec<f32> = (0..256).map(|i| ((i % 16) as f32 / 8.0) - 1.0).collect();
        let widget = WaveWidget::new(&scope, 1.0, true, &theme);
        let area = Rect::new(0, 0, 40, 9);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let mut glyphs = 0;
        for y in 1..8u16 {
            for x in 1..39u16 {
                if buf[(x, y)].symbol() == "█" {
                    glyphs += 1;
                }
            }
        }
        assert!(glyphs > 0);
    }
}
