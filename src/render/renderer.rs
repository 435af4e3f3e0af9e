use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameOverReport, GameState, Position, Session, SessionPhase};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;

/// Each grid cell takes two terminal columns so cells look square
const CELL_WIDTH: u16 = 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<S: HighScoreStore>(
        &self,
        frame: &mut Frame,
        session: &Session<S>,
        metrics: &GameMetrics,
    ) {
        let state = session.state();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, session.high_score(), metrics);
        frame.render_widget(stats, chunks[0]);

        let tiles = u16::try_from(state.tile_count).unwrap_or(u16::MAX);
        let game_area = centered_rect(
            tiles.saturating_mul(CELL_WIDTH).saturating_add(2),
            tiles.saturating_add(2),
            chunks[1],
        );
        frame.render_widget(self.render_grid(state), game_area);

        match state.phase {
            SessionPhase::NotStarted => {
                let hint = self.render_hint();
                let area = centered_rect(28, 3, game_area);
                frame.render_widget(Clear, area);
                frame.render_widget(hint, area);
            }
            SessionPhase::Paused => {
                let overlay = self.render_paused();
                let area = centered_rect(16, 3, game_area);
                frame.render_widget(Clear, area);
                frame.render_widget(overlay, area);
            }
            SessionPhase::GameOver => {
                if let Some(report) = session.last_game_over() {
                    let notice = self.render_game_over(report);
                    let area = centered_rect(36, 8, game_area);
                    frame.render_widget(Clear, area);
                    frame.render_widget(notice, area);
                }
            }
            SessionPhase::Running => {}
        }

        let controls = self.render_controls(session);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        // Paused boards stay visible underneath the overlay, just dimmed.
        let dim = if state.phase == SessionPhase::Running {
            Modifier::empty()
        } else {
            Modifier::DIM
        };
        let mut lines = Vec::with_capacity(state.tile_count);

        for y in 0..state.tile_count {
            let mut spans = Vec::with_capacity(state.tile_count);

            for x in 0..state.tile_count {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    // Snake head - distinct color
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD | dim),
                    )
                } else if state.snake.occupies(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green).add_modifier(dim))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD | dim),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(
        &self,
        state: &GameState,
        high_score: u32,
        metrics: &GameMetrics,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("High score: ", label),
            Span::styled(high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", state.speed_ms), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_hint(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to start", Style::default().fg(Color::Gray)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![Line::from(Span::styled(
            "Paused",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
    }

    fn render_game_over(&self, report: &GameOverReport) -> Paragraph<'_> {
        let mut high_score = vec![
            Span::styled("High score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                report.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
        ];
        if report.new_high_score {
            high_score.push(Span::styled(
                " (new!)",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Game over! Your score is: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    report.final_score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(high_score),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls<S: HighScoreStore>(&self, session: &Session<S>) -> Paragraph<'_> {
        let start_style = if session.can_start() {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };

        let text = vec![Line::from(vec![
            Span::styled("[Enter] ", start_style),
            Span::styled(session.start_label(), start_style),
            Span::raw(" | "),
            Span::styled("[Space] ", Style::default().fg(Color::Yellow)),
            Span::styled(session.pause_label(), Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle centred in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
