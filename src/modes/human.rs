use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

use crate::game::{GameEngine, Session, TickReport};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::persistence::HighScoreStore;
use crate::render::Renderer;
use crate::ticker::Ticker;

pub struct HumanMode<S: HighScoreStore> {
    session: Session<S>,
    ticker: Ticker,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl<S: HighScoreStore> HumanMode<S> {
    pub fn new(engine: GameEngine, store: S) -> Self {
        let period = engine.config().initial_tick();

        Self {
            session: Session::new(engine, store),
            ticker: Ticker::new(period),
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = self.ticker.tick() => {
                    let report = self.session.tick();
                    self.apply_tick(report);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Turn(direction) => {
                self.session.turn(direction);
            }
            KeyAction::TogglePause => {
                if self.session.state().is_running() {
                    let paused = self.session.toggle_pause();
                    self.metrics.on_pause_changed(paused);
                }
            }
            KeyAction::Start => {
                if let Some(period) = self.session.start() {
                    self.ticker.reschedule(period);
                    self.metrics.on_game_start();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn apply_tick(&mut self, report: TickReport) {
        if let Some(period) = report.reschedule {
            debug!(period_ms = period.as_millis() as u64, "rescheduling tick timer");
            self.ticker.reschedule(period);
        }

        if report.game_over.is_some() {
            self.metrics.on_game_over();
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, SessionPhase, TickOutcome};
    use crate::persistence::MemoryStore;

    fn human_mode() -> HumanMode<MemoryStore> {
        let engine = GameEngine::with_seed(GameConfig::default(), 5);
        HumanMode::new(engine, MemoryStore::new(0))
    }

    #[tokio::test]
    async fn test_game_initialization() {
        let mode = human_mode();
        assert_eq!(mode.session.state().phase, SessionPhase::NotStarted);
        assert_eq!(mode.session.state().score, 0);
        assert_eq!(mode.ticker.period(), Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_input_ignored_before_start() {
        let mut mode = human_mode();
        mode.handle_action(KeyAction::Turn(Direction::Up));
        mode.handle_action(KeyAction::TogglePause);

        let state = mode.session.state();
        assert_eq!(state.pending_direction, Direction::Right);
        assert_eq!(state.phase, SessionPhase::NotStarted);
    }

    #[tokio::test]
    async fn test_start_and_pause() {
        let mut mode = human_mode();
        mode.handle_action(KeyAction::Start);
        assert_eq!(mode.session.state().phase, SessionPhase::Running);

        mode.handle_action(KeyAction::Turn(Direction::Up));
        assert_eq!(mode.session.state().pending_direction, Direction::Up);

        mode.handle_action(KeyAction::TogglePause);
        assert!(mode.session.state().is_paused());
        mode.handle_action(KeyAction::TogglePause);
        assert!(!mode.session.state().is_paused());
    }

    #[tokio::test]
    async fn test_speed_up_reschedules_ticker() {
        let mut mode = human_mode();
        mode.handle_action(KeyAction::Start);

        let report = TickReport {
            outcome: TickOutcome::AteFood {
                new_speed: Some(Duration::from_millis(140)),
            },
            reschedule: Some(Duration::from_millis(140)),
            game_over: None,
        };
        mode.apply_tick(report);

        assert_eq!(mode.ticker.period(), Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut mode = human_mode();
        mode.handle_action(KeyAction::Quit);
        assert!(mode.should_quit);
    }
}
