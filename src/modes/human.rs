use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::audio::{SoundCue, SoundSink};
use crate::game::{GameConfig, GameLoop, RunState, TickOutcome};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;
use crate::storage::ScoreStore;

/// Scheduler callback period, roughly one display frame
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Keyboard/mouse play in the terminal
pub struct HumanMode {
    game: GameLoop,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    sound: Box<dyn SoundSink>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(
        config: GameConfig,
        store: Box<dyn ScoreStore>,
        sound: Box<dyn SoundSink>,
    ) -> Result<Self> {
        let game = GameLoop::new(config, store).context("Failed to set up the game")?;

        Ok(Self {
            game,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            sound,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            rounds = self.metrics.rounds_played,
            best = self.metrics.best_this_session,
            high_score = self.game.high_score(),
            "Session finished"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        let clock = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // One scheduler callback: maybe tick, then draw
                _ = frame_timer.tick() => {
                    let outcome = self.game.tick(clock.elapsed());
                    self.after_tick(&outcome);

                    self.metrics.update();
                    let view = self.game.view();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view, &self.metrics);
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

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action = match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.input_handler.handle_key_event(key)
            }
            Event::Mouse(mouse) => self.swipe.handle_mouse_event(mouse),
            _ => KeyAction::None,
        };

        self.apply(action)
    }

    fn apply(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::Steer(direction) => {
                let was_idle = self.game.run_state() == RunState::Idle;
                if self.game.set_direction(direction) {
                    if was_idle {
                        self.metrics.on_round_start();
                    }
                    self.sound.play(SoundCue::Turn);
                }
            }
            KeyAction::TogglePause => match self.game.toggle_pause() {
                RunState::Paused => self.metrics.on_pause(),
                RunState::Running => self.metrics.on_resume(),
                RunState::Idle | RunState::GameOver => {}
            },
            KeyAction::Restart => {
                if self.game.restart().context("Failed to restart the round")? {
                    self.metrics.on_round_start();
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    fn after_tick(&mut self, outcome: &TickOutcome) {
        if let Some(cue) = SoundCue::for_tick(outcome) {
            self.sound.play(cue);
        }

        // only the tick that ended the round is Advanced; later ones are Over
        let round_ended = matches!(outcome, TickOutcome::Advanced(_))
            && self.game.run_state() == RunState::GameOver;
        if round_ended {
            self.metrics.on_round_over(self.game.view().score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
