use std::io::Write;
use tracing::debug;

use crate::game::{StepOutcome, TickOutcome};

/// Sound effects the host may play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Food,
    Turn,
    GameOver,
}

impl SoundCue {
    /// Cue for a tick result, if it deserves one
    pub fn for_tick(outcome: &TickOutcome) -> Option<SoundCue> {
        match outcome {
            TickOutcome::Advanced(StepOutcome::Moved { ate_food: true, .. }) => {
                Some(SoundCue::Food)
            }
            TickOutcome::Advanced(StepOutcome::Collided(_) | StepOutcome::ArenaFull) => {
                Some(SoundCue::GameOver)
            }
            _ => None,
        }
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures.
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue);
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Rings the terminal bell for food and game over
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        if cue == SoundCue::Turn {
            return;
        }

        let rung = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        if let Err(e) = rung {
            debug!(?cue, "Bell failed: {}", e);
        }
    }
}
