use std::time::{Duration, Instant};

/// Round clock and counters shown next to the arena
pub struct SessionMetrics {
    round_started: Instant,
    /// Time already spent paused in this round
    paused_for: Duration,
    paused_at: Option<Instant>,
    pub elapsed_time: Duration,
    pub rounds_played: u32,
    pub best_this_session: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            paused_for: Duration::ZERO,
            paused_at: None,
            elapsed_time: Duration::ZERO,
            rounds_played: 0,
            best_this_session: 0,
        }
    }

    /// Refresh `elapsed_time`; the clock stands still while paused
    pub fn update(&mut self) {
        let now = self.paused_at.unwrap_or_else(Instant::now);
        self.elapsed_time = now
            .saturating_duration_since(self.round_started)
            .saturating_sub(self.paused_for);
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.paused_for = Duration::ZERO;
        self.paused_at = None;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
        }
    }

    pub fn on_resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_for += paused_at.elapsed();
        }
    }

    pub fn on_round_over(&mut self, final_score: u32) {
        self.update();
        // freeze the clock on the final time until the next round
        self.paused_at = Some(Instant::now());
        self.rounds_played += 1;
        self.best_this_session = self.best_this_session.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
