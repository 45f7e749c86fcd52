/// Step of the ± buttons, in seconds.
pub const ADJUST_STEP: i64 = 15;

/// Counting state of the duration input. Times are unix seconds; while
/// running the count grows by one for every second since `started_at`, so
/// the state can travel between requests as two numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    base: u32,
    started_at: Option<i64>,
}

impl Stopwatch {
    pub fn new(seconds: u32) -> Self {
        Self {
            base: seconds,
            started_at: None,
        }
    }

    /// A stopwatch that has been running since `started_at`.
    pub fn running(seconds: u32, started_at: i64) -> Self {
        Self {
            base: seconds,
            started_at: Some(started_at),
        }
    }

    /// The count when last paused or adjusted.
    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn seconds_at(&self, now: i64) -> u32 {
        let elapsed = self.started_at.map_or(0, |start| (now - start).max(0));
        (i64::from(self.base) + elapsed).clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn start(&mut self, now: i64) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Folds the elapsed time into the count.
    pub fn pause(&mut self, now: i64) {
        self.base = self.seconds_at(now);
        self.started_at = None;
    }

    pub fn toggle(&mut self, now: i64) {
        if self.is_running() {
            self.pause(now);
        } else {
            self.start(now);
        }
    }

    /// Stops and zeroes the count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Shift the count, never below zero. A running stopwatch keeps running.
    pub fn adjust(&mut self, delta: i64) {
        self.base = (i64::from(self.base) + delta).clamp(0, i64::from(u32::MAX)) as u32;
    }

    /// `MM:SS`.
    pub fn display_at(&self, now: i64) -> String {
        let seconds = self.seconds_at(now);
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}
