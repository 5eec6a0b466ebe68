//! Real-time pacing of replayed logs.

use std::time::Duration;

/// Spaces events out by their in-game time, scaled by a speed factor.
#[derive(Debug, Clone)]
pub struct Pacer {
    speed: f64,
    last_time: Option<f64>,
}

impl Pacer {
    /// Create a pacer; a speed of zero disables pacing.
    pub const fn new(speed: f64) -> Self {
        Self {
            speed,
            last_time: None,
        }
    }

    /// How long to wait before sending an event at `time` seconds.
    ///
    /// The first event and events that go back in time are not delayed.
    pub fn delay_before(&mut self, time: f64) -> Option<Duration> {
        if self.speed <= 0.0 {
            return None;
        }
        let previous = self.last_time.replace(time)?;
        let gap = (time - previous) / self.speed;
        (gap > 0.0).then(|| Duration::from_secs_f64(gap))
    }
}
