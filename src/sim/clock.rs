//! Simulation clock and due-timestamp alarms
//!
//! Alarms are due-timestamps polled at the start of each tick.

use serde::{Deserialize, Serialize};

use crate::consts::{BONUS_SPAWN_INTERVAL_MS, ENEMY_FIRE_INTERVAL_MS};
use crate::platform::Clock;

/// Monotonic millisecond clock advanced by the simulation itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimClock {
    now_ms: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// A repeating alarm expressed as the next due timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub interval_ms: u64,
    pub next_due_ms: u64,
}

impl Alarm {
    /// First firing one full interval after `start_ms`
    pub fn new(interval_ms: u64, start_ms: u64) -> Self {
        Self {
            interval_ms,
            next_due_ms: start_ms + interval_ms,
        }
    }

    /// Returns true at most once per call when the alarm is due.
    ///
    /// Missed intervals are coalesced into a single firing.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        while self.next_due_ms <= now_ms {
            self.next_due_ms += self.interval_ms.max(1);
        }
        true
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.next_due_ms.saturating_sub(now_ms)
    }
}

/// The simulation's timer set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarms {
    pub enemy_fire: Alarm,
    pub bonus_spawn: Alarm,
}

impl Alarms {
    pub fn new(start_ms: u64) -> Self {
        Self {
            enemy_fire: Alarm::new(ENEMY_FIRE_INTERVAL_MS, start_ms),
            bonus_spawn: Alarm::new(BONUS_SPAWN_INTERVAL_MS, start_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_fires_on_interval() {
        let mut alarm = Alarm::new(3000, 0);
        assert!(!alarm.poll(2999));
        assert!(alarm.poll(3000));
        assert!(!alarm.poll(3001));
        assert!(alarm.poll(6000));
    }

    #[test]
    fn test_alarm_coalesces_missed_intervals() {
        let mut alarm = Alarm::new(100, 0);
        assert!(alarm.poll(1050));
        assert_eq!(alarm.next_due_ms, 1100);
        assert!(!alarm.poll(1099));
    }

    #[test]
    fn test_sim_clock_elapsed() {
        let mut clock = SimClock::new();
        clock.advance(16);
        clock.advance(16);
        assert_eq!(clock.now_ms(), 32);
        assert_eq!(clock.elapsed_since(10), 22);
        assert_eq!(clock.elapsed_since(100), 0);
    }
}
