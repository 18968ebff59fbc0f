//! Platform abstraction layer
//!
//! Handles the boundary to the host:
//! - Time (monotonic clock, frame pacing)
//! - Input (held keys, sampled once per tick)

use std::collections::HashSet;
use std::time::Instant;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Quit,
}

impl Key {
    /// Map a raw key code. Unknown codes yield `None` and are ignored.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0x25 => Some(Key::Left),
            0x27 => Some(Key::Right),
            0x20 => Some(Key::Fire),
            0x1B => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Reports which keys are currently held
pub trait InputProvider {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Held-key set fed by the host's key events
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    down: HashSet<Key>,
}

impl HeldKeys {
    pub fn press(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.down.remove(&key);
    }

    /// Raw key-down event; unknown codes are a no-op
    pub fn press_code(&mut self, code: u32) {
        match Key::from_code(code) {
            Some(key) => self.press(key),
            None => log::trace!("Ignoring key code {code:#x}"),
        }
    }

    pub fn release_code(&mut self, code: u32) {
        if let Some(key) = Key::from_code(code) {
            self.release(key);
        }
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

impl InputProvider for HeldKeys {
    fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> u64;

    fn elapsed_since(&self, timestamp_ms: u64) -> u64 {
        self.now_ms().saturating_sub(timestamp_ms)
    }
}

/// Wall clock measured from creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Fixed-timestep accumulator for frame pacing
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_ms: u64,
    max_substeps: u32,
    accumulator: u64,
    last_ms: Option<u64>,
}

impl FixedStep {
    pub fn new(step_ms: u64, max_substeps: u32) -> Self {
        Self {
            step_ms: step_ms.max(1),
            max_substeps,
            accumulator: 0,
            last_ms: None,
        }
    }

    /// Feed the current time, get the number of simulation steps to run.
    ///
    /// Backlog beyond `max_substeps` is dropped to prevent a spiral of death.
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let last = self.last_ms.replace(now_ms).unwrap_or(now_ms);
        self.accumulator += now_ms.saturating_sub(last);

        let mut steps = 0;
        while self.accumulator >= self.step_ms && steps < self.max_substeps {
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.step_ms {
            log::debug!("Frame pacing behind by {} ms, dropping backlog", self.accumulator);
            self.accumulator %= self.step_ms;
        }
        steps
    }

    /// Time left until the next step is due
    pub fn until_next_ms(&self) -> u64 {
        self.step_ms.saturating_sub(self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys() {
        let mut keys = HeldKeys::default();
        keys.press(Key::Left);
        assert!(keys.is_key_down(Key::Left));
        keys.release(Key::Left);
        assert!(!keys.is_key_down(Key::Left));
    }

    #[test]
    fn test_unknown_codes_ignored() {
        let mut keys = HeldKeys::default();
        keys.press_code(0xFFFF);
        keys.press_code(0x20);
        assert!(keys.is_key_down(Key::Fire));
        assert!(!keys.is_key_down(Key::Left));
        keys.release_code(0xFFFF);
        keys.release_code(0x20);
        assert!(!keys.is_key_down(Key::Fire));
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut step = FixedStep::new(16, 8);
        assert_eq!(step.advance(1000), 0);
        assert_eq!(step.advance(1010), 0);
        assert_eq!(step.advance(1020), 1);
        assert_eq!(step.until_next_ms(), 12);
        assert_eq!(step.advance(1052), 2);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut step = FixedStep::new(16, 8);
        step.advance(0);
        assert_eq!(step.advance(10_000), 8);
        assert!(step.until_next_ms() > 0);
        assert_eq!(step.advance(10_000), 0);
    }
}
