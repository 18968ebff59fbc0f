//! Audio routing
//!
//! The simulation only emits [`GameEvent`]s; this module turns them into
//! calls on an [`AudioSink`] and owns the bonus loop handles.

use std::collections::HashMap;

use crate::assets::{SoundBank, SoundId};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    Shoot,
    /// Enemy or bonus target destroyed
    Explosion,
    /// Player hit
    PlayerDeath,
    /// Bonus target engine, looped while it flies
    BonusLoop,
}

/// Handle to a playing loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle(pub u64);

/// Audio backend
pub trait AudioSink {
    fn play_once(&mut self, sound: SoundId, volume: f32);
    fn play_loop(&mut self, sound: SoundId, volume: f32) -> LoopHandle;
    fn stop(&mut self, handle: LoopHandle);
}

/// Maps game events to sink calls
pub struct SoundRouter<S: AudioSink> {
    sink: S,
    bank: SoundBank,
    /// Simulation loop id -> playing handle
    loops: HashMap<u32, LoopHandle>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> SoundRouter<S> {
    pub fn new(sink: S, bank: SoundBank, settings: &Settings) -> Self {
        Self {
            sink,
            bank,
            loops: HashMap::new(),
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn sound_for(&self, effect: SoundEffect) -> SoundId {
        match effect {
            SoundEffect::Shoot => self.bank.shoot,
            SoundEffect::Explosion => self.bank.explosion,
            SoundEffect::PlayerDeath => self.bank.player_death,
            SoundEffect::BonusLoop => self.bank.bonus_loop,
        }
    }

    /// Play a one-shot effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let sound = self.sound_for(effect);
        self.sink.play_once(sound, vol);
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::PlayerShot => self.play(SoundEffect::Shoot),
            GameEvent::EnemiesDestroyed { .. } | GameEvent::BonusDestroyed => {
                self.play(SoundEffect::Explosion)
            }
            GameEvent::PlayerKilled { .. } => self.play(SoundEffect::PlayerDeath),
            GameEvent::BonusLoopStarted { loop_id } => {
                // Loops start even when muted so the stop bookkeeping stays paired
                let sound = self.sound_for(SoundEffect::BonusLoop);
                let handle = self.sink.play_loop(sound, self.effective_volume());
                if let Some(stale) = self.loops.insert(loop_id, handle) {
                    log::warn!("Loop {loop_id} started twice, stopping the older one");
                    self.sink.stop(stale);
                }
            }
            GameEvent::BonusLoopStopped { loop_id } => match self.loops.remove(&loop_id) {
                Some(handle) => self.sink.stop(handle),
                None => log::warn!("Stop for unknown loop {loop_id}"),
            },
            GameEvent::EnemyFired { .. }
            | GameEvent::WaveStarted { .. }
            | GameEvent::GameOver
            | GameEvent::Won => {}
        }
    }

    pub fn handle_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Loops currently playing
    pub fn active_loops(&self) -> usize {
        self.loops.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio {
    next_handle: u64,
}

impl AudioSink for LogAudio {
    fn play_once(&mut self, sound: SoundId, volume: f32) {
        log::trace!("play {sound:?} at {volume:.2}");
    }

    fn play_loop(&mut self, sound: SoundId, volume: f32) -> LoopHandle {
        self.next_handle += 1;
        log::trace!("loop {sound:?} at {volume:.2} -> #{}", self.next_handle);
        LoopHandle(self.next_handle)
    }

    fn stop(&mut self, handle: LoopHandle) {
        log::trace!("stop loop #{}", handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::sim::DeathCause;

    #[derive(Default)]
    struct RecordingSink {
        once: Vec<SoundId>,
        started: Vec<LoopHandle>,
        stopped: Vec<LoopHandle>,
    }

    impl AudioSink for RecordingSink {
        fn play_once(&mut self, sound: SoundId, _volume: f32) {
            self.once.push(sound);
        }

        fn play_loop(&mut self, _sound: SoundId, _volume: f32) -> LoopHandle {
            let handle = LoopHandle(self.started.len() as u64 + 100);
            self.started.push(handle);
            handle
        }

        fn stop(&mut self, handle: LoopHandle) {
            self.stopped.push(handle);
        }
    }

    fn router(settings: &Settings) -> SoundRouter<RecordingSink> {
        let bank = SoundBank::load(&mut MemoryAssets::builtin()).unwrap();
        SoundRouter::new(RecordingSink::default(), bank, settings)
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut audio = router(&Settings::default());
        audio.handle_all(&[
            GameEvent::PlayerShot,
            GameEvent::EnemiesDestroyed { count: 3 },
            GameEvent::PlayerKilled {
                cause: DeathCause::EnemyBullet,
            },
            GameEvent::WaveStarted { wave: 2 },
        ]);
        let bank = audio.bank;
        assert_eq!(
            audio.sink().once,
            vec![bank.shoot, bank.explosion, bank.player_death]
        );
    }

    #[test]
    fn test_loop_started_and_stopped_once() {
        let mut audio = router(&Settings::default());
        audio.handle(&GameEvent::BonusLoopStarted { loop_id: 4 });
        assert_eq!(audio.active_loops(), 1);
        audio.handle(&GameEvent::BonusLoopStopped { loop_id: 4 });
        audio.handle(&GameEvent::BonusLoopStopped { loop_id: 4 });
        assert_eq!(audio.active_loops(), 0);
        assert_eq!(audio.sink().stopped, vec![LoopHandle(100)]);
    }

    #[test]
    fn test_muted_skips_one_shots() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut audio = router(&settings);
        audio.handle(&GameEvent::PlayerShot);
        assert!(audio.sink().once.is_empty());
        audio.set_muted(false);
        audio.handle(&GameEvent::PlayerShot);
        assert_eq!(audio.sink().once.len(), 1);
    }
}
