//! Enemy formation controller
//!
//! The grid moves as one loosely-coupled group: every unit keeps its own
//! velocity, but edge bounces are applied to the whole group at once.

use crate::consts::*;

use super::entity::{Entity, IdAllocator, Step};

/// The enemy grid for the current wave
#[derive(Debug, Default)]
pub struct Formation {
    /// Units in spawn order (row-major)
    pub units: Vec<Entity>,
    /// Wave this formation was spawned for
    pub wave: u32,
    /// Edge bounces since spawn
    pub bounces: u32,
}

impl Formation {
    /// Populate a fresh grid. Speed does not scale with the wave.
    pub fn spawn(wave: u32, now_ms: u64, ids: &mut IdAllocator) -> Self {
        let mut units = Vec::with_capacity(FORMATION_ROWS * FORMATION_COLS);
        for row in 0..FORMATION_ROWS {
            for col in 0..FORMATION_COLS {
                let x = FORMATION_OFFSET_X + col as f32 * FORMATION_SPACING_X;
                let y = FORMATION_OFFSET_Y + row as f32 * FORMATION_SPACING_Y;
                units.push(Entity::enemy(ids.next_id(), x, y, ENEMY_BASE_SPEED, now_ms));
            }
        }
        log::debug!("Spawned formation for wave {wave} ({} units)", units.len());
        Self {
            units,
            wave,
            bounces: 0,
        }
    }

    /// Move live units, animate, and drop units whose death animation ended
    pub fn step(&mut self, now_ms: u64, dt: f32) {
        self.units
            .retain_mut(|unit| unit.update(now_ms, dt) == Step::Keep);
    }

    /// Bounce the whole group off a screen edge.
    ///
    /// Returns true if a bounce happened. Call at most once per tick.
    pub fn check_edge_and_bounce(&mut self) -> bool {
        let edge_reached = self
            .live_units()
            .any(|u| u.rect.left() <= 0.0 || u.rect.right() >= SCREEN_WIDTH);
        if !edge_reached {
            return false;
        }

        for unit in &mut self.units {
            unit.vel.x = -unit.vel.x * BOUNCE_SPEEDUP;
            unit.rect.min.y += BOUNCE_DESCENT;
        }
        self.bounces += 1;
        log::debug!(
            "Formation bounce #{} (speed {:.2} px/s)",
            self.bounces,
            self.speed()
        );
        true
    }

    /// No units remain, including dying ones
    pub fn is_cleared(&self) -> bool {
        self.units.is_empty()
    }

    /// Units eligible for collisions and firing
    pub fn live_units(&self) -> impl Iterator<Item = &Entity> {
        self.units.iter().filter(|u| u.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live_units().count()
    }

    /// Indices into `units` of live units, in spawn order
    pub fn live_indices(&self) -> Vec<usize> {
        self.units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_live())
            .map(|(i, _)| i)
            .collect()
    }

    /// Current speed magnitude of the group (0 when empty)
    pub fn speed(&self) -> f32 {
        self.units.first().map(|u| u.vel.x.abs()).unwrap_or(0.0)
    }

    /// Lowest edge of any live unit
    pub fn lowest_live_bottom(&self) -> Option<f32> {
        self.live_units().map(|u| u.rect.bottom()).reduce(f32::max)
    }
}
