//! Read-only view of a frame for the presentation layer

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind};
use super::state::{GamePhase, GameState};

/// Which sprite to draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    PlayerDead,
    Enemy { frame: u8 },
    EnemyDying,
    PlayerBullet,
    EnemyBullet,
    Bonus,
    BonusDying,
    Shield,
}

/// One drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub id: u32,
    pub kind: SpriteKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteView {
    fn of(entity: &Entity, kind: SpriteKind) -> Self {
        Self {
            id: entity.id,
            kind,
            x: entity.rect.min.x,
            y: entity.rect.min.y,
            w: entity.rect.size.x,
            h: entity.rect.size.y,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub score: u64,
    pub wave: u32,
    pub phase: GamePhase,
    /// Draw order: shields, enemies, bonus, bullets, player
    pub sprites: Vec<SpriteView>,
}

impl FrameSnapshot {
    pub fn count(&self, pred: impl Fn(&SpriteKind) -> bool) -> usize {
        self.sprites.iter().filter(|s| pred(&s.kind)).count()
    }
}

fn sprite_kind(entity: &Entity, phase: GamePhase) -> SpriteKind {
    let dying = entity.is_dying();
    match entity.kind {
        EntityKind::Player => match phase {
            GamePhase::PlayerDying { .. } | GamePhase::GameOver => SpriteKind::PlayerDead,
            _ => SpriteKind::Player,
        },
        EntityKind::Enemy { .. } if dying => SpriteKind::EnemyDying,
        EntityKind::Enemy { frame, .. } => SpriteKind::Enemy { frame },
        EntityKind::PlayerBullet => SpriteKind::PlayerBullet,
        EntityKind::EnemyBullet => SpriteKind::EnemyBullet,
        EntityKind::Bonus { .. } if dying => SpriteKind::BonusDying,
        EntityKind::Bonus { .. } => SpriteKind::Bonus,
        EntityKind::Shield => SpriteKind::Shield,
    }
}

impl GameState {
    /// Capture the rendered entity set and HUD values
    pub fn snapshot(&self) -> FrameSnapshot {
        let entities = self
            .shields
            .iter()
            .chain(self.formation.units.iter())
            .chain(self.bonus.iter())
            .chain(self.player_bullets.iter())
            .chain(self.enemy_bullets.iter())
            .chain(std::iter::once(&self.player));

        FrameSnapshot {
            tick: self.time_ticks,
            score: self.round.score,
            wave: self.round.wave,
            phase: self.phase,
            sprites: entities
                .map(|e| SpriteView::of(e, sprite_kind(e, self.phase)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_snapshot_contains_full_entity_set() {
        let state = GameState::new(1);
        let snap = state.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.wave, 1);
        assert_eq!(
            snap.count(|k| matches!(k, SpriteKind::Enemy { .. })),
            FORMATION_ROWS * FORMATION_COLS
        );
        assert_eq!(snap.count(|k| *k == SpriteKind::Shield), 3);
        assert_eq!(snap.sprites.last().map(|s| s.kind), Some(SpriteKind::Player));
    }

    #[test]
    fn test_dying_sprites() {
        let mut state = GameState::new(1);
        state.formation.units[0].start_dying(0);
        state.phase = GamePhase::PlayerDying {
            since_ms: 0,
            cause: crate::sim::DeathCause::EnemyLanded,
        };
        let snap = state.snapshot();
        assert_eq!(snap.count(|k| *k == SpriteKind::EnemyDying), 1);
        assert_eq!(snap.count(|k| *k == SpriteKind::PlayerDead), 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = GameState::new(1).snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"wave\":1"));
    }
}
