//! Entities shared by every movable/drawable object
//!
//! One struct with a closed set of kinds. Per-kind behavior lives in the
//! `match` tables of [`Entity::update`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned box, `min` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.min.x + self.size.x / 2.0, self.bottom())
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Liveness of an entity. Dead entities are removed from their group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Life {
    Alive,
    /// Visually present, excluded from collisions
    Dying { since_ms: u64 },
}

/// Looping sound owned by the bonus target.
///
/// Move-only: releasing consumes it, so a loop can only be stopped once.
#[derive(Debug, PartialEq, Eq)]
pub struct LoopToken(u32);

impl LoopToken {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }

    pub fn release(self) -> u32 {
        self.0
    }
}

/// Kind-specific payload
#[derive(Debug, PartialEq)]
pub enum EntityKind {
    Player,
    Enemy { frame: u8, last_flip_ms: u64 },
    PlayerBullet,
    EnemyBullet,
    Bonus { sound: Option<LoopToken> },
    Shield,
}

/// Result of one entity update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Keep,
    /// Left the screen or finished its death animation
    Expired,
}

/// A simulated object
#[derive(Debug, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
    pub vel: Vec2,
    pub life: Life,
}

impl Entity {
    fn new(id: u32, kind: EntityKind, rect: Rect, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            rect,
            vel,
            life: Life::Alive,
        }
    }

    pub fn player(id: u32) -> Self {
        let x = SCREEN_WIDTH / 2.0 - PLAYER_WIDTH / 2.0;
        let y = SCREEN_HEIGHT - PLAYER_BOTTOM_MARGIN - PLAYER_HEIGHT;
        Self::new(
            id,
            EntityKind::Player,
            Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            Vec2::ZERO,
        )
    }

    pub fn enemy(id: u32, x: f32, y: f32, speed: f32, now_ms: u64) -> Self {
        Self::new(
            id,
            EntityKind::Enemy {
                frame: 0,
                last_flip_ms: now_ms,
            },
            Rect::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
            Vec2::new(speed, 0.0),
        )
    }

    /// Player bullet centered on `origin`
    pub fn player_bullet(id: u32, origin: Vec2) -> Self {
        Self::new(
            id,
            EntityKind::PlayerBullet,
            Rect::from_center(origin, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            Vec2::new(0.0, -PLAYER_BULLET_SPEED),
        )
    }

    /// Enemy bullet centered on `origin`
    pub fn enemy_bullet(id: u32, origin: Vec2) -> Self {
        Self::new(
            id,
            EntityKind::EnemyBullet,
            Rect::from_center(origin, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            Vec2::new(0.0, ENEMY_BULLET_SPEED),
        )
    }

    /// Bonus target entering from the right edge
    pub fn bonus(id: u32, sound: LoopToken) -> Self {
        let distance = SCREEN_WIDTH + BONUS_WIDTH;
        let speed = distance / crate::ms_to_secs(BONUS_CROSSING_MS);
        Self::new(
            id,
            EntityKind::Bonus { sound: Some(sound) },
            Rect::new(SCREEN_WIDTH, BONUS_Y, BONUS_WIDTH, BONUS_HEIGHT),
            Vec2::new(-speed, 0.0),
        )
    }

    pub fn shield(id: u32, center_x: f32) -> Self {
        Self::new(
            id,
            EntityKind::Shield,
            Rect::from_center(
                Vec2::new(center_x, SHIELD_CENTER_Y),
                Vec2::new(SHIELD_WIDTH, SHIELD_HEIGHT),
            ),
            Vec2::ZERO,
        )
    }

    #[inline]
    pub fn is_dying(&self) -> bool {
        matches!(self.life, Life::Dying { .. })
    }

    /// Alive and not dying: eligible for collisions
    #[inline]
    pub fn is_live(&self) -> bool {
        self.life == Life::Alive
    }

    /// Begin the death animation. No-op if already dying.
    pub fn start_dying(&mut self, now_ms: u64) {
        if self.is_live() {
            self.life = Life::Dying { since_ms: now_ms };
        }
    }

    /// Take the bonus loop sound, if this entity still holds one
    pub fn release_sound(&mut self) -> Option<u32> {
        match &mut self.kind {
            EntityKind::Bonus { sound } => sound.take().map(LoopToken::release),
            _ => None,
        }
    }

    pub fn holds_sound(&self) -> bool {
        matches!(self.kind, EntityKind::Bonus { sound: Some(_) })
    }

    /// Advance one tick
    pub fn update(&mut self, now_ms: u64, dt: f32) -> Step {
        if let Life::Dying { since_ms } = self.life {
            return if now_ms.saturating_sub(since_ms) >= DEATH_ANIM_MS {
                Step::Expired
            } else {
                Step::Keep
            };
        }

        match &mut self.kind {
            EntityKind::Player | EntityKind::Shield => Step::Keep,
            EntityKind::Enemy {
                frame,
                last_flip_ms,
            } => {
                self.rect.min.x += self.vel.x * dt;
                if now_ms.saturating_sub(*last_flip_ms) >= ENEMY_ANIM_MS {
                    *frame ^= 1;
                    *last_flip_ms = now_ms;
                }
                Step::Keep
            }
            EntityKind::PlayerBullet => {
                self.rect.min += self.vel * dt;
                if self.rect.bottom() < 0.0 {
                    Step::Expired
                } else {
                    Step::Keep
                }
            }
            EntityKind::EnemyBullet => {
                self.rect.min += self.vel * dt;
                if self.rect.top() > SCREEN_HEIGHT {
                    Step::Expired
                } else {
                    Step::Keep
                }
            }
            EntityKind::Bonus { .. } => {
                self.rect.min.x += self.vel.x * dt;
                if self.rect.right() < 0.0 {
                    Step::Expired
                } else {
                    Step::Keep
                }
            }
        }
    }
}

/// Monotonic entity id source; iteration order follows allocation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}
