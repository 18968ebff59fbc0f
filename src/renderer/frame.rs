//! Frame composition: playfield sprites plus HUD

use glam::Vec2;

use super::{RenderSink, TextAlign};
use crate::assets::{Sprite, SpriteSheet};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{FrameSnapshot, GamePhase, SpriteKind};

/// HUD text margin from the screen edges
const HUD_MARGIN: f32 = 10.0;

fn sprite_for(sheet: &SpriteSheet, kind: SpriteKind) -> &Sprite {
    match kind {
        SpriteKind::Player => &sheet.player,
        SpriteKind::PlayerDead => &sheet.player_dead,
        SpriteKind::Enemy { frame } => &sheet.enemy_frames[usize::from(frame & 1)],
        SpriteKind::EnemyDying | SpriteKind::BonusDying => &sheet.enemy_dying,
        SpriteKind::PlayerBullet => &sheet.player_bullet,
        SpriteKind::EnemyBullet => &sheet.enemy_bullet,
        SpriteKind::Bonus => &sheet.bonus,
        SpriteKind::Shield => &sheet.shield,
    }
}

/// Score and wave lines
pub fn hud_lines(snapshot: &FrameSnapshot) -> (String, String) {
    (
        format!("Score: {}", snapshot.score),
        format!("Wave: {}", snapshot.wave),
    )
}

/// Draw one full frame and present it
pub fn render_frame(sink: &mut impl RenderSink, sheet: &SpriteSheet, snapshot: &FrameSnapshot) {
    if snapshot.phase == GamePhase::Won {
        sink.draw_text(
            "You have won!",
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            TextAlign::Center,
        );
        sink.present();
        return;
    }

    sink.draw(&sheet.background, Vec2::ZERO);
    for view in &snapshot.sprites {
        let sprite = sprite_for(sheet, view.kind);
        // Death sprites may be taller than the entity box; keep them bottom-aligned
        let h = match sprite {
            Sprite::Image { h, .. } | Sprite::Placeholder { h, .. } => *h,
        };
        let y = view.y + view.h - h.max(view.h);
        sink.draw(sprite, Vec2::new(view.x, y));
    }

    let (score, wave) = hud_lines(snapshot);
    sink.draw_text(&score, Vec2::new(HUD_MARGIN, HUD_MARGIN), TextAlign::Left);
    sink.draw_text(
        &wave,
        Vec2::new(SCREEN_WIDTH - HUD_MARGIN, HUD_MARGIN),
        TextAlign::Right,
    );
    sink.present();
}
