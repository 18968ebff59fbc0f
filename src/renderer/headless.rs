//! Renderer for runs without a display

use glam::Vec2;

use super::{RenderSink, TextAlign};
use crate::assets::Sprite;

/// Counts draw calls and logs the HUD periodically
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Log the HUD every N presented frames (0 = never)
    log_interval: u64,
    frames: u64,
    draws_this_frame: usize,
    last_draws: usize,
    hud: Vec<String>,
}

impl HeadlessRenderer {
    pub fn new(log_interval: u64) -> Self {
        Self {
            log_interval,
            ..Self::default()
        }
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sprite draws in the last presented frame
    pub fn last_draws(&self) -> usize {
        self.last_draws
    }
}

impl RenderSink for HeadlessRenderer {
    fn draw(&mut self, _sprite: &Sprite, _pos: Vec2) {
        self.draws_this_frame += 1;
    }

    fn draw_text(&mut self, text: &str, _pos: Vec2, _align: TextAlign) {
        self.hud.push(text.to_string());
    }

    fn present(&mut self) {
        self.frames += 1;
        self.last_draws = std::mem::take(&mut self.draws_this_frame);
        let hud = std::mem::take(&mut self.hud).join(" | ");
        if self.log_interval > 0 && self.frames.is_multiple_of(self.log_interval) {
            log::info!("[frame {}] {hud} ({} sprites)", self.frames, self.last_draws);
        } else {
            log::trace!("[frame {}] {hud}", self.frames);
        }
    }
}
