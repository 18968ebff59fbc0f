//! Presentation adapter
//!
//! The host provides a [`RenderSink`]; [`render_frame`] composes one frame
//! from a read-only [`FrameSnapshot`](crate::sim::FrameSnapshot).

pub mod frame;
pub mod headless;

use glam::Vec2;

use crate::assets::Sprite;

pub use frame::{hud_lines, render_frame};
pub use headless::HeadlessRenderer;

/// Horizontal anchoring of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing surface provided by the host
pub trait RenderSink {
    /// Draw a sprite with its top-left corner at `pos`
    fn draw(&mut self, sprite: &Sprite, pos: Vec2);
    fn draw_text(&mut self, text: &str, pos: Vec2, align: TextAlign);
    /// Finish the frame
    fn present(&mut self);
}
