//! Sprite sheet frames and GPU-ready instance data

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Textures the game draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    SpriteSheet,
    Ground,
    Backdrop,
    Title,
    Font,
}

impl TextureId {
    pub const ALL: [TextureId; 5] = [
        TextureId::SpriteSheet,
        TextureId::Ground,
        TextureId::Backdrop,
        TextureId::Title,
        TextureId::Font,
    ];

    /// Pixel size of the texture
    pub const fn size(self) -> (f32, f32) {
        match self {
            TextureId::Title => (48.0, 64.0),
            _ => (128.0, 128.0),
        }
    }

    /// Asset file the texture is loaded from
    pub const fn file_name(self) -> &'static str {
        match self {
            TextureId::SpriteSheet => "spriteSheet.png",
            TextureId::Ground => "ground.png",
            TextureId::Backdrop => "backgroundTrees.png",
            TextureId::Title => "title.png",
            TextureId::Font => "font.png",
        }
    }
}

/// A rectangle of a texture, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFrame {
    pub texture: TextureId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteFrame {
    pub const fn new(texture: TextureId, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { texture, x, y, w, h }
    }

    /// Same-size frame shifted by whole frames
    pub fn step(self, columns: f32, rows: f32) -> Self {
        Self {
            x: self.x + columns * self.w,
            y: self.y + rows * self.h,
            ..self
        }
    }

    /// Normalized `[u, v, width, height]`
    pub fn uv_rect(&self) -> [f32; 4] {
        let (tw, th) = self.texture.size();
        [self.x / tw, self.y / th, self.w / tw, self.h / th]
    }
}

/// Sheet layout
pub mod frames {
    use super::{SpriteFrame, TextureId::*};

    pub const FOX_RUN: SpriteFrame = SpriteFrame::new(SpriteSheet, 0.0, 0.0, 32.0, 32.0);
    pub const FOX_TUMBLE: SpriteFrame = SpriteFrame::new(SpriteSheet, 0.0, 96.0, 32.0, 32.0);
    pub const FOX_SHADOW: SpriteFrame = SpriteFrame::new(SpriteSheet, 32.0, 96.0, 32.0, 16.0);
    pub const ENEMY: SpriteFrame = SpriteFrame::new(SpriteSheet, 64.0, 96.0, 16.0, 32.0);
    pub const ROCK: SpriteFrame = SpriteFrame::new(SpriteSheet, 32.0, 0.0, 16.0, 16.0);
    pub const MUSHROOM: SpriteFrame = SpriteFrame::new(SpriteSheet, 64.0, 0.0, 16.0, 16.0);
    pub const BERRY: SpriteFrame = SpriteFrame::new(SpriteSheet, 32.0, 16.0, 16.0, 16.0);
    pub const TREE: SpriteFrame = SpriteFrame::new(SpriteSheet, 96.0, 16.0, 32.0, 48.0);
    pub const FOXHOLE: SpriteFrame = SpriteFrame::new(SpriteSheet, 64.0, 16.0, 32.0, 16.0);
    pub const FOX_IN_FOXHOLE: SpriteFrame = SpriteFrame::new(SpriteSheet, 64.0, 0.0, 32.0, 16.0);
    pub const ENEMY_TIRED: SpriteFrame = SpriteFrame::new(SpriteSheet, 80.0, 48.0, 32.0, 48.0);
    pub const ENEMY_WITH_FOX: SpriteFrame = SpriteFrame::new(SpriteSheet, 32.0, 32.0, 48.0, 48.0);
    pub const HUD_TRACK: SpriteFrame = SpriteFrame::new(SpriteSheet, 112.0, 96.0, 16.0, 32.0);
    pub const HUD_FOX: SpriteFrame = SpriteFrame::new(SpriteSheet, 96.0, 112.0, 16.0, 16.0);
    pub const HUD_ENEMY: SpriteFrame = SpriteFrame::new(SpriteSheet, 96.0, 96.0, 16.0, 16.0);
    pub const GROUND: SpriteFrame = SpriteFrame::new(Ground, 0.0, 0.0, 128.0, 128.0);
    pub const BACKDROP: SpriteFrame = SpriteFrame::new(Backdrop, 0.0, 0.0, 128.0, 128.0);
    pub const TITLE_ENEMY: SpriteFrame = SpriteFrame::new(Title, 0.0, 32.0, 48.0, 32.0);
    pub const TITLE_FOX: SpriteFrame = SpriteFrame::new(Title, 0.0, 0.0, 48.0, 32.0);
}

/// Per-sprite data uploaded to the GPU (must match shader)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    /// Normalized `[u, v, width, height]`
    pub uv_rect: [f32; 4],
    pub tint: [f32; 4],
}

impl SpriteInstance {
    pub fn new(model: Mat4, frame: &SpriteFrame) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            uv_rect: frame.uv_rect(),
            tint: [1.0; 4],
        }
    }

    pub fn with_tint(mut self, tint: [f32; 4]) -> Self {
        self.tint = tint;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), 24 * 4);
        let instance = SpriteInstance::new(Mat4::IDENTITY, &frames::ROCK);
        let bytes: &[u8] = bytemuck::bytes_of(&instance);
        assert_eq!(bytes.len(), 96);
    }

    #[test]
    fn test_uv_rect_is_normalized() {
        assert_eq!(frames::HUD_TRACK.uv_rect(), [0.875, 0.75, 0.125, 0.25]);
        let second_rock = frames::ROCK.step(1.0, 0.0);
        assert_eq!(second_rock.x, 48.0);
    }
}
