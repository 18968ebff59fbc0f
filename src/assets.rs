//! Sprite and sound loading
//!
//! Assets are resolved once at startup. Essential assets abort startup when
//! missing; the bonus target sprite degrades to a placeholder shape.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::*;

/// Opaque handle to a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Opaque handle to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset `{name}` not found at {path}")]
    NotFound { name: String, path: PathBuf },
    #[error("asset `{name}` could not be read")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads named images and sounds
pub trait AssetProvider {
    fn load_image(&mut self, name: &str) -> Result<ImageId, AssetError>;
    fn load_sound(&mut self, name: &str) -> Result<SoundId, AssetError>;
}

/// Something the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    /// Loaded image scaled to `w`×`h`
    Image { id: ImageId, w: f32, h: f32 },
    /// Filled rectangle
    Placeholder { w: f32, h: f32, color: [u8; 3] },
}

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const RED: [u8; 3] = [255, 0, 0];

/// All sprites used by a round
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub background: Sprite,
    pub player: Sprite,
    pub player_dead: Sprite,
    pub enemy_frames: [Sprite; 2],
    pub enemy_dying: Sprite,
    pub bonus: Sprite,
    pub shield: Sprite,
    pub player_bullet: Sprite,
    pub enemy_bullet: Sprite,
}

fn image(
    assets: &mut impl AssetProvider,
    name: &str,
    w: f32,
    h: f32,
) -> Result<Sprite, AssetError> {
    let id = assets.load_image(name)?;
    Ok(Sprite::Image { id, w, h })
}

impl SpriteSheet {
    pub fn load(assets: &mut impl AssetProvider) -> Result<Self, AssetError> {
        let bonus = match image(assets, "ufo", BONUS_WIDTH, BONUS_HEIGHT) {
            Ok(sprite) => sprite,
            Err(e) => {
                log::warn!("Bonus sprite unavailable, using placeholder: {e}");
                Sprite::Placeholder {
                    w: BONUS_WIDTH,
                    h: BONUS_HEIGHT,
                    color: WHITE,
                }
            }
        };

        Ok(Self {
            background: image(assets, "invaders", SCREEN_WIDTH, SCREEN_HEIGHT)?,
            player: image(assets, "player", PLAYER_WIDTH, PLAYER_HEIGHT)?,
            player_dead: image(assets, "playerdeath", PLAYER_WIDTH, PLAYER_WIDTH)?,
            enemy_frames: [
                image(assets, "alien1", ENEMY_SIZE, ENEMY_SIZE)?,
                image(assets, "alien2", ENEMY_SIZE, ENEMY_SIZE)?,
            ],
            enemy_dying: image(assets, "aliendeath", ENEMY_SIZE, ENEMY_SIZE)?,
            bonus,
            shield: image(assets, "shield", SHIELD_WIDTH, SHIELD_HEIGHT)?,
            player_bullet: Sprite::Placeholder {
                w: BULLET_WIDTH,
                h: BULLET_HEIGHT,
                color: WHITE,
            },
            enemy_bullet: Sprite::Placeholder {
                w: BULLET_WIDTH,
                h: BULLET_HEIGHT,
                color: RED,
            },
        })
    }
}

/// All sounds used by a round
#[derive(Debug, Clone, Copy)]
pub struct SoundBank {
    pub shoot: SoundId,
    pub explosion: SoundId,
    pub player_death: SoundId,
    pub bonus_loop: SoundId,
}

impl SoundBank {
    pub fn load(assets: &mut impl AssetProvider) -> Result<Self, AssetError> {
        Ok(Self {
            shoot: assets.load_sound("shoot")?,
            explosion: assets.load_sound("explosion")?,
            player_death: assets.load_sound("playerdeath")?,
            bonus_loop: assets.load_sound("ufo")?,
        })
    }
}

/// Every asset name the game asks for
pub const IMAGE_NAMES: &[&str] = &[
    "invaders",
    "player",
    "playerdeath",
    "alien1",
    "alien2",
    "aliendeath",
    "ufo",
    "shield",
];
pub const SOUND_NAMES: &[&str] = &["shoot", "explosion", "playerdeath", "ufo"];

/// Assets stored as `<name>.png` / `<name>.wav` under a directory
#[derive(Debug)]
pub struct DirAssets {
    root: PathBuf,
    loaded: Vec<PathBuf>,
}

impl DirAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            loaded: Vec::new(),
        }
    }

    /// Paths resolved so far, indexed by handle
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }

    fn resolve(&mut self, name: &str, ext: &str) -> Result<u32, AssetError> {
        let path = self.root.join(format!("{name}.{ext}"));
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                log::debug!("Loaded {}", path.display());
                self.loaded.push(path);
                Ok(self.loaded.len() as u32 - 1)
            }
            Ok(_) => Err(AssetError::NotFound {
                name: name.to_string(),
                path,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AssetError::NotFound {
                name: name.to_string(),
                path,
            }),
            Err(source) => Err(AssetError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}

impl AssetProvider for DirAssets {
    fn load_image(&mut self, name: &str) -> Result<ImageId, AssetError> {
        self.resolve(name, "png").map(ImageId)
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundId, AssetError> {
        self.resolve(name, "wav").map(SoundId)
    }
}

/// In-memory asset set keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    images: HashSet<String>,
    sounds: HashSet<String>,
    next_id: u32,
}

impl MemoryAssets {
    pub fn new<'a>(
        images: impl IntoIterator<Item = &'a str>,
        sounds: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            images: images.into_iter().map(str::to_string).collect(),
            sounds: sounds.into_iter().map(str::to_string).collect(),
            next_id: 0,
        }
    }

    /// Every asset the game needs
    pub fn builtin() -> Self {
        Self::new(IMAGE_NAMES.iter().copied(), SOUND_NAMES.iter().copied())
    }

    pub fn without_image(mut self, name: &str) -> Self {
        self.images.remove(name);
        self
    }

    fn issue(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl AssetProvider for MemoryAssets {
    fn load_image(&mut self, name: &str) -> Result<ImageId, AssetError> {
        if !self.images.contains(name) {
            return Err(AssetError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(format!("memory://{name}")),
            });
        }
        Ok(ImageId(self.issue()))
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundId, AssetError> {
        if !self.sounds.contains(name) {
            return Err(AssetError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(format!("memory://{name}")),
            });
        }
        Ok(SoundId(self.issue()))
    }
}
