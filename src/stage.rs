//! Editor stage state.
//!
//! Tracks the sprites placed on the stage, which one is current, and the
//! drag/pinch bookkeeping the gesture handlers update. Rendering and raw
//! touch recognition live elsewhere; callers feed already-recognised
//! gestures (pan deltas, pinch scale, double tap) into these methods.

use crate::config::StageConfig;
use crate::error::{Error, Result};
use crate::exif::OrientationResult;
use crate::filters::{Filter, FilterKind};
use log::debug;

/// Stable handle for a sprite on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

/// One image placed on the stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub id: SpriteId,
    /// Caller-defined category ("image", "sticker", ...).
    pub kind: String,
    pub width: f64,
    pub height: f64,
    /// Position of the anchor point in stage coordinates.
    pub x: f64,
    pub y: f64,
    pub anchor: (f64, f64),
    pub scale_x: f64,
    pub scale_y: f64,
    /// Clockwise, in radians.
    pub rotation: f64,
    pub filters: Vec<Filter>,
    drag: DragState,
}

/// Position and scale captured when a gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    start_x: f64,
    start_y: f64,
    init_scale: f64,
    panning: bool,
}

impl Sprite {
    pub fn is_panning(&self) -> bool {
        self.drag.panning
    }
}

pub struct Stage {
    config: StageConfig,
    sprites: Vec<Sprite>,
    current: Option<SpriteId>,
    next_id: u64,
}

impl Stage {
    pub fn new(config: StageConfig) -> Self {
        Self {
            config,
            sprites: Vec::new(),
            current: None,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Sprites in drawing order, bottom first.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    pub fn current(&self) -> Option<&Sprite> {
        self.current.and_then(|id| self.sprite(id))
    }

    fn current_mut(&mut self) -> Option<&mut Sprite> {
        let id = self.current?;
        self.sprites.iter_mut().find(|s| s.id == id)
    }

    /// Place a decoded image on the stage, centred and rotated upright.
    ///
    /// With `auto_fix_stage` the sprite spans the stage width and keeps the
    /// image's aspect ratio; the size is taken from the stored (unrotated)
    /// pixels. The new sprite becomes current.
    pub fn add_sprite(
        &mut self,
        image_width: u32,
        image_height: u32,
        kind: &str,
        orientation: OrientationResult,
    ) -> Result<SpriteId> {
        if kind.is_empty() {
            return Err(Error::EmptySpriteKind);
        }
        if image_width == 0 || image_height == 0 {
            return Err(Error::InvalidDimensions {
                width: image_width,
                height: image_height,
            });
        }

        let (width, height) = if self.config.auto_fix_stage {
            let w = self.config.width as f64;
            (w, w * image_height as f64 / image_width as f64)
        } else {
            (image_width as f64, image_height as f64)
        };
        let x = self.config.width as f64 / 2.0;
        let y = self.config.height as f64 / 2.0;

        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.push(Sprite {
            id,
            kind: kind.to_string(),
            width,
            height,
            x,
            y,
            anchor: (0.5, 0.5),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: orientation.rotation().radians(),
            filters: Vec::new(),
            drag: DragState {
                start_x: x,
                start_y: y,
                init_scale: 1.0,
                panning: false,
            },
        });
        self.current = Some(id);
        debug!(
            "added {} sprite {:?} ({}x{}, {:?})",
            kind, id, image_width, image_height, orientation
        );
        Ok(id)
    }

    /// Make a sprite current and arm it for dragging (mouse down / touch start).
    pub fn select(&mut self, id: SpriteId) -> bool {
        if self.sprite(id).is_none() {
            return false;
        }
        self.current = Some(id);
        if let Some(sprite) = self.current_mut() {
            sprite.drag = DragState {
                start_x: sprite.x,
                start_y: sprite.y,
                init_scale: 1.0,
                panning: true,
            };
        }
        true
    }

    pub fn gestures_enabled(&self) -> bool {
        self.config.gestures_enabled()
    }

    /// Move the current sprite by a pan delta measured from the gesture start.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !self.gestures_enabled() {
            return;
        }
        if let Some(sprite) = self.current_mut() {
            if sprite.drag.panning {
                sprite.x = sprite.drag.start_x + dx;
                sprite.y = sprite.drag.start_y + dy;
            }
        }
    }

    pub fn pinch_start(&mut self) {
        if !self.gestures_enabled() {
            return;
        }
        if let Some(sprite) = self.current_mut() {
            sprite.drag.init_scale = if sprite.scale_x == 0.0 {
                1.0
            } else {
                sprite.scale_x
            };
        }
    }

    /// Scale the current sprite relative to its scale at pinch start.
    pub fn pinch(&mut self, scale: f64) {
        if !self.gestures_enabled() {
            return;
        }
        if let Some(sprite) = self.current_mut() {
            sprite.scale_x = sprite.drag.init_scale * scale;
            sprite.scale_y = sprite.drag.init_scale * scale;
        }
    }

    /// Double tap removes the current sprite.
    pub fn double_tap(&mut self) -> Option<SpriteId> {
        if !self.gestures_enabled() {
            return None;
        }
        self.remove_sprite(None)
    }

    /// End of an input event; a final one commits the drag position.
    pub fn gesture_end(&mut self, is_final: bool) {
        if !self.gestures_enabled() || !is_final {
            return;
        }
        if let Some(sprite) = self.current_mut() {
            sprite.drag.start_x = sprite.x;
            sprite.drag.start_y = sprite.y;
            sprite.drag.panning = false;
        }
    }

    /// Remove `id`, or the current sprite when `None`.
    pub fn remove_sprite(&mut self, id: Option<SpriteId>) -> Option<SpriteId> {
        let id = id.or(self.current)?;
        let idx = self.sprites.iter().position(|s| s.id == id)?;
        self.sprites.remove(idx);
        if self.current == Some(id) {
            self.current = None;
        }
        debug!("removed sprite {:?}", id);
        Some(id)
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.current = None;
    }

    /// Sprites of a category, or all of them when `kind` is `None`.
    pub fn sprites_by_kind(&self, kind: Option<&str>) -> Vec<&Sprite> {
        match kind {
            None => self.sprites.iter().collect(),
            Some(kind) => self.sprites.iter().filter(|s| s.kind == kind).collect(),
        }
    }

    /// Replace the filters on every sprite of `kind` with the named ones.
    pub fn apply_filters<S: AsRef<str>>(&mut self, kind: &str, names: &[S]) -> Result<usize> {
        if !self.config.has_filters {
            return Err(Error::FiltersDisabled);
        }
        let filters = names
            .iter()
            .map(|name| {
                name.as_ref()
                    .parse::<FilterKind>()
                    .map(|k| Filter::configure(k, &self.config))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut count = 0;
        for sprite in self.sprites.iter_mut().filter(|s| s.kind == kind) {
            sprite.filters = filters.clone();
            count += 1;
        }
        debug!("applied {} filters to {} {} sprites", filters.len(), count, kind);
        Ok(count)
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.config.animated = !self.config.animated;
        self.config.animated
    }

    pub fn toggle_touch(&mut self) -> bool {
        self.config.touched = !self.config.touched;
        self.config.touched
    }
}
