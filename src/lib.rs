//! # photo-orient
//!
//! Detects the EXIF orientation of uploaded photos so they can be shown
//! upright, plus the editor stage model that places corrected photos.
//!
//! ```
//! use photo_orient::{detect_orientation, OrientationResult, Rotation};
//!
//! let result = detect_orientation(&[0x89, b'P', b'N', b'G']);
//! assert_eq!(result, OrientationResult::NotJpeg);
//! assert_eq!(result.rotation(), Rotation::None);
//! ```

pub mod config;
pub mod error;
pub mod exif;
pub mod filters;
pub mod fix;
pub mod image_loader;
pub mod orientation;
pub mod stage;

pub use config::StageConfig;
pub use error::{Error, Result};
pub use exif::{detect_orientation, ByteOrder, OrientationResult};
pub use filters::{Filter, FilterKind};
pub use orientation::Rotation;
pub use stage::{Sprite, SpriteId, Stage};
