//! Stage configuration.
//!
//! Loaded from JSON with camelCase keys. Keys that are absent keep their
//! defaults and unknown keys are ignored, so a partial document only
//! overrides what it names:
//!
//! ```
//! use photo_orient::StageConfig;
//!
//! let config = StageConfig::from_json_str(r#"{ "width": 800, "hasFilters": false }"#)?;
//! assert_eq!(config.width, 800);
//! assert_eq!(config.height, 500);
//! assert!(!config.has_filters);
//! # Ok::<(), photo_orient::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StageConfig {
    /// Stage width in pixels.
    pub width: u32,
    /// Stage height in pixels.
    pub height: u32,
    /// Background colour as 0xRRGGBB.
    pub bg_color: u32,
    /// Scale newly added images to the stage width.
    pub auto_fix_stage: bool,
    /// Continuous redraw; gestures are only wired while this is on.
    pub animated: bool,
    /// Gesture handling.
    pub touched: bool,
    /// Whether the filter catalog is available.
    pub has_filters: bool,
    /// JPEG quality for exported images, 1-100.
    pub export_quality: u8,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            bg_color: 0xBBBBBB,
            auto_fix_stage: true,
            animated: true,
            touched: true,
            has_filters: true,
            export_quality: 92,
        }
    }
}

impl StageConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
        log::debug!("loaded stage config from {}", path.display());
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::invalid_config("width", self.width));
        }
        if self.height == 0 {
            return Err(Error::invalid_config("height", self.height));
        }
        if self.bg_color > 0xFFFFFF {
            return Err(Error::invalid_config(
                "bgColor",
                format!("{:#08x}", self.bg_color),
            ));
        }
        if !(1..=100).contains(&self.export_quality) {
            return Err(Error::invalid_config("exportQuality", self.export_quality));
        }
        Ok(())
    }

    /// Gestures need both animation and touch handling switched on.
    pub fn gestures_enabled(&self) -> bool {
        self.animated && self.touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StageConfig::default();
        assert_eq!((config.width, config.height), (500, 500));
        assert_eq!(config.bg_color, 0xBBBBBB);
        assert!(config.auto_fix_stage);
        assert!(config.gestures_enabled());
        assert!(config.has_filters);
        assert_eq!(config.export_quality, 92);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override_ignores_unknown_keys() {
        let config = StageConfig::from_json_str(
            r##"{ "height": 300, "touched": false, "$canvasEl": "#canvas" }"##,
        )
        .unwrap();
        assert_eq!(config.width, 500);
        assert_eq!(config.height, 300);
        assert!(!config.touched);
        assert!(!config.gestures_enabled());
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(
            StageConfig::from_json_str("{}").unwrap(),
            StageConfig::default()
        );
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            StageConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            StageConfig::from_json_str(r#"{ "exportQuality": 0 }"#),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            StageConfig::from_json_str(r#"{ "bgColor": 16777216 }"#),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            StageConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 640, "exportQuality": 80 }}"#).unwrap();
        let config = StageConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.width, 640);
        assert_eq!(config.export_quality, 80);

        let missing = StageConfig::from_json_file(Path::new("/nonexistent/stage.json"));
        assert!(matches!(missing, Err(Error::Read { .. })));
    }
}
