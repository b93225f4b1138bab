use crate::error::{Error, Result};
use crate::exif::{detect_orientation, OrientationResult};
use crate::orientation::Rotation;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported image extensions (lowercase).
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Simple RGBA image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Buffer length for `width` x `height` RGBA pixels, `None` on overflow.
fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}

impl RgbaImage {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if byte_len(width, height) == Some(data.len()) {
            Some(Self {
                data,
                width,
                height,
            })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let i = (y * self.width as usize + x) * 4;
        &self.data[i..i + 4]
    }

    /// Zeroed buffer of the same byte length, with the given dimensions.
    fn blank_like(&self, width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; self.data.len()],
            width,
            height,
        }
    }
}

/// Collect image paths from CLI arguments.
pub fn collect_paths<S: AsRef<str>>(args: &[S]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for arg in args {
        let p = PathBuf::from(arg.as_ref());
        if p.is_dir() {
            scan_directory(&p, &mut paths);
        } else if is_supported_image(&p) {
            paths.push(p);
        } else {
            debug!("skipping {}", p.display());
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths
}

fn scan_directory(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_directory(&path, out);
        } else if is_supported_image(&path) {
            out.push(path);
        }
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a whole image file into memory.
pub fn read_image_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::read(path, e))
}

pub fn write_image_bytes(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|e| Error::write(path, e))
}

/// Read a file and run orientation detection on its bytes.
pub fn detect_file_orientation(path: &Path) -> Result<OrientationResult> {
    let data = read_image_bytes(path)?;
    let result = detect_orientation(&data);
    debug!("{}: {:?}", path.display(), result);
    Ok(result)
}

// ============================================================
// JPEG via system libturbojpeg
// ============================================================

/// Decode a JPEG file and rotate its pixels upright.
#[cfg(feature = "jpeg")]
pub fn load_upright_jpeg(path: &Path) -> Result<(RgbaImage, OrientationResult)> {
    let data = read_image_bytes(path)?;
    decode_upright_jpeg(&data)
}

/// Decode JPEG bytes and rotate the pixels by their stored orientation.
#[cfg(feature = "jpeg")]
pub fn decode_upright_jpeg(data: &[u8]) -> Result<(RgbaImage, OrientationResult)> {
    let image = turbojpeg::decompress(data, turbojpeg::PixelFormat::RGBA)?;
    let img = RgbaImage::from_raw(image.width as u32, image.height as u32, image.pixels)
        .ok_or(Error::InvalidDimensions {
            width: image.width as u32,
            height: image.height as u32,
        })?;

    let orientation = detect_orientation(data);
    Ok((apply_rotation(img, orientation.rotation()), orientation))
}

/// Encode an RGBA buffer as JPEG at the given quality (1-100).
#[cfg(feature = "jpeg")]
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let image = turbojpeg::Image {
        pixels: img.data.as_slice(),
        width: img.width as usize,
        pitch: img.width as usize * 4,
        height: img.height as usize,
        format: turbojpeg::PixelFormat::RGBA,
    };
    let buf = turbojpeg::compress(image, quality as i32, turbojpeg::Subsamp::Sub2x2)?;
    Ok(buf.to_vec())
}

// ============================================================
// Orientation transforms
// ============================================================

pub fn apply_rotation(img: RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => img,
        Rotation::Clockwise90 => rotate_90(&img),
        Rotation::Half => rotate_180(&img),
        Rotation::CounterClockwise90 => rotate_270(&img),
    }
}

/// Rotate 90 degrees clockwise.
pub fn rotate_90(img: &RgbaImage) -> RgbaImage {
    let mut out = img.blank_like(img.height, img.width);
    let (w, h) = (img.width as usize, img.height as usize);
    for y in 0..h {
        for x in 0..w {
            let dst = (x * h + (h - 1 - y)) * 4;
            out.data[dst..dst + 4].copy_from_slice(img.pixel(x, y));
        }
    }
    out
}

pub fn rotate_180(img: &RgbaImage) -> RgbaImage {
    let mut out = img.blank_like(img.width, img.height);
    let (w, h) = (img.width as usize, img.height as usize);
    for y in 0..h {
        for x in 0..w {
            let dst = ((h - 1 - y) * w + (w - 1 - x)) * 4;
            out.data[dst..dst + 4].copy_from_slice(img.pixel(x, y));
        }
    }
    out
}

/// Rotate 270 degrees clockwise (90 counter-clockwise).
pub fn rotate_270(img: &RgbaImage) -> RgbaImage {
    let mut out = img.blank_like(img.height, img.width);
    let (w, h) = (img.width as usize, img.height as usize);
    for y in 0..h {
        for x in 0..w {
            let dst = ((w - 1 - x) * h + y) * 4;
            out.data[dst..dst + 4].copy_from_slice(img.pixel(x, y));
        }
    }
    out
}
