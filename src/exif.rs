//! EXIF orientation detection from raw JPEG bytes.
//!
//! Walks the JPEG marker segments looking for the first APP1 block, checks
//! its "Exif" signature, then reads IFD0 of the embedded TIFF structure for
//! the orientation tag (0x0112).

use serde::Serialize;

/// Start-of-image marker every JPEG begins with.
const SOI: u16 = 0xFFD8;
/// APP1 segment, conventionally carrying EXIF.
const APP1: u16 = 0xFFE1;
/// ASCII "Exif".
const EXIF_SIGNATURE: u32 = 0x4578_6966;
/// "Exif\0\0" precedes the TIFF header inside APP1.
const EXIF_HEADER_LEN: usize = 6;
/// ASCII "II".
const LITTLE_ENDIAN_MARK: u16 = 0x4949;
const IFD_ENTRY_LEN: usize = 12;
/// Offset of the inline value inside an IFD entry (after tag, type, count).
const IFD_VALUE_OFFSET: usize = 8;

/// EXIF tag holding the orientation value.
pub const ORIENTATION_TAG: u16 = 0x0112;

/// Outcome of [`detect_orientation`].
///
/// None of these are errors: callers fall back to "no rotation needed" for
/// everything except a recognised [`OrientationResult::Orientation`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum OrientationResult {
    /// The buffer does not start with the JPEG SOI marker.
    NotJpeg,
    /// The first APP1 segment does not carry the "Exif" signature.
    InvalidExif,
    /// No APP1 segment, or its first IFD has no orientation entry.
    NoOrientationTag,
    /// The EXIF block points past the end of the buffer.
    Truncated,
    /// Raw stored orientation value (1-8 for well-formed files).
    Orientation(u16),
}

impl OrientationResult {
    /// The stored orientation value, if one was found.
    pub fn value(self) -> Option<u16> {
        match self {
            OrientationResult::Orientation(v) => Some(v),
            _ => None,
        }
    }
}

/// Byte order of the TIFF structure inside an EXIF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// "II" selects little-endian; anything else is read as big-endian.
    pub fn from_marker(marker: u16) -> Self {
        if marker == LITTLE_ENDIAN_MARK {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    pub fn u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    pub fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

/// Bounds-checked reads relative to the start of a TIFF header.
struct TiffReader<'a> {
    data: &'a [u8],
    base: usize,
    order: ByteOrder,
}

impl<'a> TiffReader<'a> {
    fn bytes<const N: usize>(&self, off: usize) -> Option<[u8; N]> {
        let start = self.base.checked_add(off)?;
        let end = start.checked_add(N)?;
        self.data.get(start..end)?.try_into().ok()
    }

    fn u16_at(&self, off: usize) -> Option<u16> {
        self.bytes(off).map(|b| self.order.u16(b))
    }

    fn u32_at(&self, off: usize) -> Option<u32> {
        self.bytes(off).map(|b| self.order.u32(b))
    }
}

fn be_u16(data: &[u8], pos: usize) -> Option<u16> {
    let b = data.get(pos..pos.checked_add(2)?)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

fn be_u32(data: &[u8], pos: usize) -> Option<u32> {
    let b = data.get(pos..pos.checked_add(4)?)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Determine the EXIF orientation stored in a JPEG file's bytes.
///
/// Only the first APP1 segment is inspected. Every other segment is skipped
/// by its length; reading stops at the first value that is not a marker or
/// when the buffer runs out.
pub fn detect_orientation(data: &[u8]) -> OrientationResult {
    if be_u16(data, 0) != Some(SOI) {
        return OrientationResult::NotJpeg;
    }

    let mut pos = 2;
    while let Some(marker) = be_u16(data, pos) {
        pos += 2;
        if marker == APP1 {
            return read_app1(data, pos);
        }
        if marker & 0xFF00 != 0xFF00 {
            break;
        }
        // Segment length counts its own two bytes, so this lands on the next marker.
        match be_u16(data, pos) {
            Some(len) => pos += len as usize,
            None => break,
        }
    }
    OrientationResult::NoOrientationTag
}

/// `pos` points at the APP1 length field.
fn read_app1(data: &[u8], pos: usize) -> OrientationResult {
    let signature_at = pos + 2;
    if be_u32(data, signature_at) != Some(EXIF_SIGNATURE) {
        return OrientationResult::InvalidExif;
    }

    let tiff_start = signature_at + EXIF_HEADER_LEN;
    let order = match be_u16(data, tiff_start) {
        Some(mark) => ByteOrder::from_marker(mark),
        None => return OrientationResult::Truncated,
    };

    let reader = TiffReader {
        data,
        base: tiff_start,
        order,
    };
    scan_ifd0(&reader).unwrap_or(OrientationResult::Truncated)
}

/// `None` means a read went out of bounds.
fn scan_ifd0(reader: &TiffReader) -> Option<OrientationResult> {
    let ifd_offset = reader.u32_at(4)? as usize;
    let entry_count = reader.u16_at(ifd_offset)? as usize;
    let entries_start = ifd_offset.checked_add(2)?;

    for i in 0..entry_count {
        let entry_off = entries_start.checked_add(i * IFD_ENTRY_LEN)?;
        if reader.u16_at(entry_off)? == ORIENTATION_TAG {
            let value = reader.u16_at(entry_off + IFD_VALUE_OFFSET)?;
            return Some(OrientationResult::Orientation(value));
        }
    }
    Some(OrientationResult::NoOrientationTag)
}
