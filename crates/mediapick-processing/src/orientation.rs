//! EXIF orientation: reading, dimension-swap decisions, and re-applying the
//! tag to re-encoded output.

use std::fs;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use img_parts::{jpeg::Jpeg, png::Png, Bytes, ImageEXIF};

const TAG_ORIENTATION: u16 = 0x0112;

/// EXIF orientation value (1–8, 0 meaning undefined).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation(pub u16);

impl Orientation {
    pub const UNDEFINED: Orientation = Orientation(0);
    pub const NORMAL: Orientation = Orientation(1);
    pub const ROTATE_90: Orientation = Orientation(6);
    pub const ROTATE_270: Orientation = Orientation(8);

    /// Read the orientation tag from a media file; any failure (not an
    /// image, no EXIF, truncated data) maps to `UNDEFINED`.
    pub fn read(path: &Path) -> Orientation {
        let Ok(file) = fs::File::open(path) else {
            return Orientation::UNDEFINED;
        };
        let mut reader = BufReader::new(file);
        let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
            return Orientation::UNDEFINED;
        };
        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(|v| Orientation(v as u16))
            .unwrap_or(Orientation::UNDEFINED)
    }

    /// 90°/270° rotations swap the displayed width and height relative to
    /// the raw decode bounds.
    pub fn swaps_dimensions(self) -> bool {
        self == Orientation::ROTATE_90 || self == Orientation::ROTATE_270
    }

    /// Upright images need no orientation rewrite on output.
    pub fn is_upright(self) -> bool {
        self == Orientation::UNDEFINED || self == Orientation::NORMAL
    }
}

/// Smallest valid EXIF body carrying only an orientation entry: a
/// little-endian TIFF header plus a single-field IFD0.
fn orientation_exif_payload(orientation: Orientation) -> Vec<u8> {
    let mut out = Vec::with_capacity(26);
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    out.extend_from_slice(&1u16.to_le_bytes()); // entry count
    out.extend_from_slice(&TAG_ORIENTATION.to_le_bytes());
    out.extend_from_slice(&3u16.to_le_bytes()); // type SHORT
    out.extend_from_slice(&1u32.to_le_bytes()); // value count
    out.extend_from_slice(&orientation.0.to_le_bytes());
    out.extend_from_slice(&[0, 0]); // value padding
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    out
}

/// Re-apply an orientation tag to a freshly encoded JPEG or PNG file.
///
/// Skipped for upright orientations since the EXIF rewrite costs a full
/// read-modify-write of the file. Unsupported formats are left untouched.
pub fn rewrite(path: &Path, orientation: Orientation) -> Result<()> {
    if orientation.is_upright() {
        return Ok(());
    }

    let data = fs::read(path).context("read encoded image")?;
    let payload = Bytes::from(orientation_exif_payload(orientation));

    let encoded = if let Ok(mut jpeg) = Jpeg::from_bytes(data.clone().into()) {
        jpeg.set_exif(Some(payload));
        jpeg.encoder().bytes().to_vec()
    } else if let Ok(mut png) = Png::from_bytes(data.into()) {
        png.set_exif(Some(payload));
        png.encoder().bytes().to_vec()
    } else {
        return Ok(());
    };

    fs::write(path, encoded).context("write image with orientation tag")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn write_test_jpeg(path: &Path) {
        let img = RgbImage::from_pixel(8, 4, Rgb([200, 10, 10]));
        img.save_with_format(path, ImageFormat::Jpeg).unwrap();
    }

    #[test]
    fn test_swaps_dimensions() {
        assert!(Orientation::ROTATE_90.swaps_dimensions());
        assert!(Orientation::ROTATE_270.swaps_dimensions());
        assert!(!Orientation::NORMAL.swaps_dimensions());
        assert!(!Orientation(3).swaps_dimensions()); // 180° keeps axes
        assert!(!Orientation::UNDEFINED.swaps_dimensions());
    }

    #[test]
    fn test_is_upright() {
        assert!(Orientation::UNDEFINED.is_upright());
        assert!(Orientation::NORMAL.is_upright());
        assert!(!Orientation::ROTATE_90.is_upright());
    }

    #[test]
    fn test_payload_layout() {
        let payload = orientation_exif_payload(Orientation::ROTATE_90);
        assert_eq!(payload.len(), 26);
        assert_eq!(&payload[..2], b"II");
        // orientation value sits right after the 12-byte entry header
        assert_eq!(payload[20], 6);
    }

    #[test]
    fn test_read_no_exif_is_undefined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        write_test_jpeg(&path);
        assert_eq!(Orientation::read(&path), Orientation::UNDEFINED);
    }

    #[test]
    fn test_rewrite_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.jpg");
        write_test_jpeg(&path);

        rewrite(&path, Orientation::ROTATE_90).unwrap();
        assert_eq!(Orientation::read(&path), Orientation::ROTATE_90);

        // image must still decode after the rewrite
        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 8);
    }

    #[test]
    fn test_rewrite_upright_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upright.jpg");
        write_test_jpeg(&path);
        let before = fs::read(&path).unwrap();

        rewrite(&path, Orientation::NORMAL).unwrap();
        assert_eq!(fs::read(&path).unwrap(), before);
    }
}
