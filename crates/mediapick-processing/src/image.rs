//! Image normalization engine: conditional resize and HEIC/HEIF→JPEG
//! conversion, honoring EXIF orientation throughout.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageFormat;

use mediapick_core::{AcquisitionOptions, TempStore};

use crate::mime;
use crate::orientation::{self, Orientation};

pub struct ImageNormalizer;

impl ImageNormalizer {
    /// Pixel dimensions as displayed, i.e. with the EXIF-rotation axis swap
    /// applied. Header-only decode. Returns (0, 0) when the file cannot be
    /// read as an image.
    pub fn dimensions(path: &Path) -> (u32, u32) {
        let raw = match Self::raw_dimensions(path) {
            Ok(dims) => dims,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "could not read image bounds");
                return (0, 0);
            }
        };
        if Orientation::read(path).swaps_dimensions() {
            (raw.1, raw.0)
        } else {
            raw
        }
    }

    fn raw_dimensions(path: &Path) -> Result<(u32, u32)> {
        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    /// Resizing is skipped only when quality is 100 and either no constraint
    /// is set or the source already fits both constraints.
    pub fn should_resize(width: u32, height: u32, options: &AcquisitionOptions) -> bool {
        if (options.max_width == 0 || options.max_height == 0) && options.quality == 100 {
            return false;
        }
        if options.max_width >= width && options.max_height >= height && options.quality == 100 {
            return false;
        }
        true
    }

    pub fn should_convert_to_jpeg(mime_type: &str, options: &AcquisitionOptions) -> bool {
        options.convert_to_jpeg && mime::is_heif(mime_type)
    }

    /// Constrain to maxWidth first, then re-check maxHeight, preserving
    /// aspect ratio with integer truncation. Zero maxima leave the
    /// dimensions untouched.
    pub fn constrain_dimensions(
        orig_width: u32,
        orig_height: u32,
        options: &AcquisitionOptions,
    ) -> (u32, u32) {
        let mut width = orig_width;
        let mut height = orig_height;

        if options.max_width == 0 || options.max_height == 0 {
            return (width, height);
        }

        if options.max_width < width {
            height = ((options.max_width as f32 / width as f32) * height as f32) as u32;
            width = options.max_width;
        }

        if options.max_height < height {
            width = ((options.max_height as f32 / height as f32) * width as f32) as u32;
            height = options.max_height;
        }

        (width, height)
    }

    /// Resize and/or convert an image, returning the path to the result.
    ///
    /// Returns the input path unchanged when neither resize nor conversion is
    /// needed (no re-encode, to avoid lossy recompression and metadata loss)
    /// and on any processing failure (best-effort, logged). On success the
    /// input file is deleted and replaced by a new temp file carrying the
    /// original orientation tag.
    pub fn normalize(
        path: &Path,
        mime_type: &str,
        options: &AcquisitionOptions,
        temp: &TempStore,
    ) -> PathBuf {
        match Self::transform(path, mime_type, options, temp) {
            Ok(Some(out)) => out,
            Ok(None) => path.to_path_buf(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "image normalization failed, keeping original"
                );
                path.to_path_buf()
            }
        }
    }

    fn transform(
        path: &Path,
        mime_type: &str,
        options: &AcquisitionOptions,
        temp: &TempStore,
    ) -> Result<Option<PathBuf>> {
        let orientation = Orientation::read(path);
        let raw = Self::raw_dimensions(path).context("decode image bounds")?;
        let (width, height) = if orientation.swaps_dimensions() {
            (raw.1, raw.0)
        } else {
            raw
        };

        let target_quality;
        let converting = Self::should_convert_to_jpeg(mime_type, options);
        if !Self::should_resize(width, height, options) {
            if !converting {
                return Ok(None);
            }
            target_quality = options.conversion_quality;
        } else {
            target_quality = options.quality;
        }

        // Decoding the full bitmap drops all EXIF metadata, so the original
        // orientation tag is written back onto the output below.
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .context("decode image")?;

        let (new_width, new_height) = Self::constrain_dimensions(width, height, options);
        let scaled = if orientation.swaps_dimensions() {
            img.resize_exact(new_height, new_width, FilterType::Triangle)
        } else {
            img.resize_exact(new_width, new_height, FilterType::Triangle)
        };

        // PNG stays PNG; everything else (JPEG, HEIC/HEIF, exotic formats)
        // is written as JPEG at the target quality.
        let format = if mime_type == "image/png" && !converting {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        };
        let extension = if format == ImageFormat::Png { "png" } else { "jpg" };

        let out_path = temp.create(extension).context("create output temp file")?;
        tracing::debug!(
            source = %path.display(),
            output = %out_path.display(),
            width = new_width,
            height = new_height,
            quality = target_quality,
            converting,
            "re-encoding image"
        );

        let file = fs::File::create(&out_path).context("open output temp file")?;
        let mut writer = BufWriter::new(file);
        match format {
            ImageFormat::Png => scaled.write_to(&mut writer, ImageFormat::Png)?,
            _ => {
                let quality = target_quality.clamp(1, 100) as u8;
                let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
                encoder.encode_image(&scaled.to_rgb8())?;
            }
        }
        writer.flush()?;

        orientation::rewrite(&out_path, orientation)?;
        TempStore::delete(path);
        Ok(Some(out_path))
    }
}
