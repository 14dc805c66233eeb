use crate::constants::{MAX_IMAGE_DIMENSION, TEMP_FILE_PREFIX, TEMP_FILE_SUFFIX};
use crate::error::{CompressionError, Result};
use crate::formats::SourceFormat;
use crate::validation::{validate_quality, validate_source_size};
use image::{DynamicImage, GenericImageView, ImageReader, RgbImage};
use jpeg_encoder::{ColorType, Encoder};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Byte sizes of one source image and its compressed copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
}

/// Loads an image file and returns it along with its size on disk.
///
/// The format is sniffed from the content first and falls back to the
/// extension. Oversized files and images are rejected before or right after
/// decoding.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    let file_size = validate_source_size(input_path)?;

    let decode_error = |source| CompressionError::ImageDecode {
        path: input_path.to_path_buf(),
        source,
    };

    let mut reader = ImageReader::open(input_path)?.with_guessed_format()?;
    if reader.format().is_none() {
        if let Some(format) = SourceFormat::from_path(input_path) {
            reader.set_format(format.to_image_format());
        }
    }
    let img = reader.decode().map_err(decode_error)?;

    let (width, height) = img.dimensions();
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            MAX_IMAGE_DIMENSION,
        ));
    }

    Ok((img, file_size))
}

/// Drops alpha and palette information so the pixels are JPEG-compatible.
pub fn to_jpeg_compatible(img: &DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Entropy-coding settings for the JPEG writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegOptions {
    /// Huffman tables built from the image's own symbol statistics.
    pub optimize_huffman: bool,
    pub progressive: bool,
}

impl Default for JpegOptions {
    fn default() -> Self {
        Self {
            optimize_huffman: true,
            progressive: true,
        }
    }
}

/// Encodes `rgb` into `writer` as a progressive JPEG with optimized Huffman tables.
pub fn encode_jpeg<W: Write>(rgb: &RgbImage, quality: u8, writer: W) -> Result<()> {
    encode_jpeg_with(rgb, quality, JpegOptions::default(), writer)
}

pub fn encode_jpeg_with<W: Write>(
    rgb: &RgbImage,
    quality: u8,
    options: JpegOptions,
    writer: W,
) -> Result<()> {
    let (width, height) = rgb.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(CompressionError::InvalidDimensions(
            width,
            height,
            u32::from(u16::MAX),
        ));
    };

    let mut encoder = Encoder::new(writer, quality);
    encoder.set_optimized_huffman_tables(options.optimize_huffman);
    encoder.set_progressive(options.progressive);
    encoder.encode(rgb.as_raw(), w, h, ColorType::Rgb)?;
    Ok(())
}

/// Writes a JPEG of `img` to `dest_path` without ever leaving a partial file there.
///
/// The data goes to a hidden temp file in the destination directory, which is
/// then renamed into place. The rename refuses to replace an existing file,
/// reported as `DestinationExists`.
pub fn save_jpeg(img: &DynamicImage, dest_path: &Path, quality: u8) -> Result<u64> {
    let dest_dir = dest_path.parent().unwrap_or(Path::new("."));
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(TEMP_FILE_SUFFIX)
        .tempfile_in(dest_dir)?;

    let rgb = to_jpeg_compatible(img);
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        encode_jpeg(&rgb, quality, &mut writer)?;
        writer.flush()?;
    }

    // Temp file is removed on drop if the rename fails.
    temp.persist_noclobber(dest_path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            CompressionError::DestinationExists(dest_path.to_path_buf())
        } else {
            CompressionError::Io(e.error)
        }
    })?;

    Ok(fs::metadata(dest_path)?.len())
}

/// Compresses one source image into a JPEG at `dest_path`.
///
/// Every failure comes back as an error value; nothing here panics on bad input.
pub fn compress_image(source_path: &Path, dest_path: &Path, quality: u8) -> Result<CompressionStats> {
    let quality = validate_quality(quality)?;
    let (img, original_size) = load_image_with_metadata(source_path)?;
    let compressed_size = save_jpeg(&img, dest_path, quality)?;

    Ok(CompressionStats {
        original_size,
        compressed_size,
    })
}
