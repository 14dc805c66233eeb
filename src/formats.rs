//! Source image formats accepted by the scanner
//!
//! Eligibility is decided by extension only; the decoder sniffs the real
//! content later, so a mislabelled file still fails or succeeds on its bytes.

use crate::error::{CompressionError, Result};
use image::ImageFormat;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// PNG, possibly with alpha or a palette
    Png,
    /// JPEG under either `.jpg` or `.jpeg`
    Jpeg,
}

impl SourceFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" => Some(SourceFormat::Png),
            "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Png => "PNG",
            SourceFormat::Jpeg => "JPEG",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SourceFormat {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| CompressionError::UnsupportedFormat(s.to_string()))
    }
}
