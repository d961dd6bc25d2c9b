// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading helpers for uploaded blobs.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Maximum accepted image size (10MB)
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Custom error types for image decoding
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub size_bytes: usize,
}

/// Decode raw image bytes from a multipart upload.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Detect image format from magic bytes.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),

        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),

        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),

        // GIF: GIF87a or GIF89a
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),

        // BMP: BM
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),

        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// Content type for an HTTP response carrying this format.
pub fn format_content_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    // 1x1 red PNG image (base64)
    const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_png_bytes() {
        let bytes = STANDARD.decode(TINY_PNG_BASE64).unwrap();
        let (img, info) = decode_image_bytes(&bytes).unwrap();
        assert_eq!(info.width, 1);
        assert_eq!(info.height, 1);
        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!(img.width(), 1);
    }

    #[test]
    fn test_decode_empty_bytes() {
        let result = decode_image_bytes(&[]);
        assert!(matches!(result.unwrap_err(), ImageError::EmptyData));
    }

    #[test]
    fn test_decode_too_large() {
        let large = vec![0u8; MAX_IMAGE_SIZE + 1];
        let result = decode_image_bytes(&large);
        assert!(matches!(result.unwrap_err(), ImageError::TooLarge(_, _)));
    }

    #[test]
    fn test_decode_corrupted_header() {
        // PNG header but truncated data
        let corrupted = [0x89, 0x50, 0x4E, 0x47, 0x00, 0x00, 0x00, 0x00];
        let result = decode_image_bytes(&corrupted);
        assert!(matches!(result.unwrap_err(), ImageError::DecodeFailed(_)));
    }

    #[test]
    fn test_detect_format_jpeg() {
        let jpeg_header = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46];
        assert_eq!(detect_format(&jpeg_header).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_format_gif() {
        let gif87 = [0x47, 0x49, 0x46, 0x38, 0x37, 0x61];
        let gif89 = [0x47, 0x49, 0x46, 0x38, 0x39, 0x61];
        assert_eq!(detect_format(&gif87).unwrap(), ImageFormat::Gif);
        assert_eq!(detect_format(&gif89).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn test_detect_format_webp() {
        let webp_header = [
            0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50,
        ];
        assert_eq!(detect_format(&webp_header).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_detect_format_unknown() {
        let unknown = [0x00, 0x00, 0x00, 0x00];
        assert!(detect_format(&unknown).is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(format_content_type(ImageFormat::Png), "image/png");
        assert_eq!(format_content_type(ImageFormat::Jpeg), "image/jpeg");
        assert_eq!(
            format_content_type(ImageFormat::Tiff),
            "application/octet-stream"
        );
    }
}
