//! Preview image capture for quote documents.

use async_trait::async_trait;
use image::codecs::jpeg::JpegDecoder;
use image::{ImageDecoder, ImageReader};
use std::io::Cursor;
use std::path::PathBuf;

use crate::error::{QuoteError, Result};
use crate::model::{ImageFormat, PreviewImage};

/// Produces a rendering of the configured vanity.
#[async_trait]
pub trait PreviewCapture: Send + Sync {
    async fn capture(&self) -> Result<PreviewImage>;
}

/// Reads a pre-rendered JPEG from disk.
#[derive(Debug, Clone)]
pub struct FilePreviewCapture {
    path: PathBuf,
}

impl FilePreviewCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PreviewCapture for FilePreviewCapture {
    async fn capture(&self) -> Result<PreviewImage> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| QuoteError::PreviewCaptureFailed {
                message: format!("{}: {}", self.path.display(), e),
            })?;
        jpeg_preview(data)
    }
}

/// Capture a preview, degrading to `None` on failure.
///
/// A quote without an image is still a valid quote, so capture errors are
/// logged and swallowed here.
pub async fn capture_preview(capture: &dyn PreviewCapture) -> Option<PreviewImage> {
    match capture.capture().await {
        Ok(image) => {
            tracing::debug!("Captured {}x{} preview", image.width, image.height);
            Some(image)
        }
        Err(err) => {
            tracing::warn!("Continuing without preview image: {}", err);
            None
        }
    }
}

/// Wrap JPEG bytes as a preview, reading size and color components from
/// the frame header.
pub fn jpeg_preview(data: Vec<u8>) -> Result<PreviewImage> {
    let reader = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .map_err(capture_failed)?;
    if reader.format() != Some(image::ImageFormat::Jpeg) {
        return Err(capture_failed("not a JPEG image"));
    }

    let decoder = JpegDecoder::new(Cursor::new(&data)).map_err(capture_failed)?;
    let (width, height) = decoder.dimensions();
    if width == 0 || height == 0 {
        return Err(capture_failed("JPEG has zero size"));
    }
    // Components of the encoded frame, not of the decoded pixels.
    let components = decoder.original_color_type().channel_count();

    Ok(PreviewImage {
        format: ImageFormat::Jpeg,
        width,
        height,
        components,
        data,
    })
}

fn capture_failed(err: impl std::fmt::Display) -> QuoteError {
    QuoteError::PreviewCaptureFailed {
        message: err.to_string(),
    }
}
