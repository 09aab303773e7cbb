use crate::classify::Scorer;
use crate::core::RgbImageView;
use crate::detector::HandDetector;
use crate::recognize::{Recognition, RecognizeError, Recognizer};
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Image file extensions accepted by [`load_rgb_image`], lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors produced by the image helpers.
#[derive(thiserror::Error, Debug)]
pub enum ImageLoadError {
    #[error("unsupported image format: {} (expected jpg, jpeg or png)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Decode(#[from] ::image::ImageError),

    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },
}

/// `true` if `path` has one of the [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
        .unwrap_or(false)
}

/// Decode a jpg/png file into 8-bit RGB, dropping any alpha channel.
pub fn load_rgb_image(path: impl AsRef<Path>) -> Result<::image::RgbImage, ImageLoadError> {
    let path = path.as_ref();
    if !is_supported_image(path) {
        return Err(ImageLoadError::UnsupportedFormat(path.to_path_buf()));
    }
    Ok(::image::ImageReader::open(path)?.decode()?.to_rgb8())
}

/// Convert an `image::RgbImage` into the lightweight `signhand-core` view type.
pub fn rgb_view(img: &::image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width(),
        height: img.height(),
        data: img.as_raw(),
    }
}

/// Copy a raw row-major RGB buffer into an `image::RgbImage`.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<::image::RgbImage, ImageLoadError> {
    let expected = RgbImageView::expected_len(width, height)
        .ok_or(ImageLoadError::InvalidRgbDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(ImageLoadError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }

    ::image::RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(ImageLoadError::InvalidRgbDimensions { width, height })
}

/// Run recognition end-to-end on a decoded image.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, recognizer),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn recognize_image<D: HandDetector, S: Scorer>(
    img: &::image::RgbImage,
    recognizer: &Recognizer<D, S>,
) -> Result<Recognition, RecognizeError> {
    recognizer.recognize(&rgb_view(img))
}
