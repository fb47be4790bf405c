use crate::error::VqaError;
use kornia_image::{Image, ImageSize, allocator::CpuAllocator};

/// Decodes an uploaded file into an RGB8 bitmap.
///
/// The encoding is sniffed from the bytes, so any raster format the `image`
/// crate understands is accepted (PNG, JPEG, WebP, GIF, ...). Alpha and
/// grayscale inputs are converted to RGB.
pub fn decode_rgb8(bytes: &[u8]) -> Result<Image<u8, 3, CpuAllocator>, VqaError> {
    if bytes.is_empty() {
        return Err(VqaError::InvalidImage("empty upload".to_string()));
    }

    let rgb = image::load_from_memory(bytes)
        .map_err(|e| VqaError::InvalidImage(e.to_string()))?
        .to_rgb8();

    let size = ImageSize {
        width: rgb.width() as usize,
        height: rgb.height() as usize,
    };

    Image::new(size, rgb.into_raw(), CpuAllocator)
        .map_err(|e| VqaError::InvalidImage(e.to_string()))
}
