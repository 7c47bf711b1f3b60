use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage};

/// Load an image file as 8-bit luma
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage, image::ImageError> {
    Ok(image::open(path)?.to_luma8())
}

/// Load an image file as 8-bit RGB (for annotated output)
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, image::ImageError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Convert any decoded image to luma; a no-op copy for luma input
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        other => other.to_luma8(),
    }
}
