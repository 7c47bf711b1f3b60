use image::{GrayImage, Luma};

/// Foreground value in binary masks
pub const FOREGROUND: u8 = 255;

/// Inverse global threshold: pixels at or below `threshold` become foreground (255),
/// everything brighter becomes background (0)
pub fn threshold_binarize_inv(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut binary = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] <= threshold {
            binary.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }

    binary
}

/// Mean intensity of a horizontal run, used as a local threshold
pub fn row_mean(gray: &GrayImage, y: u32, x0: u32, x1: u32) -> u8 {
    if x1 <= x0 || y >= gray.height() {
        return 0;
    }
    let x1 = x1.min(gray.width());
    let sum: u64 = (x0..x1).map(|x| gray.get_pixel(x, y)[0] as u64).sum();
    let count = (x1.saturating_sub(x0)).max(1) as u64;
    (sum / count) as u8
}

/// Mean intensity of a vertical run, used as a local threshold
pub fn col_mean(gray: &GrayImage, x: u32, y0: u32, y1: u32) -> u8 {
    if y1 <= y0 || x >= gray.width() {
        return 0;
    }
    let y1 = y1.min(gray.height());
    let sum: u64 = (y0..y1).map(|y| gray.get_pixel(x, y)[0] as u64).sum();
    let count = (y1.saturating_sub(y0)).max(1) as u64;
    (sum / count) as u8
}
