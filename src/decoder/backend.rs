//! Symbol reader seams and their `rxing` implementations.
//!
//! The decoders only ever see these traits, so the symbol algorithms stay an
//! opaque dependency and tests can substitute scripted readers.

use std::collections::HashMap;

use image::GrayImage;
use rxing::{BarcodeFormat, Exceptions, RXingResult};
use tracing::debug;

use crate::error::DecodeError;
use crate::models::CandidateRegion;
use crate::utils::binarization::{col_mean, row_mean};

/// Fraction of a neighbouring row that must agree with the scan row for a
/// linear symbol to extend over it
const ROW_AGREEMENT: f32 = 0.9;

/// One symbol reported by a full-image scan
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Printed extent of the symbol
    pub region: CandidateRegion,
    /// Raw payload bytes, possibly empty
    pub data: Vec<u8>,
}

impl Detection {
    /// Convenience constructor
    pub fn new(region: CandidateRegion, data: impl Into<Vec<u8>>) -> Self {
        Self {
            region,
            data: data.into(),
        }
    }
}

/// Finds and decodes every barcode (1D or 2D) in an image
pub trait BarcodeScanner: Send + Sync {
    /// Scan the whole image. An empty vector means nothing was detected.
    fn scan(&self, gray: &GrayImage) -> Result<Vec<Detection>, DecodeError>;
}

/// Decodes DataMatrix symbols inside a cropped region
pub trait MatrixReader: Send + Sync {
    /// Decode the crop. An empty vector means no symbol was found.
    fn read(&self, crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError>;
}

/// Multi-format scanner backed by `rxing`
///
/// DataMatrix hits are dropped here; those symbols belong to the contour pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingScanner;

impl BarcodeScanner for RxingScanner {
    fn scan(&self, gray: &GrayImage) -> Result<Vec<Detection>, DecodeError> {
        let (width, height) = gray.dimensions();
        match rxing::helpers::detect_multiple_in_luma(gray.as_raw().clone(), width, height) {
            Ok(results) => Ok(results
                .iter()
                .filter(|result| *result.getBarcodeFormat() != BarcodeFormat::DATA_MATRIX)
                .map(|result| detection_from_result(gray, result))
                .collect()),
            Err(Exceptions::NotFoundException(_)) => Ok(Vec::new()),
            Err(err) => Err(DecodeError::Backend(err.to_string())),
        }
    }
}

/// DataMatrix-only reader backed by `rxing`
#[derive(Debug, Default, Clone, Copy)]
pub struct RxingMatrixReader;

impl MatrixReader for RxingMatrixReader {
    fn read(&self, crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError> {
        let (width, height) = crop.dimensions();
        // detect_in_luma passes width and height through swapped
        match rxing::helpers::detect_in_luma_with_hints(
            crop.as_raw().clone(),
            width,
            height,
            Some(BarcodeFormat::DATA_MATRIX),
            &mut HashMap::new(),
        ) {
            Ok(result) => Ok(vec![result.getText().as_bytes().to_vec()]),
            Err(Exceptions::NotFoundException(_)) => Ok(Vec::new()),
            Err(err) => Err(DecodeError::Backend(err.to_string())),
        }
    }
}

fn detection_from_result(gray: &GrayImage, result: &RXingResult) -> Detection {
    let data = result.getText().as_bytes().to_vec();
    let points = result.getPoints();
    if points.is_empty() {
        return Detection::new(CandidateRegion::new(0, 0, 0, 0), data);
    }

    let (img_w, img_h) = gray.dimensions();
    let clamp_x = |v: f32| (v.max(0.0) as u32).min(img_w.saturating_sub(1));
    let clamp_y = |v: f32| (v.max(0.0) as u32).min(img_h.saturating_sub(1));

    let mut min_x = clamp_x(points.iter().map(|p| p.x).fold(f32::INFINITY, f32::min));
    let mut max_x = clamp_x(points.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max));
    let mut min_y = clamp_y(points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min));
    let mut max_y = clamp_y(points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max));

    // 1D readers report the two ends of the scan line only
    if max_y == min_y && max_x > min_x {
        let (top, bottom) = linear_extent(gray, min_x, max_x + 1, min_y);
        debug!(
            format = ?result.getBarcodeFormat(),
            row = min_y,
            top,
            bottom,
            "estimated linear symbol height"
        );
        min_y = top;
        max_y = bottom;
    } else if max_x == min_x && max_y > min_y {
        let (left, right) = linear_extent_vertical(gray, min_y, max_y + 1, min_x);
        debug!(
            format = ?result.getBarcodeFormat(),
            column = min_x,
            left,
            right,
            "estimated rotated linear symbol width"
        );
        min_x = left;
        max_x = right;
    }

    let region = CandidateRegion::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
    Detection::new(region, data)
}

/// Vertical extent `(top, bottom)` of a linear symbol crossing `row` between `x0..x1`
pub(crate) fn linear_extent(gray: &GrayImage, x0: u32, x1: u32, row: u32) -> (u32, u32) {
    let x1 = x1.min(gray.width());
    if x1 <= x0 || row >= gray.height() {
        return (row, row);
    }
    let threshold = row_mean(gray, row, x0, x1);
    let reference: Vec<bool> = (x0..x1)
        .map(|x| gray.get_pixel(x, row)[0] < threshold)
        .collect();
    let needed = ROW_AGREEMENT * reference.len() as f32;

    let agrees = |y: u32| {
        let same = (x0..x1)
            .zip(&reference)
            .filter(|(x, dark)| (gray.get_pixel(*x, y)[0] < threshold) == **dark)
            .count();
        same as f32 >= needed
    };
    grow(row, gray.height(), agrees)
}

/// Horizontal extent `(left, right)` of a rotated linear symbol crossing `column`
/// between `y0..y1`
pub(crate) fn linear_extent_vertical(
    gray: &GrayImage,
    y0: u32,
    y1: u32,
    column: u32,
) -> (u32, u32) {
    let y1 = y1.min(gray.height());
    if y1 <= y0 || column >= gray.width() {
        return (column, column);
    }
    let threshold = col_mean(gray, column, y0, y1);
    let reference: Vec<bool> = (y0..y1)
        .map(|y| gray.get_pixel(column, y)[0] < threshold)
        .collect();
    let needed = ROW_AGREEMENT * reference.len() as f32;

    let agrees = |x: u32| {
        let same = (y0..y1)
            .zip(&reference)
            .filter(|(y, dark)| (gray.get_pixel(x, *y)[0] < threshold) == **dark)
            .count();
        same as f32 >= needed
    };
    grow(column, gray.width(), agrees)
}

/// Widen `start` in both directions while `agrees` holds, staying below `limit`
fn grow(start: u32, limit: u32, agrees: impl Fn(u32) -> bool) -> (u32, u32) {
    let mut low = start;
    while low > 0 && agrees(low - 1) {
        low -= 1;
    }
    let mut high = start;
    while high + 1 < limit && agrees(high + 1) {
        high += 1;
    }
    (low, high)
}
