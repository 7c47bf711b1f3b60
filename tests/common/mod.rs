#![allow(dead_code)]

use image::{GrayImage, Luma, RgbImage};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};
use specimen_labels::decoder::backend::{BarcodeScanner, Detection, MatrixReader};
use specimen_labels::{CandidateRegion, DecodeError, Decoder, DecoderConfig};
use std::path::Path;

pub const WHITE: Luma<u8> = Luma([255]);
pub const BLACK: Luma<u8> = Luma([0]);

/// Render a symbol with `scale` px per module and a white quiet zone of `quiet` px.
///
/// 1D symbols are `bar_height` rows tall; 2D symbols keep square modules.
pub fn render_symbol(
    format: BarcodeFormat,
    text: &str,
    scale: u32,
    bar_height: u32,
    quiet: u32,
) -> GrayImage {
    let matrix = MultiFormatWriter::default()
        .encode(text, &format, 0, 0)
        .expect("symbol encodes");
    let (cols, rows) = (matrix.getWidth(), matrix.getHeight());
    let sym_w = cols * scale;
    let sym_h = if rows == 1 { bar_height } else { rows * scale };

    let mut img = GrayImage::from_pixel(sym_w + 2 * quiet, sym_h + 2 * quiet, WHITE);
    for y in 0..sym_h {
        let row = if rows == 1 { 0 } else { y / scale };
        for x in 0..sym_w {
            if matrix.get(x / scale, row) {
                img.put_pixel(x + quiet, y + quiet, BLACK);
            }
        }
    }
    img
}

/// Paste `symbol` onto `canvas` with its top-left corner at (x, y)
pub fn paste(canvas: &mut GrayImage, symbol: &GrayImage, x: u32, y: u32) {
    image::imageops::replace(canvas, symbol, x as i64, y as i64);
}

pub fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, WHITE)
}

/// Uniform image; scripted scanners read its intensity as the symbol
pub fn flat(value: u8) -> GrayImage {
    GrayImage::from_pixel(64, 48, Luma([value]))
}

pub fn write_gray(dir: &Path, name: &str, img: &GrayImage) {
    img.save(dir.join(name)).expect("write test image");
}

pub fn write_specimen(dir: &Path, name: &str) {
    RgbImage::from_pixel(32, 24, image::Rgb([120, 160, 90]))
        .save(dir.join(name))
        .expect("write specimen image");
}

/// Barcode scanner keyed on the intensity of the image's top-left pixel
pub struct IntensityScanner(pub Vec<(u8, &'static str)>);

impl BarcodeScanner for IntensityScanner {
    fn scan(&self, gray: &GrayImage) -> Result<Vec<Detection>, DecodeError> {
        let value = gray.get_pixel(0, 0)[0];
        Ok(self
            .0
            .iter()
            .filter(|(v, _)| *v == value)
            .map(|(_, text)| {
                Detection::new(CandidateRegion::new(0, 0, gray.width(), gray.height()), *text)
            })
            .collect())
    }
}

/// Matrix reader that never finds anything
pub struct NoMatrix;

impl MatrixReader for NoMatrix {
    fn read(&self, _crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError> {
        Ok(Vec::new())
    }
}

/// Matrix reader that decodes every crop to the same text
pub struct FixedMatrix(pub &'static str);

impl MatrixReader for FixedMatrix {
    fn read(&self, _crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError> {
        Ok(vec![self.0.as_bytes().to_vec()])
    }
}

/// White label with one solid 60px square, a DataMatrix candidate
pub fn square_label() -> GrayImage {
    let mut img = blank(120, 120);
    for y in 30..90 {
        for x in 30..90 {
            img.put_pixel(x, y, BLACK);
        }
    }
    img
}

pub fn scripted_decoder(codes: Vec<(u8, &'static str)>) -> Decoder {
    Decoder::with_backends(
        Box::new(IntensityScanner(codes)),
        Box::new(NoMatrix),
        DecoderConfig::default(),
    )
}

pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
