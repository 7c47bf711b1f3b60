use image::imageops;
use image::{GrayImage, Luma};
use tracing::{debug, info};

use crate::config::DecoderConfig;
use crate::decoder::backend::MatrixReader;
use crate::detector::contour::ContourDetector;
use crate::models::{Annotation, AnnotationSource, CandidateRegion, DecodeOutcome, Payload};

/// Fill for the part of a crop margin that lies outside the image
const PAPER: u8 = 255;

/// DataMatrix pass over square candidate regions
pub struct DataMatrixDecoder<'a, R: MatrixReader + ?Sized> {
    reader: &'a R,
    config: &'a DecoderConfig,
}

impl<'a, R: MatrixReader + ?Sized> DataMatrixDecoder<'a, R> {
    /// Borrow a reader and its configuration
    pub fn new(reader: &'a R, config: &'a DecoderConfig) -> Self {
        Self { reader, config }
    }

    /// Try each candidate region in turn; the first one that decodes wins.
    ///
    /// A reader error on one candidate only skips that candidate. Crops are
    /// clamped to the image, so candidates on the border are still tried.
    pub fn decode(&self, gray: &GrayImage, annotations: &mut Vec<Annotation>) -> DecodeOutcome {
        let candidates = ContourDetector::detect(gray, self.config);

        for (index, candidate) in candidates.iter().enumerate() {
            annotations.push(Annotation::around(candidate, 0, AnnotationSource::DataMatrix));

            let Some(crop) = margin_crop(gray, candidate, self.config.crop_margin) else {
                continue;
            };

            let symbols = match self.reader.read(&crop) {
                Ok(symbols) => symbols,
                Err(err) => {
                    debug!(candidate = index, error = %err, "candidate failed to decode");
                    continue;
                }
            };

            let Some(first) = symbols.first() else {
                debug!(candidate = index, "no symbol in candidate");
                continue;
            };
            match Payload::from_utf8(first) {
                Ok(Some(payload)) => {
                    info!(candidate = index, payload = %payload, "datamatrix decoded");
                    return DecodeOutcome::Found(payload);
                }
                Ok(None) => debug!(candidate = index, "empty datamatrix payload"),
                Err(err) => debug!(candidate = index, error = %err, "candidate failed to decode"),
            }
        }

        DecodeOutcome::NotFound
    }
}

/// Crop `candidate` plus `margin` on every side.
///
/// The window is clamped to the image; whatever part of the margin falls
/// outside is filled with paper white so the reader always sees a quiet zone.
fn margin_crop(gray: &GrayImage, candidate: &CandidateRegion, margin: u32) -> Option<GrayImage> {
    let window = candidate.expand_clamped(margin, gray.dimensions())?;
    let inside = imageops::crop_imm(gray, window.x, window.y, window.width, window.height);

    let width = window.width.max(candidate.width.saturating_add(2 * margin));
    let height = window.height.max(candidate.height.saturating_add(2 * margin));
    if (width, height) == (window.width, window.height) {
        return Some(inside.to_image());
    }

    let left = margin.saturating_sub(candidate.x);
    let top = margin.saturating_sub(candidate.y);
    let mut framed = GrayImage::from_pixel(width, height, Luma([PAPER]));
    imageops::replace(&mut framed, &inside.to_image(), i64::from(left), i64::from(top));
    Some(framed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::models::OutcomeKind;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use std::sync::Mutex;

    /// Decodes only crops of one width; records every crop size it is handed
    struct WidthReader {
        width: u32,
        text: &'static str,
        seen: Mutex<Vec<(u32, u32)>>,
    }

    impl WidthReader {
        fn new(width: u32, text: &'static str) -> Self {
            Self {
                width,
                text,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<(u32, u32)> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl MatrixReader for WidthReader {
        fn read(&self, crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError> {
            self.seen.lock().unwrap().push(crop.dimensions());
            if crop.width() == self.width {
                Ok(vec![self.text.as_bytes().to_vec()])
            } else {
                Err(DecodeError::Backend("no symbol".into()))
            }
        }
    }

    fn white(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([255]))
    }

    fn dark_rect(img: &mut GrayImage, x: i32, y: i32, w: u32, h: u32) {
        draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), Luma([0]));
    }

    fn run(img: &GrayImage, reader: &WidthReader) -> (DecodeOutcome, Vec<Annotation>) {
        let config = DecoderConfig::default();
        let mut annotations = Vec::new();
        let outcome = DataMatrixDecoder::new(reader, &config).decode(img, &mut annotations);
        (outcome, annotations)
    }

    #[test]
    fn test_no_candidates_is_not_found() {
        let reader = WidthReader::new(70, "ACC1");
        let (outcome, annotations) = run(&white(100, 100), &reader);
        assert_eq!(outcome.kind(), OutcomeKind::NotFound);
        assert!(reader.seen().is_empty());
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_crop_has_margin() {
        let mut img = white(200, 200);
        dark_rect(&mut img, 50, 50, 60, 60);
        let reader = WidthReader::new(70, "ACC1");
        let (outcome, annotations) = run(&img, &reader);
        assert_eq!(outcome.payload().unwrap().as_str(), "ACC1");
        assert_eq!(reader.seen(), vec![(70, 70)]);
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].source, AnnotationSource::DataMatrix);
    }

    #[test]
    fn test_border_candidate_is_clamped_not_skipped() {
        for (x, y) in [(0, 0), (0, 70), (70, 0), (140, 140)] {
            let mut img = white(200, 200);
            dark_rect(&mut img, x, y, 60, 60);
            let reader = WidthReader::new(70, "EDGE42");
            let (outcome, _) = run(&img, &reader);
            assert_eq!(
                outcome.payload().map(|p| p.as_str()),
                Some("EDGE42"),
                "square at ({x}, {y})"
            );
            assert_eq!(reader.seen(), vec![(70, 70)]);
        }
    }

    #[test]
    fn test_margin_outside_image_is_paper_white() {
        let mut img = white(200, 200);
        dark_rect(&mut img, 0, 70, 60, 60);
        let candidate = CandidateRegion::new(0, 70, 60, 60);

        let crop = margin_crop(&img, &candidate, 5).unwrap();
        assert_eq!(crop.dimensions(), (70, 70));
        // left margin is synthetic, the symbol starts after it
        assert_eq!(crop.get_pixel(0, 35)[0], PAPER);
        assert_eq!(crop.get_pixel(4, 35)[0], PAPER);
        assert_eq!(crop.get_pixel(5, 35)[0], 0);
        assert_eq!(crop.get_pixel(64, 35)[0], 0);
        assert_eq!(crop.get_pixel(65, 35)[0], 255);
    }

    #[test]
    fn test_interior_crop_is_a_plain_window() {
        let mut img = white(200, 200);
        img.put_pixel(45, 45, Luma([7]));
        let candidate = CandidateRegion::new(50, 50, 60, 60);
        let crop = margin_crop(&img, &candidate, 5).unwrap();
        assert_eq!(crop.dimensions(), (70, 70));
        assert_eq!(crop.get_pixel(0, 0)[0], 7);
    }

    #[test]
    fn test_failed_candidate_does_not_abort_search() {
        let mut img = white(320, 220);
        // discovered first (raster order), its 70px crop is rejected
        dark_rect(&mut img, 40, 20, 60, 60);
        dark_rect(&mut img, 200, 100, 80, 80);
        let reader = WidthReader::new(90, "SECOND");
        let (outcome, annotations) = run(&img, &reader);
        assert_eq!(outcome.payload().unwrap().as_str(), "SECOND");
        assert_eq!(reader.seen(), vec![(70, 70), (90, 90)]);
        assert_eq!(annotations.len(), 2);
    }

    #[test]
    fn test_all_candidates_failing_is_not_found() {
        let mut img = white(320, 220);
        dark_rect(&mut img, 40, 20, 60, 60);
        dark_rect(&mut img, 200, 100, 80, 80);
        let reader = WidthReader::new(1, "NEVER");
        let (outcome, _) = run(&img, &reader);
        assert_eq!(outcome.kind(), OutcomeKind::NotFound);
        assert_eq!(reader.seen().len(), 2);
    }
}
