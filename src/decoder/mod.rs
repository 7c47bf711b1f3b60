//! Label decoding
//!
//! Two passes over a label image:
//! - a full-image barcode scan (1D and general 2D symbols)
//! - a DataMatrix search over square contour candidates, used only when the
//!   barcode pass produced no payload

/// Symbol reader traits and `rxing` implementations
pub mod backend;
/// Full-image barcode pass
pub mod barcode;
/// DataMatrix candidate pass
pub mod datamatrix;

use std::path::Path;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::models::{Annotation, DecodeOutcome};
use crate::utils::grayscale::to_gray;
use backend::{BarcodeScanner, MatrixReader, RxingMatrixReader, RxingScanner};
use barcode::BarcodeDecoder;
use datamatrix::DataMatrixDecoder;

/// Barcode-first decoder with DataMatrix fallback
pub struct Decoder {
    scanner: Box<dyn BarcodeScanner>,
    reader: Box<dyn MatrixReader>,
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder backed by `rxing` with default settings
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create an `rxing`-backed decoder with custom settings
    pub fn with_config(config: DecoderConfig) -> Self {
        Self::with_backends(Box::new(RxingScanner), Box::new(RxingMatrixReader), config)
    }

    /// Create a decoder over arbitrary symbol readers
    pub fn with_backends(
        scanner: Box<dyn BarcodeScanner>,
        reader: Box<dyn MatrixReader>,
        config: DecoderConfig,
    ) -> Self {
        Self {
            scanner,
            reader,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Load an image file and decode it
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> DecodeOutcome {
        self.decode_file_annotated(path).0
    }

    /// Load an image file and decode it, keeping the audit rectangles
    pub fn decode_file_annotated<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> (DecodeOutcome, Vec<Annotation>) {
        let path = path.as_ref();
        debug!(path = %path.display(), "decoding label");
        match image::open(path) {
            Ok(image) => self.decode_image_annotated(&image),
            Err(err) => (DecodeOutcome::Failed(DecodeError::Image(err)), Vec::new()),
        }
    }

    /// Decode an already loaded image
    pub fn decode_image(&self, image: &DynamicImage) -> DecodeOutcome {
        self.decode_image_annotated(image).0
    }

    /// Decode an already loaded image, keeping the audit rectangles
    pub fn decode_image_annotated(&self, image: &DynamicImage) -> (DecodeOutcome, Vec<Annotation>) {
        let gray = to_gray(image);
        let mut annotations = Vec::new();
        let outcome = self.decode_gray(&gray, &mut annotations);
        (outcome, annotations)
    }

    /// Decode a grayscale image, appending audit rectangles to `annotations`.
    ///
    /// On `Found`, the last annotation marks the symbol that decoded.
    pub fn decode_gray(
        &self,
        gray: &GrayImage,
        annotations: &mut Vec<Annotation>,
    ) -> DecodeOutcome {
        let barcode = BarcodeDecoder::new(self.scanner.as_ref(), &self.config);
        match barcode.decode(gray, annotations) {
            DecodeOutcome::Found(payload) => return DecodeOutcome::Found(payload),
            DecodeOutcome::Failed(err) => {
                info!(error = %err, "barcode pass failed, trying datamatrix");
            }
            other => {
                info!(reason = %other.kind(), "barcode pass empty, trying datamatrix");
            }
        }

        DataMatrixDecoder::new(self.reader.as_ref(), &self.config).decode(gray, annotations)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnnotationSource, CandidateRegion, OutcomeKind};
    use backend::Detection;
    use image::Luma;
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted(Result<Vec<Detection>, String>);

    impl BarcodeScanner for Scripted {
        fn scan(&self, _gray: &GrayImage) -> Result<Vec<Detection>, DecodeError> {
            self.0.clone().map_err(DecodeError::Backend)
        }
    }

    struct CountingReader {
        text: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl MatrixReader for CountingReader {
        fn read(&self, _crop: &GrayImage) -> Result<Vec<Vec<u8>>, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.map(|t| t.as_bytes().to_vec()).into_iter().collect())
        }
    }

    fn label_with_square() -> DynamicImage {
        let mut img = GrayImage::from_pixel(200, 200, Luma([255]));
        draw_filled_rect_mut(&mut img, Rect::at(60, 60).of_size(50, 50), Luma([0]));
        DynamicImage::ImageLuma8(img)
    }

    fn decoder(
        scan: Result<Vec<Detection>, String>,
        matrix: Option<&'static str>,
    ) -> (Decoder, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            text: matrix,
            calls: Arc::clone(&calls),
        };
        let decoder = Decoder::with_backends(
            Box::new(Scripted(scan)),
            Box::new(reader),
            DecoderConfig::default(),
        );
        (decoder, calls)
    }

    #[test]
    fn test_barcode_takes_priority() {
        let hit = Detection::new(CandidateRegion::new(0, 0, 100, 40), "BAR1");
        let (decoder, calls) = decoder(Ok(vec![hit]), Some("DM1"));
        let outcome = decoder.decode_image(&label_with_square());
        assert_eq!(outcome.payload().unwrap().as_str(), "BAR1");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_falls_back_when_nothing_detected() {
        let (decoder, calls) = decoder(Ok(vec![]), Some("DM1"));
        let outcome = decoder.decode_image(&label_with_square());
        assert_eq!(outcome.payload().unwrap().as_str(), "DM1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_falls_back_when_detections_do_not_qualify() {
        let speck = Detection::new(CandidateRegion::new(0, 0, 4, 4), "NOISE");
        let (decoder, _) = decoder(Ok(vec![speck]), Some("DM2"));
        let outcome = decoder.decode_image(&label_with_square());
        assert_eq!(outcome.payload().unwrap().as_str(), "DM2");
    }

    #[test]
    fn test_falls_back_when_scanner_errors() {
        let (decoder, _) = decoder(Err("boom".into()), Some("DM3"));
        let outcome = decoder.decode_image(&label_with_square());
        assert_eq!(outcome.payload().unwrap().as_str(), "DM3");
    }

    #[test]
    fn test_both_passes_failing_is_not_found() {
        let (decoder, calls) = decoder(Ok(vec![]), None);
        let outcome = decoder.decode_image(&label_with_square());
        assert_eq!(outcome.kind(), OutcomeKind::NotFound);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_last_annotation_marks_the_decoding_pass() {
        let hit = Detection::new(CandidateRegion::new(0, 0, 100, 40), "BAR1");
        let (by_barcode, _) = decoder(Ok(vec![hit]), None);
        let (_, annotations) = by_barcode.decode_image_annotated(&label_with_square());
        assert_eq!(annotations.last().map(|a| a.source), Some(AnnotationSource::Barcode));

        let (by_matrix, _) = decoder(Ok(vec![]), Some("DM1"));
        let (_, annotations) = by_matrix.decode_image_annotated(&label_with_square());
        assert_eq!(
            annotations.last().map(|a| a.source),
            Some(AnnotationSource::DataMatrix)
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let (decoder, _) = decoder(Ok(vec![]), None);
        let outcome = decoder.decode_file("/nonexistent/label_lbl.tif");
        assert!(matches!(outcome, DecodeOutcome::Failed(DecodeError::Image(_))));
    }
}
