use image::GrayImage;
use tracing::{debug, info};

use crate::config::DecoderConfig;
use crate::decoder::backend::BarcodeScanner;
use crate::models::{Annotation, AnnotationSource, DecodeOutcome, Payload};

/// Full-image barcode pass (1D and general 2D symbols)
pub struct BarcodeDecoder<'a, S: BarcodeScanner + ?Sized> {
    scanner: &'a S,
    config: &'a DecoderConfig,
}

impl<'a, S: BarcodeScanner + ?Sized> BarcodeDecoder<'a, S> {
    /// Borrow a scanner and its configuration
    pub fn new(scanner: &'a S, config: &'a DecoderConfig) -> Self {
        Self { scanner, config }
    }

    /// Return the first detection that is large enough and carries data.
    ///
    /// `NotFound` when the scanner sees nothing, `Empty` when it sees symbols
    /// but none qualifies.
    pub fn decode(&self, gray: &GrayImage, annotations: &mut Vec<Annotation>) -> DecodeOutcome {
        let detections = match self.scanner.scan(gray) {
            Ok(detections) => detections,
            Err(err) => return DecodeOutcome::Failed(err),
        };

        if detections.is_empty() {
            debug!("no barcodes detected");
            return DecodeOutcome::NotFound;
        }

        for detection in &detections {
            let region = &detection.region;
            if region.width <= self.config.min_barcode_width
                || region.height <= self.config.min_barcode_height
            {
                continue;
            }
            if detection.data.is_empty() {
                continue;
            }

            annotations.push(Annotation::around(
                region,
                self.config.barcode_annotation_pad,
                AnnotationSource::Barcode,
            ));
            return match Payload::from_utf8(&detection.data) {
                Ok(Some(payload)) => {
                    info!(payload = %payload, "barcode decoded");
                    DecodeOutcome::Found(payload)
                }
                Ok(None) => DecodeOutcome::Empty,
                Err(err) => DecodeOutcome::Failed(err),
            };
        }

        debug!(detections = detections.len(), "no qualifying barcode");
        DecodeOutcome::Empty
    }
}
