use std::fmt;

use super::CandidateRegion;

/// Which decoder produced an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSource {
    /// Full-image barcode scan
    Barcode,
    /// DataMatrix candidate region
    DataMatrix,
}

impl fmt::Display for AnnotationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationSource::Barcode => f.write_str("barcode"),
            AnnotationSource::DataMatrix => f.write_str("datamatrix"),
        }
    }
}

/// A rectangle worth drawing for visual audit of a decode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    /// Left edge, may be negative after padding
    pub left: i32,
    /// Top edge, may be negative after padding
    pub top: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Producing decoder
    pub source: AnnotationSource,
}

impl Annotation {
    /// Annotate a region grown by `pad` pixels on each side
    pub fn around(region: &CandidateRegion, pad: u32, source: AnnotationSource) -> Self {
        let (left, top, width, height) = region.padded(pad);
        Self {
            left,
            top,
            width,
            height,
            source,
        }
    }
}
