//! Audit overlays for decoded labels.
//!
//! Decoders only record [`Annotation`]s; this module draws them onto a copy of
//! the label so an operator can see which region produced the accession number.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::info;

use crate::models::{Annotation, AnnotationSource};

const BARCODE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const DATAMATRIX_COLOR: Rgb<u8> = Rgb([0, 200, 255]);
const THICKNESS: i32 = 2;

/// Draw every annotation as a hollow rectangle, `THICKNESS` pixels wide
pub fn draw_annotations(img: &mut RgbImage, annotations: &[Annotation]) {
    for annotation in annotations {
        let color = match annotation.source {
            AnnotationSource::Barcode => BARCODE_COLOR,
            AnnotationSource::DataMatrix => DATAMATRIX_COLOR,
        };
        for offset in 0..THICKNESS {
            let width = annotation.width.saturating_sub(2 * offset as u32);
            let height = annotation.height.saturating_sub(2 * offset as u32);
            if width == 0 || height == 0 {
                break;
            }
            let rect = Rect::at(annotation.left + offset, annotation.top + offset)
                .of_size(width, height);
            draw_hollow_rect_mut(img, rect, color);
        }
    }
}

/// Draw annotations on a copy of `img` and save it
pub fn save_annotated<P: AsRef<Path>>(
    img: &RgbImage,
    annotations: &[Annotation],
    out: P,
) -> Result<(), image::ImageError> {
    let mut copy = img.clone();
    draw_annotations(&mut copy, annotations);
    copy.save(out.as_ref())?;
    info!(path = %out.as_ref().display(), count = annotations.len(), "saved annotated label");
    Ok(())
}
