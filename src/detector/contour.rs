use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tracing::debug;

use crate::config::{CandidateOrder, DecoderConfig};
use crate::models::CandidateRegion;
use crate::utils::binarization::threshold_binarize_inv;
use crate::utils::geometry::{bounding_rect, contour_area};

/// Square-blob candidate finder for DataMatrix symbols
pub struct ContourDetector;

impl ContourDetector {
    /// Find near-square dark blobs that may hold a DataMatrix symbol.
    ///
    /// Dark modules are thresholded to foreground and closed so a symbol
    /// becomes one solid blob; only outer contours are considered.
    pub fn detect(gray: &GrayImage, config: &DecoderConfig) -> Vec<CandidateRegion> {
        let mask = Self::closed_mask(gray, config);
        // find_contours does not treat the image border as background, so
        // blobs touching it would come back as holes
        let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
        imageops::replace(&mut framed, &mask, 1, 1);
        let contours = find_contours::<u32>(&framed);
        let mut candidates = Vec::new();

        for contour in contours {
            if contour.border_type != BorderType::Outer || contour.parent.is_some() {
                continue;
            }

            let area = contour_area(&contour.points);
            if area <= config.min_contour_area {
                continue;
            }

            let Some((x, y, w, h)) = bounding_rect(&contour.points) else {
                continue;
            };
            let region = CandidateRegion::new(x.saturating_sub(1), y.saturating_sub(1), w, h)
                .with_area(area);
            let aspect = region.aspect_ratio();
            if !(config.min_aspect..=config.max_aspect).contains(&aspect) {
                continue;
            }

            candidates.push(region);
        }

        if config.candidate_order == CandidateOrder::LargestFirst {
            candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
        }

        debug!(count = candidates.len(), "square candidates");
        candidates
    }

    /// Thresholded and morphologically closed foreground mask
    pub fn closed_mask(gray: &GrayImage, config: &DecoderConfig) -> GrayImage {
        let binary = threshold_binarize_inv(gray, config.threshold);
        if config.close_radius == 0 {
            return binary;
        }
        morphology::close(&binary, Norm::LInf, config.close_radius)
    }
}
