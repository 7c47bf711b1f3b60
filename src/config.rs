//! Tunables for the decoders and the rename workflow.
//!
//! Defaults reproduce the field-tested values; every decoder value can be
//! overridden through a `LABEL_*` environment variable, and the binaries layer
//! command-line flags on top.

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Order in which DataMatrix candidates are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateOrder {
    /// Contour discovery order (raster scan of the closed mask)
    #[default]
    Discovery,
    /// Largest contour area first
    LargestFirst,
}

impl std::str::FromStr for CandidateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discovery" => Ok(CandidateOrder::Discovery),
            "largest-first" | "largest" => Ok(CandidateOrder::LargestFirst),
            other => Err(format!("unknown candidate order '{other}'")),
        }
    }
}

/// Decoder parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Pixels at or below this intensity are foreground
    pub threshold: u8,
    /// Chebyshev radius of the closing element (3 gives a 7x7 square)
    pub close_radius: u8,
    /// Contours must enclose strictly more than this many px²
    pub min_contour_area: f64,
    /// Accepted width/height range for DataMatrix candidates
    pub min_aspect: f32,
    /// Upper bound of the aspect range
    pub max_aspect: f32,
    /// Margin added around each candidate before cropping
    pub crop_margin: u32,
    /// Barcode detections must be wider than this
    pub min_barcode_width: u32,
    /// Barcode detections must be taller than this
    pub min_barcode_height: u32,
    /// Padding of the audit rectangle drawn around barcodes
    pub barcode_annotation_pad: u32,
    /// DataMatrix candidate ordering
    pub candidate_order: CandidateOrder,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            close_radius: 3,
            min_contour_area: 1000.0,
            min_aspect: 0.8,
            max_aspect: 1.2,
            crop_margin: 5,
            min_barcode_width: 10,
            min_barcode_height: 10,
            barcode_annotation_pad: 10,
            candidate_order: CandidateOrder::Discovery,
        }
    }
}

impl DecoderConfig {
    /// Defaults with `LABEL_*` environment overrides applied
    pub fn from_env() -> Self {
        let d = Self::default();
        let min_barcode = parse_env_u32("LABEL_MIN_BARCODE_SIZE", d.min_barcode_width);
        Self {
            threshold: parse_env_u8("LABEL_THRESHOLD", d.threshold),
            close_radius: parse_env_u8("LABEL_CLOSE_RADIUS", d.close_radius),
            min_contour_area: parse_env_f64("LABEL_MIN_AREA", d.min_contour_area).max(0.0),
            min_aspect: d.min_aspect,
            max_aspect: d.max_aspect,
            crop_margin: parse_env_u32("LABEL_CROP_MARGIN", d.crop_margin),
            min_barcode_width: min_barcode,
            min_barcode_height: min_barcode,
            barcode_annotation_pad: d.barcode_annotation_pad,
            candidate_order: std::env::var("LABEL_CANDIDATE_ORDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(d.candidate_order),
        }
    }

    /// Builder-style candidate order override
    pub fn with_candidate_order(mut self, order: CandidateOrder) -> Self {
        self.candidate_order = order;
        self
    }
}

/// What to do when a target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingTarget {
    /// Overwrite it; re-running a batch converges on the same output
    #[default]
    Replace,
    /// Fail the pair without writing anything
    Keep,
}

/// Rename workflow parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameConfig {
    /// Decoder tunables
    pub decoder: DecoderConfig,
    /// Existing target policy
    pub existing: ExistingTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_field_values() {
        let c = DecoderConfig::default();
        assert_eq!(c.threshold, 50);
        assert_eq!(c.close_radius, 3);
        assert_eq!(c.min_contour_area, 1000.0);
        assert_eq!(c.crop_margin, 5);
        assert_eq!((c.min_barcode_width, c.min_barcode_height), (10, 10));
        assert_eq!(c.candidate_order, CandidateOrder::Discovery);
        assert_eq!(RenameConfig::default().existing, ExistingTarget::Replace);
    }

    #[test]
    fn candidate_order_parses() {
        assert_eq!("discovery".parse(), Ok(CandidateOrder::Discovery));
        assert_eq!("Largest-First".parse(), Ok(CandidateOrder::LargestFirst));
        assert!("biggest".parse::<CandidateOrder>().is_err());
    }
}
