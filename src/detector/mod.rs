//! Label symbol localisation
//!
//! Locates candidate DataMatrix regions by thresholding, morphological
//! closing and outer-contour analysis.

/// Square candidate search over the closed foreground mask
pub mod contour;
