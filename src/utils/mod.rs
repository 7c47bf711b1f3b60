//! Utility functions for image processing
//!
//! This module provides helper functions for label decoding:
//! - Image loading and grayscale conversion
//! - Inverse global thresholding
//! - Contour geometry (area, bounding boxes)

/// Inverse thresholding
pub mod binarization;
/// Contour area and bounding boxes
pub mod geometry;
/// Image loading
pub mod grayscale;
