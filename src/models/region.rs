/// Axis-aligned pixel rectangle that may hold a code symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateRegion {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Area enclosed by the contour this region was derived from
    pub area: f64,
}

impl CandidateRegion {
    /// Create a region from its bounding box; the area defaults to the box area
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            area: width as f64 * height as f64,
        }
    }

    /// Attach the enclosed contour area
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Width divided by height (0 for degenerate regions)
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Grow the region by `margin` on every side, clamped to `bounds` (width, height).
    ///
    /// Returns `None` when the clamped region is empty, which only happens for
    /// regions lying fully outside the image.
    pub fn expand_clamped(&self, margin: u32, bounds: (u32, u32)) -> Option<CandidateRegion> {
        let (img_w, img_h) = bounds;
        let x0 = self.x.saturating_sub(margin);
        let y0 = self.y.saturating_sub(margin);
        let x1 = self
            .x
            .saturating_add(self.width)
            .saturating_add(margin)
            .min(img_w);
        let y1 = self
            .y
            .saturating_add(self.height)
            .saturating_add(margin)
            .min(img_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CandidateRegion::new(x0, y0, x1 - x0, y1 - y0).with_area(self.area))
    }

    /// Grow the region by `pad` on every side without clamping (signed left/top)
    pub fn padded(&self, pad: u32) -> (i32, i32, u32, u32) {
        (
            self.x as i32 - pad as i32,
            self.y as i32 - pad as i32,
            self.width + 2 * pad,
            self.height + 2 * pad,
        )
    }
}
