/// Geometry helpers for contour analysis
use imageproc::point::Point;

/// Area enclosed by a closed polygon (shoelace formula, absolute value)
///
/// Contours traced along pixel centres enclose slightly less than their pixel
/// count: a filled `s x s` square yields `(s - 1)²`.
pub fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    twice_area.unsigned_abs() as f64 / 2.0
}

/// Inclusive bounding box `(x, y, width, height)` of a point set
pub fn bounding_rect(points: &[Point<u32>]) -> Option<(u32, u32, u32, u32)> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
