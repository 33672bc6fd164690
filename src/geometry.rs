//! Geometry builders for vertex instructions.

use kurbo::{RoundedRect, RoundedRectRadii, Shape};

use crate::foundation::core::{BezPath, Point, Rect, Size, Vec2};

/// Tolerance used when flattening curved shapes into paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Bounding box of a box shadow, enlarged to contain its blur and spread.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowGeometry {
    pub pos: Point,
    pub size: Size,
}

impl ShadowGeometry {
    /// Compute the adjusted bounds of a shadow cast by the rectangle `(raw_pos, raw_size)`.
    ///
    /// The box grows by `3 * blur_radius + 2 * spread_radius` along each axis and shifts back by
    /// `1.5 * blur_radius + spread_radius` before `offset` is applied, so the blur falloff is
    /// never cropped. Non-finite inputs count as zero, a negative blur counts as zero and the
    /// size is clamped at zero.
    pub fn compute(
        raw_pos: Point,
        raw_size: Size,
        offset: Vec2,
        blur_radius: f64,
        spread_radius: f64,
    ) -> Self {
        let blur = finite_or_zero(blur_radius).max(0.0);
        let spread = finite_or_zero(spread_radius);
        let grow = blur * 3.0 + spread * 2.0;
        let shift = blur * 1.5 + spread;
        Self {
            pos: Point::new(
                finite_or_zero(raw_pos.x) - shift + finite_or_zero(offset.x),
                finite_or_zero(raw_pos.y) - shift + finite_or_zero(offset.y),
            ),
            size: Size::new(
                (finite_or_zero(raw_size.width) + grow).max(0.0),
                (finite_or_zero(raw_size.height) + grow).max(0.0),
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Polygon (or pie slice) approximating the ellipse inscribed in `(pos, size)`.
///
/// Angles are in degrees, `0` pointing up and increasing clockwise on screen. A sweep of at
/// least 360 degrees yields a closed outline; anything smaller is a slice through the center.
pub fn ellipse_path(
    pos: Point,
    size: Size,
    segments: u32,
    angle_start: f64,
    angle_end: f64,
) -> BezPath {
    let mut path = BezPath::new();
    if size.width <= 0.0 || size.height <= 0.0 || segments == 0 {
        return path;
    }
    let rx = size.width / 2.0;
    let ry = size.height / 2.0;
    let center = Point::new(pos.x + rx, pos.y + ry);
    let sweep = angle_end - angle_start;
    let full = sweep.abs() >= 360.0;

    let at = |deg: f64| {
        let (s, c) = deg.to_radians().sin_cos();
        Point::new(center.x + rx * s, center.y - ry * c)
    };

    if full {
        let step = 360.0 / f64::from(segments);
        path.move_to(at(angle_start));
        for i in 1..segments {
            path.line_to(at(angle_start + step * f64::from(i)));
        }
    } else {
        let step = sweep / f64::from(segments);
        path.move_to(center);
        for i in 0..=segments {
            path.line_to(at(angle_start + step * f64::from(i)));
        }
    }
    path.close_path();
    path
}

/// Squares of half-extent `pointsize` centered on each point.
pub fn points_path(points: &[Point], pointsize: f64) -> BezPath {
    let mut path = BezPath::new();
    if pointsize <= 0.0 {
        return path;
    }
    for p in points {
        let r = Rect::new(
            p.x - pointsize,
            p.y - pointsize,
            p.x + pointsize,
            p.y + pointsize,
        );
        path.extend(r.path_elements(PATH_TOLERANCE));
    }
    path
}

pub fn rect_path(pos: Point, size: Size) -> BezPath {
    let mut path = BezPath::new();
    if size.width <= 0.0 || size.height <= 0.0 {
        return path;
    }
    path.extend(Rect::from_origin_size(pos, size).path_elements(PATH_TOLERANCE));
    path
}

/// Rounded rectangle path; `radii` are `[top_left, top_right, bottom_right, bottom_left]`.
pub fn rounded_rect_path(rect: Rect, radii: [f64; 4]) -> BezPath {
    let mut path = BezPath::new();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return path;
    }
    let [tl, tr, br, bl] = radii.map(|r| finite_or_zero(r).max(0.0));
    let rr = RoundedRect::from_rect(rect, RoundedRectRadii::new(tl, tr, br, bl));
    path.extend(rr.path_elements(PATH_TOLERANCE));
    path
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
