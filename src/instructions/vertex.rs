use std::sync::Arc;

use crate::foundation::core::{BezPath, Point, Size};
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::geometry::{ellipse_path, points_path, rect_path};
use crate::instructions::{Instruction, Node, attach_to_active, ensure_finite};
use crate::render::backend::{Primitive, RenderBackend};
use crate::render::state::RenderState;

fn fill(
    path: BezPath,
    state: &RenderState,
    backend: &mut dyn RenderBackend,
) -> GraphicsResult<()> {
    if path.elements().is_empty() {
        return Ok(());
    }
    backend.submit(Primitive::Fill {
        path,
        color: state.color,
        transform: state.transforms.top().to_affine(),
    })
}

fn ensure_point(name: &str, p: Point) -> GraphicsResult<()> {
    ensure_finite(name, &[p.x, p.y])
}

fn ensure_size(name: &str, s: Size) -> GraphicsResult<()> {
    ensure_finite(name, &[s.width, s.height])
}

/// Parameters of an [`Ellipse`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EllipseOpts {
    pub pos: Point,
    pub size: Size,
    /// Number of outline segments; at least 3.
    pub segments: u32,
    /// Start angle in degrees, `0` pointing up, clockwise.
    pub angle_start: f64,
    pub angle_end: f64,
}

impl Default for EllipseOpts {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            size: Size::new(100.0, 100.0),
            segments: 180,
            angle_start: 0.0,
            angle_end: 360.0,
        }
    }
}

impl EllipseOpts {
    fn validate(&self) -> GraphicsResult<()> {
        ensure_point("ellipse pos", self.pos)?;
        ensure_size("ellipse size", self.size)?;
        ensure_finite("ellipse angles", &[self.angle_start, self.angle_end])?;
        if self.segments < 3 {
            return Err(GraphicsError::validation(format!(
                "ellipse needs at least 3 segments, got {}",
                self.segments
            )));
        }
        Ok(())
    }
}

/// Filled ellipse inscribed in `(pos, size)`.
#[derive(Clone)]
pub struct Ellipse {
    pub(crate) node: Arc<Node<EllipseOpts>>,
}

impl Ellipse {
    pub fn new(pos: Point, size: Size) -> GraphicsResult<Self> {
        Self::with_opts(EllipseOpts {
            pos,
            size,
            ..EllipseOpts::default()
        })
    }

    pub fn with_opts(opts: EllipseOpts) -> GraphicsResult<Self> {
        opts.validate()?;
        let e = Self {
            node: Node::new(opts),
        };
        attach_to_active(Instruction::Ellipse(e.clone()))?;
        Ok(e)
    }

    pub fn opts(&self) -> EllipseOpts {
        self.node.get(|o| *o)
    }

    pub fn set_opts(&self, opts: EllipseOpts) -> GraphicsResult<()> {
        opts.validate()?;
        self.node.update(false, |o| {
            *o = opts;
            Ok(())
        })
    }

    pub fn set_pos(&self, pos: Point) -> GraphicsResult<()> {
        self.set_opts(EllipseOpts { pos, ..self.opts() })
    }

    pub fn set_size(&self, size: Size) -> GraphicsResult<()> {
        self.set_opts(EllipseOpts {
            size,
            ..self.opts()
        })
    }

    pub fn set_segments(&self, segments: u32) -> GraphicsResult<()> {
        self.set_opts(EllipseOpts {
            segments,
            ..self.opts()
        })
    }

    pub fn geometry(&self) -> BezPath {
        let o = self.opts();
        ellipse_path(o.pos, o.size, o.segments, o.angle_start, o.angle_end)
    }

    pub(crate) fn emit(
        &self,
        state: &RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        fill(self.geometry(), state, backend)
    }
}

impl std::fmt::Debug for Ellipse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Ellipse").field(&self.opts()).finish()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PointsParams {
    points: Vec<Point>,
    pointsize: f64,
}

/// Square point sprites of half-extent `pointsize`.
#[derive(Clone)]
pub struct Points {
    pub(crate) node: Arc<Node<PointsParams>>,
}

impl Points {
    pub fn new(points: Vec<Point>, pointsize: f64) -> GraphicsResult<Self> {
        validate_pointsize(pointsize)?;
        for p in &points {
            ensure_point("point", *p)?;
        }
        let pts = Self {
            node: Node::new(PointsParams { points, pointsize }),
        };
        attach_to_active(Instruction::Points(pts.clone()))?;
        Ok(pts)
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` list.
    pub fn from_flat(coords: &[f64], pointsize: f64) -> GraphicsResult<Self> {
        if coords.len() % 2 != 0 {
            return Err(GraphicsError::validation(format!(
                "flat point list needs an even number of values, got {}",
                coords.len()
            )));
        }
        let points = coords
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect();
        Self::new(points, pointsize)
    }

    pub fn points(&self) -> Vec<Point> {
        self.node.get(|p| p.points.clone())
    }

    pub fn pointsize(&self) -> f64 {
        self.node.get(|p| p.pointsize)
    }

    pub fn add_point(&self, x: f64, y: f64) -> GraphicsResult<()> {
        ensure_finite("point", &[x, y])?;
        self.node.update(false, |p| {
            p.points.push(Point::new(x, y));
            Ok(())
        })
    }

    pub fn set_points(&self, points: Vec<Point>) -> GraphicsResult<()> {
        for p in &points {
            ensure_point("point", *p)?;
        }
        self.node.update(false, |p| {
            p.points = points;
            Ok(())
        })
    }

    pub fn set_pointsize(&self, pointsize: f64) -> GraphicsResult<()> {
        validate_pointsize(pointsize)?;
        self.node.update(false, |p| {
            p.pointsize = pointsize;
            Ok(())
        })
    }

    pub fn geometry(&self) -> BezPath {
        self.node.get(|p| points_path(&p.points, p.pointsize))
    }

    pub(crate) fn emit(
        &self,
        state: &RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        fill(self.geometry(), state, backend)
    }
}

fn validate_pointsize(pointsize: f64) -> GraphicsResult<()> {
    if !pointsize.is_finite() || pointsize < 0.0 {
        return Err(GraphicsError::validation(format!(
            "pointsize must be finite and >= 0, got {pointsize}"
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.node.get(|p| {
            f.debug_struct("Points")
                .field("points", &p.points.len())
                .field("pointsize", &p.pointsize)
                .finish()
        })
    }
}

/// Axis-aligned filled rectangle.
#[derive(Clone)]
pub struct Rectangle {
    pub(crate) node: Arc<Node<(Point, Size)>>,
}

impl Rectangle {
    pub fn new(pos: Point, size: Size) -> GraphicsResult<Self> {
        ensure_point("rectangle pos", pos)?;
        ensure_size("rectangle size", size)?;
        let r = Self {
            node: Node::new((pos, size)),
        };
        attach_to_active(Instruction::Rectangle(r.clone()))?;
        Ok(r)
    }

    pub fn pos(&self) -> Point {
        self.node.get(|r| r.0)
    }

    pub fn size(&self) -> Size {
        self.node.get(|r| r.1)
    }

    pub fn set_pos(&self, pos: Point) -> GraphicsResult<()> {
        ensure_point("rectangle pos", pos)?;
        self.node.update(false, |r| {
            r.0 = pos;
            Ok(())
        })
    }

    pub fn set_size(&self, size: Size) -> GraphicsResult<()> {
        ensure_size("rectangle size", size)?;
        self.node.update(false, |r| {
            r.1 = size;
            Ok(())
        })
    }

    pub fn geometry(&self) -> BezPath {
        self.node.get(|r| rect_path(r.0, r.1))
    }

    pub(crate) fn emit(
        &self,
        state: &RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        fill(self.geometry(), state, backend)
    }
}

impl std::fmt::Debug for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rectangle")
            .field("pos", &self.pos())
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/instructions/vertex.rs"]
mod tests;
