use std::sync::Arc;

use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::error::GraphicsResult;
use crate::geometry::ShadowGeometry;
use crate::instructions::{Instruction, Node, attach_to_active, ensure_finite};
use crate::render::backend::{Primitive, RenderBackend, ShadowPrimitive};
use crate::render::state::RenderState;

/// Raw parameters of a [`BoxShadow`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoxShadowOpts {
    pub pos: Point,
    pub size: Size,
    pub offset: Vec2,
    pub blur_radius: f64,
    pub spread_radius: f64,
    /// Corner radii: `[top_left, top_right, bottom_right, bottom_left]`.
    pub border_radius: [f64; 4],
}

impl Default for BoxShadowOpts {
    fn default() -> Self {
        Self {
            pos: Point::ZERO,
            size: Size::new(100.0, 100.0),
            offset: Vec2::ZERO,
            blur_radius: 15.0,
            spread_radius: 0.0,
            border_radius: [0.0; 4],
        }
    }
}

impl BoxShadowOpts {
    pub fn geometry(&self) -> ShadowGeometry {
        ShadowGeometry::compute(
            self.pos,
            self.size,
            self.offset,
            self.blur_radius,
            self.spread_radius,
        )
    }

    /// Validate fields that are not clamped by the geometry computation.
    fn validate(&self) -> GraphicsResult<()> {
        ensure_finite("box shadow border_radius", &self.border_radius)
    }
}

/// A blurred, spread, offset shadow of a (rounded) rectangle.
///
/// Raw `pos`/`size` are retained; the rendered bounds ([`adjusted_pos`](Self::adjusted_pos),
/// [`adjusted_size`](Self::adjusted_size)) are derived from them on every read.
#[derive(Clone)]
pub struct BoxShadow {
    pub(crate) node: Arc<Node<BoxShadowOpts>>,
}

impl BoxShadow {
    pub fn new() -> GraphicsResult<Self> {
        Self::with_opts(BoxShadowOpts::default())
    }

    pub fn with_opts(opts: BoxShadowOpts) -> GraphicsResult<Self> {
        opts.validate()?;
        let sanitized = clamp_geometry(opts);
        let bs = Self {
            node: Node::new(sanitized),
        };
        attach_to_active(Instruction::BoxShadow(bs.clone()))?;
        Ok(bs)
    }

    pub fn opts(&self) -> BoxShadowOpts {
        self.node.get(|o| *o)
    }

    pub fn set_opts(&self, opts: BoxShadowOpts) -> GraphicsResult<()> {
        opts.validate()?;
        let opts = clamp_geometry(opts);
        self.node.update(false, |o| {
            *o = opts;
            Ok(())
        })
    }

    fn modify(&self, f: impl FnOnce(&mut BoxShadowOpts)) -> GraphicsResult<()> {
        let mut opts = self.opts();
        f(&mut opts);
        self.set_opts(opts)
    }

    pub fn set_pos(&self, pos: Point) -> GraphicsResult<()> {
        self.modify(|o| o.pos = pos)
    }

    pub fn set_size(&self, size: Size) -> GraphicsResult<()> {
        self.modify(|o| o.size = size)
    }

    pub fn set_offset(&self, offset: Vec2) -> GraphicsResult<()> {
        self.modify(|o| o.offset = offset)
    }

    pub fn set_blur_radius(&self, blur_radius: f64) -> GraphicsResult<()> {
        self.modify(|o| o.blur_radius = blur_radius)
    }

    pub fn set_spread_radius(&self, spread_radius: f64) -> GraphicsResult<()> {
        self.modify(|o| o.spread_radius = spread_radius)
    }

    pub fn set_border_radius(&self, border_radius: [f64; 4]) -> GraphicsResult<()> {
        self.modify(|o| o.border_radius = border_radius)
    }

    pub fn raw_pos(&self) -> Point {
        self.opts().pos
    }

    pub fn raw_size(&self) -> Size {
        self.opts().size
    }

    pub fn geometry(&self) -> ShadowGeometry {
        self.opts().geometry()
    }

    pub fn adjusted_pos(&self) -> Point {
        self.geometry().pos
    }

    pub fn adjusted_size(&self) -> Size {
        self.geometry().size
    }

    pub(crate) fn emit(
        &self,
        state: &RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        let opts = self.opts();
        let geometry = opts.geometry();
        if geometry.is_empty() {
            return Ok(());
        }
        backend.submit(Primitive::Shadow(ShadowPrimitive {
            geometry,
            body: shadow_body(&opts),
            border_radius: opts.border_radius,
            blur_radius: opts.blur_radius,
            color: state.color,
            transform: state.transforms.top().to_affine(),
        }))
    }
}

/// Rectangle casting the shadow, in the local space of the adjusted box.
///
/// It sits `1.5 * blur_radius` in from every edge and is grown by `spread_radius` on each side.
fn shadow_body(opts: &BoxShadowOpts) -> Rect {
    let inset = opts.blur_radius * 1.5;
    let w = (opts.size.width + opts.spread_radius * 2.0).max(0.0);
    let h = (opts.size.height + opts.spread_radius * 2.0).max(0.0);
    Rect::new(inset, inset, inset + w, inset + h)
}

/// Replace non-finite geometry inputs by zero and negative blur by zero.
fn clamp_geometry(mut opts: BoxShadowOpts) -> BoxShadowOpts {
    let before = opts;
    for v in [
        &mut opts.pos.x,
        &mut opts.pos.y,
        &mut opts.size.width,
        &mut opts.size.height,
        &mut opts.offset.x,
        &mut opts.offset.y,
        &mut opts.spread_radius,
    ] {
        if !v.is_finite() {
            *v = 0.0;
        }
    }
    if !opts.blur_radius.is_finite() || opts.blur_radius < 0.0 {
        opts.blur_radius = 0.0;
    }
    if opts != before {
        tracing::warn!(?before, after = ?opts, "box shadow parameters clamped");
    }
    opts
}

impl std::fmt::Debug for BoxShadow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BoxShadow").field(&self.opts()).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/instructions/box_shadow.rs"]
mod tests;
