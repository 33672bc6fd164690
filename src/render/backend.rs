use crate::foundation::core::{Affine, BezPath, Rect, Rgba};
use crate::foundation::error::GraphicsResult;
use crate::geometry::ShadowGeometry;
use crate::instructions::ClearMask;

/// A blurred rounded rectangle, positioned by its adjusted geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowPrimitive {
    /// Adjusted position and size of the blurred box, in canvas space.
    pub geometry: ShadowGeometry,
    /// Rectangle casting the shadow, relative to `geometry.pos`.
    pub body: Rect,
    pub border_radius: [f64; 4],
    pub blur_radius: f64,
    pub color: Rgba,
    pub transform: Affine,
}

/// Device-level drawing command emitted during replay.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Reset the target to `color`.
    Clear { color: Rgba, mask: ClearMask },
    /// Fill `path` (non-zero winding) in canvas space, mapped through `transform`.
    Fill {
        path: BezPath,
        color: Rgba,
        transform: Affine,
    },
    Shadow(ShadowPrimitive),
}

/// Sink for the primitives produced by replaying a canvas.
pub trait RenderBackend {
    /// Target size in pixels.
    fn size(&self) -> (u32, u32);

    fn submit(&mut self, primitive: Primitive) -> GraphicsResult<()>;
}

/// Backend that only records what it is given.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    primitives: Vec<Primitive>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn take(&mut self) -> Vec<Primitive> {
        std::mem::take(&mut self.primitives)
    }
}

impl RenderBackend for RecordingBackend {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn submit(&mut self, primitive: Primitive) -> GraphicsResult<()> {
        self.primitives.push(primitive);
        Ok(())
    }
}
