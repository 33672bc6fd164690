use std::sync::Arc;

use crate::foundation::core::Rgba;
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::instructions::{Instruction, Node, attach_to_active};
use crate::render::backend::{Primitive, RenderBackend};
use crate::render::state::RenderState;

fn ensure_finite_rgba(name: &str, c: Rgba) -> GraphicsResult<()> {
    if [c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GraphicsError::validation(format!(
            "{name} channels must be finite"
        )))
    }
}

/// Sets the color used by every following vertex instruction.
#[derive(Clone)]
pub struct Color {
    pub(crate) node: Arc<Node<Rgba>>,
}

impl Color {
    /// Create a color instruction and record it into the active canvas, if any.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> GraphicsResult<Self> {
        Self::from_rgba(Rgba::new(r, g, b, a))
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> GraphicsResult<Self> {
        Self::from_rgba(Rgba::rgb(r, g, b))
    }

    pub fn from_rgba(rgba: Rgba) -> GraphicsResult<Self> {
        ensure_finite_rgba("color", rgba)?;
        let color = Self {
            node: Node::new(rgba),
        };
        attach_to_active(Instruction::Color(color.clone()))?;
        Ok(color)
    }

    pub fn rgba(&self) -> Rgba {
        self.node.get(|c| *c)
    }

    pub fn set_rgba(&self, rgba: Rgba) -> GraphicsResult<()> {
        ensure_finite_rgba("color", rgba)?;
        self.node.update(true, |c| {
            *c = rgba;
            Ok(())
        })
    }

    /// Replace the color channels, keeping alpha.
    pub fn set_rgb(&self, r: f32, g: f32, b: f32) -> GraphicsResult<()> {
        ensure_finite_rgba("color", Rgba::rgb(r, g, b))?;
        self.node.update(true, |c| {
            (c.r, c.g, c.b) = (r, g, b);
            Ok(())
        })
    }

    pub fn set_a(&self, a: f32) -> GraphicsResult<()> {
        if !a.is_finite() {
            return Err(GraphicsError::validation("color channels must be finite"));
        }
        self.node.update(true, |c| {
            c.a = a;
            Ok(())
        })
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Color").field(&self.rgba()).finish()
    }
}

/// Sets the color used by a later [`ClearBuffers`].
#[derive(Clone)]
pub struct ClearColor {
    pub(crate) node: Arc<Node<Rgba>>,
}

impl ClearColor {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> GraphicsResult<Self> {
        let rgba = Rgba::new(r, g, b, a);
        ensure_finite_rgba("clear color", rgba)?;
        let clear = Self {
            node: Node::new(rgba),
        };
        attach_to_active(Instruction::ClearColor(clear.clone()))?;
        Ok(clear)
    }

    pub fn rgba(&self) -> Rgba {
        self.node.get(|c| *c)
    }

    pub fn set_rgba(&self, rgba: Rgba) -> GraphicsResult<()> {
        ensure_finite_rgba("clear color", rgba)?;
        self.node.update(true, |c| {
            *c = rgba;
            Ok(())
        })
    }
}

impl std::fmt::Debug for ClearColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClearColor").field(&self.rgba()).finish()
    }
}

/// Buffers affected by [`ClearBuffers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClearMask {
    pub color: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl Default for ClearMask {
    fn default() -> Self {
        Self {
            color: true,
            depth: false,
            stencil: false,
        }
    }
}

/// Clears the current target using the clear color in effect.
#[derive(Clone)]
pub struct ClearBuffers {
    pub(crate) node: Arc<Node<ClearMask>>,
}

impl ClearBuffers {
    /// Clear the color buffer only.
    pub fn new() -> GraphicsResult<Self> {
        Self::with_mask(ClearMask::default())
    }

    pub fn with_mask(mask: ClearMask) -> GraphicsResult<Self> {
        let clear = Self {
            node: Node::new(mask),
        };
        attach_to_active(Instruction::ClearBuffers(clear.clone()))?;
        Ok(clear)
    }

    pub fn mask(&self) -> ClearMask {
        self.node.get(|m| *m)
    }

    pub fn set_mask(&self, mask: ClearMask) -> GraphicsResult<()> {
        self.node.update(true, |m| {
            *m = mask;
            Ok(())
        })
    }

    pub(crate) fn emit(
        &self,
        state: &RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        backend.submit(Primitive::Clear {
            color: state.clear_color,
            mask: self.mask(),
        })
    }
}

impl std::fmt::Debug for ClearBuffers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ClearBuffers").field(&self.mask()).finish()
    }
}
