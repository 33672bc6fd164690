use crate::foundation::core::Rgba;
use crate::transform::TransformStack;

/// State threaded through a single replay pass.
///
/// Owned by the pass; groups replay inline against the same state while an Fbo starts a fresh
/// one for its own target.
#[derive(Clone, Debug)]
pub struct RenderState {
    /// Color used by vertex instructions.
    pub color: Rgba,
    /// Color used by `ClearBuffers`.
    pub clear_color: Rgba,
    pub transforms: TransformStack,
    /// Target size in pixels.
    pub size: (u32, u32),
}

impl RenderState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: Rgba::WHITE,
            clear_color: Rgba::BLACK,
            transforms: TransformStack::new(),
            size: (width, height),
        }
    }

    /// Fresh state with `clear_color` preset, as used at the start of an Fbo draw.
    pub fn with_clear_color(width: u32, height: u32, clear_color: Rgba) -> Self {
        Self {
            clear_color,
            ..Self::new(width, height)
        }
    }
}
