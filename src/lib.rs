//! Retained-mode graphics canvas.
//!
//! Application code records instructions into a [`Canvas`] and a renderer replays them:
//!
//! - Open a recording scope with [`Canvas::record`] (or [`Fbo::record`])
//! - Construct instructions ([`Color`], [`Ellipse`], [`BoxShadow`], [`Callback`], ...); each one
//!   appends itself to the active canvas
//! - Replay into a [`RenderBackend`], or draw an [`Fbo`] and read its pixels back
//!
//! Render-context operations are restricted to the owner thread of the [`GraphicsContext`]
//! while its [`ThreadGuard`] is enabled.
#![forbid(unsafe_code)]

mod foundation;

/// Retained instruction lists and scoped recording.
pub mod canvas;
/// Context configuration.
pub mod config;
pub(crate) mod context;
pub(crate) mod fbo;
/// Geometry derived from instruction parameters.
pub mod geometry;
/// Recordable instructions.
pub mod instructions;
/// Replay state and backends.
pub mod render;
pub(crate) mod thread_guard;
pub(crate) mod transform;

pub use crate::canvas::{Canvas, RecordingScope};
pub use crate::config::GraphicsConfig;
pub use crate::context::GraphicsContext;
pub use crate::fbo::{Fbo, FboOpts, Texture};
pub use crate::foundation::core::{Affine, BezPath, PixelBuffer, Point, Rect, Rgba, Size, Vec2};
pub use crate::foundation::error::{GraphicsError, GraphicsResult};
pub use crate::foundation::math::Mat4;
pub use crate::geometry::ShadowGeometry;
pub use crate::instructions::{
    BoxShadow, BoxShadowOpts, Callback, ClearBuffers, ClearColor, ClearMask, Color, Ellipse,
    EllipseOpts, Instruction, InstructionKind, MatrixInstruction, MatrixOp, Points, Rectangle,
};
pub use crate::render::{CpuBackend, Primitive, RecordingBackend, RenderBackend, RenderState};
pub use crate::thread_guard::ThreadGuard;
pub use crate::transform::TransformStack;
