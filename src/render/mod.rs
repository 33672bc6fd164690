//! Replay state and rasterization backends.

pub mod backend;
pub mod blur;
pub mod cpu;
pub mod state;

pub use backend::{Primitive, RecordingBackend, RenderBackend, ShadowPrimitive};
pub use cpu::CpuBackend;
pub use state::RenderState;
