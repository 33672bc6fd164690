//! Offscreen render targets.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::canvas::{Canvas, RecordingScope};
use crate::context::GraphicsContext;
use crate::foundation::core::{PixelBuffer, Rgba};
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::instructions::{
    ClearMask, Instruction, OwnerSlot, attach_to_active, ensure_finite, lock,
};
use crate::render::backend::{Primitive, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::render::state::RenderState;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FboOpts {
    /// Target size in pixels.
    pub size: (u32, u32),
    /// Color the target is reset to at the start of every draw.
    pub clear_color: Rgba,
}

impl Default for FboOpts {
    fn default() -> Self {
        Self {
            size: (100, 100),
            clear_color: Rgba::TRANSPARENT,
        }
    }
}

struct FboState {
    size: (u32, u32),
    clear_color: Rgba,
    /// Straight RGBA8 result of the last draw; `None` until drawn or after a resize.
    texture: Option<PixelBuffer>,
}

struct FboInner {
    canvas: Canvas,
    state: Mutex<FboState>,
}

/// Offscreen target with its own canvas.
///
/// Drawing replays the internal canvas into a CPU pixel buffer, readable through
/// [`pixels`](Self::pixels) or the [`Texture`] handle. An Fbo added to another canvas redraws
/// itself whenever that canvas is replayed, without touching the outer render state.
#[derive(Clone)]
pub struct Fbo {
    inner: Arc<FboInner>,
}

impl Fbo {
    /// Allocate a framebuffer and record it into the active canvas, if any.
    pub fn new(ctx: &GraphicsContext, opts: FboOpts) -> GraphicsResult<Self> {
        ctx.thread_guard().check()?;
        validate_size(ctx, opts.size)?;
        ensure_finite_color(opts.clear_color)?;
        tracing::debug!(width = opts.size.0, height = opts.size.1, "fbo allocated");
        let fbo = Self {
            inner: Arc::new(FboInner {
                canvas: Canvas::new(ctx),
                state: Mutex::new(FboState {
                    size: opts.size,
                    clear_color: opts.clear_color,
                    texture: None,
                }),
            }),
        };
        attach_to_active(Instruction::Fbo(fbo.clone()))?;
        Ok(fbo)
    }

    /// Redirect recording into the internal canvas while the scope lives.
    pub fn record(&self) -> RecordingScope {
        self.inner.canvas.record()
    }

    pub fn canvas(&self) -> Canvas {
        self.inner.canvas.clone()
    }

    pub fn size(&self) -> (u32, u32) {
        lock(&self.inner.state).size
    }

    /// Reallocate the target. The previous texture is dropped.
    pub fn set_size(&self, width: u32, height: u32) -> GraphicsResult<()> {
        let ctx = self.inner.canvas.context();
        ctx.thread_guard().check()?;
        validate_size(ctx, (width, height))?;
        {
            let mut state = lock(&self.inner.state);
            if state.size == (width, height) {
                return Ok(());
            }
            state.size = (width, height);
            state.texture = None;
        }
        tracing::debug!(width, height, "fbo reallocated");
        self.inner.canvas.ask_update();
        Ok(())
    }

    pub fn clear_color(&self) -> Rgba {
        lock(&self.inner.state).clear_color
    }

    pub fn set_clear_color(&self, clear_color: Rgba) -> GraphicsResult<()> {
        self.inner.canvas.context().thread_guard().check()?;
        ensure_finite_color(clear_color)?;
        lock(&self.inner.state).clear_color = clear_color;
        self.inner.canvas.ask_update();
        Ok(())
    }

    /// Replay the internal canvas into the texture.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn draw(&self) -> GraphicsResult<()> {
        self.inner.canvas.context().thread_guard().check()?;
        self.draw_unchecked()
    }

    pub(crate) fn draw_unchecked(&self) -> GraphicsResult<()> {
        let ((width, height), clear_color) = {
            let state = lock(&self.inner.state);
            (state.size, state.clear_color)
        };
        let mut backend = CpuBackend::new(width, height)?;
        backend.submit(Primitive::Clear {
            color: clear_color,
            mask: ClearMask::default(),
        })?;
        let mut state = RenderState::with_clear_color(width, height, clear_color);
        self.inner.canvas.replay_unchecked(&mut state, &mut backend)?;
        let pixels = backend.finish().into_straight();

        let mut state = lock(&self.inner.state);
        // A resize during replay makes this result stale.
        if state.size == (width, height) {
            state.texture = Some(pixels);
        }
        Ok(())
    }

    /// Straight RGBA8 bytes of the last draw, rows top to bottom.
    pub fn pixels(&self) -> GraphicsResult<Vec<u8>> {
        self.texture().pixels()
    }

    pub fn texture(&self) -> Texture {
        Texture {
            inner: Arc::clone(&self.inner),
        }
    }

    pub(crate) fn owner_slot(&self) -> &OwnerSlot {
        self.inner.canvas.parent_slot()
    }

    pub(crate) fn identity(&self) -> *const () {
        Arc::as_ptr(&self.inner).cast()
    }
}

impl std::fmt::Debug for Fbo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);
        f.debug_struct("Fbo")
            .field("size", &state.size)
            .field("clear_color", &state.clear_color)
            .field("drawn", &state.texture.is_some())
            .finish()
    }
}

/// Read handle on an Fbo's color buffer.
#[derive(Clone)]
pub struct Texture {
    inner: Arc<FboInner>,
}

impl Texture {
    pub fn size(&self) -> (u32, u32) {
        lock(&self.inner.state).size
    }

    /// Snapshot of the last draw as a [`PixelBuffer`].
    pub fn buffer(&self) -> GraphicsResult<PixelBuffer> {
        lock(&self.inner.state)
            .texture
            .clone()
            .ok_or(GraphicsError::NotDrawn)
    }

    pub fn pixels(&self) -> GraphicsResult<Vec<u8>> {
        Ok(self.buffer()?.data)
    }

    /// Encode the last draw to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> GraphicsResult<()> {
        let path = path.as_ref();
        let buffer = self.buffer()?;
        let img = image::RgbaImage::from_raw(buffer.width, buffer.height, buffer.data)
            .ok_or_else(|| GraphicsError::resource("texture buffer does not match its size"))?;
        img.save(path)?;
        tracing::debug!(path = %path.display(), "texture saved");
        Ok(())
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

fn validate_size(ctx: &GraphicsContext, (width, height): (u32, u32)) -> GraphicsResult<()> {
    let max = ctx.config().max_fbo_dimension;
    if width == 0 || height == 0 || width > max || height > max {
        return Err(GraphicsError::resource(format!(
            "fbo size {width}x{height} outside 1..={max}"
        )));
    }
    Ok(())
}

fn ensure_finite_color(c: Rgba) -> GraphicsResult<()> {
    ensure_finite("fbo clear_color", &[c.r, c.g, c.b, c.a].map(f64::from))
}

#[cfg(test)]
#[path = "../tests/unit/fbo.rs"]
mod tests;
