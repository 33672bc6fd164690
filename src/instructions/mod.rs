//! Canvas instructions.
//!
//! Every instruction is a cheap, clonable handle over shared parameters. A handle can be
//! attached to at most one [`Canvas`] at a time; mutating an attached instruction marks that
//! canvas (and its ancestors) as needing a redraw. State and context instructions are bound to
//! the render context: touching them off the owner thread is checked by the context's
//! [`ThreadGuard`](crate::ThreadGuard).

pub mod box_shadow;
pub mod callback;
pub mod matrix;
pub mod state;
pub mod vertex;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::canvas::{Canvas, CanvasShared};
use crate::fbo::Fbo;
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::render::backend::RenderBackend;
use crate::render::state::RenderState;

pub use box_shadow::{BoxShadow, BoxShadowOpts};
pub use callback::Callback;
pub use matrix::{MatrixInstruction, MatrixOp};
pub use state::{ClearBuffers, ClearColor, ClearMask, Color};
pub use vertex::{Ellipse, EllipseOpts, Points, Rectangle};

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Back-reference from an instruction (or nested canvas) to the canvas holding it.
#[derive(Default)]
pub(crate) struct OwnerSlot(Mutex<Option<Weak<CanvasShared>>>);

impl OwnerSlot {
    pub(crate) fn with_owner(owner: &Arc<CanvasShared>) -> Self {
        Self(Mutex::new(Some(Arc::downgrade(owner))))
    }

    pub(crate) fn get(&self) -> Option<Arc<CanvasShared>> {
        lock(&self.0).as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn claim(&self, owner: &Arc<CanvasShared>) -> GraphicsResult<()> {
        let mut slot = lock(&self.0);
        if slot.as_ref().and_then(Weak::upgrade).is_some() {
            return Err(GraphicsError::validation(
                "instruction already belongs to a canvas; remove it first",
            ));
        }
        *slot = Some(Arc::downgrade(owner));
        Ok(())
    }

    pub(crate) fn release(&self) {
        *lock(&self.0) = None;
    }
}

/// Shared storage behind every instruction handle.
pub(crate) struct Node<T> {
    pub(crate) owner: OwnerSlot,
    params: Mutex<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(params: T) -> Arc<Self> {
        Arc::new(Self {
            owner: OwnerSlot::default(),
            params: Mutex::new(params),
        })
    }

    pub(crate) fn get<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.params))
    }

    /// Mutate parameters, then flag the owning canvas.
    ///
    /// `context_bound` instructions attached to a canvas are checked against its thread guard
    /// before anything is touched.
    pub(crate) fn update<R>(
        &self,
        context_bound: bool,
        f: impl FnOnce(&mut T) -> GraphicsResult<R>,
    ) -> GraphicsResult<R> {
        let owner = self.owner.get();
        if context_bound && let Some(canvas) = &owner {
            canvas.context().thread_guard().check()?;
        }
        let out = f(&mut lock(&self.params))?;
        if let Some(canvas) = owner {
            canvas.invalidate();
        }
        Ok(out)
    }

    pub(crate) fn flag_update(&self) {
        if let Some(canvas) = self.owner.get() {
            canvas.invalidate();
        }
    }

    pub(crate) fn owner_canvas(&self) -> Option<Canvas> {
        self.owner.get().map(Canvas::from_shared)
    }
}

/// Broad instruction category, mirroring how each kind interacts with the render state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// Mutates the render state (color, clear color, transform).
    State,
    /// Emits geometry using the current render state.
    Vertex,
    /// Owns a render target of its own.
    Context,
    /// Calls back into application code.
    Callback,
    /// Nested canvas replayed inline.
    Group,
}

impl InstructionKind {
    /// State and context instructions are tied to the render context's owner thread.
    pub fn is_context_bound(self) -> bool {
        matches!(self, Self::State | Self::Context)
    }
}

/// A recorded canvas instruction.
#[derive(Clone, Debug)]
pub enum Instruction {
    Color(Color),
    ClearColor(ClearColor),
    ClearBuffers(ClearBuffers),
    Matrix(MatrixInstruction),
    Ellipse(Ellipse),
    Points(Points),
    Rectangle(Rectangle),
    BoxShadow(BoxShadow),
    Fbo(Fbo),
    Callback(Callback),
    Group(Canvas),
}

impl Instruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::Color(_) | Self::ClearColor(_) | Self::ClearBuffers(_) | Self::Matrix(_) => {
                InstructionKind::State
            }
            Self::Ellipse(_) | Self::Points(_) | Self::Rectangle(_) | Self::BoxShadow(_) => {
                InstructionKind::Vertex
            }
            Self::Fbo(_) => InstructionKind::Context,
            Self::Callback(_) => InstructionKind::Callback,
            Self::Group(_) => InstructionKind::Group,
        }
    }

    /// Canvas currently holding this instruction.
    pub fn owner(&self) -> Option<Canvas> {
        self.owner_slot().get().map(Canvas::from_shared)
    }

    /// Identity comparison: `true` when both refer to the same underlying instruction.
    pub fn same(&self, other: &Instruction) -> bool {
        std::ptr::eq(self.identity(), other.identity())
    }

    /// Mark the owning canvas as needing a redraw.
    pub fn flag_update(&self) {
        if let Some(canvas) = self.owner_slot().get() {
            canvas.invalidate();
        }
    }

    /// Apply this instruction against `state`, emitting primitives into `backend`.
    pub fn replay(
        &self,
        state: &mut RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        match self {
            Self::Color(c) => {
                state.color = c.rgba();
                Ok(())
            }
            Self::ClearColor(c) => {
                state.clear_color = c.rgba();
                Ok(())
            }
            Self::ClearBuffers(c) => c.emit(state, backend),
            Self::Matrix(m) => m.apply(&mut state.transforms),
            Self::Ellipse(e) => e.emit(state, backend),
            Self::Points(p) => p.emit(state, backend),
            Self::Rectangle(r) => r.emit(state, backend),
            Self::BoxShadow(b) => b.emit(state, backend),
            Self::Fbo(f) => f.draw_unchecked(),
            Self::Callback(cb) => cb.invoke(),
            Self::Group(canvas) => canvas.replay_unchecked(state, backend),
        }
    }

    pub(crate) fn owner_slot(&self) -> &OwnerSlot {
        match self {
            Self::Color(c) => &c.node.owner,
            Self::ClearColor(c) => &c.node.owner,
            Self::ClearBuffers(c) => &c.node.owner,
            Self::Matrix(m) => &m.node.owner,
            Self::Ellipse(e) => &e.node.owner,
            Self::Points(p) => &p.node.owner,
            Self::Rectangle(r) => &r.node.owner,
            Self::BoxShadow(b) => &b.node.owner,
            Self::Fbo(f) => f.owner_slot(),
            Self::Callback(cb) => &cb.node.owner,
            Self::Group(canvas) => canvas.parent_slot(),
        }
    }

    /// Canvas replayed as part of this instruction, if any.
    pub(crate) fn nested_canvas(&self) -> Option<Canvas> {
        match self {
            Self::Group(canvas) => Some(canvas.clone()),
            Self::Fbo(f) => Some(f.canvas()),
            _ => None,
        }
    }

    fn identity(&self) -> *const () {
        match self {
            Self::Color(c) => Arc::as_ptr(&c.node).cast(),
            Self::ClearColor(c) => Arc::as_ptr(&c.node).cast(),
            Self::ClearBuffers(c) => Arc::as_ptr(&c.node).cast(),
            Self::Matrix(m) => Arc::as_ptr(&m.node).cast(),
            Self::Ellipse(e) => Arc::as_ptr(&e.node).cast(),
            Self::Points(p) => Arc::as_ptr(&p.node).cast(),
            Self::Rectangle(r) => Arc::as_ptr(&r.node).cast(),
            Self::BoxShadow(b) => Arc::as_ptr(&b.node).cast(),
            Self::Fbo(f) => f.identity(),
            Self::Callback(cb) => Arc::as_ptr(&cb.node).cast(),
            Self::Group(canvas) => canvas.identity(),
        }
    }
}

macro_rules! impl_into_instruction {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Instruction {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl From<&$ty> for Instruction {
                fn from(v: &$ty) -> Self {
                    Self::$variant(v.clone())
                }
            }
        )*
    };
}

impl_into_instruction!(
    Color => Color,
    ClearColor => ClearColor,
    ClearBuffers => ClearBuffers,
    MatrixInstruction => Matrix,
    Ellipse => Ellipse,
    Points => Points,
    Rectangle => Rectangle,
    BoxShadow => BoxShadow,
    Fbo => Fbo,
    Callback => Callback,
    Canvas => Group,
);

/// Append `instruction` to the calling thread's active recording target, if any.
pub(crate) fn attach_to_active(instruction: Instruction) -> GraphicsResult<()> {
    match crate::canvas::recording::active_canvas() {
        Some(canvas) => canvas.add(instruction),
        None => Ok(()),
    }
}

pub(crate) fn ensure_finite(name: &str, values: &[f64]) -> GraphicsResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GraphicsError::validation(format!("{name} must be finite")))
    }
}
