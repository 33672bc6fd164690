//! Retained instruction lists.

pub mod recording;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::context::GraphicsContext;
use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::instructions::{Instruction, OwnerSlot, lock};
use crate::render::backend::RenderBackend;
use crate::render::state::RenderState;

pub use recording::RecordingScope;

static NESTING: Mutex<()> = Mutex::new(());

pub(crate) struct CanvasShared {
    ctx: GraphicsContext,
    parent: OwnerSlot,
    instructions: Mutex<Vec<Instruction>>,
    before: OnceLock<Canvas>,
    after: OnceLock<Canvas>,
    dirty: AtomicBool,
}

impl CanvasShared {
    pub(crate) fn context(&self) -> &GraphicsContext {
        &self.ctx
    }

    /// Flag this canvas and every ancestor as needing a redraw.
    pub(crate) fn invalidate(&self) {
        self.dirty.store(true, Ordering::Release);
        if let Some(parent) = self.parent.get() {
            parent.invalidate();
        }
    }
}

/// An ordered, replayable list of instructions.
///
/// `Canvas` is a handle: clones share the same list. Instructions are replayed in insertion
/// order; the optional [`before`](Self::before) and [`after`](Self::after) groups are replayed
/// around the main list.
#[derive(Clone)]
pub struct Canvas {
    shared: Arc<CanvasShared>,
}

impl Canvas {
    pub fn new(ctx: &GraphicsContext) -> Self {
        Self::build(ctx.clone(), OwnerSlot::default())
    }

    fn build(ctx: GraphicsContext, parent: OwnerSlot) -> Self {
        Self {
            shared: Arc::new(CanvasShared {
                ctx,
                parent,
                instructions: Mutex::new(Vec::new()),
                before: OnceLock::new(),
                after: OnceLock::new(),
                dirty: AtomicBool::new(true),
            }),
        }
    }

    pub(crate) fn from_shared(shared: Arc<CanvasShared>) -> Self {
        Self { shared }
    }

    pub fn context(&self) -> &GraphicsContext {
        &self.shared.ctx
    }

    /// Make this canvas the active recording target of the calling thread.
    ///
    /// Instructions constructed while the returned scope lives are appended here.
    pub fn record(&self) -> RecordingScope {
        RecordingScope::enter(self.clone())
    }

    /// Group replayed before the main instruction list.
    pub fn before(&self) -> Canvas {
        self.shared
            .before
            .get_or_init(|| {
                Self::build(
                    self.shared.ctx.clone(),
                    OwnerSlot::with_owner(&self.shared),
                )
            })
            .clone()
    }

    /// Group replayed after the main instruction list.
    pub fn after(&self) -> Canvas {
        self.shared
            .after
            .get_or_init(|| {
                Self::build(
                    self.shared.ctx.clone(),
                    OwnerSlot::with_owner(&self.shared),
                )
            })
            .clone()
    }

    /// Append an instruction.
    ///
    /// Fails when the instruction already belongs to a canvas, when it would nest this canvas
    /// inside itself, or (for context-bound instructions) when called off the owner thread
    /// with verification enabled.
    pub fn add(&self, instruction: impl Into<Instruction>) -> GraphicsResult<()> {
        let instruction = instruction.into();
        let index = self.len();
        self.insert(index, instruction)
    }

    /// Insert an instruction at `index` (clamped to the current length).
    pub fn insert(&self, index: usize, instruction: impl Into<Instruction>) -> GraphicsResult<()> {
        let instruction = instruction.into();
        if instruction.kind().is_context_bound() {
            self.shared.ctx.thread_guard().check()?;
        }
        match instruction.nested_canvas() {
            Some(nested) => {
                // Parent links between canvases only change under this lock.
                let _nesting = lock(&NESTING);
                if self.is_within(&nested) {
                    return Err(GraphicsError::validation(
                        "a canvas cannot be nested inside itself",
                    ));
                }
                instruction.owner_slot().claim(&self.shared)?;
            }
            None => instruction.owner_slot().claim(&self.shared)?,
        }
        {
            let mut list = lock(&self.shared.instructions);
            let index = index.min(list.len());
            list.insert(index, instruction);
        }
        self.shared.invalidate();
        Ok(())
    }

    /// Remove `instruction`, detaching it so it may be added elsewhere.
    ///
    /// Returns `false` when it was not part of this canvas.
    pub fn remove(&self, instruction: &Instruction) -> bool {
        let removed = {
            let mut list = lock(&self.shared.instructions);
            match list.iter().position(|i| i.same(instruction)) {
                Some(pos) => Some(list.remove(pos)),
                None => None,
            }
        };
        match removed {
            Some(instruction) => {
                instruction.owner_slot().release();
                self.shared.invalidate();
                true
            }
            None => false,
        }
    }

    pub fn index_of(&self, instruction: &Instruction) -> Option<usize> {
        lock(&self.shared.instructions)
            .iter()
            .position(|i| i.same(instruction))
    }

    /// Remove every instruction from the main list.
    pub fn clear(&self) {
        let drained: Vec<Instruction> = lock(&self.shared.instructions).drain(..).collect();
        for instruction in &drained {
            instruction.owner_slot().release();
        }
        self.shared.invalidate();
    }

    pub fn len(&self) -> usize {
        lock(&self.shared.instructions).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the main list, in replay order.
    pub fn instructions(&self) -> Vec<Instruction> {
        lock(&self.shared.instructions).clone()
    }

    /// Whether anything changed since the last replay.
    pub fn needs_redraw(&self) -> bool {
        self.shared.dirty.load(Ordering::Acquire)
    }

    /// Mark this canvas (and its ancestors) as needing a redraw.
    pub fn ask_update(&self) {
        self.shared.invalidate();
    }

    /// Canvas this one is nested in, if any.
    pub fn parent(&self) -> Option<Canvas> {
        self.shared.parent.get().map(Self::from_shared)
    }

    pub fn ptr_eq(&self, other: &Canvas) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Replay every instruction against `state`, emitting primitives into `backend`.
    ///
    /// Replay is a render-context operation and is checked against the thread guard. The
    /// first error (including one returned by a callback handler) stops the replay and is
    /// returned unchanged.
    #[tracing::instrument(level = "debug", skip_all, fields(len = self.len()))]
    pub fn replay(
        &self,
        state: &mut RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        self.shared.ctx.thread_guard().check()?;
        self.replay_unchecked(state, backend)
    }

    /// Replay into `backend` starting from a fresh [`RenderState`].
    pub fn draw(&self, backend: &mut dyn RenderBackend) -> GraphicsResult<RenderState> {
        let (width, height) = backend.size();
        let mut state = RenderState::new(width, height);
        self.replay(&mut state, backend)?;
        Ok(state)
    }

    pub(crate) fn replay_unchecked(
        &self,
        state: &mut RenderState,
        backend: &mut dyn RenderBackend,
    ) -> GraphicsResult<()> {
        // Cleared up front so edits made during replay stay visible.
        self.shared.dirty.store(false, Ordering::Release);
        if let Some(before) = self.shared.before.get() {
            before.replay_unchecked(state, backend)?;
        }
        // Replay a snapshot so handlers may edit the canvas without deadlocking.
        for instruction in self.instructions() {
            instruction.replay(state, backend)?;
        }
        if let Some(after) = self.shared.after.get() {
            after.replay_unchecked(state, backend)?;
        }
        Ok(())
    }

    pub(crate) fn parent_slot(&self) -> &OwnerSlot {
        &self.shared.parent
    }

    pub(crate) fn identity(&self) -> *const () {
        Arc::as_ptr(&self.shared).cast()
    }

    /// Whether `self` is `other` or nested somewhere below it.
    ///
    /// An Fbo's canvas reports the canvas holding the Fbo as its parent, so framebuffers are
    /// covered by the same walk.
    fn is_within(&self, other: &Canvas) -> bool {
        let mut cur = Some(self.clone());
        while let Some(canvas) = cur {
            if canvas.ptr_eq(other) {
                return true;
            }
            cur = canvas.parent();
        }
        false
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("len", &self.len())
            .field("needs_redraw", &self.needs_redraw())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas.rs"]
mod tests;
