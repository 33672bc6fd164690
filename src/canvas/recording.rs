//! Thread-local stack of active recording targets.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::canvas::Canvas;

thread_local! {
    static TARGETS: RefCell<Vec<Canvas>> = const { RefCell::new(Vec::new()) };
}

/// Canvas receiving newly constructed instructions on the calling thread.
pub fn active_canvas() -> Option<Canvas> {
    TARGETS.with(|t| t.borrow().last().cloned())
}

/// Number of nested recording scopes open on the calling thread.
pub fn recording_depth() -> usize {
    TARGETS.with(|t| t.borrow().len())
}

/// Scope during which a canvas is the active recording target.
///
/// Created by [`Canvas::record`] or [`Fbo::record`](crate::Fbo::record); dropping it restores
/// the previous target. Bound to the thread that opened it.
#[must_use = "recording stops as soon as the scope is dropped"]
pub struct RecordingScope {
    canvas: Canvas,
    _not_send: PhantomData<*const ()>,
}

impl RecordingScope {
    pub(crate) fn enter(canvas: Canvas) -> Self {
        TARGETS.with(|t| t.borrow_mut().push(canvas.clone()));
        tracing::trace!(depth = recording_depth(), "recording scope entered");
        Self {
            canvas,
            _not_send: PhantomData,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}

impl Drop for RecordingScope {
    fn drop(&mut self) {
        TARGETS.with(|t| {
            let mut t = t.borrow_mut();
            if let Some(pos) = t.iter().rposition(|c| c.ptr_eq(&self.canvas)) {
                t.remove(pos);
            }
        });
    }
}

impl std::fmt::Debug for RecordingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingScope")
            .field("canvas", &self.canvas)
            .finish()
    }
}
