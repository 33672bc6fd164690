use std::sync::Arc;

use crate::foundation::error::GraphicsResult;
use crate::instructions::{Instruction, Node, attach_to_active};

type Handler = Arc<dyn Fn(&Callback) -> GraphicsResult<()> + Send + Sync>;

/// Invokes an application handler each time the canvas is replayed.
///
/// The handler receives the instruction itself. An error it returns aborts the replay and is
/// handed back to the replay caller as-is.
#[derive(Clone)]
pub struct Callback {
    pub(crate) node: Arc<Node<Handler>>,
}

impl Callback {
    pub fn new<F>(handler: F) -> GraphicsResult<Self>
    where
        F: Fn(&Callback) -> GraphicsResult<()> + Send + Sync + 'static,
    {
        let cb = Self {
            node: Node::new(Arc::new(handler) as Handler),
        };
        attach_to_active(Instruction::Callback(cb.clone()))?;
        Ok(cb)
    }

    pub fn set_handler<F>(&self, handler: F) -> GraphicsResult<()>
    where
        F: Fn(&Callback) -> GraphicsResult<()> + Send + Sync + 'static,
    {
        self.node.update(false, |h| {
            *h = Arc::new(handler) as Handler;
            Ok(())
        })
    }

    /// Request a redraw of the canvas holding this callback.
    pub fn ask_update(&self) {
        self.node.flag_update();
    }

    pub fn canvas(&self) -> Option<crate::Canvas> {
        self.node.owner_canvas()
    }

    pub(crate) fn invoke(&self) -> GraphicsResult<()> {
        // Clone the handler out so it may replace itself or touch this instruction.
        let handler = self.node.get(Arc::clone);
        handler(self)
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback").finish_non_exhaustive()
    }
}
