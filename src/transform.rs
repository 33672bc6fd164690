use crate::foundation::error::{GraphicsError, GraphicsResult};
use crate::foundation::math::Mat4;

/// Stack of model-view matrices consumed by vertex instructions during replay.
///
/// Never empty: it starts with a single identity matrix and refuses to pop its last entry.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Mat4::IDENTITY],
        }
    }

    /// Current matrix.
    pub fn top(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack holds no matrix at all. A stack built with [`new`](Self::new) never does.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Save the current matrix.
    pub fn push(&mut self) {
        let top = self.top();
        self.stack.push(top);
    }

    /// Restore the matrix saved by the matching [`push`](Self::push).
    pub fn pop(&mut self) -> GraphicsResult<Mat4> {
        match self.stack.len() {
            0 | 1 => Err(GraphicsError::validation("transform stack underflow")),
            _ => Ok(self.stack.pop().unwrap_or(Mat4::IDENTITY)),
        }
    }

    /// Reset the current matrix to identity. Returns whether the stack is non-empty.
    pub fn load_identity(&mut self) -> bool {
        self.set_top(Mat4::IDENTITY);
        !self.stack.is_empty()
    }

    /// Post-multiply the current matrix: `top = top * m`.
    pub fn multiply(&mut self, m: &Mat4) {
        let top = self.top().multiply(m);
        self.set_top(top);
    }

    fn set_top(&mut self, m: Mat4) {
        match self.stack.last_mut() {
            Some(top) => *top = m,
            None => self.stack.push(m),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/transform.rs"]
mod tests;
