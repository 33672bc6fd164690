use std::sync::Arc;

use crate::foundation::error::GraphicsResult;
use crate::foundation::math::Mat4;
use crate::instructions::{Instruction, Node, attach_to_active, ensure_finite};
use crate::transform::TransformStack;

/// Operation performed by a [`MatrixInstruction`] on the transform stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatrixOp {
    LoadIdentity,
    Push,
    Pop,
    Translate {
        x: f64,
        y: f64,
        z: f64,
    },
    /// Scale around `origin`.
    Scale {
        x: f64,
        y: f64,
        z: f64,
        origin: [f64; 3],
    },
    /// Rotate `angle` degrees around `axis`, pivoting on `origin`.
    Rotate {
        angle: f64,
        axis: [f64; 3],
        origin: [f64; 3],
    },
    Multiply(Mat4),
}

impl MatrixOp {
    fn validate(&self) -> GraphicsResult<()> {
        match *self {
            Self::LoadIdentity | Self::Push | Self::Pop => Ok(()),
            Self::Translate { x, y, z } => ensure_finite("translation", &[x, y, z]),
            Self::Scale { x, y, z, origin } => {
                ensure_finite("scale", &[x, y, z, origin[0], origin[1], origin[2]])
            }
            Self::Rotate {
                angle,
                axis,
                origin,
            } => ensure_finite(
                "rotation",
                &[
                    angle, axis[0], axis[1], axis[2], origin[0], origin[1], origin[2],
                ],
            ),
            Self::Multiply(m) => ensure_finite("matrix", m.cols.as_flattened()),
        }
    }

    /// Matrix multiplied onto the stack top, for the multiplying variants.
    pub fn matrix(&self) -> Option<Mat4> {
        match *self {
            Self::LoadIdentity | Self::Push | Self::Pop => None,
            Self::Translate { x, y, z } => Some(Mat4::translation(x, y, z)),
            Self::Scale { x, y, z, origin } => Some(Mat4::scale(x, y, z).around(origin)),
            Self::Rotate {
                angle,
                axis,
                origin,
            } => Some(Mat4::rotation(angle, axis).around(origin)),
            Self::Multiply(m) => Some(m),
        }
    }
}

/// Transform stack instruction (`LoadIdentity`, `PushMatrix`, `PopMatrix`, translate, ...).
#[derive(Clone)]
pub struct MatrixInstruction {
    pub(crate) node: Arc<Node<MatrixOp>>,
}

impl MatrixInstruction {
    pub fn new(op: MatrixOp) -> GraphicsResult<Self> {
        op.validate()?;
        let m = Self { node: Node::new(op) };
        attach_to_active(Instruction::Matrix(m.clone()))?;
        Ok(m)
    }

    pub fn load_identity() -> GraphicsResult<Self> {
        Self::new(MatrixOp::LoadIdentity)
    }

    pub fn push_matrix() -> GraphicsResult<Self> {
        Self::new(MatrixOp::Push)
    }

    pub fn pop_matrix() -> GraphicsResult<Self> {
        Self::new(MatrixOp::Pop)
    }

    pub fn translate(x: f64, y: f64) -> GraphicsResult<Self> {
        Self::new(MatrixOp::Translate { x, y, z: 0.0 })
    }

    pub fn scale(x: f64, y: f64, origin: (f64, f64)) -> GraphicsResult<Self> {
        Self::new(MatrixOp::Scale {
            x,
            y,
            z: 1.0,
            origin: [origin.0, origin.1, 0.0],
        })
    }

    /// Rotation in the canvas plane (around the z axis).
    pub fn rotate(angle: f64, origin: (f64, f64)) -> GraphicsResult<Self> {
        Self::new(MatrixOp::Rotate {
            angle,
            axis: [0.0, 0.0, 1.0],
            origin: [origin.0, origin.1, 0.0],
        })
    }

    pub fn op(&self) -> MatrixOp {
        self.node.get(|op| *op)
    }

    pub fn set_op(&self, op: MatrixOp) -> GraphicsResult<()> {
        op.validate()?;
        self.node.update(true, |cur| {
            *cur = op;
            Ok(())
        })
    }

    pub(crate) fn apply(&self, stack: &mut TransformStack) -> GraphicsResult<()> {
        match self.op() {
            MatrixOp::LoadIdentity => {
                stack.load_identity();
            }
            MatrixOp::Push => stack.push(),
            MatrixOp::Pop => {
                stack.pop()?;
            }
            op => {
                if let Some(m) = op.matrix() {
                    stack.multiply(&m);
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MatrixInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MatrixInstruction").field(&self.op()).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/instructions/matrix.rs"]
mod tests;
