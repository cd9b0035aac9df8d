use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 张量与纯数之间的运算种类（`x`为父节点，`c`为纯数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarOpKind {
    /// x + c
    Add,
    /// x * c
    Mul,
    /// c - x
    RSub,
    /// c / x
    RDiv,
}

/// 张量与纯数的运算节点，纯数作为节点的属性保存，不占用图中的节点
pub(in crate::nn) struct ScalarOp {
    kind: ScalarOpKind,
    scalar: f32,
    shape: Vec<usize>,
}

impl ScalarOp {
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        kind: ScalarOpKind,
        scalar: f32,
    ) -> Result<Self, GraphError> {
        Ok(Self {
            kind,
            scalar,
            shape: single_parent_shape(parents, "ScalarOp")?,
        })
    }
}

impl TraitNode for ScalarOp {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let x = parents[0];
        Ok(match self.kind {
            ScalarOpKind::Add => x + self.scalar,
            ScalarOpKind::Mul => x * self.scalar,
            ScalarOpKind::RSub => self.scalar - x,
            ScalarOpKind::RDiv => self.scalar / x,
        })
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("ScalarOp", parent_index));
        }
        Ok(match self.kind {
            ScalarOpKind::Add => upstream_grad.clone(),
            ScalarOpKind::Mul => upstream_grad * self.scalar,
            ScalarOpKind::RSub => -upstream_grad,
            // d(c/x)/dx = -c/x² = -(c/x)² / c，c 为0时值恒为0
            ScalarOpKind::RDiv => {
                if self.scalar == 0.0 {
                    Tensor::zeros(upstream_grad.shape())
                } else {
                    -(upstream_grad * &value.square()) / self.scalar
                }
            }
        })
    }
}
