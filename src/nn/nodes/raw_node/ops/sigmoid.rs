use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Sigmoid激活函数节点
///
/// forward: σ(x) = 1 / (1 + e^(-x))
/// backward: dσ/dx = σ(x) * (1 - σ(x))
pub(in crate::nn) struct Sigmoid {
    shape: Vec<usize>,
}

impl Sigmoid {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: single_parent_shape(parents, "Sigmoid")?,
        })
    }
}

impl TraitNode for Sigmoid {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].sigmoid())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("Sigmoid", parent_index));
        }
        let local_grad = value * &(1.0 - value);
        Ok(upstream_grad * &local_grad)
    }
}
