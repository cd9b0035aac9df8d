use super::{broadcast_parents_shape, parent_index_error};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素减法 parents[0] - parents[1]（支持广播）
pub(in crate::nn) struct Subtract {
    shape: Vec<usize>,
}

impl Subtract {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: broadcast_parents_shape(parents, "Subtract")?,
        })
    }
}

impl TraitNode for Subtract {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] - parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream_grad.sum_to_shape(parents[0].shape())),
            1 => Ok((-upstream_grad).sum_to_shape(parents[1].shape())),
            _ => Err(parent_index_error("Subtract", parent_index)),
        }
    }
}
