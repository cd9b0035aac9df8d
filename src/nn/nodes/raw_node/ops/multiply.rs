use super::{broadcast_parents_shape, parent_index_error};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素乘法（支持广播）
///
/// backward: d(a*b)/da = upstream * b，d(a*b)/db = upstream * a
pub(in crate::nn) struct Multiply {
    shape: Vec<usize>,
}

impl Multiply {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: broadcast_parents_shape(parents, "Multiply")?,
        })
    }
}

impl TraitNode for Multiply {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let other = match parent_index {
            0 => parents[1],
            1 => parents[0],
            _ => return Err(parent_index_error("Multiply", parent_index)),
        };
        Ok((upstream_grad * other).sum_to_shape(parents[parent_index].shape()))
    }
}
