use super::{broadcast_parents_shape, parent_index_error};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素除法 a / b（支持广播）
///
/// backward: d(a/b)/da = upstream / b，d(a/b)/db = -upstream * a / b²
pub(in crate::nn) struct Divide {
    shape: Vec<usize>,
}

impl Divide {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: broadcast_parents_shape(parents, "Divide")?,
        })
    }
}

impl TraitNode for Divide {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] / parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let denominator = parents[1];
        match parent_index {
            0 => Ok((upstream_grad / denominator).sum_to_shape(parents[0].shape())),
            // a / b² = (a / b) / b，复用本节点的值
            1 => Ok((-(upstream_grad * value) / denominator).sum_to_shape(parents[1].shape())),
            _ => Err(parent_index_error("Divide", parent_index)),
        }
    }
}
