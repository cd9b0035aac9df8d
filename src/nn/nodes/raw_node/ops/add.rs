use super::{broadcast_parents_shape, parent_index_error};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素加法（支持广播）
///
/// backward: 上游梯度沿被广播的维度求和，还原到各父节点的形状
pub(in crate::nn) struct Add {
    shape: Vec<usize>,
}

impl Add {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: broadcast_parents_shape(parents, "Add")?,
        })
    }
}

impl TraitNode for Add {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] + parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let parent = parents
            .get(parent_index)
            .ok_or_else(|| parent_index_error("Add", parent_index))?;
        Ok(upstream_grad.sum_to_shape(parent.shape()))
    }
}
