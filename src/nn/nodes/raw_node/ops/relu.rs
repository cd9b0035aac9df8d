use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// ReLU激活函数节点：max(0, x)，x <= 0 处梯度取0
pub(in crate::nn) struct ReLU {
    shape: Vec<usize>,
}

impl ReLU {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: single_parent_shape(parents, "ReLU")?,
        })
    }
}

impl TraitNode for ReLU {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].relu())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("ReLU", parent_index));
        }
        Ok(upstream_grad.zip_map(parents[0], |g, x| if x > 0.0 { g } else { 0.0 }))
    }
}
