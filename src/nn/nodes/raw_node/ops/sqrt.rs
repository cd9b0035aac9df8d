use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素开方
///
/// backward: d(√x)/dx = 1 / (2√x)
pub(in crate::nn) struct Sqrt {
    shape: Vec<usize>,
}

impl Sqrt {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: single_parent_shape(parents, "Sqrt")?,
        })
    }
}

impl TraitNode for Sqrt {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].sqrt())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("Sqrt", parent_index));
        }
        Ok(upstream_grad / &(value * 2.0))
    }
}
