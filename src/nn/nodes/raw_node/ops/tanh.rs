use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Tanh激活函数节点
///
/// forward: tanh(x) = (e^x - e^(-x)) / (e^x + e^(-x))
/// backward: d(tanh)/dx = 1 - tanh²(x)
pub(in crate::nn) struct Tanh {
    shape: Vec<usize>,
}

impl Tanh {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self {
            shape: single_parent_shape(parents, "Tanh")?,
        })
    }
}

impl TraitNode for Tanh {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].tanh())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("Tanh", parent_index));
        }
        let local_grad = 1.0 - &value.square();
        Ok(upstream_grad * &local_grad)
    }
}
