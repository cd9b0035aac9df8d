use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 全部元素求和，输出[1, 1]
pub(in crate::nn) struct Sum {
    shape: Vec<usize>,
}

impl Sum {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        single_parent_shape(parents, "Sum")?;
        Ok(Self { shape: vec![1, 1] })
    }
}

impl TraitNode for Sum {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].sum())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("Sum", parent_index));
        }
        Ok(Tensor::ones(parents[0].shape()) * upstream_grad)
    }
}

/// 全部元素求均值，输出[1, 1]
pub(in crate::nn) struct Mean {
    shape: Vec<usize>,
}

impl Mean {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        single_parent_shape(parents, "Mean")?;
        Ok(Self { shape: vec![1, 1] })
    }
}

impl TraitNode for Mean {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].mean())
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("Mean", parent_index));
        }
        let size = parents[0].size().max(1) as f32;
        Ok(Tensor::full(1.0 / size, parents[0].shape()) * upstream_grad)
    }
}
