/*
 * State 节点：优化器的辅助状态（动量速度、梯度平方累积量等）
 *
 * 与 Parameter 节点的区别：
 *   - Parameter：可训练参数，是更新规则的对象
 *   - State：更新规则自己维护的缓冲量，和参数同形状，创建时置零
 *
 * 两者都可以作为更新表的目标，都随图存活
 */

use super::{TraitNode, leaf_error, validate_leaf_shape};
use crate::nn::GraphError;
use crate::tensor::Tensor;

pub(in crate::nn) struct State {
    shape: Vec<usize>,
}

impl State {
    pub(in crate::nn) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        validate_leaf_shape(shape, "状态")?;
        Ok(Self {
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for State {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(leaf_error("状态"))
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(leaf_error("状态"))
    }
}
