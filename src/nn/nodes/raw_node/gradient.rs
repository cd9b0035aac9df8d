/*
 * Gradient 节点：符号梯度 d(cost)/d(target)
 *
 * 父节点：
 * - parents[0]: 代价（标量）
 * - parents[1]: 求导目标（Parameter 或 State 节点）
 *
 * 其值不由父节点的值直接算出，而是由图在本次前向传播中对代价做一次反向传播后读取，
 * 同一次前向传播中，同一代价的所有 Gradient 节点共享这一次反向传播的结果
 */

use super::TraitNode;
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;

pub(in crate::nn) struct Gradient {
    cost: NodeId,
    target: NodeId,
    shape: Vec<usize>,
}

impl Gradient {
    pub(in crate::nn) fn new(cost: NodeId, target: NodeId, target_shape: &[usize]) -> Self {
        Self {
            cost,
            target,
            shape: target_shape.to_vec(),
        }
    }

    pub(in crate::nn) const fn cost(&self) -> NodeId {
        self.cost
    }

    pub(in crate::nn) const fn target(&self) -> NodeId {
        self.target
    }
}

impl TraitNode for Gradient {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "梯度节点的值由图的反向传播得到，不能直接由父节点计算".to_string(),
        ))
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "不支持二阶梯度：代价不能依赖于梯度节点".to_string(),
        ))
    }
}
