use super::raw_node::{NodeType, TraitNode};
use crate::nn::GraphError;
use crate::tensor::Tensor;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 图中节点的统一外壳：除了具体的计算逻辑（`raw_node`）外，
/// 还持有节点的id、名称、当前值以及该值所属的前向传播批次
pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    value: Option<Tensor>,
    last_forward_pass_id: u64,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            id: NodeId(0),
            name: String::new(),
            raw_node: raw_node.into(),
            value: None,
            last_forward_pass_id: 0,
        }
    }

    pub(in crate::nn) fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.id = id;
        self.name = name.to_string();
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub(in crate::nn) const fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    /// 叶子节点（输入、参数、状态）的值只能通过本方法设置，且形状须与节点一致
    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if !self.raw_node.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "{self}的值由父节点计算得到，不应该被手动设置"
            )));
        }
        if let Some(value) = value {
            if value.shape() != self.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.value_expected_shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("{self}被设置的值形状与节点形状不一致"),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    pub(in crate::nn) const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    /// 写入本次前向传播算得的值（梯度节点等由图直接算出值的节点使用）
    pub(in crate::nn) fn set_computed_value(
        &mut self,
        value: Tensor,
        pass_id: u64,
    ) -> Result<(), GraphError> {
        if value.shape() != self.value_expected_shape() {
            return Err(GraphError::ComputationError(format!(
                "{self}算得的值形状为{:?}，与预期形状{:?}不符",
                value.shape(),
                self.value_expected_shape()
            )));
        }
        self.value = Some(value);
        self.last_forward_pass_id = pass_id;
        Ok(())
    }

    pub(in crate::nn) fn calc_value_by_parents(
        &mut self,
        parents: &[&Tensor],
        pass_id: u64,
    ) -> Result<(), GraphError> {
        let value = self.raw_node.calc_value_by_parents(parents)?;
        self.set_computed_value(value, pass_id)
    }

    pub(in crate::nn) fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let value = self.value.as_ref().ok_or_else(|| {
            GraphError::ComputationError(format!("{self}没有值，无法计算梯度"))
        })?;
        self.raw_node
            .calc_grad_to_parent(parent_index, parents, value, upstream_grad)
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.0,
            self.name,
            self.raw_node.type_name()
        )
    }
}
