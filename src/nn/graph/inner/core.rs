/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : GraphInner 核心操作 + 前向传播
 *
 * 前向传播以“批次”（pass）为单位：每次调用 forward/evaluate 分配一个新的 pass id，
 * 本批次内已算过的节点直接复用，旧批次的值会被重新计算（伯努利掩码因此每批次重新采样）。
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::{NodeHandle, NodeType};
use crate::tensor::Tensor;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            node_names: HashMap::new(),
            backward_edges: HashMap::new(),
            last_forward_pass_id: 0,
            next_id: 0,
            gradient_cache: HashMap::new(),
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_nodes(&self, ids: &[NodeId]) -> Result<Vec<&NodeHandle>, GraphError> {
        ids.iter().map(|&id| self.get_node(id)).collect()
    }

    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let _ = self.get_node(id)?;
        Ok(self.backward_edges.get(&id).cloned().unwrap_or_default())
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value_expected_shape(&self, id: NodeId) -> Result<&[usize], GraphError> {
        Ok(self.get_node(id)?.value_expected_shape())
    }

    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    /// 是否为参数或状态节点（可作为更新目标、可被求梯度）
    pub fn is_updatable_node(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.node_type().is_updatable())
    }

    pub fn is_parameter_node(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(matches!(self.get_node(id)?.node_type(), NodeType::Parameter(_)))
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn set_node_value(&mut self, id: NodeId, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.get_node_mut(id)?.set_value(value)
    }

    fn value_of(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        let node = self.get_node(id)?;
        node.value().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "{node}没有值。不该触及本错误，否则说明crate代码有问题"
            ))
        })
    }

    // ========== 批量赋值 ==========

    /// 一次性写入多个参数/状态节点的新值。
    /// 先整体校验（节点类型与形状），全部通过后才写入，因而要么全部生效、要么全部不生效
    pub fn assign_values(&mut self, assignments: Vec<(NodeId, Tensor)>) -> Result<(), GraphError> {
        for (id, value) in &assignments {
            let node = self.get_node(*id)?;
            if !node.node_type().is_updatable() {
                return Err(GraphError::InvalidOperation(format!(
                    "{node}不是参数或状态节点，不能被更新"
                )));
            }
            if value.shape() != node.value_expected_shape() {
                return Err(GraphError::ShapeMismatch {
                    expected: node.value_expected_shape().to_vec(),
                    got: value.shape().to_vec(),
                    message: format!("{node}的新值形状不一致"),
                });
            }
        }
        for (id, value) in assignments {
            self.get_node_mut(id)?.set_value(Some(&value))?;
        }
        Ok(())
    }

    // ========== 前向传播 ==========

    /// 在一个新批次中计算指定节点的值
    pub fn forward(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.evaluate(&[node_id]).map(|_| ())
    }

    /// 在同一个新批次中计算多个节点的值并返回（克隆）。
    /// 同一批次内所有节点看到的叶子值、伯努利掩码、梯度都是一致的
    pub fn evaluate(&mut self, node_ids: &[NodeId]) -> Result<Vec<Tensor>, GraphError> {
        let new_graph_forward_pass_id = self.last_forward_pass_id + 1;
        self.last_forward_pass_id = new_graph_forward_pass_id;
        for &node_id in node_ids {
            self.forward_node_internal(node_id, new_graph_forward_pass_id)?;
        }
        node_ids
            .iter()
            .map(|&id| self.value_of(id).cloned())
            .collect()
    }

    fn forward_node_internal(
        &mut self,
        node_id: NodeId,
        new_graph_forward_pass_id: u64,
    ) -> Result<(), GraphError> {
        let node = self.get_node(node_id)?;
        if node.node_type().is_leaf() {
            if node.value().is_some() {
                return Ok(());
            }
            return Err(GraphError::InvalidOperation(format!(
                "{node}是输入/参数/状态类型，但还没有值，请先通过 set_value 设置"
            )));
        }
        if node.last_forward_pass_id() == new_graph_forward_pass_id {
            return Ok(());
        }
        let gradient_pair = match node.node_type() {
            NodeType::Gradient(gradient) => Some((gradient.cost(), gradient.target())),
            _ => None,
        };

        let parents_ids = self.get_node_parents(node_id)?;
        for parent_id in &parents_ids {
            self.forward_node_internal(*parent_id, new_graph_forward_pass_id)?;
        }

        if let Some((cost, target)) = gradient_pair {
            let grad = self.gradient_value(cost, target, new_graph_forward_pass_id)?;
            return self
                .get_node_mut(node_id)?
                .set_computed_value(grad, new_graph_forward_pass_id);
        }

        // 暂时取出本节点，从而可以同时借用父节点的值
        let mut node = self.nodes.remove(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        let outcome = parents_ids
            .iter()
            .map(|&id| self.value_of(id))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|parent_values| {
                node.calc_value_by_parents(&parent_values, new_graph_forward_pass_id)
            });
        self.nodes.insert(node_id, node);
        outcome
    }

    /// 读取`cost`对`target`的梯度；同一批次内对同一代价只做一次反向传播
    fn gradient_value(
        &mut self,
        cost: NodeId,
        target: NodeId,
        pass_id: u64,
    ) -> Result<Tensor, GraphError> {
        let fresh = matches!(self.gradient_cache.get(&cost), Some((id, _)) if *id == pass_id);
        if !fresh {
            let grads = self.backward_grads(cost)?;
            self.gradient_cache.insert(cost, (pass_id, grads));
        }

        let grad = self
            .gradient_cache
            .get(&cost)
            .and_then(|(_, grads)| grads.get(&target))
            .cloned();
        match grad {
            Some(grad) => Ok(grad),
            None => Err(GraphError::InvalidOperation(format!(
                "{}与代价{}不连通，无法求梯度",
                self.get_node(target)?,
                self.get_node(cost)?
            ))),
        }
    }
}
