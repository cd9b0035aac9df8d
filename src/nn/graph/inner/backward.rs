/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeType;
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet};

impl GraphInner {
    /// 以代价节点（当前批次的值）为起点做一次反向传播，返回代价对其每个祖先
    /// 参数/状态节点的梯度。输入节点不接收梯度，与代价不连通的节点不会出现在结果中
    pub(in crate::nn::graph) fn backward_grads(
        &self,
        cost_id: NodeId,
    ) -> Result<HashMap<NodeId, Tensor>, GraphError> {
        let cost_node = self.get_node(cost_id)?;
        let cost_value = cost_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("代价{cost_node}没有值，请先执行 forward"))
        })?;
        if cost_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求代价为标量，但{cost_node}的形状为{:?}",
                cost_value.shape()
            )));
        }

        let topo_order = self.topological_sort_backward(cost_id)?;
        let requires_grad = self.nodes_requiring_grad(&topo_order)?;

        let mut grads: HashMap<NodeId, Tensor> = HashMap::new();
        if !requires_grad.contains(&cost_id) {
            return Ok(grads);
        }
        grads.insert(cost_id, Tensor::ones(cost_value.shape()));

        // 逆拓扑序：处理某节点时，它所有子节点的梯度都已累加完毕
        for &node_id in topo_order.iter().rev() {
            let node = self.get_node(node_id)?;
            if node.node_type().is_leaf() {
                continue;
            }
            let Some(upstream_grad) = grads.remove(&node_id) else {
                continue;
            };

            let parent_ids = self.get_node_parents(node_id)?;
            let parent_values = parent_ids
                .iter()
                .map(|&id| {
                    self.get_node(id)?.value().ok_or_else(|| {
                        GraphError::ComputationError(format!(
                            "{node}的父节点{id:?}没有值，请先执行 forward"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            for (parent_index, parent_id) in parent_ids.iter().enumerate() {
                if !requires_grad.contains(parent_id) {
                    continue;
                }
                let parent_grad =
                    node.calc_grad_to_parent(parent_index, &parent_values, &upstream_grad)?;
                match grads.get_mut(parent_id) {
                    Some(existing_grad) => *existing_grad += &parent_grad,
                    None => {
                        grads.insert(*parent_id, parent_grad);
                    }
                }
            }
        }

        Ok(grads)
    }

    /// 找出（拓扑序中）需要梯度的节点：参数/状态节点，以及依赖于它们的算子节点
    fn nodes_requiring_grad(&self, topo_order: &[NodeId]) -> Result<HashSet<NodeId>, GraphError> {
        let mut requires_grad = HashSet::new();
        for &node_id in topo_order {
            let node = self.get_node(node_id)?;
            let needed = match node.node_type() {
                NodeType::Parameter(_) | NodeType::State(_) => true,
                NodeType::Input(_) => false,
                NodeType::Gradient(_) => {
                    return Err(GraphError::InvalidOperation(format!(
                        "不支持二阶梯度：代价依赖于梯度{node}"
                    )));
                }
                _ => self
                    .get_node_parents(node_id)?
                    .iter()
                    .any(|parent_id| requires_grad.contains(parent_id)),
            };
            if needed {
                requires_grad.insert(node_id);
            }
        }
        Ok(requires_grad)
    }

    /// 拓扑排序（父节点总排在子节点之前），只包含代价的祖先及其本身
    fn topological_sort_backward(&self, cost_id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        fn dfs(
            graph: &GraphInner,
            node_id: NodeId,
            visited: &mut HashSet<NodeId>,
            result: &mut Vec<NodeId>,
        ) -> Result<(), GraphError> {
            if !visited.insert(node_id) {
                return Ok(());
            }
            for parent_id in graph.get_node_parents(node_id)? {
                dfs(graph, parent_id, visited, result)?;
            }
            result.push(node_id);
            Ok(())
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        dfs(self, cost_id, &mut visited, &mut result)?;
        Ok(result)
    }
}
