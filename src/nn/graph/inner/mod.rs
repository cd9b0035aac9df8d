/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作 + 前向传播（含梯度节点的求值）+ 批量赋值
 * - backward.rs: VJP 反向传播
 * - node_builders.rs: new_*_node
 */

mod backward;
mod core;
mod node_builders;

use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄或 `Var` 使用此结构。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 节点名 -> 节点id（名称在图内唯一）
    pub(in crate::nn::graph) node_names: HashMap<String, NodeId>,
    /// 反向边：child_id -> parent_ids（保持父节点顺序）
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 最后一次前向传播的 id
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    pub(in crate::nn::graph) next_id: u64,
    /// 代价节点 -> (算出这些梯度的前向传播 id, 各节点的梯度)
    pub(in crate::nn::graph) gradient_cache: HashMap<NodeId, (u64, HashMap<NodeId, Tensor>)>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
