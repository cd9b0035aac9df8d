/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 更新映射：有序的“参数/状态节点 → 新值表达式”
 */

use crate::nn::{GraphError, NodeId, Var};
use crate::tensor::Tensor;
use std::collections::HashMap;

/// 有序的更新映射
///
/// - 目标只能是参数或状态节点，表达式必须与目标同图、同形状
/// - 对已有目标再次`insert`会原地覆盖（保持原位置，以最后一次为准）
/// - `apply`在同一次前向传播中求出所有表达式（全部基于旧值），再统一写回
#[derive(Debug, Clone, Default)]
pub struct UpdateMap {
    entries: Vec<(Var, Var)>,
    index: HashMap<NodeId, usize>,
}

impl UpdateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 写入（或覆盖）`target`的新值表达式
    pub fn insert(&mut self, target: &Var, expr: Var) -> Result<(), GraphError> {
        self.check_entry(target, &expr)?;
        match self.index.get(&target.node_id()) {
            Some(&position) => self.entries[position].1 = expr,
            None => {
                self.index.insert(target.node_id(), self.entries.len());
                self.entries.push((target.clone(), expr));
            }
        }
        Ok(())
    }

    /// 其他图中的节点即使 id 相同也查不到
    pub fn get(&self, target: &Var) -> Option<&Var> {
        let position = self.position(target)?;
        Some(&self.entries[position].1)
    }

    pub fn contains(&self, target: &Var) -> bool {
        self.position(target).is_some()
    }

    /// 按插入顺序遍历 (目标, 表达式)
    pub fn iter(&self) -> impl Iterator<Item = (&Var, &Var)> {
        self.entries.iter().map(|(target, expr)| (target, expr))
    }

    /// 按插入顺序返回所有目标
    pub fn targets(&self) -> Vec<Var> {
        self.entries.iter().map(|(target, _)| target.clone()).collect()
    }

    /// 执行一步更新
    pub fn apply(&self) -> Result<(), GraphError> {
        self.apply_with_outputs(&[]).map(|_| ())
    }

    /// 执行一步更新，并返回`outputs`在更新前（与更新表达式同一批次）的值
    pub fn apply_with_outputs(&self, outputs: &[&Var]) -> Result<Vec<Tensor>, GraphError> {
        let Some(anchor) = self
            .entries
            .first()
            .map(|(target, _)| target)
            .or_else(|| outputs.first().copied())
        else {
            return Ok(Vec::new());
        };
        for output in outputs {
            anchor.check_same_graph(output, "求值")?;
        }

        let ids = self
            .entries
            .iter()
            .map(|(_, expr)| expr.node_id())
            .chain(outputs.iter().map(|output| output.node_id()))
            .collect::<Vec<_>>();
        let mut values = anchor.graph().borrow_mut().evaluate(&ids)?;
        let output_values = values.split_off(self.entries.len());

        let assignments = self
            .entries
            .iter()
            .map(|(target, _)| target.node_id())
            .zip(values)
            .collect::<Vec<_>>();
        anchor.graph().borrow_mut().assign_values(assignments)?;
        log::debug!("已同时更新{}个参数/状态节点", self.entries.len());
        Ok(output_values)
    }

    fn position(&self, target: &Var) -> Option<usize> {
        let &position = self.index.get(&target.node_id())?;
        let (owner, _) = &self.entries[position];
        owner.same_graph(target).then_some(position)
    }

    fn check_entry(&self, target: &Var, expr: &Var) -> Result<(), GraphError> {
        if !target.graph().borrow().is_updatable_node(target.node_id())? {
            return Err(GraphError::InvalidOperation(format!(
                "只有参数或状态节点可以作为更新目标，但{}不是",
                target.name()
            )));
        }
        target.check_same_graph(expr, "更新")?;
        if let Some((first, _)) = self.entries.first() {
            first.check_same_graph(target, "更新")?;
        }
        let (target_shape, expr_shape) = (target.shape(), expr.shape());
        if target_shape != expr_shape {
            return Err(GraphError::ShapeMismatch {
                expected: target_shape,
                got: expr_shape,
                message: format!("{}的更新表达式形状不一致", target.name()),
            });
        }
        Ok(())
    }
}
