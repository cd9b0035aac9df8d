/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 符号梯度：为代价对各参数的梯度创建 Gradient 节点
 */

use super::{GraphError, Var};

/// 返回`cost`对`params`中每个参数（或状态）的符号梯度，顺序与`params`一致。
///
/// 梯度节点和其他节点一样参与前向传播：同一批次内对同一代价只做一次反向传播。
/// `cost`必须是单元素张量；与`cost`不连通的参数在求值时报错。
pub fn grad(cost: &Var, params: &[Var]) -> Result<Vec<Var>, GraphError> {
    params
        .iter()
        .map(|param| {
            cost.check_same_graph(param, "求梯度")?;
            let id = cost.graph().borrow_mut().new_gradient_node(
                cost.node_id(),
                param.node_id(),
                None,
            )?;
            Ok(cost.wrap(id))
        })
        .collect()
}
