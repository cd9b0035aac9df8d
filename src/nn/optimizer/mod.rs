/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 优化器模块：以符号表达式的形式组合梯度下降更新规则
 *
 * 每个规则不直接修改参数，而是往 UpdateMap 中写入“目标 → 新值表达式”，
 * 动量包装器在此基础上改写表达式，最后由 `UpdateMap::apply` 一次性求值并同时写回。
 *
 * # 使用示例
 * ```ignore
 * let config = GdConfig { momentum: Some(0.9), ..Default::default() };
 * let updates = gd_updates(&cost, &model.params(), None, &config)?;
 * for _ in 0..epochs {
 *     x.set_value(&batch)?;
 *     let outputs = updates.apply_with_outputs(&[&cost])?;
 * }
 * ```
 */

mod config;
mod momentum;
mod rules;
mod update_map;

pub use config::{GdConfig, GdMethod, gd_updates};
pub use momentum::{apply_momentum, apply_nesterov_momentum};
pub use rules::{adadelta, adagrad, sgd};
pub use update_map::UpdateMap;

use crate::nn::{GraphError, Var};

/// 为参数查找（不存在则置零创建）名为`{参数名}_{suffix}`的辅助状态
fn auxiliary_state(param: &Var, suffix: &str) -> Result<Var, GraphError> {
    let name = format!("{}_{suffix}", param.name());
    param.get_graph().state(&name, &param.shape())
}
