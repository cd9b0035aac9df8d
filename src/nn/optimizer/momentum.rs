/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 动量包装器：在基础规则给出的参数更新之上叠加速度项
 */

use super::{UpdateMap, auxiliary_state};
use crate::nn::{GraphError, Var};

/// 取出各参数当前挂起的更新表达式；任一参数不在映射中则报错
fn pending_updates(updates: &UpdateMap, params: &[Var]) -> Result<Vec<Var>, GraphError> {
    params
        .iter()
        .map(|param| {
            updates
                .get(param)
                .cloned()
                .ok_or_else(|| GraphError::ParameterNotInUpdateMap(param.name()))
        })
        .collect()
}

/// 经典动量
///
/// 设基础规则给出的新值为`u`，速度为`v`：
/// - `x = momentum * v + u`
/// - `v = x - param`
/// - `param = x`
pub fn apply_momentum(
    mut updates: UpdateMap,
    params: &[Var],
    momentum: f32,
) -> Result<UpdateMap, GraphError> {
    let pending = pending_updates(&updates, params)?;
    log::debug!("为{}个参数叠加动量{momentum}", params.len());

    for (param, u) in params.iter().zip(pending) {
        let velocity = auxiliary_state(param, "velocity")?;
        let x = momentum * &velocity + &u;
        updates.insert(&velocity, &x - param)?;
        updates.insert(param, x)?;
    }
    Ok(updates)
}

/// Nesterov 动量
///
/// 设基础规则给出的新值为`u`，速度为`v`：
/// - `x = momentum * v + u - param`
/// - `v = x`
/// - `param = momentum * x + u`
pub fn apply_nesterov_momentum(
    mut updates: UpdateMap,
    params: &[Var],
    momentum: f32,
) -> Result<UpdateMap, GraphError> {
    let pending = pending_updates(&updates, params)?;
    log::debug!("为{}个参数叠加 Nesterov 动量{momentum}", params.len());

    for (param, u) in params.iter().zip(pending) {
        let velocity = auxiliary_state(param, "velocity")?;
        let x = momentum * &velocity + &u - param;
        updates.insert(&velocity, x.clone())?;
        updates.insert(param, momentum * &x + &u)?;
    }
    Ok(updates)
}
