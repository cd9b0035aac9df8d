/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 基础更新规则：SGD、Adagrad、Adadelta
 *
 * 每个规则向（可选的）已有 UpdateMap 追加条目并返回它。
 * `params`为空时原样返回，不创建任何节点。
 */

use super::{UpdateMap, auxiliary_state};
use crate::nn::{GraphError, Var, VarElementwiseOps, grad};

fn warn_if_not_descending(rule: &str, learning_rate: f32) {
    if learning_rate <= 0.0 {
        log::warn!("{rule}的学习率{learning_rate}不为正，参数不会沿梯度下降");
    }
}

/// 随机梯度下降：`param = param - lr * grad`
pub fn sgd(
    cost: &Var,
    params: &[Var],
    updates: Option<UpdateMap>,
    learning_rate: f32,
) -> Result<UpdateMap, GraphError> {
    let mut updates = updates.unwrap_or_default();
    if params.is_empty() {
        return Ok(updates);
    }
    warn_if_not_descending("sgd", learning_rate);
    log::debug!("sgd：为{}个参数构建更新，学习率{learning_rate}", params.len());

    for (param, g) in params.iter().zip(grad(cost, params)?) {
        updates.insert(param, param - &(learning_rate * &g))?;
    }
    Ok(updates)
}

/// Adagrad：累积梯度平方（永不清零），按其平方根缩放步长
///
/// - `accu = accu + grad²`
/// - `param = param - lr * grad / sqrt(accu + eps)`
pub fn adagrad(
    cost: &Var,
    params: &[Var],
    updates: Option<UpdateMap>,
    learning_rate: f32,
    eps: f32,
) -> Result<UpdateMap, GraphError> {
    let mut updates = updates.unwrap_or_default();
    if params.is_empty() {
        return Ok(updates);
    }
    warn_if_not_descending("adagrad", learning_rate);
    log::debug!("adagrad：为{}个参数构建更新，学习率{learning_rate}", params.len());

    for (param, g) in params.iter().zip(grad(cost, params)?) {
        let accu = auxiliary_state(param, "adagrad_accu")?;
        let accu_new = &accu + &g.square();
        updates.insert(&accu, accu_new.clone())?;

        let step = (learning_rate * &g) / (&accu_new + eps).sqrt();
        updates.insert(param, param - &step)?;
    }
    Ok(updates)
}

/// Adadelta：梯度平方与更新量平方各自做指数滑动平均
///
/// - `accu = rho * accu + (1 - rho) * grad²`
/// - `update = grad * sqrt(delta_accu + eps) / sqrt(accu + eps)`
/// - `param = param - lr * update`
/// - `delta_accu = rho * delta_accu + (1 - rho) * update²`
pub fn adadelta(
    cost: &Var,
    params: &[Var],
    updates: Option<UpdateMap>,
    learning_rate: f32,
    eps: f32,
    rho: f32,
) -> Result<UpdateMap, GraphError> {
    let mut updates = updates.unwrap_or_default();
    if params.is_empty() {
        return Ok(updates);
    }
    warn_if_not_descending("adadelta", learning_rate);
    log::debug!(
        "adadelta：为{}个参数构建更新，学习率{learning_rate}，rho={rho}",
        params.len()
    );

    for (param, g) in params.iter().zip(grad(cost, params)?) {
        let accu = auxiliary_state(param, "adadelta_accu")?;
        let delta_accu = auxiliary_state(param, "adadelta_delta_accu")?;

        let accu_new = rho * &accu + (1.0 - rho) * &g.square();
        updates.insert(&accu, accu_new.clone())?;

        // 更新量本身不含学习率，delta_accu 累积的也是它
        let update = &g * &(&delta_accu + eps).sqrt() / (&accu_new + eps).sqrt();
        updates.insert(param, param - &(learning_rate * &update))?;

        let delta_accu_new = rho * &delta_accu + (1.0 - rho) * &update.square();
        updates.insert(&delta_accu, delta_accu_new)?;
    }
    Ok(updates)
}
