/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 梯度下降配置与统一入口 gd_updates
 */

use super::{UpdateMap, adadelta, adagrad, apply_momentum, apply_nesterov_momentum, sgd};
use crate::nn::{GraphError, Var};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 基础更新规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GdMethod {
    #[default]
    Sgd,
    Adagrad,
    Adadelta,
}

impl FromStr for GdMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sgd" => Ok(Self::Sgd),
            "adagrad" => Ok(Self::Adagrad),
            "adadelta" => Ok(Self::Adadelta),
            other => Err(GraphError::InvalidConfig(format!(
                "未知的优化方法\"{other}\"，可选：sgd、adagrad、adadelta"
            ))),
        }
    }
}

impl fmt::Display for GdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sgd => "sgd",
            Self::Adagrad => "adagrad",
            Self::Adadelta => "adadelta",
        };
        write!(f, "{name}")
    }
}

/// 梯度下降配置
///
/// 动量（`momentum`，可选 Nesterov）只能与 SGD 搭配。
///
/// # JSON 示例
/// ```json
/// { "method": "sgd", "learning_rate": 0.05, "momentum": 0.9, "nesterov": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GdConfig {
    pub method: GdMethod,
    pub learning_rate: f32,
    pub momentum: Option<f32>,
    pub nesterov: bool,
    pub eps: f32,
    pub rho: f32,
}

impl Default for GdConfig {
    fn default() -> Self {
        Self {
            method: GdMethod::Sgd,
            learning_rate: 0.1,
            momentum: None,
            nesterov: false,
            eps: 1e-6,
            rho: 0.95,
        }
    }
}

impl GdConfig {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GraphError::InvalidConfig(format!("无法解析梯度下降配置：{e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.learning_rate.is_finite() {
            return Err(GraphError::InvalidConfig(format!(
                "学习率必须是有限数，得到{}",
                self.learning_rate
            )));
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "eps 必须是非负有限数，得到{}",
                self.eps
            )));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(GraphError::InvalidConfig(format!(
                "rho 必须在[0, 1]区间内，得到{}",
                self.rho
            )));
        }
        match self.momentum {
            Some(_) if self.method != GdMethod::Sgd => {
                return Err(GraphError::InvalidConfig(format!(
                    "动量只能与 sgd 搭配，但方法为{}",
                    self.method
                )));
            }
            Some(momentum) if !momentum.is_finite() => {
                return Err(GraphError::InvalidConfig(format!(
                    "动量必须是有限数，得到{momentum}"
                )));
            }
            None if self.nesterov => {
                return Err(GraphError::InvalidConfig(
                    "启用 nesterov 时必须同时设置 momentum".to_string(),
                ));
            }
            _ => {}
        }
        if self.learning_rate <= 0.0 {
            log::warn!("学习率{}不为正", self.learning_rate);
        }
        Ok(())
    }
}

/// 按配置构建更新映射：先应用基础规则，SGD 且设置了动量时再叠加（Nesterov）动量
pub fn gd_updates(
    cost: &Var,
    params: &[Var],
    updates: Option<UpdateMap>,
    config: &GdConfig,
) -> Result<UpdateMap, GraphError> {
    config.validate()?;
    log::debug!("gd_updates：方法{}，{}个参数", config.method, params.len());

    match config.method {
        GdMethod::Sgd => {
            let updates = sgd(cost, params, updates, config.learning_rate)?;
            match config.momentum {
                Some(momentum) if config.nesterov => {
                    apply_nesterov_momentum(updates, params, momentum)
                }
                Some(momentum) => apply_momentum(updates, params, momentum),
                None => Ok(updates),
            }
        }
        GdMethod::Adagrad => adagrad(cost, params, updates, config.learning_rate, config.eps),
        GdMethod::Adadelta => adadelta(
            cost,
            params,
            updates,
            config.learning_rate,
            config.eps,
            config.rho,
        ),
    }
}
