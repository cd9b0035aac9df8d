/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 层的激活函数选择
 */

use crate::nn::{GraphError, Var, VarActivationOps};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// 不做变换
    #[default]
    Identity,
    Tanh,
    Sigmoid,
    #[serde(rename = "relu")]
    ReLU,
}

impl Activation {
    pub fn apply(self, x: &Var) -> Var {
        match self {
            Self::Identity => x.clone(),
            Self::Tanh => x.tanh(),
            Self::Sigmoid => x.sigmoid(),
            Self::ReLU => x.relu(),
        }
    }
}

impl FromStr for Activation {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(Self::Identity),
            "tanh" => Ok(Self::Tanh),
            "sigmoid" => Ok(Self::Sigmoid),
            "relu" => Ok(Self::ReLU),
            other => Err(GraphError::InvalidConfig(format!(
                "未知的激活函数\"{other}\"，可选：identity、tanh、sigmoid、relu"
            ))),
        }
    }
}
