/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 参数初始化（均匀分布，区间由激活函数类型决定）
 */

use super::{Graph, GraphError, Var};
use crate::tensor::Tensor;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 权重初始化方式，决定均匀分布的区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightType {
    /// [0, 1/(fan_in+fan_out))
    #[default]
    None,
    /// [-b, b]，b = sqrt(6/(fan_in+fan_out))
    Tanh,
    /// [-4b, 4b]
    Sigmoid,
}

impl WeightType {
    /// 给定扇入/扇出下的采样区间
    fn range(self, fan_in: usize, fan_out: usize) -> (f32, f32) {
        let fan_sum = (fan_in + fan_out).max(1) as f32;
        let bound = (6.0 / fan_sum).sqrt();
        match self {
            Self::None => (0.0, 1.0 / fan_sum),
            Self::Tanh => (-bound, bound),
            Self::Sigmoid => (-4.0 * bound, 4.0 * bound),
        }
    }
}

impl FromStr for WeightType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "tanh" => Ok(Self::Tanh),
            "sigmoid" => Ok(Self::Sigmoid),
            other => Err(GraphError::InvalidConfig(format!(
                "未知的权重类型\"{other}\"，可选：none、tanh、sigmoid"
            ))),
        }
    }
}

/// 创建并初始化一个参数节点。
///
/// - `in_dim`为`None`时创建形状为[1, out_dim]的偏置，取值于[0, 1/out_dim)
/// - 否则创建形状为[in_dim, out_dim]的权重，区间由`weight_type`决定
pub fn init_weights<R: Rng + ?Sized>(
    graph: &Graph,
    name: &str,
    out_dim: usize,
    in_dim: Option<usize>,
    weight_type: WeightType,
    rng: &mut R,
) -> Result<Var, GraphError> {
    if out_dim == 0 || in_dim == Some(0) {
        return Err(GraphError::InvalidConfig(format!(
            "参数{name}的维度必须为正，得到 in_dim={in_dim:?}, out_dim={out_dim}"
        )));
    }
    let value = match in_dim {
        None => Tensor::uniform_with_rng(0.0, 1.0 / out_dim as f32, &[1, out_dim], rng),
        Some(in_dim) => {
            let (low, high) = weight_type.range(in_dim, out_dim);
            Tensor::uniform_with_rng(low, high, &[in_dim, out_dim], rng)
        }
    };
    graph.parameter(&value, name)
}

/// 创建并初始化形状为[filters, channels, kh, kw]的卷积核参数。
/// 扇入为`channels*kh*kw`，扇出为`filters*kh*kw`
pub fn init_filters<R: Rng + ?Sized>(
    graph: &Graph,
    name: &str,
    shape: [usize; 4],
    weight_type: WeightType,
    rng: &mut R,
) -> Result<Var, GraphError> {
    if shape.contains(&0) {
        return Err(GraphError::InvalidConfig(format!(
            "卷积核{name}的各维度必须为正，得到{shape:?}"
        )));
    }
    let [filters, channels, kh, kw] = shape;
    let (low, high) = weight_type.range(channels * kh * kw, filters * kh * kw);
    let value = Tensor::uniform_with_rng(low, high, &shape, rng);
    graph.parameter(&value, name)
}
