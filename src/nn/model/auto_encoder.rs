/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 由全连接层组成的（去噪）自编码器
 *
 * 模型只负责结构检查与前向传播，训练与前馈网络相同：
 * 对重构误差调用 gd_updates 即可。
 */

use super::{collect_parameters, propagate};
use crate::nn::{GraphError, Layer, Module, Var, corrupt_input};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// 输入加噪配置。`epoch`给定时实际加噪程度为`level * epoch^(-decay_rate)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorruptionConfig {
    pub level: f32,
    pub epoch: Option<u32>,
    pub decay_rate: f32,
}

impl Default for CorruptionConfig {
    fn default() -> Self {
        Self {
            level: 0.0,
            epoch: None,
            decay_rate: 1.0,
        }
    }
}

impl CorruptionConfig {
    /// 实际使用的加噪程度
    pub fn effective_level(&self) -> f32 {
        match self.epoch {
            Some(epoch) => self.level * (epoch as f32).powf(-self.decay_rate),
            None => self.level,
        }
    }
}

pub struct AutoEncoder {
    layers: Vec<Box<dyn Layer>>,
    corruption_level: Cell<f32>,
}

impl std::fmt::Debug for AutoEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoEncoder")
            .field("layers", &self.layers.iter().map(|l| l.name()).collect::<Vec<_>>())
            .field("corruption_level", &self.corruption_level.get())
            .finish()
    }
}

impl AutoEncoder {
    /// 检查：非空；每层都有维度信息与参数；首层输入维度等于末层输出维度
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Self, GraphError> {
        let (Some(first), Some(last)) = (layers.first(), layers.last()) else {
            return Err(GraphError::InvalidConfig("自编码器至少需要1层".to_string()));
        };
        for layer in &layers {
            if layer.in_dim().is_none() || layer.out_dim().is_none() {
                return Err(GraphError::InvalidConfig(format!(
                    "自编码器的层{}缺少输入/输出维度",
                    layer.name()
                )));
            }
            if layer.parameters().is_empty() {
                return Err(GraphError::InvalidConfig(format!(
                    "自编码器的层{}没有参数",
                    layer.name()
                )));
            }
        }
        if first.in_dim() != last.out_dim() {
            return Err(GraphError::InvalidConfig(format!(
                "自编码器输入维度{:?}与输出维度{:?}不一致",
                first.in_dim(),
                last.out_dim()
            )));
        }
        Ok(Self {
            layers,
            corruption_level: Cell::new(0.0),
        })
    }

    /// 前向传播：先按配置对输入加噪（程度为0则不加），再依次应用各层
    pub fn fprop<R: Rng + ?Sized>(
        &self,
        x: &Var,
        corruption: &CorruptionConfig,
        rng: &mut R,
    ) -> Result<Vec<Var>, GraphError> {
        let level = corruption.effective_level();
        self.corruption_level.set(level);
        log::debug!("自编码器输入加噪程度：{level}");

        let input = if level == 0.0 {
            x.clone()
        } else {
            corrupt_input(x, level, rng)?
        };
        propagate(&self.layers, &input)
    }

    /// 最近一次`fprop`实际使用的加噪程度
    pub fn corruption_level(&self) -> f32 {
        self.corruption_level.get()
    }

    pub fn params(&self) -> Vec<Var> {
        collect_parameters(&self.layers)
    }
}

impl Module for AutoEncoder {
    fn parameters(&self) -> Vec<Var> {
        self.params()
    }
}
