/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 前馈网络（也用于卷积网络）
 */

use super::{collect_parameters, propagate};
use crate::nn::{GraphError, Layer, Module, Var};

pub struct FeedForward {
    layers: Vec<Box<dyn Layer>>,
}

impl FeedForward {
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Self {
        Self { layers }
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// 前向传播，返回每一层的输出（最后一个即网络输出）
    pub fn fprop(&self, x: &Var) -> Result<Vec<Var>, GraphError> {
        propagate(&self.layers, x)
    }

    /// 所有层的参数，按层顺序
    pub fn params(&self) -> Vec<Var> {
        collect_parameters(&self.layers)
    }
}

impl Module for FeedForward {
    fn parameters(&self) -> Vec<Var> {
        self.params()
    }
}
