/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 卷积 K-means：一个卷积层 + 一个通道 arg-max 池化层
 */

use super::{collect_parameters, propagate};
use crate::nn::{GraphError, Layer, Module, Var};

pub struct ConvKMeans {
    layers: Vec<Box<dyn Layer>>,
}

impl std::fmt::Debug for ConvKMeans {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvKMeans")
            .field("layers", &self.layers.iter().map(|l| l.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl ConvKMeans {
    /// `layers`必须恰好是两层
    pub fn new(layers: Vec<Box<dyn Layer>>) -> Result<Self, GraphError> {
        if layers.len() != 2 {
            return Err(GraphError::InvalidConfig(format!(
                "卷积 K-means 需要恰好2层（卷积层 + arg-max 池化层），得到{}层",
                layers.len()
            )));
        }
        Ok(Self { layers })
    }

    /// 被训练的卷积层
    pub fn get_layer(&self) -> &dyn Layer {
        self.layers[0].as_ref()
    }

    /// 前向传播，返回两层各自的输出（第二个为激活图）
    pub fn fprop(&self, x: &Var) -> Result<Vec<Var>, GraphError> {
        propagate(&self.layers, x)
    }

    pub fn params(&self) -> Vec<Var> {
        collect_parameters(&self.layers)
    }
}

impl Module for ConvKMeans {
    fn parameters(&self) -> Vec<Var> {
        self.params()
    }
}
