/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 通道维 arg-max 池化（胜者通吃）
 *
 * 输入 [batch, C, H, W]，输出形状不变：每个 (batch, h, w) 位置上只有响应最大的
 * 通道保留原值，其余通道置0。梯度只经由保留下来的值回传。
 */

use crate::nn::{GraphError, Layer, Module, Var, VarMatrixOps};

#[derive(Debug)]
pub struct ArgMaxPool {
    name: String,
}

impl ArgMaxPool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Module for ArgMaxPool {
    fn parameters(&self) -> Vec<Var> {
        Vec::new()
    }
}

impl Layer for ArgMaxPool {
    fn apply(&self, x: &Var) -> Result<Var, GraphError> {
        let mask = x.channel_arg_max()?;
        x.try_mul(&mask)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
