/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Linear (全连接) 层：`output = activation(x @ W + b)`
 */

use crate::nn::{
    Activation, Graph, GraphError, Layer, Module, Var, VarMatrixOps, WeightType, init_weights,
};
use rand::Rng;

/// Linear (全连接) 层
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_dim]
/// - 输出：[batch_size, out_dim]
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(&graph, 784, 128, Activation::Sigmoid, WeightType::Sigmoid, "fc1", &mut rng)?;
/// let h = fc.apply(&x)?;
/// ```
#[derive(Debug)]
pub struct Linear {
    /// 权重参数 [in_dim, out_dim]
    weights: Var,
    /// 偏置参数 [1, out_dim]，广播到每个样本
    bias: Var,
    in_dim: usize,
    out_dim: usize,
    activation: Activation,
    name: String,
}

impl Linear {
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        in_dim: usize,
        out_dim: usize,
        activation: Activation,
        weight_type: WeightType,
        name: &str,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        let weights = init_weights(
            graph,
            &format!("{name}_W"),
            out_dim,
            Some(in_dim),
            weight_type,
            rng,
        )?;
        let bias = init_weights(graph, &format!("{name}_b"), out_dim, None, weight_type, rng)?;
        Ok(Self {
            weights,
            bias,
            in_dim,
            out_dim,
            activation,
            name: name.to_string(),
        })
    }

    pub const fn weights(&self) -> &Var {
        &self.weights
    }

    pub const fn bias(&self) -> &Var {
        &self.bias
    }

    /// `x @ W + b`，不含激活
    pub fn apply_lin(&self, x: &Var) -> Result<Var, GraphError> {
        x.matmul(&self.weights)?.try_add(&self.bias)
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<Var> {
        vec![self.weights.clone(), self.bias.clone()]
    }
}

impl Layer for Linear {
    fn apply(&self, x: &Var) -> Result<Var, GraphError> {
        Ok(self.activation.apply(&self.apply_lin(x)?))
    }

    fn in_dim(&self) -> Option<usize> {
        Some(self.in_dim)
    }

    fn out_dim(&self) -> Option<usize> {
        Some(self.out_dim)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
