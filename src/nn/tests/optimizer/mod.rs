mod config;
mod momentum;
mod rules;
mod update_map;

use crate::nn::{Graph, GraphError, Var, VarElementwiseOps, VarReduceOps};
use crate::tensor::Tensor;

/// 一维二次代价`sum(w²)`，梯度为`2w`
fn quadratic(graph: &Graph, init: &[f32]) -> Result<(Var, Var), GraphError> {
    let w = graph.parameter(&Tensor::new(init, &[1, init.len()]), "w")?;
    let cost = w.square().sum();
    Ok((w, cost))
}

fn values(var: &Var) -> Vec<f32> {
    var.value().unwrap().unwrap().to_vec()
}
