/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 基础更新规则的数值行为
 */

use super::{quadratic, values};
use crate::nn::{
    Graph, GraphError, UpdateMap, Var, VarElementwiseOps, VarMatrixOps, VarReduceOps, adadelta,
    adagrad, sgd,
};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_sgd_step() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0, 2.0])?;
    let updates = sgd(&cost, &[w.clone()], None, 0.1)?;
    assert_eq!(updates.len(), 1);

    let outputs = updates.apply_with_outputs(&[&cost])?;
    assert_abs_diff_eq!(outputs[0].number().unwrap(), 5.0);
    let w_new = values(&w);
    assert_abs_diff_eq!(w_new[0], 0.8, epsilon = 1e-6);
    assert_abs_diff_eq!(w_new[1], 1.6, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_empty_params_keep_existing_map() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0])?;
    let mut existing = UpdateMap::new();
    existing.insert(&w, &w * 0.5)?;

    let updates = adagrad(&cost, &[], Some(existing), 0.1, 1e-6)?;
    assert_eq!(updates.len(), 1);
    assert!(graph.find("w_adagrad_accu").is_none());
    Ok(())
}

#[test]
fn test_adagrad_accumulator_grows() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0, 2.0])?;
    let updates = adagrad(&cost, &[w.clone()], None, 0.1, 1e-6)?;
    // 参数与累积量各一个条目
    assert_eq!(updates.len(), 2);
    let accu = graph.find("w_adagrad_accu").unwrap();

    updates.apply()?;
    // 首步步长约为 lr * sign(grad)
    let w_new = values(&w);
    assert_abs_diff_eq!(w_new[0], 0.9, epsilon = 1e-4);
    assert_abs_diff_eq!(w_new[1], 1.9, epsilon = 1e-4);
    assert_eq!(values(&accu), vec![4.0, 16.0]);

    let mut previous = values(&accu);
    for _ in 0..5 {
        updates.apply()?;
        let current = values(&accu);
        assert!(current.iter().zip(&previous).all(|(c, p)| c >= p));
        previous = current;
    }
    Ok(())
}

#[test]
fn test_adadelta_step_is_bounded() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[3.0, -3.0])?;
    let updates = adadelta(&cost, &[w.clone()], None, 1.0, 1e-6, 0.95)?;
    assert_eq!(updates.len(), 3);
    let delta_accu = graph.find("w_adadelta_delta_accu").unwrap();

    updates.apply()?;
    // update = g * sqrt(eps) / sqrt(0.05 * g² + eps) ≈ sqrt(eps / 0.05)
    let step = (1e-6f32 / 0.05).sqrt();
    let w_new = values(&w);
    assert_abs_diff_eq!(w_new[0], 3.0 - step, epsilon = 1e-5);
    assert_abs_diff_eq!(w_new[1], -3.0 + step, epsilon = 1e-5);
    assert!(values(&delta_accu).iter().all(|v| *v > 0.0));

    let mut previous_cost = cost.item()?;
    for _ in 0..20 {
        updates.apply()?;
        let current = cost.item()?;
        assert!(current < previous_cost);
        previous_cost = current;
    }
    Ok(())
}

/// 两个参数的线性回归代价
fn linear_cost(graph: &Graph) -> Result<(Vec<Var>, Var), GraphError> {
    let x = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]))?;
    let y = graph.input(&Tensor::new(&[1.0, 3.0, 5.0], &[3, 1]))?;
    let w = graph.parameter(&Tensor::new(&[0.1, 0.1], &[2, 1]), "w")?;
    let b = graph.parameter(&Tensor::zeros(&[1, 1]), "b")?;
    let cost = (&x.matmul(&w)? + &b - &y).square().mean();
    Ok((vec![w, b], cost))
}

#[test]
fn test_rules_differ_on_same_cost() -> Result<(), GraphError> {
    let graph_sgd = Graph::new();
    let (params_sgd, cost_sgd) = linear_cost(&graph_sgd)?;
    let initial = cost_sgd.item()?;
    assert_abs_diff_eq!(initial, 20.99 / 3.0, epsilon = 1e-4);
    sgd(&cost_sgd, &params_sgd, None, 0.01)?.apply()?;

    let graph_adagrad = Graph::new();
    let (params_adagrad, cost_adagrad) = linear_cost(&graph_adagrad)?;
    adagrad(&cost_adagrad, &params_adagrad, None, 0.01, 1e-6)?.apply()?;

    let w_sgd = values(&params_sgd[0]);
    let w_adagrad = values(&params_adagrad[0]);
    assert!((w_sgd[0] - w_adagrad[0]).abs() > 1e-3);
    // 两者都让代价下降
    assert!(cost_sgd.item()? < initial);
    assert!(cost_adagrad.item()? < initial);
    Ok(())
}

#[test]
fn test_adagrad_step_smaller_than_sgd_at_same_learning_rate() -> Result<(), GraphError> {
    let graph_sgd = Graph::new();
    let (params_sgd, cost_sgd) = linear_cost(&graph_sgd)?;
    let before = params_sgd.iter().map(values).collect::<Vec<_>>();
    sgd(&cost_sgd, &params_sgd, None, 0.1)?.apply()?;

    let graph_adagrad = Graph::new();
    let (params_adagrad, cost_adagrad) = linear_cost(&graph_adagrad)?;
    adagrad(&cost_adagrad, &params_adagrad, None, 0.1, 1e-6)?.apply()?;

    // 首步 adagrad 每个元素的步长约为 lr，sgd 为 lr * |grad|，而这里 |grad| > 1
    for ((old, p_sgd), p_adagrad) in before.iter().zip(&params_sgd).zip(&params_adagrad) {
        for ((o, s), a) in old.iter().zip(values(p_sgd)).zip(values(p_adagrad)) {
            let (step_sgd, step_adagrad) = ((s - o).abs(), (a - o).abs());
            assert_abs_diff_eq!(step_adagrad, 0.1, epsilon = 1e-4);
            assert!(step_adagrad < step_sgd);
        }
    }
    Ok(())
}

#[test]
fn test_adagrad_and_adadelta_keep_separate_state() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0])?;
    let by_adagrad = adagrad(&cost, &[w.clone()], None, 0.1, 1e-6)?;
    let by_adadelta = adadelta(&cost, &[w.clone()], None, 1.0, 1e-6, 0.95)?;

    by_adagrad.apply()?;
    let adagrad_accu = graph.find("w_adagrad_accu").unwrap();
    assert_abs_diff_eq!(values(&adagrad_accu)[0], 4.0);

    // w ≈ 0.9，grad ≈ 1.8；adadelta 的累积量从0开始：0.05 * 1.8²
    by_adadelta.apply()?;
    let adadelta_accu = graph.find("w_adadelta_accu").unwrap();
    assert_abs_diff_eq!(values(&adadelta_accu)[0], 0.162, epsilon = 1e-4);
    assert_abs_diff_eq!(values(&adagrad_accu)[0], 4.0);
    Ok(())
}
