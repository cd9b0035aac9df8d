/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 经典动量与 Nesterov 动量
 */

use super::{quadratic, values};
use crate::assert_err;
use crate::nn::{Graph, GraphError, UpdateMap, apply_momentum, apply_nesterov_momentum, sgd};
use approx::assert_abs_diff_eq;

#[test]
fn test_momentum_trajectory() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0])?;
    let updates = apply_momentum(sgd(&cost, &[w.clone()], None, 0.1)?, &[w.clone()], 0.9)?;
    let velocity = graph.find("w_velocity").unwrap();
    assert_eq!(updates.len(), 2);

    updates.apply()?;
    assert_abs_diff_eq!(values(&w)[0], 0.8, epsilon = 1e-6);
    assert_abs_diff_eq!(values(&velocity)[0], -0.2, epsilon = 1e-6);

    updates.apply()?;
    assert_abs_diff_eq!(values(&w)[0], 0.46, epsilon = 1e-6);
    assert_abs_diff_eq!(values(&velocity)[0], -0.34, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_nesterov_trajectory() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0])?;
    let updates =
        apply_nesterov_momentum(sgd(&cost, &[w.clone()], None, 0.1)?, &[w.clone()], 0.9)?;
    let velocity = graph.find("w_velocity").unwrap();

    updates.apply()?;
    assert_abs_diff_eq!(values(&velocity)[0], -0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(values(&w)[0], 0.62, epsilon = 1e-6);

    updates.apply()?;
    assert_abs_diff_eq!(values(&velocity)[0], -0.304, epsilon = 1e-6);
    assert_abs_diff_eq!(values(&w)[0], 0.2224, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_zero_momentum_matches_sgd() -> Result<(), GraphError> {
    let graph_plain = Graph::new();
    let (w_plain, cost_plain) = quadratic(&graph_plain, &[1.0, -0.5])?;
    let plain = sgd(&cost_plain, &[w_plain.clone()], None, 0.1)?;

    let graph_momentum = Graph::new();
    let (w_momentum, cost_momentum) = quadratic(&graph_momentum, &[1.0, -0.5])?;
    let with_momentum = apply_momentum(
        sgd(&cost_momentum, &[w_momentum.clone()], None, 0.1)?,
        &[w_momentum.clone()],
        0.0,
    )?;

    for _ in 0..3 {
        plain.apply()?;
        with_momentum.apply()?;
        for (a, b) in values(&w_plain).iter().zip(values(&w_momentum)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }
    Ok(())
}

#[test]
fn test_momentum_requires_pending_update() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, _) = quadratic(&graph, &[1.0])?;
    assert_err!(
        apply_momentum(UpdateMap::new(), &[w.clone()], 0.9),
        GraphError::ParameterNotInUpdateMap("w")
    );
    assert_err!(
        apply_nesterov_momentum(UpdateMap::new(), &[w], 0.9),
        GraphError::ParameterNotInUpdateMap("w")
    );
    // 校验失败时不创建速度状态
    assert!(graph.find("w_velocity").is_none());
    Ok(())
}

#[test]
fn test_momentum_rejects_param_of_other_graph() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[1.0])?;
    let updates = sgd(&cost, &[w.clone()], None, 0.1)?;

    let other = Graph::new();
    let (foreign, _) = quadratic(&other, &[1.0])?;
    assert_eq!(w.node_id(), foreign.node_id());
    assert_err!(
        apply_momentum(updates.clone(), &[foreign.clone()], 0.9),
        GraphError::ParameterNotInUpdateMap("w")
    );
    assert_err!(
        apply_nesterov_momentum(updates, &[foreign], 0.9),
        GraphError::ParameterNotInUpdateMap("w")
    );
    assert!(other.find("w_velocity").is_none());
    Ok(())
}
