/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : UpdateMap：目标校验、覆盖语义、同时更新
 */

use super::values;
use crate::assert_err;
use crate::nn::{Graph, GraphError, UpdateMap};
use crate::tensor::Tensor;

#[test]
fn test_insert_overwrites_in_place() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.parameter(&Tensor::ones(&[1, 1]), "a")?;
    let b = graph.parameter(&Tensor::ones(&[1, 1]), "b")?;

    let mut updates = UpdateMap::new();
    updates.insert(&a, &a + 1.0)?;
    updates.insert(&b, &b + 2.0)?;
    updates.insert(&a, &a * 5.0)?;

    assert_eq!(updates.len(), 2);
    let order = updates.targets().iter().map(|t| t.name()).collect::<Vec<_>>();
    assert_eq!(order, vec!["a", "b"]);
    assert!(updates.contains(&a));

    updates.apply()?;
    assert_eq!(values(&a), vec![5.0]);
    assert_eq!(values(&b), vec![3.0]);
    Ok(())
}

#[test]
fn test_insert_rejects_bad_targets() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[1, 2]))?;
    let w = graph.parameter(&Tensor::ones(&[1, 2]), "w")?;
    let mut updates = UpdateMap::new();

    // 输入节点不可作为目标
    assert_err!(updates.insert(&x, &x + 1.0), GraphError::InvalidOperation(_));
    // 形状不一致
    let wide = graph.parameter(&Tensor::ones(&[2, 2]), "wide")?;
    assert_err!(
        updates.insert(&w, wide.clone()),
        GraphError::ShapeMismatch { expected, .. } if expected == &[1, 2]
    );
    // 不同的图
    let other = Graph::new();
    let v = other.parameter(&Tensor::ones(&[1, 2]), "v")?;
    assert_err!(updates.insert(&w, v), GraphError::InvalidOperation(_));
    assert!(updates.is_empty());
    Ok(())
}

#[test]
fn test_lookup_ignores_nodes_of_other_graphs() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.parameter(&Tensor::ones(&[1, 1]), "a")?;
    let mut updates = UpdateMap::new();
    updates.insert(&a, &a + 1.0)?;

    // 另一个图的首个节点与 a 的 id 相同
    let other = Graph::new();
    let b = other.parameter(&Tensor::ones(&[1, 1]), "b")?;
    assert_eq!(a.node_id(), b.node_id());
    assert!(!updates.contains(&b));
    assert!(updates.get(&b).is_none());
    assert!(updates.contains(&a));
    Ok(())
}

#[test]
fn test_updates_are_simultaneous() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.parameter(&Tensor::new(&[1.0], &[1, 1]), "a")?;
    let b = graph.parameter(&Tensor::new(&[2.0], &[1, 1]), "b")?;

    // 交换：两个表达式都读取旧值
    let mut updates = UpdateMap::new();
    updates.insert(&a, b.clone())?;
    updates.insert(&b, a.clone())?;
    let outputs = updates.apply_with_outputs(&[&(&a + &b)])?;

    assert_eq!(outputs, vec![Tensor::new(&[3.0], &[1, 1])]);
    assert_eq!(values(&a), vec![2.0]);
    assert_eq!(values(&b), vec![1.0]);
    Ok(())
}

#[test]
fn test_failed_apply_leaves_values_untouched() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.parameter(&Tensor::new(&[1.0], &[1, 1]), "a")?;
    let x = graph.input_shape(&[1, 1], Some("x"))?;

    let mut updates = UpdateMap::new();
    updates.insert(&a, &a + 1.0)?;
    updates.insert(&graph.state("s", &[1, 1])?, &x * 2.0)?;

    assert_err!(updates.apply(), GraphError::InvalidOperation(msg) if msg.contains("还没有值"));
    assert_eq!(values(&a), vec![1.0]);
    Ok(())
}
