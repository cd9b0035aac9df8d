/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 算子重载与扩展 trait 测试
 */

use crate::nn::{
    Graph, GraphError, ScalarOpKind, VarActivationOps, VarElementwiseOps, VarMatrixOps,
    VarReduceOps,
};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_var_binary_ops() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.input(&Tensor::new(&[6.0, 8.0], &[1, 2]))?;
    let b = graph.input(&Tensor::new(&[2.0, 4.0], &[1, 2]))?;

    assert_eq!((&a + &b).eval()?, Tensor::new(&[8.0, 12.0], &[1, 2]));
    assert_eq!((&a - &b).eval()?, Tensor::new(&[4.0, 4.0], &[1, 2]));
    assert_eq!((&a * &b).eval()?, Tensor::new(&[12.0, 32.0], &[1, 2]));
    assert_eq!((&a / &b).eval()?, Tensor::new(&[3.0, 2.0], &[1, 2]));
    // 所有权版本
    assert_eq!((a.clone() + b.clone()).eval()?, Tensor::new(&[8.0, 12.0], &[1, 2]));
    Ok(())
}

#[test]
fn test_var_scalar_ops_on_both_sides() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::new(&[1.0, 4.0], &[1, 2]))?;

    assert_eq!((&x + 1.0).eval()?, Tensor::new(&[2.0, 5.0], &[1, 2]));
    assert_eq!((&x - 1.0).eval()?, Tensor::new(&[0.0, 3.0], &[1, 2]));
    assert_eq!((&x * 3.0).eval()?, Tensor::new(&[3.0, 12.0], &[1, 2]));
    assert_eq!((&x / 2.0).eval()?, Tensor::new(&[0.5, 2.0], &[1, 2]));
    assert_eq!((1.0 + &x).eval()?, Tensor::new(&[2.0, 5.0], &[1, 2]));
    assert_eq!((10.0 - &x).eval()?, Tensor::new(&[9.0, 6.0], &[1, 2]));
    assert_eq!((3.0 * &x).eval()?, Tensor::new(&[3.0, 12.0], &[1, 2]));
    assert_eq!((8.0 / &x).eval()?, Tensor::new(&[8.0, 2.0], &[1, 2]));
    assert_eq!((-&x).eval()?, Tensor::new(&[-1.0, -4.0], &[1, 2]));

    let y = x.try_scalar_op(ScalarOpKind::RSub, 0.0)?;
    assert_eq!(y.eval()?, Tensor::new(&[-1.0, -4.0], &[1, 2]));
    Ok(())
}

#[test]
fn test_elementwise_and_activation_ops() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::new(&[-1.0, 0.0, 4.0], &[1, 3]))?;

    assert_eq!(x.square().eval()?, Tensor::new(&[1.0, 0.0, 16.0], &[1, 3]));
    assert_eq!(x.relu().eval()?, Tensor::new(&[0.0, 0.0, 4.0], &[1, 3]));
    let sqrt = x.sqrt().eval()?;
    assert!(sqrt[[0, 0]].is_nan());
    assert_eq!(sqrt[[0, 2]], 2.0);

    let sigmoid = x.sigmoid().eval()?;
    assert_abs_diff_eq!(sigmoid[[0, 1]], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(sigmoid[[0, 0]], 0.268_941_4, epsilon = 1e-6);
    let tanh = x.tanh().eval()?;
    assert_abs_diff_eq!(tanh[[0, 0]], -0.761_594_2, epsilon = 1e-6);
    Ok(())
}

#[test]
fn test_reduce_ops() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 6.0], &[2, 2]))?;
    assert_eq!(x.sum().shape(), vec![1, 1]);
    assert_eq!(x.sum().item()?, 12.0);
    assert_eq!(x.mean().item()?, 3.0);
    Ok(())
}

#[test]
fn test_matmul_shape_mismatch() -> Result<(), GraphError> {
    let graph = Graph::new();
    let a = graph.input(&Tensor::ones(&[2, 3]))?;
    let b = graph.input(&Tensor::ones(&[2, 3]))?;
    assert!(a.matmul(&b).is_err());
    let c = graph.input(&Tensor::ones(&[3, 2]))?;
    assert_eq!(a.matmul(&c)?.shape(), vec![2, 2]);
    assert_eq!(a.matmul(&c)?.eval()?, Tensor::full(3.0, &[2, 2]));
    Ok(())
}

#[test]
#[should_panic]
fn test_operator_panics_on_incompatible_shapes() {
    let graph = Graph::new();
    let a = graph.input(&Tensor::ones(&[2, 3])).unwrap();
    let b = graph.input(&Tensor::ones(&[3, 2])).unwrap();
    let _ = &a + &b;
}

#[test]
fn test_item_rejects_non_scalar() -> Result<(), GraphError> {
    let graph = Graph::new();
    let x = graph.input(&Tensor::ones(&[2, 2]))?;
    assert!(x.item().is_err());
    Ok(())
}
