/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : dropout 掩码与输入加噪
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, apply_dropout, corrupt_input, dropout, multi_dropout};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_dropout_extreme_probabilities() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(42);
    let keep_all = dropout(&graph, &[3, 4], 0.0, &mut rng)?;
    let drop_all = dropout(&graph, &[3, 4], 1.0, &mut rng)?;
    assert_eq!(keep_all.eval()?, Tensor::ones(&[3, 4]));
    assert_eq!(drop_all.eval()?, Tensor::zeros(&[3, 4]));
    Ok(())
}

#[test]
fn test_dropout_invalid_probability() {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(42);
    assert_err!(dropout(&graph, &[2, 2], -0.1, &mut rng), GraphError::InvalidOperation(_));
    assert_err!(dropout(&graph, &[2, 2], 1.5, &mut rng), GraphError::InvalidOperation(_));
}

#[test]
fn test_dropout_resamples_each_pass() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(3);
    let mask = dropout(&graph, &[20, 20], 0.5, &mut rng)?;

    let first = mask.eval()?;
    let second = mask.eval()?;
    assert!(first.to_vec().iter().all(|&v| v == 0.0 || v == 1.0));
    assert_ne!(first, second);

    // 同一批次内多次引用看到的是同一张掩码
    let values = graph.evaluate(&[&mask, &mask])?;
    assert_eq!(values[0], values[1]);

    let kept = first.to_vec().iter().sum::<f32>() / 400.0;
    assert!((0.35..0.65).contains(&kept), "保留比例{kept}偏离0.5太多");
    Ok(())
}

#[test]
fn test_dropout_is_reproducible_with_same_seed() -> Result<(), GraphError> {
    let sample = |seed: u64| -> Result<Tensor, GraphError> {
        let graph = Graph::new();
        let mut rng = StdRng::seed_from_u64(seed);
        dropout(&graph, &[4, 4], 0.3, &mut rng)?.eval()
    };
    assert_eq!(sample(9)?, sample(9)?);
    Ok(())
}

#[test]
fn test_multi_dropout_uses_given_probability() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(1);
    let shapes: [&[usize]; 2] = [&[2, 3], &[4, 1]];
    let masks = multi_dropout(&graph, &shapes, 1.0, &mut rng)?;
    assert_eq!(masks.len(), 2);
    assert_eq!(masks[0].eval()?, Tensor::zeros(&[2, 3]));
    assert_eq!(masks[1].eval()?, Tensor::zeros(&[4, 1]));
    Ok(())
}

#[test]
fn test_apply_dropout_and_corrupt_input() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(5);
    let x = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]))?;

    let same = apply_dropout(&x, None)?;
    assert_eq!(same.node_id(), x.node_id());

    let zero_mask = dropout(&graph, &[2, 2], 1.0, &mut rng)?;
    assert_eq!(apply_dropout(&x, Some(&zero_mask))?.eval()?, Tensor::zeros(&[2, 2]));

    let untouched = corrupt_input(&x, 0.0, &mut rng)?;
    assert_eq!(untouched.eval()?, x.eval()?);
    let wiped = corrupt_input(&x, 1.0, &mut rng)?;
    assert_eq!(wiped.eval()?, Tensor::zeros(&[2, 2]));
    Ok(())
}
