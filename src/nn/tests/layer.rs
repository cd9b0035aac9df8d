/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 层测试：卷积层配置与前向、全连接层、arg-max 池化、初始化
 */

use crate::assert_err;
use crate::nn::{
    Activation, ArgMaxPool, BorderMode, ConvConfig, ConvLayer, Graph, GraphError, Layer, Linear,
    Module, WeightType, init_filters, init_weights,
};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::str::FromStr;

fn conv_config() -> ConvConfig {
    ConvConfig {
        filter_size: (3, 3),
        num_filters: 4,
        num_channels: 2,
        fm_size: Some((6, 6)),
        batch_size: Some(2),
        ..Default::default()
    }
}

#[test]
fn test_conv_config_validation() {
    let cases = [
        ConvConfig { step: (0, 1), ..conv_config() },
        ConvConfig { filter_size: (0, 3), ..conv_config() },
        ConvConfig { num_filters: 0, ..conv_config() },
        ConvConfig { num_channels: 0, ..conv_config() },
        ConvConfig { batch_size: Some(0), ..conv_config() },
        ConvConfig { fm_size: Some((2, 6)), ..conv_config() },
    ];
    for config in cases {
        assert_err!(config.validate(), GraphError::InvalidConfig(_));
    }
    // full 模式允许特征图小于卷积核
    let full = ConvConfig {
        fm_size: Some((2, 2)),
        border_mode: BorderMode::Full,
        ..conv_config()
    };
    assert!(full.validate().is_ok());
    assert_eq!(full.output_size(), Some((4, 4)));
    assert_eq!(conv_config().output_size(), Some((4, 4)));
}

#[test]
fn test_output_size_of_invalid_config_is_none() {
    let zero_step = ConvConfig { step: (0, 1), ..conv_config() };
    assert_eq!(zero_step.output_size(), None);
    // valid 模式下特征图小于卷积核
    let too_small = ConvConfig { fm_size: Some((2, 2)), ..conv_config() };
    assert_eq!(too_small.output_size(), None);
    let unknown_fm = ConvConfig { fm_size: None, ..conv_config() };
    assert_eq!(unknown_fm.output_size(), None);
}

#[test]
fn test_conv_layer_construction_rejects_bad_config() {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let config = ConvConfig { step: (1, 0), ..conv_config() };
    assert_err!(
        ConvLayer::new(&graph, config, "conv", &mut rng),
        GraphError::InvalidConfig(_)
    );
}

#[test]
fn test_conv_layer_apply() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let config = ConvConfig {
        activation: Activation::ReLU,
        weight_type: WeightType::Tanh,
        ..conv_config()
    };
    let layer = ConvLayer::new(&graph, config, "conv", &mut rng)?;
    assert_eq!(layer.num_params(), 2);
    assert_eq!(layer.filters().shape(), vec![4, 2, 3, 3]);
    assert_eq!(layer.bias().map(|b| b.shape()), Some(vec![1, 4, 1, 1]));

    let x = graph.input(&Tensor::normal_with_rng(0.0, 1.0, &[2, 2, 6, 6], &mut rng))?;
    let y = layer.apply(&x)?;
    assert_eq!(y.shape(), vec![2, 4, 4, 4]);
    assert!(y.eval()?.to_vec().iter().all(|&v| v >= 0.0));

    let wrong = graph.input(&Tensor::ones(&[2, 2, 5, 5]))?;
    assert_err!(layer.apply(&wrong), GraphError::ShapeMismatch { .. });
    Ok(())
}

#[test]
fn test_conv_layer_apply_lin_adds_bias() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let config = ConvConfig {
        filter_size: (1, 1),
        num_filters: 2,
        num_channels: 1,
        fm_size: None,
        batch_size: None,
        activation: Activation::Sigmoid,
        ..Default::default()
    };
    let layer = ConvLayer::new(&graph, config, "conv", &mut rng)?;
    layer.filters().set_value(&Tensor::new(&[1.0, -1.0], &[2, 1, 1, 1]))?;
    layer
        .bias()
        .map(|b| b.set_value(&Tensor::new(&[0.5, 1.0], &[1, 2, 1, 1])))
        .transpose()?;

    let x = graph.input(&Tensor::new(&[1.0, 2.0], &[1, 1, 1, 2]))?;
    let y = layer.apply_lin(&x)?.eval()?;
    assert_eq!(y, Tensor::new(&[1.5, 2.5, 0.0, -1.0], &[1, 2, 1, 2]));
    Ok(())
}

#[test]
fn test_conv_layer_set_params() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let source = ConvLayer::new(&graph, conv_config(), "source", &mut rng)?;
    let target = ConvLayer::new(&graph, conv_config(), "target", &mut rng)?;
    assert_ne!(source.filters().value()?, target.filters().value()?);

    target.set_params(&source.parameters())?;
    assert_eq!(source.filters().value()?, target.filters().value()?);
    assert_eq!(source.bias().map(|b| b.value()), target.bias().map(|b| b.value()));

    assert_err!(target.set_params(&source.parameters()[..1]), GraphError::InvalidOperation(_));
    Ok(())
}

#[test]
fn test_linear_layer() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(0);
    let fc = Linear::new(&graph, 3, 2, Activation::Identity, WeightType::None, "fc", &mut rng)?;
    assert_eq!((fc.in_dim(), fc.out_dim()), (Some(3), Some(2)));
    fc.weights().set_value(&Tensor::new(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], &[3, 2]))?;
    fc.bias().set_value(&Tensor::new(&[0.5, -0.5], &[1, 2]))?;

    let x = graph.input(&Tensor::new(&[1.0, 2.0, 3.0, 0.0, 0.0, 1.0], &[2, 3]))?;
    let y = fc.apply(&x)?.eval()?;
    assert_eq!(y, Tensor::new(&[4.5, 4.5, 1.5, 0.5], &[2, 2]));
    assert_eq!(fc.parameters()[0].name(), "fc_W");
    assert_eq!(fc.parameters()[1].name(), "fc_b");
    Ok(())
}

#[test]
fn test_arg_max_pool_keeps_winner_only() -> Result<(), GraphError> {
    let graph = Graph::new();
    let pool = ArgMaxPool::new("pool");
    assert!(pool.parameters().is_empty());
    assert_eq!(pool.in_dim(), None);

    let x = graph.input(&Tensor::new(&[1.0, -2.0, 3.0, -4.0], &[1, 2, 1, 2]))?;
    let y = pool.apply(&x)?.eval()?;
    assert_eq!(y, Tensor::new(&[0.0, -2.0, 3.0, 0.0], &[1, 2, 1, 2]));
    Ok(())
}

#[test]
fn test_init_weights_ranges() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(11);

    let bias = init_weights(&graph, "b", 4, None, WeightType::Tanh, &mut rng)?;
    assert_eq!(bias.shape(), vec![1, 4]);
    assert!(bias.eval()?.to_vec().iter().all(|&v| (0.0..0.25).contains(&v)));

    let bound = (6.0f32 / 30.0).sqrt();
    let tanh = init_weights(&graph, "w_tanh", 10, Some(20), WeightType::Tanh, &mut rng)?;
    assert_eq!(tanh.shape(), vec![20, 10]);
    assert!(tanh.eval()?.to_vec().iter().all(|&v| v.abs() <= bound));

    let sigmoid = init_weights(&graph, "w_sigmoid", 10, Some(20), WeightType::Sigmoid, &mut rng)?;
    let values = sigmoid.eval()?.to_vec();
    assert!(values.iter().all(|&v| v.abs() <= 4.0 * bound));
    assert!(values.iter().any(|&v| v.abs() > bound));

    let none = init_weights(&graph, "w_none", 10, Some(20), WeightType::None, &mut rng)?;
    assert!(none.eval()?.to_vec().iter().all(|&v| (0.0..1.0 / 30.0).contains(&v)));

    assert_err!(
        init_weights(&graph, "w_zero", 0, Some(2), WeightType::None, &mut rng),
        GraphError::InvalidConfig(_)
    );
    Ok(())
}

#[test]
fn test_init_filters_uses_receptive_field_fans() -> Result<(), GraphError> {
    let graph = Graph::new();
    let mut rng = StdRng::seed_from_u64(2);
    let filters = init_filters(&graph, "f", [8, 3, 5, 5], WeightType::Tanh, &mut rng)?;
    let bound = (6.0f32 / (3.0 * 25.0 + 8.0 * 25.0)).sqrt();
    assert_eq!(filters.shape(), vec![8, 3, 5, 5]);
    assert!(filters.eval()?.to_vec().iter().all(|&v| v.abs() <= bound));
    Ok(())
}

#[test]
fn test_enums_parse_from_str() {
    assert_eq!(WeightType::from_str("sigmoid"), Ok(WeightType::Sigmoid));
    assert_eq!(Activation::from_str("relu"), Ok(Activation::ReLU));
    assert_eq!(BorderMode::from_str("full"), Ok(BorderMode::Full));
    assert_err!(WeightType::from_str("xavier"), GraphError::InvalidConfig(_));
    assert_err!(Activation::from_str("softmax"), GraphError::InvalidConfig(_));
    assert_err!(BorderMode::from_str("same"), GraphError::InvalidConfig(_));
}
