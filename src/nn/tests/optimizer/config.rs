/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : GdConfig 校验与 gd_updates 分派
 */

use super::{quadratic, values};
use crate::assert_err;
use crate::nn::{GdConfig, GdMethod, Graph, GraphError, gd_updates};
use approx::assert_abs_diff_eq;

#[test]
fn test_method_from_str() {
    assert_eq!("adadelta".parse::<GdMethod>(), Ok(GdMethod::Adadelta));
    assert_err!("rmsprop".parse::<GdMethod>(), GraphError::InvalidConfig(msg) if msg.contains("rmsprop"));
    assert_eq!(GdMethod::Adagrad.to_string(), "adagrad");
}

#[test]
fn test_config_from_json() -> Result<(), GraphError> {
    let config = GdConfig::from_json(r#"{ "learning_rate": 0.05, "momentum": 0.9, "nesterov": true }"#)?;
    assert_eq!(config.method, GdMethod::Sgd);
    assert_eq!(config.momentum, Some(0.9));
    assert!(config.nesterov);
    assert_eq!(config.rho, 0.95);

    let json = config.to_json()?;
    assert_eq!(GdConfig::from_json(&json)?, config);

    assert_err!(GdConfig::from_json(r#"{ "method": "rmsprop" }"#), GraphError::InvalidConfig(_));
    assert_err!(GdConfig::from_json(r#"{ "lr": 0.1 }"#), GraphError::InvalidConfig(_));
    Ok(())
}

#[test]
fn test_config_validation() {
    let momentum_with_adagrad = GdConfig {
        method: GdMethod::Adagrad,
        momentum: Some(0.9),
        ..Default::default()
    };
    assert_err!(momentum_with_adagrad.validate(), GraphError::InvalidConfig(msg) if msg.contains("sgd"));

    let nesterov_alone = GdConfig {
        nesterov: true,
        ..Default::default()
    };
    assert_err!(nesterov_alone.validate(), GraphError::InvalidConfig(_));

    let bad_rho = GdConfig {
        rho: 1.5,
        ..Default::default()
    };
    assert_err!(bad_rho.validate(), GraphError::InvalidConfig(_));

    let nan_lr = GdConfig {
        learning_rate: f32::NAN,
        ..Default::default()
    };
    assert_err!(nan_lr.validate(), GraphError::InvalidConfig(_));
    assert!(GdConfig::default().validate().is_ok());
}

#[test]
fn test_gd_updates_dispatch() -> Result<(), GraphError> {
    let cases = [
        (GdConfig::default(), 1, None),
        (
            GdConfig {
                momentum: Some(0.5),
                ..Default::default()
            },
            2,
            Some("w_velocity"),
        ),
        (
            GdConfig {
                method: GdMethod::Adagrad,
                ..Default::default()
            },
            2,
            Some("w_adagrad_accu"),
        ),
        (
            GdConfig {
                method: GdMethod::Adadelta,
                ..Default::default()
            },
            3,
            Some("w_adadelta_delta_accu"),
        ),
    ];
    for (config, expected_len, state_name) in cases {
        let graph = Graph::new();
        let (w, cost) = quadratic(&graph, &[1.0, 2.0])?;
        let updates = gd_updates(&cost, &[w.clone()], None, &config)?;
        assert_eq!(updates.len(), expected_len, "{config:?}");
        if let Some(name) = state_name {
            assert!(graph.find(name).is_some());
        }
        let before = cost.item()?;
        updates.apply()?;
        assert!(cost.item()? < before, "{config:?}");
    }
    Ok(())
}

#[test]
fn test_gd_updates_sgd_matches_formula() -> Result<(), GraphError> {
    let graph = Graph::new();
    let (w, cost) = quadratic(&graph, &[2.0])?;
    let config = GdConfig {
        learning_rate: 0.25,
        ..Default::default()
    };
    gd_updates(&cost, &[w.clone()], None, &config)?.apply()?;
    // 2 - 0.25 * 4
    assert_abs_diff_eq!(values(&w)[0], 1.0);
    Ok(())
}
