/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-03
 * @Description  : 负责神经网络（neural network）的构建：计算图、层、模型、优化器
 */

mod autograd;
pub mod dropout;
mod graph;
pub mod init;
pub mod layer;
pub mod model;
mod model_state;
mod module;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use autograd::grad;
pub use dropout::{apply_dropout, corrupt_input, dropout, multi_dropout};
pub use graph::{Graph, GraphError, GraphInner};
pub use init::{WeightType, init_filters, init_weights};
pub use layer::{Activation, ArgMaxPool, ConvConfig, ConvLayer, Linear};
pub use model::{AutoEncoder, ConvKMeans, CorruptionConfig, FeedForward};
pub use model_state::{load_params, save_params};
pub use module::{Layer, Module};
pub use nodes::{BorderMode, NodeId, ScalarOpKind};
pub use optimizer::{
    GdConfig, GdMethod, UpdateMap, adadelta, adagrad, apply_momentum, apply_nesterov_momentum,
    gd_updates, sgd,
};
pub use var::Var;
pub use var_ops::{VarActivationOps, VarElementwiseOps, VarMatrixOps, VarReduceOps};

#[cfg(test)]
mod tests;
