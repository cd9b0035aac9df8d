//! # Only NN
//!
//! `only_nn`是一个建立在轻量符号计算图之上的小型神经网络工具箱：
//! 提供卷积层、前馈/自编码器/卷积K均值等模型组合，
//! 以及一组可组合的梯度下降更新规则（SGD、动量、Nesterov动量、Adagrad、Adadelta）
//! 和dropout/输入腐蚀工具。
//!
//! 更新规则不直接修改参数，而是生成一张“更新表”（[`nn::optimizer::UpdateMap`]）：
//! 参数/状态节点 → 计算其下一步取值的符号表达式。整张表在同一次前向传播中求值后统一写回。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
mod utils;
