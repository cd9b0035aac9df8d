/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 张量层面的错误。张量算子无法返回 Result，这些错误以 panic 信息的形式出现
 */

mod ops;

pub use self::ops::Operator;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// 二元运算的两个张量形状无法广播
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("数据长度{data_len}与形状{shape:?}不符")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },

    /// reshape、转置或归约目标形状不合法
    #[error("张量形状不兼容")]
    IncompatibleShape,

    #[error("概率{0}须在[0, 1]区间内")]
    InvalidProbability(f32),
}
