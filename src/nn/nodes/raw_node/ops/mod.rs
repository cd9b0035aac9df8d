/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 算子节点。所有节点都以 VJP 方式实现反向传播：
 *                 给定结果对本节点的梯度，直接算出结果对某个父节点的梯度（与该父节点同形状）
 */

mod add;
mod bernoulli;
mod channel_arg_max;
mod conv2d;
mod divide;
mod mat_mul;
mod multiply;
mod reduce;
mod relu;
mod scalar_op;
mod sigmoid;
mod sqrt;
mod square;
mod subtract;
mod tanh;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use bernoulli::Bernoulli;
pub(in crate::nn) use channel_arg_max::ChannelArgMax;
pub use conv2d::BorderMode;
pub(in crate::nn) use conv2d::Conv2d;
pub(in crate::nn) use divide::Divide;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use multiply::Multiply;
pub(in crate::nn) use reduce::{Mean, Sum};
pub(in crate::nn) use relu::ReLU;
pub use scalar_op::ScalarOpKind;
pub(in crate::nn) use scalar_op::ScalarOp;
pub(in crate::nn) use sigmoid::Sigmoid;
pub(in crate::nn) use sqrt::Sqrt;
pub(in crate::nn) use square::Square;
pub(in crate::nn) use subtract::Subtract;
pub(in crate::nn) use tanh::Tanh;

use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::tensor::Tensor;

/// 校验二元逐元素算子的父节点，并返回广播后的输出形状
fn broadcast_parents_shape(parents: &[&NodeHandle], op: &str) -> Result<Vec<usize>, GraphError> {
    if parents.len() != 2 {
        return Err(GraphError::InvalidOperation(format!(
            "{op}节点需要2个父节点"
        )));
    }
    let lhs = parents[0].value_expected_shape();
    let rhs = parents[1].value_expected_shape();
    Tensor::broadcast_shape(lhs, rhs).ok_or_else(|| GraphError::ShapeMismatch {
        expected: lhs.to_vec(),
        got: rhs.to_vec(),
        message: format!(
            "{op}节点的两个父节点{}与{}形状无法广播",
            parents[0], parents[1]
        ),
    })
}

/// 校验一元算子的父节点，并返回父节点形状
fn single_parent_shape(parents: &[&NodeHandle], op: &str) -> Result<Vec<usize>, GraphError> {
    if parents.len() != 1 {
        return Err(GraphError::InvalidOperation(format!(
            "{op}节点只需要1个父节点"
        )));
    }
    Ok(parents[0].value_expected_shape().to_vec())
}

fn parent_index_error(op: &str, parent_index: usize) -> GraphError {
    GraphError::ComputationError(format!(
        "{op}节点没有第{parent_index}个父节点。不该触及本错误，否则说明crate代码有问题"
    ))
}
