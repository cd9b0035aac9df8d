mod gradient;
mod input;
mod ops;
mod parameter;
mod state;

pub(in crate::nn) use gradient::Gradient;
pub(in crate::nn) use input::Input;
pub(in crate::nn) use ops::*;
pub use ops::{BorderMode, ScalarOpKind};
pub(in crate::nn) use parameter::Parameter;
pub(in crate::nn) use state::State;

use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓叶子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Input(Input),
    Parameter(Parameter),
    State(State),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑叶子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    Gradient(Gradient),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    Divide(Divide),
    ScalarOp(ScalarOp),
    Sqrt(Sqrt),
    Square(Square),
    Tanh(Tanh),
    Sigmoid(Sigmoid),
    ReLU(ReLU),
    MatMul(MatMul),
    Conv2d(Conv2d),
    Sum(Sum),
    Mean(Mean),
    Bernoulli(Bernoulli),
    ChannelArgMax(ChannelArgMax),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

impl NodeType {
    /// 叶子节点的值由外部设置，不经前向传播计算
    pub(in crate::nn) const fn is_leaf(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Parameter(_) | Self::State(_))
    }

    /// 可以作为更新目标、也可以被求梯度的节点
    pub(in crate::nn) const fn is_updatable(&self) -> bool {
        matches!(self, Self::Parameter(_) | Self::State(_))
    }

    pub(in crate::nn) const fn type_name(&self) -> &'static str {
        match self {
            Self::Input(_) => "Input",
            Self::Parameter(_) => "Parameter",
            Self::State(_) => "State",
            Self::Gradient(_) => "Gradient",
            Self::Add(_) => "Add",
            Self::Subtract(_) => "Subtract",
            Self::Multiply(_) => "Multiply",
            Self::Divide(_) => "Divide",
            Self::ScalarOp(_) => "ScalarOp",
            Self::Sqrt(_) => "Sqrt",
            Self::Square(_) => "Square",
            Self::Tanh(_) => "Tanh",
            Self::Sigmoid(_) => "Sigmoid",
            Self::ReLU(_) => "ReLU",
            Self::MatMul(_) => "MatMul",
            Self::Conv2d(_) => "Conv2d",
            Self::Sum(_) => "Sum",
            Self::Mean(_) => "Mean",
            Self::Bernoulli(_) => "Bernoulli",
            Self::ChannelArgMax(_) => "ChannelArgMax",
        }
    }
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点值的形状，在节点创建时即已确定
    fn value_expected_shape(&self) -> &[usize];

    /// 根据父节点的值计算本节点的值（调用前所有父节点已在本次前向传播中算好）
    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// 给定结果对本节点的梯度`upstream_grad`，计算结果对第`parent_index`个父节点的梯度（VJP）
    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;
}

/// 叶子节点支持 2-4 维张量：
/// - 2D: 全连接权重/偏置 [in, out]、[1, out]，或批量数据 [batch, features]
/// - 4D: 卷积核 [F, C, kH, kW]、通道偏置 [1, F, 1, 1]，或批量图像 [batch, C, H, W]
fn validate_leaf_shape(shape: &[usize], kind: &str) -> Result<(), GraphError> {
    if shape.len() < 2 || shape.len() > 4 {
        return Err(GraphError::ShapeMismatch {
            expected: vec![],
            got: shape.to_vec(),
            message: format!("{kind}节点张量必须是 2-4 维，但收到的维度是 {} 维", shape.len()),
        });
    }
    Ok(())
}

/// 叶子节点没有父节点，其值也不经由父节点计算
fn leaf_error(kind: &str) -> GraphError {
    GraphError::InvalidOperation(format!(
        "{kind}节点是叶子节点，其值应通过 set_value 设置，而非通过父节点计算"
    ))
}
