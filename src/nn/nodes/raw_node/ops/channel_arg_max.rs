use super::{parent_index_error, single_parent_shape};
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 通道赢者通吃掩码：输入[batch, C, ...]，在每个(batch, 空间位置)上，
/// 只有响应最大的通道取1，其余取0（并列时取序号最小的通道）。
///
/// 掩码本身视为常量，不向父节点回传梯度（梯度取0）
pub(in crate::nn) struct ChannelArgMax {
    shape: Vec<usize>,
}

impl ChannelArgMax {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        let shape = single_parent_shape(parents, "ChannelArgMax")?;
        if shape.len() < 2 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0],
                got: shape,
                message: "ChannelArgMax节点的输入至少是2维 [batch, C, ...]".to_string(),
            });
        }
        Ok(Self { shape })
    }
}

impl TraitNode for ChannelArgMax {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let input = parents[0].to_vec();
        let (batch, channels) = (self.shape[0], self.shape[1]);
        let spatial: usize = self.shape[2..].iter().product();

        let mut mask = vec![0.0; input.len()];
        for n in 0..batch {
            for s in 0..spatial {
                let index = |c: usize| (n * channels + c) * spatial + s;
                let winner = (1..channels).fold(0, |best, c| {
                    if input[index(c)] > input[index(best)] {
                        c
                    } else {
                        best
                    }
                });
                if channels > 0 {
                    mask[index(winner)] = 1.0;
                }
            }
        }
        Ok(Tensor::new(&mask, &self.shape))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index != 0 {
            return Err(parent_index_error("ChannelArgMax", parent_index));
        }
        Ok(Tensor::zeros(parents[0].shape()))
    }
}
