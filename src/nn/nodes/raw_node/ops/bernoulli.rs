/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 伯努利采样节点：dropout/输入腐蚀所用的0/1掩码
 *
 * 没有父节点，但不是叶子：每次前向传播都会重新采样一张新的掩码。
 * 节点自带一个由调用者的随机数生成器派生出的 StdRng，因而采样序列可复现。
 */

use super::parent_index_error;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

pub(in crate::nn) struct Bernoulli {
    keep_prob: f32,
    rng: StdRng,
    shape: Vec<usize>,
}

impl Bernoulli {
    /// `keep_prob`为每个元素取1的概率，须在[0, 1]区间内
    pub(in crate::nn) fn new(
        shape: &[usize],
        keep_prob: f32,
        rng: StdRng,
    ) -> Result<Self, GraphError> {
        if !(0.0..=1.0).contains(&keep_prob) {
            return Err(GraphError::InvalidOperation(format!(
                "伯努利采样的概率须在[0, 1]区间内，但得到{keep_prob}"
            )));
        }
        Ok(Self {
            keep_prob,
            rng,
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Bernoulli {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(Tensor::bernoulli_with_rng(
            self.keep_prob,
            &self.shape,
            &mut self.rng,
        ))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(parent_index_error("Bernoulli", parent_index))
    }
}
