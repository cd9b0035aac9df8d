/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 张量：计算图中所有节点的值、梯度以及优化器状态的载体
 */

use ndarray::{Array, ArrayD, IxDyn};
use rand::Rng;
use rand::distributions::{Bernoulli, Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod arithmetic;
    pub mod others;
}

mod index;
mod print;
mod property;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f32等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...；
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap_or_else(|_| {
            panic!(
                "{}",
                TensorError::DataShapeMismatch {
                    data_len: data.len(),
                    shape: shape.to_vec(),
                }
            )
        });
        Self { data }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::ones(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// 用指定的随机数生成器创建一个均匀分布的随机张量，其值在[min, max)区间内。
    /// 若`min == max`，则所有元素均为`min`。
    pub fn uniform_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Self {
        if min >= max {
            return Self::full(min, shape);
        }
        let uniform = Uniform::new(min, max);
        let len = shape.iter().product::<usize>();
        let data = (0..len).map(|_| uniform.sample(rng)).collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 用指定的随机数生成器创建一个服从正态分布的随机张量（Box-Muller变换）
    pub fn normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }

    /// 创建一个伯努利分布的0/1张量：每个元素独立地以概率`p`取1，否则取0。
    /// `p`必须在[0, 1]区间内，否则panic。`p`为0或1时结果是确定的。
    pub fn bernoulli_with_rng<R: Rng + ?Sized>(p: f32, shape: &[usize], rng: &mut R) -> Self {
        let distribution = Bernoulli::new(f64::from(p))
            .unwrap_or_else(|_| panic!("{}", TensorError::InvalidProbability(p)));
        let len = shape.iter().product::<usize>();
        let data = (0..len)
            .map(|_| if distribution.sample(rng) { 1.0 } else { 0.0 })
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    pub(crate) const fn from_array(data: ArrayD<f32>) -> Self {
        Self { data }
    }
}
