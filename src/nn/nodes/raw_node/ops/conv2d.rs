/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 2D 卷积节点（数学意义上的卷积：卷积核先旋转180°，再与输入做互相关）
 *
 * 设计决策：
 * - 单节点处理多通道，Batch-First 格式：输入 [batch, C, H, W]，卷积核 [F, C, kH, kW]
 * - 输出格式：[batch, F, H', W']
 * - 边界模式：valid（不填充）或 full（四周各填充 kH-1 / kW-1 个零）
 * - 使用 Rayon 在 batch 维度并行加速
 *
 * 父节点：
 * - parents[0]: 输入数据
 * - parents[1]: 卷积核
 */

use super::parent_index_error;
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;
use ndarray::{Array4, ArrayView4, Ix4, s};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 卷积的边界模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderMode {
    /// 只在卷积核完全落在输入内部的位置输出：H' = (H - kH) / 步长 + 1
    #[default]
    Valid,
    /// 只要卷积核与输入有重叠就输出：H' = (H + kH - 2) / 步长 + 1
    Full,
}

impl BorderMode {
    /// 对给定的核尺寸需要在每一侧填充的零的个数
    pub const fn padding(&self, kernel_h: usize, kernel_w: usize) -> (usize, usize) {
        match self {
            Self::Valid => (0, 0),
            Self::Full => (kernel_h.saturating_sub(1), kernel_w.saturating_sub(1)),
        }
    }
}

impl FromStr for BorderMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(Self::Valid),
            "full" => Ok(Self::Full),
            other => Err(GraphError::InvalidConfig(format!(
                "未知的边界模式\"{other}\"，可选：valid、full"
            ))),
        }
    }
}

/// 2D 卷积节点
pub(in crate::nn) struct Conv2d {
    shape: Vec<usize>,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: (usize, usize),
}

impl Conv2d {
    /// 创建 Conv2d 节点
    ///
    /// # 输入形状约定
    /// - 输入: [batch, C, H, W]
    /// - 卷积核: [F, C, kH, kW]
    pub(in crate::nn) fn new(
        parents: &[&NodeHandle],
        stride: (usize, usize),
        border_mode: BorderMode,
    ) -> Result<Self, GraphError> {
        // 1. 验证父节点数量
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "Conv2d 节点需要 2 个父节点：[输入, 卷积核]".to_string(),
            ));
        }
        if stride.0 == 0 || stride.1 == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "卷积步长必须为正，得到 {stride:?}"
            )));
        }

        let input_shape = parents[0].value_expected_shape();
        let kernel_shape = parents[1].value_expected_shape();

        // 2. 验证形状：都必须是 4D
        if kernel_shape.len() != 4 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0, 0, 0],
                got: kernel_shape.to_vec(),
                message: format!("卷积核必须是 4D [F, C, kH, kW]，得到 {kernel_shape:?}"),
            });
        }
        if input_shape.len() != 4 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![0, 0, 0, 0],
                got: input_shape.to_vec(),
                message: format!(
                    "Conv2d 输入必须是 4D [batch, C, H, W]，得到 {input_shape:?}。单样本请使用 [1, C, H, W]"
                ),
            });
        }
        let (batch_size, input_c, input_h, input_w) = (
            input_shape[0],
            input_shape[1],
            input_shape[2],
            input_shape[3],
        );
        let (filters, kernel_c, kernel_h, kernel_w) = (
            kernel_shape[0],
            kernel_shape[1],
            kernel_shape[2],
            kernel_shape[3],
        );

        // 3. 验证通道数匹配
        if input_c != kernel_c {
            return Err(GraphError::ShapeMismatch {
                expected: vec![kernel_c],
                got: vec![input_c],
                message: format!("输入通道数 {input_c} 与卷积核通道数 {kernel_c} 不匹配"),
            });
        }

        // 4. 计算输出尺寸
        let padding = border_mode.padding(kernel_h, kernel_w);
        let padded_h = input_h + 2 * padding.0;
        let padded_w = input_w + 2 * padding.1;
        if kernel_h == 0 || kernel_w == 0 || padded_h < kernel_h || padded_w < kernel_w {
            return Err(GraphError::InvalidOperation(format!(
                "卷积输出尺寸无效：输入 {input_h}x{input_w}，核 {kernel_h}x{kernel_w}，边界模式 {border_mode:?}"
            )));
        }
        let output_h = (padded_h - kernel_h) / stride.0 + 1;
        let output_w = (padded_w - kernel_w) / stride.1 + 1;

        Ok(Self {
            shape: vec![batch_size, filters, output_h, output_w],
            kernel_size: (kernel_h, kernel_w),
            stride,
            padding,
        })
    }

    /// 对输入四周补零
    fn pad_input(&self, input: &ArrayView4<f32>) -> Array4<f32> {
        let (pad_h, pad_w) = self.padding;
        let (batch_size, c, h, w) = input.dim();
        let mut padded = Array4::zeros((batch_size, c, h + 2 * pad_h, w + 2 * pad_w));
        padded
            .slice_mut(s![.., .., pad_h..pad_h + h, pad_w..pad_w + w])
            .assign(input);
        padded
    }

    /// 输出位置(oh, ow)与核位置(u, v)对应的（已填充）输入坐标，
    /// 以及旋转180°后参与相乘的卷积核坐标
    const fn taps(
        &self,
        oh: usize,
        ow: usize,
        u: usize,
        v: usize,
    ) -> ((usize, usize), (usize, usize)) {
        let (kernel_h, kernel_w) = self.kernel_size;
        (
            (oh * self.stride.0 + u, ow * self.stride.1 + v),
            (kernel_h - 1 - u, kernel_w - 1 - v),
        )
    }

    fn convolve(&self, padded: &Array4<f32>, kernel: &ArrayView4<f32>) -> Tensor {
        let (batch_size, in_c, _, _) = padded.dim();
        let (out_c, _, k_h, k_w) = kernel.dim();
        let (out_h, out_w) = (self.shape[2], self.shape[3]);
        let single_sample_size = out_c * out_h * out_w;

        // Rayon 并行计算每个 batch 样本
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for oc in 0..out_c {
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let mut sum = 0.0f32;
                            for ic in 0..in_c {
                                for u in 0..k_h {
                                    for v in 0..k_w {
                                        let ((ih, iw), (kh, kw)) = self.taps(oh, ow, u, v);
                                        sum += padded[[b, ic, ih, iw]] * kernel[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                            sample_data[(oc * out_h + oh) * out_w + ow] = sum;
                        }
                    }
                }
                sample_data
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Tensor::new(&all_data, &self.shape)
    }

    /// dL/dX：把上游梯度沿卷积的路径散布回（已填充的）输入，再裁掉填充部分
    fn grad_to_input(
        &self,
        input: &ArrayView4<f32>,
        kernel: &ArrayView4<f32>,
        upstream: &ArrayView4<f32>,
    ) -> Tensor {
        let (batch_size, in_c, in_h, in_w) = input.dim();
        let (pad_h, pad_w) = self.padding;
        let (padded_h, padded_w) = (in_h + 2 * pad_h, in_w + 2 * pad_w);
        let (out_c, _, k_h, k_w) = kernel.dim();
        let (_, _, out_h, out_w) = upstream.dim();

        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut padded_grad = Array4::<f32>::zeros((1, in_c, padded_h, padded_w));
                for oc in 0..out_c {
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let grad_val = upstream[[b, oc, oh, ow]];
                            if grad_val == 0.0 {
                                continue;
                            }
                            for ic in 0..in_c {
                                for u in 0..k_h {
                                    for v in 0..k_w {
                                        let ((ih, iw), (kh, kw)) = self.taps(oh, ow, u, v);
                                        padded_grad[[0, ic, ih, iw]] +=
                                            grad_val * kernel[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                        }
                    }
                }
                padded_grad
                    .slice(s![0, .., pad_h..pad_h + in_h, pad_w..pad_w + in_w])
                    .iter()
                    .copied()
                    .collect()
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Tensor::new(&all_data, &[batch_size, in_c, in_h, in_w])
    }

    /// dL/dK：各样本的贡献并行算出后求和
    fn grad_to_kernel(
        &self,
        padded: &Array4<f32>,
        kernel_shape: &[usize],
        upstream: &ArrayView4<f32>,
    ) -> Tensor {
        let (batch_size, in_c, _, _) = padded.dim();
        let (out_c, k_h, k_w) = (kernel_shape[0], kernel_shape[2], kernel_shape[3]);
        let (_, _, out_h, out_w) = upstream.dim();
        let kernel_size = out_c * in_c * k_h * k_w;

        let summed = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_grad = vec![0.0f32; kernel_size];
                for oc in 0..out_c {
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let grad_val = upstream[[b, oc, oh, ow]];
                            for ic in 0..in_c {
                                for u in 0..k_h {
                                    for v in 0..k_w {
                                        let ((ih, iw), (kh, kw)) = self.taps(oh, ow, u, v);
                                        let idx = ((oc * in_c + ic) * k_h + kh) * k_w + kw;
                                        sample_grad[idx] += grad_val * padded[[b, ic, ih, iw]];
                                    }
                                }
                            }
                        }
                    }
                }
                sample_grad
            })
            .reduce(
                || vec![0.0f32; kernel_size],
                |mut acc, sample| {
                    acc.iter_mut().zip(sample).for_each(|(a, s)| *a += s);
                    acc
                },
            );

        Tensor::new(&summed, kernel_shape)
    }
}

fn as_4d<'a>(tensor: &'a Tensor, what: &str) -> Result<ArrayView4<'a, f32>, GraphError> {
    tensor
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| {
            GraphError::ComputationError(format!(
                "Conv2d 的{what}必须是 4D，得到 {:?}",
                tensor.shape()
            ))
        })
}

impl TraitNode for Conv2d {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let input = as_4d(parents[0], "输入")?;
        let kernel = as_4d(parents[1], "卷积核")?;
        let padded = self.pad_input(&input);
        Ok(self.convolve(&padded, &kernel))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let input = as_4d(parents[0], "输入")?;
        let kernel = as_4d(parents[1], "卷积核")?;
        let upstream = as_4d(upstream_grad, "上游梯度")?;
        match parent_index {
            0 => Ok(self.grad_to_input(&input, &kernel, &upstream)),
            1 => {
                let padded = self.pad_input(&input);
                Ok(self.grad_to_kernel(&padded, parents[1].shape(), &upstream))
            }
            _ => Err(parent_index_error("Conv2d", parent_index)),
        }
    }
}
