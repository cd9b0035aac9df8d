/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : 卷积层
 *
 * 输入/输出形状：
 * - 输入：[batch_size, num_channels, H, W]
 * - 输出：[batch_size, num_filters, H', W']
 *
 * 输出尺寸计算：
 * - valid: H' = (H - filter_h) / step_h + 1
 * - full:  H' = (H + filter_h - 2) / step_h + 1
 *
 * 计算：output = activation(conv2d(x, filters) + b)
 */

use crate::nn::{
    Activation, BorderMode, Graph, GraphError, Layer, Module, Var, VarMatrixOps, WeightType,
    init_filters,
};
use crate::tensor::Tensor;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 卷积层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvConfig {
    /// 卷积核尺寸 (高, 宽)
    pub filter_size: (usize, usize),
    pub num_filters: usize,
    pub num_channels: usize,
    /// 输入特征图尺寸 (高, 宽)，给定时 `apply` 会校验输入
    pub fm_size: Option<(usize, usize)>,
    /// 给定时 `apply` 会校验输入的批大小
    pub batch_size: Option<usize>,
    /// 步长 (高, 宽)
    pub step: (usize, usize),
    pub border_mode: BorderMode,
    pub use_bias: bool,
    pub activation: Activation,
    pub weight_type: WeightType,
}

impl Default for ConvConfig {
    fn default() -> Self {
        Self {
            filter_size: (3, 3),
            num_filters: 1,
            num_channels: 1,
            fm_size: None,
            batch_size: None,
            step: (1, 1),
            border_mode: BorderMode::Valid,
            use_bias: true,
            activation: Activation::Identity,
            weight_type: WeightType::None,
        }
    }
}

impl ConvConfig {
    pub fn validate(&self) -> Result<(), GraphError> {
        let (fh, fw) = self.filter_size;
        if fh == 0 || fw == 0 {
            return Err(GraphError::InvalidConfig(format!(
                "卷积核尺寸必须为正，得到{:?}",
                self.filter_size
            )));
        }
        if self.num_filters == 0 || self.num_channels == 0 {
            return Err(GraphError::InvalidConfig(format!(
                "卷积核个数与通道数必须为正，得到 num_filters={}, num_channels={}",
                self.num_filters, self.num_channels
            )));
        }
        if self.step.0 == 0 || self.step.1 == 0 {
            return Err(GraphError::InvalidConfig(format!(
                "卷积步长必须为正，得到{:?}",
                self.step
            )));
        }
        if self.batch_size == Some(0) {
            return Err(GraphError::InvalidConfig("批大小必须为正".to_string()));
        }
        if let Some((h, w)) = self.fm_size {
            if h == 0 || w == 0 {
                return Err(GraphError::InvalidConfig(format!(
                    "特征图尺寸必须为正，得到{:?}",
                    self.fm_size
                )));
            }
            if self.border_mode == BorderMode::Valid && (h < fh || w < fw) {
                return Err(GraphError::InvalidConfig(format!(
                    "valid 模式下特征图{:?}不能小于卷积核{:?}",
                    (h, w),
                    self.filter_size
                )));
            }
        }
        Ok(())
    }

    /// 输入特征图尺寸已知且配置合法时的输出特征图尺寸
    pub fn output_size(&self) -> Option<(usize, usize)> {
        self.validate().ok()?;
        let (h, w) = self.fm_size?;
        let (fh, fw) = self.filter_size;
        let (pad_h, pad_w) = self.border_mode.padding(fh, fw);
        Some((
            (h + 2 * pad_h - fh) / self.step.0 + 1,
            (w + 2 * pad_w - fw) / self.step.1 + 1,
        ))
    }
}

/// 卷积层
///
/// # 使用示例
/// ```ignore
/// let config = ConvConfig {
///     filter_size: (5, 5),
///     num_filters: 16,
///     activation: Activation::ReLU,
///     ..Default::default()
/// };
/// let conv = ConvLayer::new(&graph, config, "conv1", &mut rng)?;
/// let h = conv.apply(&x)?;
/// ```
#[derive(Debug)]
pub struct ConvLayer {
    config: ConvConfig,
    /// 卷积核参数 [num_filters, num_channels, filter_h, filter_w]
    filters: Var,
    /// 偏置参数 [1, num_filters, 1, 1]
    bias: Option<Var>,
    name: String,
}

impl ConvLayer {
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        config: ConvConfig,
        name: &str,
        rng: &mut R,
    ) -> Result<Self, GraphError> {
        config.validate()?;
        let (fh, fw) = config.filter_size;
        let filters = init_filters(
            graph,
            &format!("{name}_filters"),
            [config.num_filters, config.num_channels, fh, fw],
            config.weight_type,
            rng,
        )?;
        let bias = if config.use_bias {
            let value = Tensor::uniform_with_rng(
                0.0,
                1.0 / config.num_filters as f32,
                &[1, config.num_filters, 1, 1],
                rng,
            );
            Some(graph.parameter(&value, &format!("{name}_bias"))?)
        } else {
            None
        };

        Ok(Self {
            config,
            filters,
            bias,
            name: name.to_string(),
        })
    }

    pub const fn config(&self) -> &ConvConfig {
        &self.config
    }

    pub const fn filters(&self) -> &Var {
        &self.filters
    }

    pub const fn bias(&self) -> Option<&Var> {
        self.bias.as_ref()
    }

    /// 卷积加偏置，不含激活
    pub fn apply_lin(&self, x: &Var) -> Result<Var, GraphError> {
        self.check_input_shape(&x.shape())?;
        let y = x.conv2d(&self.filters, self.config.step, self.config.border_mode)?;
        match &self.bias {
            Some(bias) => y.try_add(bias),
            None => Ok(y),
        }
    }

    /// 从其他（同结构的）层的参数拷贝数值：`params`依次为卷积核与偏置
    pub fn set_params(&self, params: &[Var]) -> Result<(), GraphError> {
        let own = self.parameters();
        if params.len() != own.len() {
            return Err(GraphError::InvalidOperation(format!(
                "{}需要{}个参数，得到{}个",
                self.name,
                own.len(),
                params.len()
            )));
        }
        for (target, source) in own.iter().zip(params) {
            let value = source.value()?.ok_or_else(|| {
                GraphError::ComputationError(format!("参数{}没有值", source.name()))
            })?;
            target.set_value(&value)?;
        }
        Ok(())
    }

    fn check_input_shape(&self, shape: &[usize]) -> Result<(), GraphError> {
        let mut expected = vec![
            self.config.batch_size.unwrap_or(shape.first().copied().unwrap_or(0)),
            self.config.num_channels,
        ];
        match self.config.fm_size {
            Some((h, w)) => expected.extend([h, w]),
            None => expected.extend(shape.iter().skip(2).take(2)),
        }
        if shape.len() != 4 || shape != expected.as_slice() {
            return Err(GraphError::ShapeMismatch {
                expected,
                got: shape.to_vec(),
                message: format!("卷积层{}的输入形状不符合配置", self.name),
            });
        }
        Ok(())
    }
}

impl Module for ConvLayer {
    fn parameters(&self) -> Vec<Var> {
        let mut params = vec![self.filters.clone()];
        params.extend(self.bias.clone());
        params
    }
}

impl Layer for ConvLayer {
    fn apply(&self, x: &Var) -> Result<Var, GraphError> {
        Ok(self.config.activation.apply(&self.apply_lin(x)?))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
