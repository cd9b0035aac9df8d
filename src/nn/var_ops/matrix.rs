/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 矩阵/卷积运算扩展 trait
 *
 * 提供矩阵运算的链式调用支持，用户需 import 此 trait 后才能使用。
 */

use crate::nn::{BorderMode, GraphError, Var};

/// 矩阵运算扩展 trait
///
/// - `matmul(other)`: 矩阵乘法
/// - `conv2d(kernel, stride, border_mode)`: 二维卷积
/// - `channel_arg_max()`: 通道维胜者掩码
///
/// # 使用示例
/// ```ignore
/// use only_nn::nn::{Var, VarMatrixOps};
///
/// let y = x.matmul(&w)?;
/// let fm = images.conv2d(&filters, (1, 1), BorderMode::Valid)?;
/// ```
pub trait VarMatrixOps {
    /// 矩阵乘法
    ///
    /// # 形状要求
    /// - self: [m, k]
    /// - other: [k, n]
    /// - 输出: [m, n]
    fn matmul(&self, other: &Var) -> Result<Var, GraphError>;

    /// 二维卷积（卷积核翻转的真卷积）
    ///
    /// # 形状要求
    /// - self: [batch, channels, h, w]
    /// - kernel: [filters, channels, kh, kw]
    /// - 输出: [batch, filters, oh, ow]，其中 valid 模式 `oh = (h - kh) / sh + 1`，
    ///   full 模式 `oh = (h + kh - 2) / sh + 1`
    fn conv2d(
        &self,
        kernel: &Var,
        stride: (usize, usize),
        border_mode: BorderMode,
    ) -> Result<Var, GraphError>;

    /// 对 [batch, channels, h, w] 的每个 (batch, h, w) 位置，
    /// 响应最大的通道处为1，其余为0。不传递梯度
    fn channel_arg_max(&self) -> Result<Var, GraphError>;
}

impl VarMatrixOps for Var {
    fn matmul(&self, other: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(other, "矩阵乘法")?;
        let id = self
            .graph()
            .borrow_mut()
            .new_mat_mul_node(self.node_id(), other.node_id(), None)?;
        Ok(self.wrap(id))
    }

    fn conv2d(
        &self,
        kernel: &Var,
        stride: (usize, usize),
        border_mode: BorderMode,
    ) -> Result<Var, GraphError> {
        self.check_same_graph(kernel, "卷积")?;
        let id = self.graph().borrow_mut().new_conv2d_node(
            self.node_id(),
            kernel.node_id(),
            stride,
            border_mode,
            None,
        )?;
        Ok(self.wrap(id))
    }

    fn channel_arg_max(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_channel_arg_max_node(self.node_id(), None)?;
        Ok(self.wrap(id))
    }
}
