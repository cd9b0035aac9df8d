/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 扩展 trait 模块
 *
 * 按功能领域组织 Var 的扩展方法，用户按需 import。
 *
 * # 模块结构
 * - `activation`: 激活函数（relu, sigmoid, tanh）
 * - `elementwise`: 逐元素数学运算（sqrt, square）
 * - `matrix`: 矩阵/卷积运算（matmul, conv2d, channel_arg_max）
 * - `reduce`: 归约（sum, mean）
 *
 * # 使用示例
 * ```ignore
 * use only_nn::nn::{Var, VarActivationOps, VarElementwiseOps, VarMatrixOps, VarReduceOps};
 *
 * let h = x.matmul(&w)?.tanh();
 * let cost = (&h - &target).square().mean();
 * ```
 */

mod activation;
mod elementwise;
mod matrix;
mod reduce;

pub use activation::VarActivationOps;
pub use elementwise::VarElementwiseOps;
pub use matrix::VarMatrixOps;
pub use reduce::VarReduceOps;
