/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Layer 模块 - 组合 Node 构建常见网络结构
 *
 * Layer 不是新的抽象层，只是语法糖：每个层持有自己的参数 Var，
 * `apply` 时往图里添加节点并返回输出 Var。
 */

mod activation;
mod arg_max_pool;
mod conv2d;
mod linear;

pub use activation::Activation;
pub use arg_max_pool::ArgMaxPool;
pub use conv2d::{ConvConfig, ConvLayer};
pub use linear::Linear;
