/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module / Layer trait 定义
 */

use super::{GraphError, Var};

/// 持有可训练参数的组件（层或模型）
///
/// 构造函数各不相同，不放入 trait；Var 自带图引用，前向计算也无需传入 `&Graph`。
pub trait Module {
    /// 全部可训练参数，顺序即 `gd_updates` 与 `save_params` 使用的顺序
    fn parameters(&self) -> Vec<Var>;

    /// 参数节点（而非标量元素）的个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }
}

/// 层 trait：可被模型按顺序串联的模块
///
/// # 使用示例
/// ```ignore
/// let layers: Vec<Box<dyn Layer>> = vec![Box::new(encoder), Box::new(decoder)];
/// let model = AutoEncoder::new(layers)?;
/// ```
pub trait Layer: Module {
    /// 对输入构建本层的输出表达式
    fn apply(&self, x: &Var) -> Result<Var, GraphError>;

    /// 输入特征维度（仅对全连接类的层有意义）
    fn in_dim(&self) -> Option<usize> {
        None
    }

    /// 输出特征维度（仅对全连接类的层有意义）
    fn out_dim(&self) -> Option<usize> {
        None
    }

    /// 层名称
    fn name(&self) -> &str;
}
