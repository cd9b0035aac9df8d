/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 计算图、更新规则与模型组合共用的错误类型
 */

use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0:?}不存在")]
    NodeNotFound(NodeId),

    #[error("无效操作: {0}")]
    InvalidOperation(String),

    #[error("形状不匹配（期望{expected:?}，实际{got:?}）: {message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },

    #[error("计算错误: {0}")]
    ComputationError(String),

    #[error("{0}")]
    DuplicateNodeName(String),

    /// 动量包装时，参数在更新表中没有待定的更新
    #[error("参数{0}不在更新表中，无法叠加动量")]
    ParameterNotInUpdateMap(String),

    #[error("无效配置: {0}")]
    InvalidConfig(String),

    #[error("（反）序列化失败: {0}")]
    Serialization(String),
}
