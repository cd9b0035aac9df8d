/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use crate::nn::NodeId;
use crate::nn::var::Var;
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Graph {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    pub fn with_name(name: &str) -> Self {
        Self::from_inner(GraphInner::with_name(name))
    }

    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    /// 检查某个 Var 是否属于本图
    pub fn owns(&self, var: &Var) -> bool {
        Rc::ptr_eq(&self.inner, var.graph())
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, Rc::clone(&self.inner))
    }

    // ==================== 创建变量 ====================

    /// 创建输入节点并设置数据
    pub fn input(&self, data: &Tensor) -> Result<Var, GraphError> {
        self.new_input(data, None)
    }

    /// 创建命名输入节点
    pub fn input_named(&self, data: &Tensor, name: &str) -> Result<Var, GraphError> {
        self.new_input(data, Some(name))
    }

    /// 创建只有形状、尚未设置数据的输入节点（之后通过 `Var::set_value` 喂入数据）
    pub fn input_shape(&self, shape: &[usize], name: Option<&str>) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().new_input_node(shape, name)?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 创建常量张量（本质上是不会被更新的输入节点）
    pub fn constant(&self, data: &Tensor) -> Result<Var, GraphError> {
        self.new_input(data, None)
    }

    fn new_input(&self, data: &Tensor, name: Option<&str>) -> Result<Var, GraphError> {
        let mut g = self.inner.borrow_mut();
        let node_id = g.new_input_node(data.shape(), name)?;
        g.set_node_value(node_id, Some(data))?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 创建以`init_value`为初值的可训练参数节点
    pub fn parameter(&self, init_value: &Tensor, name: &str) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_parameter_node(init_value, Some(name))?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 按名称查找（不存在则置零创建）优化器状态节点
    pub fn state(&self, name: &str, shape: &[usize]) -> Result<Var, GraphError> {
        let node_id = self.inner.borrow_mut().find_or_new_state_node(name, shape)?;
        Ok(self.wrap_node_id(node_id))
    }

    /// 按名称查找已有节点
    pub fn find(&self, name: &str) -> Option<Var> {
        let node_id = self.inner.borrow().find_node_by_name(name)?;
        Some(self.wrap_node_id(node_id))
    }

    // ==================== 执行 ====================

    /// 前向传播
    pub fn forward(&self, output: &Var) -> Result<(), GraphError> {
        self.inner.borrow_mut().forward(output.node_id())
    }

    /// 在同一次前向传播中计算多个 Var 的值
    pub fn evaluate(&self, outputs: &[&Var]) -> Result<Vec<Tensor>, GraphError> {
        for output in outputs {
            if !self.owns(output) {
                return Err(GraphError::InvalidOperation(
                    "不能求值来自其他 Graph 的 Var".to_string(),
                ));
            }
        }
        let ids = outputs.iter().map(|var| var.node_id()).collect::<Vec<_>>();
        self.inner.borrow_mut().evaluate(&ids)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
