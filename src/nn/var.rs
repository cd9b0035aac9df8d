/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Var - 符号变量句柄，支持算子重载和链式调用
 */

use super::graph::{Graph, GraphInner};
use super::nodes::ScalarOpKind;
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

/// 符号变量句柄 - 携带图引用，支持算子重载和链式调用
///
/// # 设计原则
/// - 持有 `Rc<RefCell<GraphInner>>` 引用，实现算子重载
/// - 构建表达式时只是往图中添加节点，不做任何数值计算
/// - Clone 语义（非 Copy），但开销极低（Rc clone）
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&data)?;
/// let w = graph.parameter(&init, "w")?;
/// let y = x.matmul(&w)?.tanh();
/// let cost = (&y - &target).square().mean();
/// let value = cost.eval()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 节点名称
    pub fn name(&self) -> String {
        self.graph
            .borrow()
            .get_node_name(self.id)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// 节点值的形状，在节点创建时就已确定
    pub fn shape(&self) -> Vec<usize> {
        self.graph
            .borrow()
            .get_node_value_expected_shape(self.id)
            .expect("获取形状失败")
            .to_vec()
    }

    /// 是否为可训练参数
    pub fn is_parameter(&self) -> bool {
        self.graph
            .borrow()
            .is_parameter_node(self.id)
            .unwrap_or(false)
    }

    /// 以本 Var 的图为准，把同图的另一 Var 包装出来
    pub(crate) fn wrap(&self, id: NodeId) -> Self {
        Self::new(id, Rc::clone(&self.graph))
    }

    /// 用一元节点的构造函数在本 Var 之上建新节点。供各算子 trait 使用，失败即 panic
    pub(crate) fn unary(
        &self,
        build: fn(&mut GraphInner, NodeId, Option<&str>) -> Result<NodeId, GraphError>,
        op: &str,
    ) -> Self {
        let id = build(&mut *self.graph.borrow_mut(), self.id, None)
            .unwrap_or_else(|e| panic!("创建{op}节点失败：{e}"));
        self.wrap(id)
    }

    // ==================== 执行 ====================

    /// 前向传播（开启一个新批次）
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 前向传播并返回值
    pub fn eval(&self) -> Result<Tensor, GraphError> {
        let mut values = self.graph.borrow_mut().evaluate(&[self.id])?;
        values
            .pop()
            .ok_or_else(|| GraphError::ComputationError("求值结果为空".to_string()))
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点当前的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 设置叶子节点的值
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 获取标量值（前向传播后）
    pub fn item(&self) -> Result<f32, GraphError> {
        let value = self.eval()?;
        value
            .number()
            .ok_or_else(|| GraphError::InvalidOperation(format!("形状为{:?}的张量不是标量", value.shape())))
    }

    // ==================== 安全版本（返回 Result）====================

    pub(crate) fn check_same_graph(&self, other: &Self, op: &str) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(format!(
                "不能对来自不同 Graph 的 Var 进行{op}"
            )))
        }
    }

    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "加法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(self.id, other.id, None)?;
        Ok(self.wrap(id))
    }

    pub fn try_sub(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "减法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_subtract_node(self.id, other.id, None)?;
        Ok(self.wrap(id))
    }

    /// 逐元素乘法
    pub fn try_mul(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "乘法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_multiply_node(self.id, other.id, None)?;
        Ok(self.wrap(id))
    }

    /// 逐元素除法
    pub fn try_div(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "除法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_divide_node(self.id, other.id, None)?;
        Ok(self.wrap(id))
    }

    /// 与纯数运算
    pub fn try_scalar_op(&self, kind: ScalarOpKind, scalar: f32) -> Result<Self, GraphError> {
        let id = self
            .graph
            .borrow_mut()
            .new_scalar_op_node(self.id, kind, scalar, None)?;
        Ok(self.wrap(id))
    }
}

// ==================== 算子重载 ====================

macro_rules! impl_var_binary_op {
    ($trait:ident, $method:ident, $try_method:ident, $message:literal) => {
        impl $trait for &Var {
            type Output = Var;

            fn $method(self, other: &Var) -> Var {
                self.$try_method(other).expect($message)
            }
        }

        impl $trait for Var {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                (&self).$method(&other)
            }
        }

        impl $trait<Var> for &Var {
            type Output = Var;

            fn $method(self, other: Var) -> Var {
                self.$method(&other)
            }
        }

        impl $trait<&Self> for Var {
            type Output = Self;

            fn $method(self, other: &Self) -> Self {
                (&self).$method(other)
            }
        }
    };
}

impl_var_binary_op!(Add, add, try_add, "Var 加法失败");
impl_var_binary_op!(Sub, sub, try_sub, "Var 减法失败");
impl_var_binary_op!(Mul, mul, try_mul, "Var 乘法失败");
impl_var_binary_op!(Div, div, try_div, "Var 除法失败");

/// Var 与 f32 的运算：`$var_side`为 `var ⊕ c` 对应的节点，`$scalar_side`为 `c ⊕ var` 对应的节点
macro_rules! impl_var_scalar_op {
    ($trait:ident, $method:ident, |$c:ident| $var_side:expr, $scalar_side:expr) => {
        impl $trait<f32> for &Var {
            type Output = Var;

            fn $method(self, $c: f32) -> Var {
                let (kind, scalar) = $var_side;
                self.try_scalar_op(kind, scalar)
                    .expect("Var 与纯数运算失败")
            }
        }

        impl $trait<f32> for Var {
            type Output = Self;

            fn $method(self, scalar: f32) -> Self {
                (&self).$method(scalar)
            }
        }

        impl $trait<&Var> for f32 {
            type Output = Var;

            fn $method(self, var: &Var) -> Var {
                let $c = self;
                let (kind, scalar) = $scalar_side;
                var.try_scalar_op(kind, scalar)
                    .expect("纯数与 Var 运算失败")
            }
        }

        impl $trait<Var> for f32 {
            type Output = Var;

            fn $method(self, var: Var) -> Var {
                self.$method(&var)
            }
        }
    };
}

impl_var_scalar_op!(Add, add, |c| (ScalarOpKind::Add, c), (ScalarOpKind::Add, c));
impl_var_scalar_op!(Sub, sub, |c| (ScalarOpKind::Add, -c), (ScalarOpKind::RSub, c));
impl_var_scalar_op!(Mul, mul, |c| (ScalarOpKind::Mul, c), (ScalarOpKind::Mul, c));
impl_var_scalar_op!(Div, div, |c| (ScalarOpKind::Mul, 1.0 / c), (ScalarOpKind::RDiv, c));

impl Neg for &Var {
    type Output = Var;

    fn neg(self) -> Var {
        self * -1.0
    }
}

impl Neg for Var {
    type Output = Self;

    fn neg(self) -> Self {
        -&self
    }
}
