/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @LastEditTime : 2026-02-03
 * @Description  : Var 激活函数
 */

use crate::nn::{GraphInner, Var};

/// 激活函数，`use only_nn::nn::VarActivationOps`后可链式调用：`x.relu().sigmoid()`
pub trait VarActivationOps {
    /// max(0, x)
    fn relu(&self) -> Var;

    /// 1 / (1 + exp(-x))
    fn sigmoid(&self) -> Var;

    fn tanh(&self) -> Var;
}

impl VarActivationOps for Var {
    fn relu(&self) -> Var {
        self.unary(GraphInner::new_relu_node, "ReLU")
    }

    fn sigmoid(&self) -> Var {
        self.unary(GraphInner::new_sigmoid_node, "Sigmoid")
    }

    fn tanh(&self) -> Var {
        self.unary(GraphInner::new_tanh_node, "Tanh")
    }
}
