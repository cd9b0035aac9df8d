/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Var 归约扩展 trait，结果均为[1, 1]形状的标量
 */

use crate::nn::{GraphInner, Var};

pub trait VarReduceOps {
    /// 所有元素之和
    fn sum(&self) -> Var;

    /// 所有元素的均值
    fn mean(&self) -> Var;
}

impl VarReduceOps for Var {
    fn sum(&self) -> Var {
        self.unary(GraphInner::new_sum_node, "Sum")
    }

    fn mean(&self) -> Var {
        self.unary(GraphInner::new_mean_node, "Mean")
    }
}
