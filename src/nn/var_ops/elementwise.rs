/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Var 逐元素数学运算扩展 trait
 */

use crate::nn::{GraphInner, Var};

/// 逐元素数学运算扩展 trait
pub trait VarElementwiseOps {
    /// 逐元素平方根。负数元素得到 NaN
    fn sqrt(&self) -> Var;

    /// 逐元素平方
    fn square(&self) -> Var;
}

impl VarElementwiseOps for Var {
    fn sqrt(&self) -> Var {
        self.unary(GraphInner::new_sqrt_node, "Sqrt")
    }

    fn square(&self) -> Var {
        self.unary(GraphInner::new_square_node, "Square")
    }
}
