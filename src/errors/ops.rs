/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 张量二元运算符（仅用于错误信息）
 */

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    AddAssign,
    Sub,
    Mul,
    Div,
    MatMul,
}

impl Operator {
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Add => "相加",
            Self::AddAssign => "原地相加",
            Self::Sub => "相减",
            Self::Mul => "逐元素相乘",
            Self::Div => "逐元素相除",
            Self::MatMul => "矩阵相乘",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}
