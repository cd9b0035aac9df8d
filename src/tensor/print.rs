use crate::tensor::Tensor;
use std::fmt;

impl fmt::Display for Tensor {
    /// 一、二阶张量逐元素打印；更高阶只打印形状与元素个数
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shape = self.shape();
        match shape.len() {
            0 => write!(f, "{:8.4}", self.to_vec().first().copied().unwrap_or(0.0))?,
            1 => write_row(f, &self.to_vec())?,
            2 => {
                let values = self.to_vec();
                let cols = shape[1].max(1);
                write!(f, "[")?;
                for (i, row) in values.chunks(cols).enumerate() {
                    if i > 0 {
                        write!(f, ",\n ")?;
                    }
                    write_row(f, row)?;
                }
                write!(f, "]")?;
            }
            _ => write!(f, "<{}个元素>", self.size())?,
        }
        write!(f, "\n形状: {shape:?}")
    }
}

fn write_row(f: &mut fmt::Formatter, row: &[f32]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value:8.4}")?;
    }
    write!(f, "]")
}
