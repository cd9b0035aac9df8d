use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let new_total_elements: usize = shape.iter().product();
        assert!(
            self.size() == new_total_elements,
            "{}",
            TensorError::IncompatibleShape
        );
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .unwrap_or_else(|_| panic!("{}", TensorError::IncompatibleShape));
        Self { data }
    }

    /// 二维张量的转置
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::IncompatibleShape
        );
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }

    /// 按 NumPy 风格（从右向左对齐，维度相等或其一为1）计算两个形状广播后的形状。
    /// 不兼容时返回None
    pub fn broadcast_shape(shape_1: &[usize], shape_2: &[usize]) -> Option<Vec<usize>> {
        let ndim = shape_1.len().max(shape_2.len());
        let mut result = vec![0; ndim];
        for i in 0..ndim {
            let dim_1 = dim_from_right(shape_1, i);
            let dim_2 = dim_from_right(shape_2, i);
            result[ndim - 1 - i] = match (dim_1, dim_2) {
                (a, b) if a == b => a,
                (1, b) => b,
                (a, 1) => a,
                _ => return None,
            };
        }
        Some(result)
    }

    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        Self::broadcast_shape(self.shape(), other.shape()).is_some()
    }

    /// 将（广播后的）张量沿被广播的维度求和，还原到`target`形状。
    /// 这是广播运算反向传播时梯度归约的核心。
    pub fn sum_to_shape(&self, target: &[usize]) -> Self {
        if self.shape() == target {
            return self.clone();
        }

        let mut data = self.data.clone();
        while data.ndim() > target.len() {
            data = data.sum_axis(Axis(0));
        }
        let offset = target.len() - data.ndim();
        for (axis, &dim) in target.iter().enumerate().skip(offset) {
            let axis = axis - offset;
            if dim == 1 && data.shape()[axis] != 1 {
                data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
            }
        }

        Self { data }.reshape(target)
    }
}

fn dim_from_right(shape: &[usize], i: usize) -> usize {
    if i < shape.len() {
        shape[shape.len() - 1 - i]
    } else {
        1
    }
}
