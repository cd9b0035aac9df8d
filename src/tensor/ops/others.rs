use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Ix2, Zip};
use std::cmp::PartialEq;

impl From<f32> for Tensor {
    /// 将`f32`转换为形状为`[1, 1]`的张量（图中标量的统一形状）
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1, 1])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 逐元素映射
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor::from_array(self.data.mapv(f))
    }

    /// 两个形状严格一致的张量逐元素组合
    pub fn zip_map<F: Fn(f32, f32) -> f32>(&self, other: &Tensor, f: F) -> Tensor {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::IncompatibleShape
        );
        let mut data = self.data.clone();
        Zip::from(&mut data)
            .and(&other.data)
            .for_each(|a, &b| *a = f(*a, b));
        Tensor::from_array(data)
    }

    pub fn sqrt(&self) -> Tensor {
        self.map(f32::sqrt)
    }

    pub fn square(&self) -> Tensor {
        self.map(|x| x * x)
    }

    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    pub fn relu(&self) -> Tensor {
        self.map(|x| x.max(0.0))
    }

    /// 对张量中的所有元素求和并返回一个形状为[1, 1]的标量
    pub fn sum(&self) -> Tensor {
        let mut value = 0.0;
        Zip::from(&self.data).for_each(|a| value += a);
        Tensor::from(value)
    }

    /// 所有元素的均值，形状为[1, 1]；空张量的均值为0
    pub fn mean(&self) -> Tensor {
        if self.size() == 0 {
            return Tensor::from(0.0);
        }
        let total = self.data.iter().sum::<f32>();
        Tensor::from(total / self.size() as f32)
    }

    /// 实现矩阵乘法。只接受2阶张量，且前一个张量的列数须等于后一个张量的行数，否则panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        let error = || TensorError::OperatorError {
            operator: Operator::MatMul,
            tensor1_shape: self.shape().to_vec(),
            tensor2_shape: other.shape().to_vec(),
        };
        assert!(
            self.dimension() == 2 && other.dimension() == 2,
            "{}",
            error()
        );
        assert!(self.shape()[1] == other.shape()[0], "{}", error());

        let lhs = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .unwrap_or_else(|_| panic!("{}", error()));
        let rhs = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .unwrap_or_else(|_| panic!("{}", error()));
        Tensor::from_array(lhs.dot(&rhs).into_dyn())
    }
}
