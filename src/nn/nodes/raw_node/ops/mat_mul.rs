use super::parent_index_error;
use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 矩阵乘法 A[m, k] @ B[k, n]
///
/// backward: dA = upstream @ Bᵀ，dB = Aᵀ @ upstream
pub(in crate::nn) struct MatMul {
    shape: Vec<usize>,
}

impl MatMul {
    pub(in crate::nn) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "MatMul节点需要2个父节点".to_string(),
            ));
        }
        let lhs = parents[0].value_expected_shape();
        let rhs = parents[1].value_expected_shape();
        if lhs.len() != 2 || rhs.len() != 2 || lhs[1] != rhs[0] {
            return Err(GraphError::ShapeMismatch {
                expected: lhs.to_vec(),
                got: rhs.to_vec(),
                message: format!(
                    "MatMul节点的两个父节点{}与{}形状不兼容：须均为2阶，且前者的列数等于后者的行数",
                    parents[0], parents[1]
                ),
            });
        }
        Ok(Self {
            shape: vec![lhs[0], rhs[1]],
        })
    }
}

impl TraitNode for MatMul {
    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].mat_mul(parents[1]))
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        match parent_index {
            0 => Ok(upstream_grad.mat_mul(&parents[1].transpose())),
            1 => Ok(parents[0].transpose().mat_mul(upstream_grad)),
            _ => Err(parent_index_error("MatMul", parent_index)),
        }
    }
}
