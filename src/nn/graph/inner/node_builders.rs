/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::raw_node::{
    Add, Bernoulli, ChannelArgMax, Conv2d, Divide, Gradient, Input, MatMul, Mean, Multiply,
    Parameter, ReLU, ScalarOp, Sigmoid, Sqrt, Square, State, Subtract, Sum, Tanh,
};
use crate::nn::nodes::{BorderMode, NodeHandle, ScalarOpKind};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

impl GraphInner {
    /// 添加节点到列表
    fn add_node_to_list(
        &mut self,
        mut node_handle: NodeHandle,
        name: Option<&str>,
        node_type: &str,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), node_type)?;
        self.next_id += 1;
        let node_id = NodeId(self.next_id);

        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        node_handle.bind_id_and_name(node_id, &node_name);
        self.node_names.insert(node_name, node_id);
        self.nodes.insert(node_id, node_handle);
        Ok(node_id)
    }

    fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.node_names.contains_key(name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    fn generate_valid_new_node_name(
        &self,
        base_name: &str,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if !base_name.is_empty() {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if !self.node_names.contains_key(&name) {
                return Ok(name);
            }
            counter += 1;
        }
    }

    // ========== 叶子 ==========

    pub fn new_input_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(Input::new(shape)?);
        self.add_node_to_list(node, name, "input", &[])
    }

    /// 创建参数节点并设置初始值
    pub fn new_parameter_node(
        &mut self,
        init_value: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(Parameter::new(init_value.shape())?);
        let node_id = self.add_node_to_list(node, name, "parameter", &[])?;
        self.set_node_value(node_id, Some(init_value))?;
        Ok(node_id)
    }

    /// 创建置零的状态节点
    pub fn new_state_node(
        &mut self,
        shape: &[usize],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let node = NodeHandle::new(State::new(shape)?);
        let node_id = self.add_node_to_list(node, name, "state", &[])?;
        self.set_node_value(node_id, Some(&Tensor::zeros(shape)))?;
        Ok(node_id)
    }

    /// 按名称查找状态节点，不存在则以全零创建。
    /// 同名节点已存在但不是同形状的状态节点时报错
    pub fn find_or_new_state_node(
        &mut self,
        name: &str,
        shape: &[usize],
    ) -> Result<NodeId, GraphError> {
        if let Some(node_id) = self.find_node_by_name(name) {
            let node = self.get_node(node_id)?;
            if !matches!(node.node_type(), crate::nn::nodes::NodeType::State(_)) {
                return Err(GraphError::InvalidOperation(format!(
                    "{node}已存在，但不是状态节点"
                )));
            }
            if node.value_expected_shape() != shape {
                return Err(GraphError::ShapeMismatch {
                    expected: shape.to_vec(),
                    got: node.value_expected_shape().to_vec(),
                    message: format!("已存在的状态{node}形状不一致"),
                });
            }
            return Ok(node_id);
        }
        let node_id = self.new_state_node(shape, Some(name))?;
        log::debug!("创建状态节点{name}，形状{shape:?}");
        Ok(node_id)
    }

    // ========== 梯度 ==========

    /// 创建符号梯度节点 d(cost)/d(target)
    pub fn new_gradient_node(
        &mut self,
        cost_id: NodeId,
        target_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let cost = self.get_node(cost_id)?;
        if cost.value_expected_shape().iter().product::<usize>() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "代价{cost}必须是标量，但其形状为{:?}",
                cost.value_expected_shape()
            )));
        }
        let target = self.get_node(target_id)?;
        if !target.node_type().is_updatable() {
            return Err(GraphError::InvalidOperation(format!(
                "只能对参数或状态节点求梯度，但{target}不是"
            )));
        }
        let node = NodeHandle::new(Gradient::new(
            cost_id,
            target_id,
            target.value_expected_shape(),
        ));
        self.add_node_to_list(node, name, "gradient", &[cost_id, target_id])
    }

    // ========== 逐元素二元算子 ==========

    pub fn new_add_node(
        &mut self,
        left_node_id: NodeId,
        right_node_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_node_id, right_node_id];
        let handle = NodeHandle::new(Add::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, "add", &parents)
    }

    pub fn new_subtract_node(
        &mut self,
        left_node_id: NodeId,
        right_node_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_node_id, right_node_id];
        let handle = NodeHandle::new(Subtract::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, "subtract", &parents)
    }

    pub fn new_multiply_node(
        &mut self,
        left_node_id: NodeId,
        right_node_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_node_id, right_node_id];
        let handle = NodeHandle::new(Multiply::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, "multiply", &parents)
    }

    pub fn new_divide_node(
        &mut self,
        left_node_id: NodeId,
        right_node_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_node_id, right_node_id];
        let handle = NodeHandle::new(Divide::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, "divide", &parents)
    }

    pub fn new_scalar_op_node(
        &mut self,
        parent_id: NodeId,
        kind: ScalarOpKind,
        scalar: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(ScalarOp::new(
            &self.get_nodes(&[parent_id])?,
            kind,
            scalar,
        )?);
        self.add_node_to_list(handle, name, "scalar_op", &[parent_id])
    }

    // ========== 逐元素一元算子 ==========

    pub fn new_sqrt_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Sqrt::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "sqrt", &[parent_id])
    }

    pub fn new_square_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Square::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "square", &[parent_id])
    }

    pub fn new_tanh_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Tanh::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "tanh", &[parent_id])
    }

    pub fn new_sigmoid_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Sigmoid::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "sigmoid", &[parent_id])
    }

    pub fn new_relu_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(ReLU::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "relu", &[parent_id])
    }

    // ========== 矩阵/卷积 ==========

    pub fn new_mat_mul_node(
        &mut self,
        left_node_id: NodeId,
        right_node_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [left_node_id, right_node_id];
        let handle = NodeHandle::new(MatMul::new(&self.get_nodes(&parents)?)?);
        self.add_node_to_list(handle, name, "mat_mul", &parents)
    }

    pub fn new_conv2d_node(
        &mut self,
        input_id: NodeId,
        kernel_id: NodeId,
        stride: (usize, usize),
        border_mode: BorderMode,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let parents = [input_id, kernel_id];
        let handle = NodeHandle::new(Conv2d::new(
            &self.get_nodes(&parents)?,
            stride,
            border_mode,
        )?);
        self.add_node_to_list(handle, name, "conv2d", &parents)
    }

    pub fn new_channel_arg_max_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(ChannelArgMax::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "channel_arg_max", &[parent_id])
    }

    // ========== 归约 ==========

    pub fn new_sum_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Sum::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "sum", &[parent_id])
    }

    pub fn new_mean_node(
        &mut self,
        parent_id: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Mean::new(&self.get_nodes(&[parent_id])?)?);
        self.add_node_to_list(handle, name, "mean", &[parent_id])
    }

    // ========== 随机 ==========

    /// 创建伯努利掩码节点，每个元素以`keep_prob`的概率取1
    pub fn new_bernoulli_node(
        &mut self,
        shape: &[usize],
        keep_prob: f32,
        rng: StdRng,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let handle = NodeHandle::new(Bernoulli::new(shape, keep_prob, rng)?);
        self.add_node_to_list(handle, name, "bernoulli", &[])
    }
}
