mod raw_node;

pub(in crate::nn) use raw_node::{NodeType, TraitNode};
use raw_node::{Add, Input, LeakyReLU, MatMul, Parameter, SoftmaxCrossEntropy};

use std::fmt;

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 节点ID，在所属的图内唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// 节点句柄：图中统一持有的节点包装，承载具体节点与前向传播状态。
#[derive(Clone)]
pub(in crate::nn) struct NodeHandle {
    raw_node: NodeType,
    last_forward_pass_id: u64,
}

impl NodeHandle {
    fn wrap<T: Into<NodeType>>(raw_node: T) -> Self {
        Self {
            raw_node: raw_node.into(),
            last_forward_pass_id: 0,
        }
    }

    // ==================== 构造 ====================

    pub fn new_input(shape: &[usize]) -> Result<Self, GraphError> {
        Ok(Self::wrap(Input::new(shape)?))
    }

    pub fn new_parameter(shape: &[usize], init_value: Tensor) -> Result<Self, GraphError> {
        Ok(Self::wrap(Parameter::new(shape, init_value)?))
    }

    pub fn new_add(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::wrap(Add::new(parents)?))
    }

    pub fn new_mat_mul(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::wrap(MatMul::new(parents)?))
    }

    pub fn new_leaky_relu(
        parents: &[&NodeHandle],
        negative_slope: f64,
    ) -> Result<Self, GraphError> {
        Ok(Self::wrap(LeakyReLU::new(parents, negative_slope)?))
    }

    pub fn new_softmax_cross_entropy(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        Ok(Self::wrap(SoftmaxCrossEntropy::new(parents)?))
    }

    // ==================== 基础访问 ====================

    pub fn id(&self) -> NodeId {
        self.raw_node.id()
    }

    pub fn name(&self) -> &str {
        self.raw_node.name()
    }

    /// 节点入图时由图统一绑定ID与名称。
    pub fn bind_id_and_name(&mut self, id: NodeId, name: &str) {
        self.raw_node.set_id(id);
        self.raw_node.set_name(name);
    }

    pub fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    // ==================== 值与梯度 ====================

    pub fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub fn has_value(&self) -> bool {
        self.raw_node.value().is_some()
    }

    pub fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub fn clear_value(&mut self) -> Result<(), GraphError> {
        self.raw_node.clear_value()
    }

    pub fn value_expected_shape(&self) -> &[usize] {
        self.raw_node.value_expected_shape()
    }

    pub fn grad(&self) -> Option<&Tensor> {
        self.raw_node.grad()
    }

    pub fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_grad(grad)
    }

    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.raw_node.clear_grad()
    }

    // ==================== 前向/反向计算 ====================

    pub fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents)
    }

    /// 计算本节点传给某个父节点的梯度（VJP）。
    /// `assistant_parent`是参与同一运算的另一个父节点（如有）。
    pub fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(target_parent, upstream_grad, assistant_parent)
    }

    pub fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub fn set_last_forward_pass_id(&mut self, pass_id: u64) {
        self.last_forward_pass_id = pass_id;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[{}]", self.raw_node.name())
    }
}
