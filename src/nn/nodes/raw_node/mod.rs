mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::SoftmaxCrossEntropy;
pub(in crate::nn) use ops::{Add, LeakyReLU, MatMul};
pub(in crate::nn) use parameter::Parameter;

use enum_dispatch::enum_dispatch;

use super::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[enum_dispatch]
#[derive(Clone)]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    Add(Add),
    MatMul(MatMul),
    LeakyReLU(LeakyReLU),
    SoftmaxCrossEntropy(SoftmaxCrossEntropy),
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    fn id(&self) -> NodeId;

    fn set_id(&mut self, id: NodeId);

    fn name(&self) -> &str;

    fn set_name(&mut self, name: &str);

    /// 获取本节点的实际值（张量）。
    fn value(&self) -> Option<&Tensor>;

    /// 设置本节点的实际值。只有输入/参数类型节点的值可被外部设置。
    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError>;

    fn clear_value(&mut self) -> Result<(), GraphError>;

    /// 节点创建时即确定的预期输出形状（输入节点的首维为占位batch）。
    fn value_expected_shape(&self) -> &[usize];

    /// 根据父节点的值计算本节点的值。
    /// 注：该接口只在图的前向传播中使用，调用前所有父节点的值都已计算完毕。
    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError>;

    /// 计算本节点传给某个父节点的梯度（VJP模式）。
    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError>;

    fn grad(&self) -> Option<&Tensor>;

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError>;

    fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.set_grad(None)
    }
}
