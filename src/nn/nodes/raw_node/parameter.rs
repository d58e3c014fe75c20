//! Parameter节点：可训练参数。值只在两处被修改：
//! 创建时的初始化，以及优化器的更新步骤。

use super::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[derive(Clone)]
pub(crate) struct Parameter {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    shape: Vec<usize>,
}

impl Parameter {
    pub(crate) fn new(shape: &[usize], init_value: Tensor) -> Result<Self, GraphError> {
        // 全连接网络的参数只有权重[in, out]与偏置[1, out]两种，都是2维
        if shape.len() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: shape.len(),
                message: "参数张量必须是2维（权重[in, out]或偏置[1, out]）。".to_string(),
            });
        }
        if init_value.shape() != shape {
            return Err(GraphError::ShapeMismatch {
                expected: shape.to_vec(),
                got: init_value.shape().to_vec(),
                message: "参数初始值的形状与声明不符。".to_string(),
            });
        }

        Ok(Self {
            id: None,
            name: None,
            value: Some(init_value),
            grad: None,
            shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Parameter {
    fn id(&self) -> NodeId {
        self.id.unwrap()
    }

    fn set_id(&mut self, id: NodeId) {
        self.id = Some(id);
    }

    fn name(&self) -> &str {
        self.name.as_ref().unwrap()
    }

    fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(value) = value {
            if value.shape() != self.shape {
                return Err(GraphError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: value.shape().to_vec(),
                    message: "参数的形状在创建后不可改变。".to_string(),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    fn clear_value(&mut self) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "参数节点{}的值不应被清除",
            self.name()
        )))
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[NodeHandle]) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "参数节点{}没有父节点，不应被前向传播计算",
            self.name()
        )))
    }

    fn calc_grad_to_parent(
        &self,
        _target_parent: &NodeHandle,
        _upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "参数节点{}没有父节点",
            self.name()
        )))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
