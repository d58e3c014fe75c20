//! Input节点：值由外部通过`set_value`设置的输入节点。
//!
//! # 动态batch支持
//! Input支持动态batch：第一维可以是任意值，其余特征维在`set_value`时严格校验。
//! 这使得同一个计算图可以处理不同batch_size的输入（如每个epoch末尾的不完整batch）。

use super::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

#[derive(Clone)]
pub(crate) struct Input {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    // 注：Input节点没有grad字段，输入数据不参与梯度更新
    /// 特征形状（不含batch维），`set_value`时校验
    feature_shape: Vec<usize>,
    /// 创建时的完整形状（首维为占位batch）
    fixed_shape: Vec<usize>,
}

impl Input {
    pub(crate) fn new(shape: &[usize]) -> Result<Self, GraphError> {
        if shape.len() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: shape.len(),
                message: "输入张量必须是2维（[batch, features]）。".to_string(),
            });
        }

        Ok(Self {
            id: None,
            name: None,
            value: None,
            feature_shape: shape[1..].to_vec(),
            fixed_shape: shape.to_vec(),
        })
    }
}

impl TraitNode for Input {
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
            // batch维自由，特征维必须严格一致，绝不静默截断或填充
            if value.dimension() != self.fixed_shape.len()
                || value.shape()[1..] != self.feature_shape[..]
            {
                return Err(GraphError::ShapeMismatch {
                    expected: self.fixed_shape.clone(),
                    got: value.shape().to_vec(),
                    message: format!(
                        "输入节点的特征维必须为{:?}（batch维可变）。",
                        self.feature_shape
                    ),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    fn clear_value(&mut self) -> Result<(), GraphError> {
        self.value = None;
        Ok(())
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.fixed_shape
    }

    fn calc_value_by_parents(&mut self, _parents: &[NodeHandle]) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "输入节点{}的值应通过set_value设置，而非由前向传播计算",
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
            "输入节点{}没有父节点",
            self.name()
        )))
    }

    fn grad(&self) -> Option<&Tensor> {
        None
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        if grad.is_some() {
            return Err(GraphError::InvalidOperation(format!(
                "输入节点{}不应该有梯度",
                self.name()
            )));
        }
        Ok(())
    }
}
