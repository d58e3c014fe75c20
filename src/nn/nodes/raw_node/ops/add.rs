use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 逐元素加法节点。
///
/// 除形状严格一致的情况外，还支持行向量广播：父节点形状为[batch, n]与[1, n]时，
/// 行向量（典型地是偏置）被广播到batch的每一行；此时传给行向量父节点的梯度是
/// 上游梯度沿行方向的求和。
#[derive(Clone)]
pub(crate) struct Add {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    shape: Vec<usize>,
}

impl Add {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "Add节点需要2个父节点".to_string(),
            ));
        }

        let shape1 = parents[0].value_expected_shape();
        let shape2 = parents[1].value_expected_shape();
        if !compatible(shape1, shape2) {
            return Err(GraphError::ShapeMismatch {
                expected: shape1.to_vec(),
                got: shape2.to_vec(),
                message: "Add的两个父节点形状必须一致，或其中一方为可广播的行向量[1, n]。"
                    .to_string(),
            });
        }

        // 输出形状取行数较大的一方
        let shape = if shape1[0] >= shape2[0] { shape1 } else { shape2 };

        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            shape: shape.to_vec(),
        })
    }
}

fn compatible(shape1: &[usize], shape2: &[usize]) -> bool {
    shape1 == shape2
        || (shape1.len() == 2
            && shape2.len() == 2
            && shape1[1] == shape2[1]
            && (shape1[0] == 1 || shape2[0] == 1))
}

impl TraitNode for Add {
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

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(format!(
            "Add节点{}的值由前向传播计算，不应被手动设置",
            self.name()
        )))
    }

    fn clear_value(&mut self) -> Result<(), GraphError> {
        self.value = None;
        Ok(())
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let value1 = parents[0].value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}的第一个父节点没有值", self.name()))
        })?;
        let value2 = parents[1].value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}的第二个父节点没有值", self.name()))
        })?;

        if !compatible(value1.shape(), value2.shape()) {
            return Err(GraphError::ShapeMismatch {
                expected: value1.shape().to_vec(),
                got: value2.shape().to_vec(),
                message: format!("Add节点'{}'的两个父节点值形状不兼容。", self.name()),
            });
        }

        self.value = Some(value1 + value2);
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let parent_value = target_parent.value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}没有值，无法计算梯度", target_parent))
        })?;

        if parent_value.shape() == upstream_grad.shape() {
            Ok(upstream_grad.clone())
        } else {
            // 被广播的行向量父节点：梯度沿行方向求和回[1, n]
            Ok(upstream_grad.sum_rows())
        }
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
