use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 矩阵乘法节点：C = A @ B。
///
/// VJP梯度：dL/dA = G @ Bᵀ，dL/dB = Aᵀ @ G（G为上游梯度）。
#[derive(Clone)]
pub(crate) struct MatMul {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    shape: Vec<usize>,
    parents_ids: Vec<NodeId>, // NOTE: 顺序即(A, B)
}

impl MatMul {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "MatMul节点需要2个父节点".to_string(),
            ));
        }

        let shape1 = parents[0].value_expected_shape();
        let shape2 = parents[1].value_expected_shape();
        if shape1.len() != 2 || shape2.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "MatMul的两个父节点都必须是2阶张量".to_string(),
            ));
        }
        if shape1[1] != shape2[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![shape1[0], shape2[1]],
                got: vec![shape1[1], shape2[0]],
                message: format!(
                    "MatMul的两个父节点形状不兼容：父节点1的列数({})与父节点2的行数({})不相等。",
                    shape1[1], shape2[0],
                ),
            });
        }

        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            shape: vec![shape1[0], shape2[1]],
            parents_ids: vec![parents[0].id(), parents[1].id()],
        })
    }
}

impl TraitNode for MatMul {
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
            "MatMul节点{}的值由前向传播计算，不应被手动设置",
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

        if value1.shape()[1] != value2.shape()[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![value1.shape()[0], value2.shape()[1]],
                got: vec![value1.shape()[1], value2.shape()[0]],
                message: format!(
                    "MatMul节点'{}'的两个父节点值形状不兼容：父节点1的列数({})与父节点2的行数({})不相等。",
                    self.name(),
                    value1.shape()[1],
                    value2.shape()[0],
                ),
            });
        }

        self.value = Some(value1.mat_mul(value2));
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        upstream_grad: &Tensor,
        assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        let other = assistant_parent.ok_or_else(|| {
            GraphError::ComputationError("MatMul需要另一个父节点参与梯度计算".to_string())
        })?;
        let other_value = other
            .value()
            .ok_or_else(|| GraphError::ComputationError(format!("{other}没有值")))?;

        if target_parent.id() == self.parents_ids[0] {
            // dL/dA = G @ Bᵀ
            Ok(upstream_grad.mat_mul(&other_value.transpose()))
        } else if target_parent.id() == self.parents_ids[1] {
            // dL/dB = Aᵀ @ G
            Ok(other_value.transpose().mat_mul(upstream_grad))
        } else {
            Err(GraphError::ComputationError(format!(
                "节点id`{:?}`不是当前节点的父节点id`{:?}`或`{:?}`",
                target_parent.id(),
                self.parents_ids[0],
                self.parents_ids[1]
            )))
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
