use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, NodeId};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// Softmax + CrossEntropy融合损失节点。
///
/// 将Softmax激活和交叉熵损失合并为单一节点：
/// 1. 数值稳定性：使用log-sum-exp技巧避免溢出
/// 2. 梯度简洁：dL/dx = (softmax(x) - y) / batch
///
/// ## 输入
/// - 父节点0: logits（未经softmax的原始分数，[batch, num_classes]）
/// - 父节点1: labels（one-hot编码的真实标签，[batch, num_classes]）
///
/// ## 输出
/// - 标量损失[1, 1]，取batch内各样本损失的平均值
///
/// ## 数值稳定计算
/// ```text
/// softmax(x)_i = exp(x_i - max(x)) / Σ exp(x_j - max(x))
/// L = -Σ y_i * (x_i - max(x) - log(Σ exp(x_j - max(x))))
/// ```
#[derive(Clone)]
pub(crate) struct SoftmaxCrossEntropy {
    id: Option<NodeId>,
    name: Option<String>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
    /// 输出形状固定为[1, 1]（标量损失）
    shape: Vec<usize>,
    /// 缓存softmax结果，用于反向传播
    softmax_cache: Option<Tensor>,
    /// 缓存labels，用于反向传播
    labels_cache: Option<Tensor>,
    /// 父节点ID，用于区分logits和labels
    parents_ids: Vec<NodeId>,
}

impl SoftmaxCrossEntropy {
    pub(crate) fn new(parents: &[&NodeHandle]) -> Result<Self, GraphError> {
        if parents.len() != 2 {
            return Err(GraphError::InvalidOperation(
                "SoftmaxCrossEntropy节点需要2个父节点（logits和labels）".to_string(),
            ));
        }

        let logits_shape = parents[0].value_expected_shape();
        let labels_shape = parents[1].value_expected_shape();
        if logits_shape != labels_shape {
            return Err(GraphError::ShapeMismatch {
                expected: logits_shape.to_vec(),
                got: labels_shape.to_vec(),
                message: "logits和labels形状必须相同。".to_string(),
            });
        }

        Ok(Self {
            id: None,
            name: None,
            value: None,
            grad: None,
            shape: vec![1, 1],
            softmax_cache: None,
            labels_cache: None,
            parents_ids: vec![parents[0].id(), parents[1].id()],
        })
    }

    /// 数值稳定的softmax，逐行（逐样本）计算。
    /// 输入/输出: [batch, num_classes]
    fn stable_softmax_batch(logits: &Tensor) -> Tensor {
        let shape = logits.shape();
        let batch_size = shape[0];
        let num_classes = shape[1];

        let mut result = Tensor::zeros(shape);
        for b in 0..batch_size {
            let mut max_val = logits[[b, 0]];
            for c in 1..num_classes {
                if logits[[b, c]] > max_val {
                    max_val = logits[[b, c]];
                }
            }

            let mut sum_exp = 0.0f32;
            for c in 0..num_classes {
                let exp_val = (logits[[b, c]] - max_val).exp();
                result[[b, c]] = exp_val;
                sum_exp += exp_val;
            }

            for c in 0..num_classes {
                result[[b, c]] /= sum_exp;
            }
        }
        result
    }

    /// 数值稳定的交叉熵损失，返回batch内的平均损失。
    fn stable_cross_entropy_batch(logits: &Tensor, labels: &Tensor) -> f32 {
        let shape = logits.shape();
        let batch_size = shape[0];
        let num_classes = shape[1];

        let mut total_loss = 0.0f32;
        for b in 0..batch_size {
            let mut max_val = logits[[b, 0]];
            for c in 1..num_classes {
                if logits[[b, c]] > max_val {
                    max_val = logits[[b, c]];
                }
            }

            let mut sum_exp = 0.0f32;
            for c in 0..num_classes {
                sum_exp += (logits[[b, c]] - max_val).exp();
            }
            let log_sum_exp = sum_exp.ln();

            // L = -Σ y_i * (x_i - max - log_sum_exp)；one-hot标签下点积只留真类分量
            let mut dot_product = 0.0f32;
            for c in 0..num_classes {
                dot_product += logits[[b, c]] * labels[[b, c]];
            }
            total_loss += -dot_product + max_val + log_sum_exp;
        }

        total_loss / batch_size as f32
    }
}

impl TraitNode for SoftmaxCrossEntropy {
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
            "SoftmaxCrossEntropy节点{}的值由前向传播计算，不应被手动设置",
            self.name()
        )))
    }

    fn clear_value(&mut self) -> Result<(), GraphError> {
        self.value = None;
        self.softmax_cache = None;
        self.labels_cache = None;
        Ok(())
    }

    fn value_expected_shape(&self) -> &[usize] {
        &self.shape
    }

    fn calc_value_by_parents(&mut self, parents: &[NodeHandle]) -> Result<(), GraphError> {
        let logits = parents[0].value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}的logits父节点没有值", self.name()))
        })?;
        let labels = parents[1].value().ok_or_else(|| {
            GraphError::ComputationError(format!("{}的labels父节点没有值", self.name()))
        })?;

        if logits.shape() != labels.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: logits.shape().to_vec(),
                got: labels.shape().to_vec(),
                message: format!("{}的logits与labels值形状必须相同。", self.name()),
            });
        }

        // 缓存softmax和labels用于反向传播
        self.softmax_cache = Some(Self::stable_softmax_batch(logits));
        self.labels_cache = Some(labels.clone());

        let loss = Self::stable_cross_entropy_batch(logits, labels);
        self.value = Some(Tensor::new(&[loss], &[1, 1]));

        Ok(())
    }

    /// 对logits: dL/d_logits = (softmax - labels) / batch_size。
    /// labels是常量，不参与梯度计算。
    fn calc_grad_to_parent(
        &self,
        target_parent: &NodeHandle,
        _upstream_grad: &Tensor,
        _assistant_parent: Option<&NodeHandle>,
    ) -> Result<Tensor, GraphError> {
        if target_parent.id() != self.parents_ids[0] {
            return Err(GraphError::InvalidOperation(
                "不应该对labels计算梯度".to_string(),
            ));
        }

        let softmax = self.softmax_cache.as_ref().ok_or_else(|| {
            GraphError::ComputationError("softmax缓存为空，需先执行前向传播".to_string())
        })?;
        let labels = self.labels_cache.as_ref().ok_or_else(|| {
            GraphError::ComputationError("labels缓存为空，需先执行前向传播".to_string())
        })?;

        let batch_size = softmax.shape()[0] as f32;
        Ok((softmax - labels) / batch_size)
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
