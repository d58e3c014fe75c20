use std::cell::RefCell;
use std::rc::Rc;

use super::base::Optimizer;
use crate::nn::{Graph, GraphError, GraphInner, NodeId, Var};

/// 随机梯度下降优化器：θ = θ - α * ∇θ。
///
/// 固定学习率的朴素SGD，无动量、无学习率调度、无内部状态。
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Sgd::new(&graph, &model.parameters(), 0.01);
/// optimizer.zero_grad()?;
/// loss.backward()?;
/// optimizer.step()?;
/// ```
pub struct Sgd {
    /// 图引用
    graph: Rc<RefCell<GraphInner>>,
    /// 要优化的参数节点ID
    params: Vec<NodeId>,
    /// 学习率
    lr: f32,
}

impl Sgd {
    /// 创建新的SGD优化器。
    ///
    /// # 参数
    /// - `graph`: 图句柄
    /// - `params`: 要优化的参数Var列表
    /// - `lr`: 学习率
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.iter().map(Var::node_id).collect(),
            lr,
        }
    }
}

impl Optimizer for Sgd {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            g.clear_node_grad(node_id)?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for &node_id in &self.params {
            if let Some(grad) = g.get_node_grad(node_id)? {
                let current = g.get_node_value(node_id)?.ok_or_else(|| {
                    GraphError::ComputationError(format!("参数节点{node_id:?}没有值"))
                })?;
                let new_value = current - self.lr * &grad;
                g.set_node_value(node_id, Some(&new_value))?;
            }
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }
}
