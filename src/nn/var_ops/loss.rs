use std::rc::Rc;

use crate::nn::{GraphError, Var};

/// 损失函数扩展trait。
///
/// # 使用示例
/// ```ignore
/// use micro_torch::nn::VarLossOps;
///
/// let loss = logits.cross_entropy(&labels)?;
/// ```
pub trait VarLossOps {
    /// Cross Entropy Loss（内含Softmax）。
    ///
    /// # 参数
    /// - `target`: 目标标签（one-hot编码，[batch, num_classes]）
    ///
    /// # 返回
    /// 标量损失值节点（batch平均）
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn cross_entropy(&self, target: &Var) -> Result<Var, GraphError> {
        self.assert_same_graph(target);
        let id = self.graph().borrow_mut().new_softmax_cross_entropy_node(
            self.node_id(),
            target.node_id(),
            None,
        )?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
