use std::rc::Rc;

use crate::nn::Var;

/// 激活函数扩展trait。
///
/// 提供激活函数的链式调用：
/// - `relu()`: 标准`ReLU`
/// - `leaky_relu(alpha)`: 负半轴斜率为alpha的`LeakyReLU`
///
/// # 使用示例
/// ```ignore
/// use micro_torch::nn::VarActivationOps;
///
/// let h = fc1.forward(&x).relu();
/// ```
pub trait VarActivationOps {
    /// `ReLU`激活：max(0, x)
    fn relu(&self) -> Var;

    /// `LeakyReLU`激活：x if x > 0 else alpha * x
    fn leaky_relu(&self, alpha: f64) -> Var;
}

impl VarActivationOps for Var {
    fn relu(&self) -> Var {
        let id = self
            .graph()
            .borrow_mut()
            .new_relu_node(self.node_id(), None)
            .expect("创建ReLU节点失败");
        Self::new(id, Rc::clone(self.graph()))
    }

    fn leaky_relu(&self, alpha: f64) -> Var {
        let id = self
            .graph()
            .borrow_mut()
            .new_leaky_relu_node(self.node_id(), alpha, None)
            .expect("创建LeakyReLU节点失败");
        Self::new(id, Rc::clone(self.graph()))
    }
}
