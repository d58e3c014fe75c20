use crate::nn::{GraphError, Var};

/// 优化器trait（PyTorch风格）。
///
/// # 设计要点
/// - 优化器创建时绑定特定参数（通过Var）
/// - `backward()`计算所有参数的梯度（由Var调用）
/// - `step()`只更新优化器绑定的参数
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = Sgd::new(&graph, &model.parameters(), 0.01);
///
/// // 训练循环
/// optimizer.zero_grad()?;
/// let loss_val = loss.backward()?;
/// optimizer.step()?;
///
/// // 或者一步完成
/// let loss_val = optimizer.minimize(&loss)?;
/// ```
pub trait Optimizer {
    /// 清零绑定参数的梯度。
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 用已计算的梯度更新参数。
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成：zero_grad + forward + backward + step。
    ///
    /// # 返回
    /// loss的标量值
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    /// 获取学习率。
    fn learning_rate(&self) -> f32;

    /// 设置学习率。
    fn set_learning_rate(&mut self, lr: f32);
}
