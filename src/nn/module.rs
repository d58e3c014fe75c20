use super::Var;

/// 模块trait。
///
/// # 设计原则
/// - `forward()`**不是**trait方法（各模块签名各异）
/// - `new()`**不是**trait方法（参数各异）
/// - `parameters()`返回`Vec<Var>`（签名一致，放入trait）
/// - 由于Var携带图引用，`forward()`不需要`&Graph`参数
///
/// # 使用示例
///
/// ```ignore
/// use micro_torch::nn::{Graph, GraphError, Linear, Module, Var, VarActivationOps};
///
/// struct Mlp {
///     fc1: Linear,
///     fc2: Linear,
/// }
///
/// impl Mlp {
///     fn new(graph: &Graph) -> Result<Self, GraphError> {
///         Ok(Mlp {
///             fc1: Linear::new(graph, 784, 128, true, "fc1")?,
///             fc2: Linear::new(graph, 128, 10, true, "fc2")?,
///         })
///     }
///
///     fn forward(&self, x: &Var) -> Var {
///         let h = self.fc1.forward(x).relu();
///         self.fc2.forward(&h)
///     }
/// }
///
/// impl Module for Mlp {
///     fn parameters(&self) -> Vec<Var> {
///         [self.fc1.parameters(), self.fc2.parameters()].concat()
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数。
    ///
    /// 这是Module trait唯一必须实现的方法，供优化器确定要更新哪些参数。
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数节点数量。
    fn num_params(&self) -> usize {
        self.parameters().len()
    }
}
