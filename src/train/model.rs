//! 固定拓扑的MNIST多层感知机。

use crate::nn::{Graph, GraphError, Linear, Module, Var, VarActivationOps};

/// MNIST MLP。
///
/// 网络结构: Input(784) -> Linear(128) + ReLU -> Linear(64) + ReLU -> Linear(10)
///
/// 三个命名的全连接阶段以普通结构体字段的形式静态组合；
/// 拓扑固定，不需要任何运行时多态或模块注册机制。
pub struct MnistMlp {
    fc1: Linear,
    fc2: Linear,
    fc3: Linear,
}

impl MnistMlp {
    /// 输入展平后的维度（28x28）。
    pub const INPUT_DIM: usize = 784;
    /// 输出类别数。
    pub const NUM_CLASSES: usize = 10;

    pub fn new(graph: &Graph) -> Result<Self, GraphError> {
        Ok(Self {
            fc1: Linear::new(graph, Self::INPUT_DIM, 128, true, "fc1")?,
            fc2: Linear::new(graph, 128, 64, true, "fc2")?,
            fc3: Linear::new(graph, 64, Self::NUM_CLASSES, true, "fc3")?,
        })
    }

    /// 前向传播：前两个阶段后接ReLU，最后一个阶段直接输出logits。
    pub fn forward(&self, x: &Var) -> Var {
        let h1 = self.fc1.forward(x).relu();
        let h2 = self.fc2.forward(&h1).relu();
        self.fc3.forward(&h2)
    }
}

impl Module for MnistMlp {
    fn parameters(&self) -> Vec<Var> {
        [
            self.fc1.parameters(),
            self.fc2.parameters(),
            self.fc3.parameters(),
        ]
        .concat()
    }
}
