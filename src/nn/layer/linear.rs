//! Linear（全连接）层。

use crate::nn::{Graph, GraphError, Init, Module, Var, VarMatrixOps};

/// Linear（全连接）层。
///
/// PyTorch风格的全连接层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
///
/// 偏置形状为[1, out_features]，前向传播时经Add节点的行广播作用到batch的
/// 每一行，因此同一个图可以处理任意batch大小（包括epoch末尾的不完整batch）。
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(&graph, 784, 128, true, "fc1")?;
/// let h = fc.forward(&x).relu();  // 链式调用
/// ```
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Var,
    /// 偏置参数 [1, out_features]（可选）
    bias: Option<Var>,
    /// 输入特征维度
    in_features: usize,
    /// 输出特征维度
    out_features: usize,
}

impl Linear {
    /// 创建新的Linear层。
    ///
    /// # 参数
    /// - `graph`: 计算图句柄
    /// - `in_features`: 输入特征维度
    /// - `out_features`: 输出特征维度
    /// - `use_bias`: 是否使用偏置
    /// - `name`: 层名称前缀（参数节点命名为`{name}_W`、`{name}_b`）
    pub fn new(
        graph: &Graph,
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        name: &str,
    ) -> Result<Self, GraphError> {
        // 权重参数：Kaiming初始化适合ReLU
        let weights = graph.parameter(
            &[in_features, out_features],
            Init::Kaiming,
            &format!("{name}_W"),
        )?;

        // 偏置参数（可选）：零初始化
        let bias = if use_bias {
            Some(graph.parameter(&[1, out_features], Init::Zeros, &format!("{name}_b"))?)
        } else {
            None
        };

        Ok(Self {
            weights,
            bias,
            in_features,
            out_features,
        })
    }

    /// 前向传播：计算`x @ W + b`。
    ///
    /// # 参数
    /// - `x`: 输入Var，形状[batch_size, in_features]
    ///
    /// # 返回
    /// 输出Var，形状[batch_size, out_features]
    ///
    /// # Panics
    /// 如果输入形状与层不匹配
    pub fn forward(&self, x: &Var) -> Var {
        // x @ W: [batch, in] @ [in, out] = [batch, out]
        let xw = x.matmul(&self.weights).expect("Linear matmul失败");

        match &self.bias {
            // [batch, out] + [1, out]，Add节点行广播
            Some(bias) => &xw + bias,
            None => xw,
        }
    }

    /// 获取输入特征维度。
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// 获取输出特征维度。
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// 获取权重Var。
    pub fn weights(&self) -> &Var {
        &self.weights
    }

    /// 获取偏置Var（如果有）。
    pub fn bias(&self) -> Option<&Var> {
        self.bias.as_ref()
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<Var> {
        let mut params = vec![self.weights.clone()];
        if let Some(ref bias) = self.bias {
            params.push(bias.clone());
        }
        params
    }
}
