//! Var——智能变量句柄，携带图引用，支持算子重载和链式调用。

use std::cell::RefCell;
use std::ops::Add;
use std::rc::Rc;

use super::graph::{Graph, GraphError, GraphInner};
use super::NodeId;
use crate::tensor::Tensor;

// ==================== Init枚举 ====================

/// 参数初始化策略。
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He初始化（适用于`ReLU`）
    Kaiming,
    /// Xavier/Glorot初始化（适用于Sigmoid/Tanh）
    Xavier,
}

impl Init {
    /// 生成初始化后的Tensor（使用全局RNG）。
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal(*mean, *std, shape),
            Self::Kaiming => {
                let fan_in = shape[0];
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::normal(0.0, std, shape)
            }
            Self::Xavier => {
                let (fan_in, fan_out) = (shape[0], shape.get(1).copied().unwrap_or(1));
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::normal(0.0, std, shape)
            }
        }
    }

    /// 生成初始化后的Tensor（使用指定的RNG，确保可重复性）。
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut rand::rngs::StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
            Self::Kaiming => {
                let fan_in = shape[0];
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
            Self::Xavier => {
                let (fan_in, fan_out) = (shape[0], shape.get(1).copied().unwrap_or(1));
                let std = (2.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}

// ==================== Var结构 ====================

/// 智能变量句柄——携带图引用，支持算子重载和链式调用。
///
/// # 设计原则
/// - 持有`Rc<RefCell<GraphInner>>`引用，用户无需接触NodeId
/// - Clone语义（非Copy），开销极低（Rc clone）
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&images)?;          // 返回Var
/// let h = fc1.forward(&x).relu();         // 链式调用
/// let loss = logits.cross_entropy(&y)?;
/// let loss_val = loss.backward()?;        // 直接在Var上调用
/// ```
#[derive(Clone)]
pub struct Var {
    /// 节点ID
    id: NodeId,
    /// 图引用（用户不可见）
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    /// 创建新的Var（内部使用）。
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    /// 获取节点ID。
    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    /// 获取内部图引用（供trait和内部模块使用）。
    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个Var是否来自同一个Graph。
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取Var所属的Graph句柄。
    ///
    /// 即使原始Graph句柄已drop，此方法仍返回有效的Graph，
    /// 因为Var持有`GraphInner`的强引用（Rc）。
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 获取节点创建时确定的预期输出形状。
    pub fn value_expected_shape(&self) -> Vec<usize> {
        self.graph
            .borrow()
            .get_node_value_expected_shape(self.id)
            .expect("获取形状失败")
            .to_vec()
    }

    /// 断言两个Var来自同一个Graph，否则panic（供trait使用）。
    pub(crate) fn assert_same_graph(&self, other: &Self) {
        assert!(
            self.same_graph(other),
            "不能对来自不同Graph的Var进行操作"
        );
    }

    // ==================== 执行 ====================

    /// 前向传播。
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 反向传播（ensure-forward语义）。
    ///
    /// 自动先执行forward()确保loss值已计算，再执行反向传播。
    ///
    /// # 返回值
    /// loss的标量值
    pub fn backward(&self) -> Result<f32, GraphError> {
        let mut g = self.graph.borrow_mut();
        g.forward(self.id)?;
        g.backward(self.id)
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点的值（克隆的Tensor）。
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 设置节点的值。
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 获取标量值（假设是1x1 Tensor）。
    pub fn item(&self) -> Result<f32, GraphError> {
        let value = self.value()?.ok_or(GraphError::NodeNotFound(self.id))?;
        value
            .number()
            .ok_or_else(|| GraphError::InvalidOperation("Tensor不是标量".to_string()))
    }

    /// 获取节点的梯度。
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        self.graph.borrow().get_node_grad(self.id)
    }

    // ==================== 安全版本（返回Result）====================

    /// 安全的加法（返回Result）。
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        if !self.same_graph(other) {
            return Err(GraphError::InvalidOperation(
                "不能对来自不同Graph的Var进行加法".to_string(),
            ));
        }
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(&[self.id, other.id], None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }
}

// ==================== 算子重载 ====================

impl Add for &Var {
    type Output = Var;

    fn add(self, other: &Var) -> Var {
        self.try_add(other).expect("Var加法失败")
    }
}

impl Add for Var {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Add<Var> for &Var {
    type Output = Var;

    fn add(self, other: Var) -> Var {
        self + &other
    }
}

impl Add<&Self> for Var {
    type Output = Self;

    fn add(self, other: &Self) -> Self {
        &self + other
    }
}
