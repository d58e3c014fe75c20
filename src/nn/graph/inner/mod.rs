//! GraphInner：计算图的底层实现。
//!
//! 各impl块分散在子模块中：
//! - core.rs: 基础操作 + 前向传播 + train/eval模式
//! - backward.rs: VJP反向传播
//! - node_builders.rs: new_*_node

mod backward;
mod core;
mod node_builders;

use std::collections::HashMap;

use rand::rngs::StdRng;

use crate::nn::nodes::NodeHandle;
use crate::nn::NodeId;

/// 图的完整定义（核心实现）。
///
/// 用户通常通过`Graph`句柄使用此结构，需要底层操作时可经`graph.inner_mut()`访问。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    /// 正向边：parent_id -> child_ids
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 反向边：child_id -> parent_ids
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// 最后一次前向传播的id（用于单次传播内的重复计算去重）
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    pub(in crate::nn::graph) next_id: u64,
    pub(in crate::nn::graph) is_eval_mode: bool,
    /// 图级别的随机数生成器（用于参数初始化）。
    /// None表示使用默认的thread_rng（非确定性）。
    pub(in crate::nn::graph) rng: Option<StdRng>,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
