//! GraphInner的VJP反向传播。

use std::collections::{HashMap, HashSet};

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::nodes::NodeType;
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl GraphInner {
    /// 反向传播：从标量损失节点出发，沿反拓扑序把梯度传播到所有参数节点。
    ///
    /// 返回损失的标量值。传播结束后释放中间节点的值与梯度，
    /// 参数节点的梯度保留并跨backward调用累积（由`zero_grad`显式清零）。
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        if !self.is_train_mode() {
            eprintln!("[micro_torch 警告] 在no_grad/eval模式下调用backward，这通常是误用。");
        }

        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("损失{loss_node}没有值，请先执行forward"))
        })?;
        if loss_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求损失为标量[1, 1]，但得到{:?}",
                loss_value.shape()
            )));
        }
        let loss_scalar = loss_value.number().unwrap();

        self.reset_intermediate_grad();

        // 损失对自身的梯度为1
        self.get_node_mut(loss_id)?
            .set_grad(Some(&Tensor::ones(&[1, 1])))?;

        let topo_order = self.topological_sort_backward(loss_id)?;
        for node_id in topo_order {
            self.propagate_grad_to_parents(node_id)?;
        }

        self.release_intermediate_results()?;

        Ok(loss_scalar)
    }

    /// 将梯度从当前节点传播到其父节点（梯度已存在的前提下）。
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_ids = self.get_node_parents(node_id)?;
        if parent_ids.is_empty() {
            return Ok(());
        }

        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            let upstream_grad = match node.grad() {
                Some(grad) => grad,
                None => return Ok(()),
            };

            let mut grads = Vec::with_capacity(parent_ids.len());
            for parent_id in &parent_ids {
                let parent = self.get_node(*parent_id)?;

                // 输入节点（数据与标签）不接收梯度
                if let NodeType::Input(_) = parent.node_type() {
                    continue;
                }

                let assistant_parent_id =
                    parent_ids.iter().find(|&&id| id != *parent_id).copied();
                let assistant = assistant_parent_id
                    .map(|id| self.get_node(id))
                    .transpose()?;

                let parent_grad = node.calc_grad_to_parent(parent, upstream_grad, assistant)?;
                grads.push((*parent_id, parent_grad));
            }
            grads
        };

        for (parent_id, parent_grad) in parent_grads {
            let parent_node = self.get_node_mut(parent_id)?;
            if let Some(existing_grad) = parent_node.grad() {
                let new_grad = existing_grad + &parent_grad;
                parent_node.set_grad(Some(&new_grad))?;
            } else {
                parent_node.set_grad(Some(&parent_grad))?;
            }
        }

        Ok(())
    }

    /// 反向拓扑排序：只有当一个节点的全部（子图内）子节点都处理完毕、
    /// 其梯度累积完整后，才轮到它向父节点传播。
    fn topological_sort_backward(&self, loss_id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 1. 沿父边收集从loss可达的子图
        let mut reachable = HashSet::new();
        let mut stack = vec![loss_id];
        while let Some(node_id) = stack.pop() {
            if !reachable.insert(node_id) {
                continue;
            }
            stack.extend(self.get_node_parents(node_id)?);
        }

        // 2. 统计子图内每个节点还有多少个子节点未处理
        let mut pending_children: HashMap<NodeId, usize> = HashMap::new();
        for &node_id in &reachable {
            let count = self
                .get_node_children(node_id)?
                .iter()
                .filter(|child_id| reachable.contains(child_id))
                .count();
            pending_children.insert(node_id, count);
        }

        // 3. 从loss出发，子节点全部就绪的节点依次出队
        let mut order = Vec::with_capacity(reachable.len());
        let mut ready = vec![loss_id];
        while let Some(node_id) = ready.pop() {
            order.push(node_id);
            for parent_id in self.get_node_parents(node_id)? {
                if let Some(count) = pending_children.get_mut(&parent_id) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(parent_id);
                    }
                }
            }
        }

        Ok(order)
    }

    /// 清除所有节点的梯度。
    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        for node in self.nodes.values_mut() {
            let _ = node.clear_grad();
        }
        Ok(())
    }

    /// 清除单个节点的梯度。
    pub fn clear_node_grad(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self.get_node_mut(node_id)?;
        let _ = node.clear_grad();
        Ok(())
    }

    /// 清零梯度（PyTorch风格别名）。
    pub fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.clear_grad()
    }
}
