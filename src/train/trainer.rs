//! 训练驱动：构建网络、遍历数据，对每个batch执行
//! “清零梯度 → 前向 → 交叉熵损失 → 反向 → SGD更新”的固定循环。

use thiserror::Error;

use super::config::TrainConfig;
use super::model::MnistMlp;
use crate::data::{DataError, DataLoader, TensorDataset};
use crate::nn::{Graph, GraphError, Module, Optimizer, Sgd, Var, VarLossOps};
use crate::tensor::Tensor;

/// 训练过程的错误：数据与计算图两类协作方错误的汇聚。
/// 不捕获、不翻译、不重试，一路传播到进程边界。
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("数据错误: {0}")]
    Data(#[from] DataError),

    #[error("计算图错误: {0}")]
    Graph(#[from] GraphError),
}

/// 训练器。
///
/// 在整个运行周期内独占一个`Graph`、一个`MnistMlp`和一个`Sgd`优化器，
/// 没有任何隐藏的全局注册表；进程结束即丢弃，无持久化。
pub struct Trainer {
    config: TrainConfig,
    graph: Graph,
    model: MnistMlp,
    /// 输入占位节点 [batch, 784]（batch维动态）
    x: Var,
    /// 标签占位节点 [batch, 10]
    y: Var,
    logits: Var,
    loss: Var,
    optimizer: Sgd,
}

impl Trainer {
    /// 构建网络、损失节点与优化器。
    pub fn new(config: TrainConfig) -> Result<Self, GraphError> {
        let graph = match config.seed {
            Some(seed) => Graph::new_with_seed(seed),
            None => Graph::new(),
        };
        let model = MnistMlp::new(&graph)?;

        let x = graph.input_shape(&[config.batch_size, MnistMlp::INPUT_DIM], Some("x"))?;
        let y = graph.input_shape(&[config.batch_size, MnistMlp::NUM_CLASSES], Some("y"))?;

        let logits = model.forward(&x);
        let loss = logits.cross_entropy(&y)?;

        let optimizer = Sgd::new(&graph, &model.parameters(), config.learning_rate);

        Ok(Self {
            config,
            graph,
            model,
            x,
            y,
            logits,
            loss,
            optimizer,
        })
    }

    /// 固定epoch数的训练循环。
    ///
    /// 每个epoch对数据集完整遍历一遍（顺序由数据加载器决定）；对每个batch依次：
    /// 清零参数梯度、前向计算输出、计算交叉熵损失、反向求梯度、执行一步SGD更新。
    /// epoch结束后输出一行`Epoch: <n> Loss: <loss>`（n从1开始）。
    /// 注意：上报并记录的是该epoch最后一个batch的损失，不是epoch平均值。
    ///
    /// # 返回
    /// 每个epoch上报的损失；`epochs = 0`或数据集为空时为空。
    pub fn fit(&mut self, dataset: TensorDataset) -> Result<Vec<f32>, TrainError> {
        let mut loader =
            DataLoader::new(dataset, self.config.batch_size).shuffle(self.config.shuffle);
        if let Some(seed) = self.config.seed {
            loader = loader.seed(seed);
        }

        let mut history = Vec::with_capacity(self.config.epochs);
        for epoch in 0..self.config.epochs {
            let mut last_batch_loss = None;

            for (images, labels) in loader.iter() {
                self.x.set_value(&images)?;
                self.y.set_value(&labels)?;

                self.optimizer.zero_grad()?;
                // backward内含前向传播，返回本batch的损失标量
                let loss_val = self.loss.backward()?;
                self.optimizer.step()?;

                last_batch_loss = Some(loss_val);
            }

            if let Some(loss_val) = last_batch_loss {
                println!("Epoch: {} Loss: {}", epoch + 1, loss_val);
                history.push(loss_val);
            }
        }

        Ok(history)
    }

    /// 前向计算一批图像的logits（不含softmax），不触碰梯度。
    pub fn predict(&self, images: &Tensor) -> Result<Tensor, TrainError> {
        self.x.set_value(images)?;
        self.logits.forward()?;
        let logits = self
            .logits
            .value()?
            .ok_or_else(|| GraphError::ComputationError("前向传播后logits没有值".to_string()))?;
        Ok(logits)
    }

    /// 在给定数据集上计算分类准确率（逐样本argmax对比one-hot标签）。
    ///
    /// 评估在no_grad上下文中进行；`fit`与训练程序都不会调用它。
    pub fn evaluate(&self, dataset: TensorDataset) -> Result<f32, TrainError> {
        let loader = DataLoader::new(dataset, self.config.batch_size);

        self.graph.no_grad_scope(|_| {
            let mut correct = 0usize;
            let mut total = 0usize;

            for (images, labels) in loader.iter() {
                let logits = self.predict(&images)?;
                let batch_size = logits.shape()[0];
                let num_classes = logits.shape()[1];

                for i in 0..batch_size {
                    let mut pred_class = 0;
                    let mut max_val = f32::NEG_INFINITY;
                    for j in 0..num_classes {
                        if logits[[i, j]] > max_val {
                            max_val = logits[[i, j]];
                            pred_class = j;
                        }
                    }

                    let mut true_class = 0;
                    for j in 0..num_classes {
                        if labels[[i, j]] > 0.5 {
                            true_class = j;
                            break;
                        }
                    }

                    if pred_class == true_class {
                        correct += 1;
                    }
                }
                total += batch_size;
            }

            if total == 0 {
                Ok(0.0)
            } else {
                Ok(correct as f32 / total as f32)
            }
        })
    }

    /// 访问底层模型。
    pub fn model(&self) -> &MnistMlp {
        &self.model
    }

    /// 访问训练配置。
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// 访问计算图句柄。
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
