/// 训练配置。
///
/// 默认值即训练程序使用的固定超参数：5个epoch、学习率0.01、batch大小64。
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// 训练的epoch数
    pub epochs: usize,
    /// SGD学习率（固定，无调度）
    pub learning_rate: f32,
    /// 每个batch的样本数
    pub batch_size: usize,
    /// 每个epoch是否打乱样本顺序（由数据加载器执行）
    pub shuffle: bool,
    /// 参数初始化与打乱的种子；None时为非确定性初始化
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 5,
            learning_rate: 0.01,
            batch_size: 64,
            shuffle: true,
            seed: None,
        }
    }
}
