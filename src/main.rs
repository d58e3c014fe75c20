//! MNIST多层感知机训练程序。
//!
//! 无参数、无配置文件、无环境变量：从`./data`读取MNIST训练集（不联网下载），
//! 按默认配置（5个epoch、学习率0.01、batch大小64）训练，
//! 每个epoch输出一行`Epoch: <n> Loss: <loss>`。
//! 成功时退出码为0；数据缺失、形状不符等协作方错误一路传播，进程非零退出。

use micro_torch::data::{MnistDataset, TensorDataset};
use micro_torch::train::{TrainConfig, TrainError, Trainer};

fn main() -> Result<(), TrainError> {
    let mnist = MnistDataset::load(Some("./data"), true, false)?;
    let dataset = TensorDataset::new(mnist.images().clone(), mnist.labels().clone());

    let mut trainer = Trainer::new(TrainConfig::default())?;
    trainer.fit(dataset)?;

    Ok(())
}
