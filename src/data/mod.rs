//! 数据加载模块。
//!
//! 提供数据集加载、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`DataLoader`]: `PyTorch`风格的数据批量加载器
//! - [`TensorDataset`]: 持有特征和标签的数据集
//! - [`MnistDataset`]: MNIST手写数字数据集
//! - [`transforms`]: 数据变换函数（归一化、one-hot等）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use micro_torch::data::{DataLoader, TensorDataset};
//!
//! let dataset = TensorDataset::new(train_x, train_y);
//! let loader = DataLoader::new(dataset, 64)
//!     .shuffle(true)
//!     .seed(42);
//!
//! // PyTorch风格训练循环
//! for (x_batch, y_batch) in loader.iter() {
//!     x.set_value(&x_batch)?;
//!     y.set_value(&y_batch)?;
//!     optimizer.zero_grad()?;
//!     loss.backward()?;
//!     optimizer.step()?;
//! }
//! ```

mod dataloader;
pub mod datasets;
pub mod error;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{DataLoader, TensorDataset};
pub use datasets::{default_data_dir, MnistDataset};
pub use error::DataError;
