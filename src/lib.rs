//! # Micro Torch
//!
//! `micro_torch`是一个仿照[pytorch](https://pytorch.org)训练接口的极简AI框架：
//! ndarray张量、VJP反向传播计算图、Linear层、SGD优化器，以及MNIST数据管线。
//! 自带一个固定拓扑（784 -> 128 -> 64 -> 10）多层感知机的训练程序（见`src/main.rs`）。

pub mod data;
pub mod errors;
pub mod nn;
pub mod tensor;
pub mod train;
