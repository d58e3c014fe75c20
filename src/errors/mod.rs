use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 张量层错误。
/// 注：运算符重载无法返回`Result`，因此逐元素运算在形状不兼容时以本错误的
/// 消息panic；可失败的接口则正常返回`Err`。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不兼容，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    DataLengthMismatch { data_len: usize, shape: Vec<usize> },

    #[error("reshape前后元素个数必须一致：{size}与{shape:?}不符")]
    ReshapeSizeMismatch { size: usize, shape: Vec<usize> },

    #[error("该运算要求{expected}阶张量，但得到{got}阶")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("矩阵乘法要求前一个张量的列数({0})等于后一个张量的行数({1})")]
    MatMulIncompatible(usize, usize),
}
