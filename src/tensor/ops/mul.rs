//! 张量的乘法：两个形状一致的张量逐元素相乘（或张量与纯数相乘），返回新张量。
//! 注意这是Hadamard积，矩阵乘法请使用`mat_mul`。

use std::ops::Mul;

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Mul<Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}

impl<'a> Mul<&'a Tensor> for f32 {
    type Output = Tensor;

    fn mul(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self * &tensor.data,
        }
    }
}

impl Mul<f32> for Tensor {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            data: &self.data * scalar,
        }
    }
}

impl Mul<f32> for &Tensor {
    type Output = Tensor;

    fn mul(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data * scalar,
        }
    }
}

impl Mul for Tensor {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        mul_within_tensors(&self, &other)
    }
}

impl<'a> Mul<&'a Self> for Tensor {
    type Output = Self;

    fn mul(self, other: &'a Self) -> Self {
        mul_within_tensors(&self, other)
    }
}

impl Mul<Tensor> for &Tensor {
    type Output = Tensor;

    fn mul(self, other: Tensor) -> Tensor {
        mul_within_tensors(self, &other)
    }
}

impl Mul for &Tensor {
    type Output = Tensor;

    fn mul(self, other: Self) -> Tensor {
        mul_within_tensors(self, other)
    }
}

fn mul_within_tensors(tensor1: &Tensor, tensor2: &Tensor) -> Tensor {
    assert!(
        tensor1.is_same_shape(tensor2),
        "{}",
        TensorError::OperatorError {
            operator: Operator::Mul,
            tensor1_shape: tensor1.shape().to_vec(),
            tensor2_shape: tensor2.shape().to_vec(),
        }
    );
    Tensor {
        data: &tensor1.data * &tensor2.data,
    }
}
