//! 张量的减法：两个形状一致的张量逐元素相减，返回新张量。

use std::ops::Sub;

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Sub for Tensor {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        sub_within_tensors(&self, &other)
    }
}

impl<'a> Sub<&'a Self> for Tensor {
    type Output = Self;

    fn sub(self, other: &'a Self) -> Self {
        sub_within_tensors(&self, other)
    }
}

impl Sub<Tensor> for &Tensor {
    type Output = Tensor;

    fn sub(self, other: Tensor) -> Tensor {
        sub_within_tensors(self, &other)
    }
}

impl Sub for &Tensor {
    type Output = Tensor;

    fn sub(self, other: Self) -> Tensor {
        sub_within_tensors(self, other)
    }
}

fn sub_within_tensors(tensor1: &Tensor, tensor2: &Tensor) -> Tensor {
    assert!(
        tensor1.is_same_shape(tensor2),
        "{}",
        TensorError::OperatorError {
            operator: Operator::Sub,
            tensor1_shape: tensor1.shape().to_vec(),
            tensor2_shape: tensor2.shape().to_vec(),
        }
    );
    Tensor {
        data: &tensor1.data - &tensor2.data,
    }
}
