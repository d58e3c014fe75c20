//! 张量的加法：两个张量“逐元素”（或张量与纯数）相加，返回新张量。
//! 两个张量相加时，除了形状严格一致的情况，还支持行向量广播：
//! [m, n]与[1, n]相加时，行向量被广播到每一行。

use std::ops::Add;

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Add<Tensor> for f32 {
    type Output = Tensor;

    fn add(self, tensor: Tensor) -> Tensor {
        Tensor {
            data: self + &tensor.data,
        }
    }
}

impl<'a> Add<&'a Tensor> for f32 {
    type Output = Tensor;

    fn add(self, tensor: &'a Tensor) -> Tensor {
        Tensor {
            data: self + &tensor.data,
        }
    }
}

impl Add<f32> for Tensor {
    type Output = Self;

    fn add(self, scalar: f32) -> Self {
        Self {
            data: &self.data + scalar,
        }
    }
}

impl Add<f32> for &Tensor {
    type Output = Tensor;

    fn add(self, scalar: f32) -> Tensor {
        Tensor {
            data: &self.data + scalar,
        }
    }
}

impl Add for Tensor {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        add_within_tensors(&self, &other)
    }
}

impl<'a> Add<&'a Self> for Tensor {
    type Output = Self;

    fn add(self, other: &'a Self) -> Self {
        add_within_tensors(&self, other)
    }
}

impl Add<Tensor> for &Tensor {
    type Output = Tensor;

    fn add(self, other: Tensor) -> Tensor {
        add_within_tensors(self, &other)
    }
}

impl Add for &Tensor {
    type Output = Tensor;

    fn add(self, other: Self) -> Tensor {
        add_within_tensors(self, other)
    }
}

fn add_within_tensors(tensor1: &Tensor, tensor2: &Tensor) -> Tensor {
    assert!(
        row_broadcast_compatible(tensor1.shape(), tensor2.shape()),
        "{}",
        TensorError::OperatorError {
            operator: Operator::Add,
            tensor1_shape: tensor1.shape().to_vec(),
            tensor2_shape: tensor2.shape().to_vec(),
        }
    );
    // ndarray只对右操作数广播，故把元素多的一方放在左边
    if tensor1.size() >= tensor2.size() {
        Tensor {
            data: &tensor1.data + &tensor2.data,
        }
    } else {
        Tensor {
            data: &tensor2.data + &tensor1.data,
        }
    }
}

/// 形状严格一致，或二者均为2阶、列数相同且其中一方只有1行。
pub(in crate::tensor) fn row_broadcast_compatible(shape1: &[usize], shape2: &[usize]) -> bool {
    shape1 == shape2
        || (shape1.len() == 2
            && shape2.len() == 2
            && shape1[1] == shape2[1]
            && (shape1[0] == 1 || shape2[0] == 1))
}
