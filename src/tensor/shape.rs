use ndarray::{Array, IxDyn};

use super::Tensor;
use crate::errors::TensorError;

impl Tensor {
    /// 改变张量的形状并返回新张量。前后元素个数必须一致，否则panic。
    pub fn reshape(&self, shape: &[usize]) -> Tensor {
        assert_eq!(
            self.size(),
            shape.iter().product::<usize>(),
            "{}",
            TensorError::ReshapeSizeMismatch {
                size: self.size(),
                shape: shape.to_vec(),
            }
        );
        Tensor {
            data: Array::from_shape_vec(IxDyn(shape), self.flatten_view().to_vec()).unwrap(),
        }
    }

    /// 展平为一维张量，形状[size]。
    pub fn flatten(&self) -> Tensor {
        self.reshape(&[self.size()])
    }

    /// 二维转置：[m, n] -> [n, m]。只接受2阶张量，否则panic。
    pub fn transpose(&self) -> Tensor {
        assert_eq!(
            self.dimension(),
            2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            }
        );
        let transposed = self.data.view().reversed_axes();
        Tensor {
            data: transposed.as_standard_layout().into_owned(),
        }
    }
}
