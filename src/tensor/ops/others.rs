use ndarray::{Array, Axis, Ix2, IxDyn};

use crate::errors::TensorError;
use crate::tensor::Tensor;

impl Tensor {
    /// 逐元素条件映射：满足`cond`的元素经`if_true`变换，否则经`if_false`变换。
    pub fn where_with_f32<C, T, F>(&self, cond: C, if_true: T, if_false: F) -> Tensor
    where
        C: Fn(f32) -> bool,
        T: Fn(f32) -> f32,
        F: Fn(f32) -> f32,
    {
        Tensor {
            data: self
                .data
                .map(|&x| if cond(x) { if_true(x) } else { if_false(x) }),
        }
    }

    /// 沿第0维（行方向）求和并保留行向量形状：[m, n] -> [1, n]。
    /// 只接受2阶张量，否则panic。
    pub fn sum_rows(&self) -> Tensor {
        assert_eq!(
            self.dimension(),
            2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            }
        );
        let view = self.data.view().into_dimensionality::<Ix2>().unwrap();
        let summed = view.sum_axis(Axis(0));
        let cols = summed.len();
        Tensor {
            data: Array::from_shape_vec(IxDyn(&[1, cols]), summed.to_vec()).unwrap(),
        }
    }
}
