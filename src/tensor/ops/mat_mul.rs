use crate::errors::TensorError;
use crate::tensor::Tensor;

impl Tensor {
    /// 实现矩阵乘法。只接受2阶张量，否则会触发panic。
    /// 需要保证前一个张量的列数等于后一个张量的行数，否则也会触发panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        assert_eq!(
            self.dimension(),
            2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            }
        );
        assert_eq!(
            other.dimension(),
            2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: other.dimension(),
            }
        );
        assert_eq!(
            self.shape()[1],
            other.shape()[0],
            "{}",
            TensorError::MatMulIncompatible(self.shape()[1], other.shape()[0])
        );

        // 将动态维度数组转换为常量维度数组后执行乘法
        let self_data = self
            .data
            .view()
            .into_dimensionality::<ndarray::Ix2>()
            .unwrap();
        let other_data = other
            .data
            .view()
            .into_dimensionality::<ndarray::Ix2>()
            .unwrap();
        let result_data = self_data.dot(&other_data);

        Tensor {
            data: result_data.into_dyn(),
        }
    }
}
