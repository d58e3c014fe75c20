//! 张量与纯数的除法：逐元素除以一个标量，返回新张量。
//! 除数为零时panic。

use std::ops::Div;

use crate::tensor::Tensor;

impl Div<f32> for Tensor {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        assert!(scalar != 0.0, "除数不能为零");
        Self {
            data: &self.data / scalar,
        }
    }
}

impl Div<f32> for &Tensor {
    type Output = Tensor;

    fn div(self, scalar: f32) -> Tensor {
        assert!(scalar != 0.0, "除数不能为零");
        Tensor {
            data: &self.data / scalar,
        }
    }
}
