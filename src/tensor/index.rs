use ndarray::IxDyn;
use std::ops::{Index, IndexMut};

use super::Tensor;

impl Index<[usize; 1]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 1]) -> &f32 {
        &self.data[IxDyn(&index)]
    }
}

impl IndexMut<[usize; 1]> for Tensor {
    fn index_mut(&mut self, index: [usize; 1]) -> &mut f32 {
        &mut self.data[IxDyn(&index)]
    }
}

impl Index<[usize; 2]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 2]) -> &f32 {
        &self.data[IxDyn(&index)]
    }
}

impl IndexMut<[usize; 2]> for Tensor {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut f32 {
        &mut self.data[IxDyn(&index)]
    }
}
