use super::Tensor;

impl Tensor {
    /// 若为向量，`shape`可以是[n]；若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数，即`shape()`的元素个数。
    /// 注：这里用`dimension`是参照了大多数库的命名规范（PyTorch、NumPy等），
    /// 张量中所有元素的数量请使用`size()`获取。
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量。
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为[1, 4]和[4]是不一致的，会返回false。
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量（形状为[]或各维皆为1）。
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None。
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 按行优先顺序返回底层数据的扁平切片。
    pub fn flatten_view(&self) -> &[f32] {
        self.data.as_slice().expect("张量数据必须按标准布局连续存储")
    }

    /// `flatten_view`的别名，语义上强调只读访问底层数据。
    pub fn data_as_slice(&self) -> &[f32] {
        self.flatten_view()
    }
}
