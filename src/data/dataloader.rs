//! DataLoader——PyTorch风格的数据批量加载器。
//!
//! 提供统一的数据迭代API，支持：
//! - 自动分批（batch_size）
//! - 随机打乱（shuffle）
//! - 丢弃不完整批次（drop_last）

use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::tensor::Tensor;

/// TensorDataset——持有特征和标签的数据集。
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(features, labels);
/// println!("样本数: {}", dataset.len());
/// ```
#[derive(Clone)]
pub struct TensorDataset {
    features: Tensor,
    labels: Tensor,
    len: usize,
}

impl TensorDataset {
    /// 创建新的TensorDataset。
    ///
    /// # 参数
    /// - `features`: 特征张量，第一维为样本数
    /// - `labels`: 标签张量，第一维为样本数（必须与features一致）
    ///
    /// # Panics
    /// 如果features和labels的样本数不一致
    pub fn new(features: Tensor, labels: Tensor) -> Self {
        let len = features.shape()[0];
        assert_eq!(
            len,
            labels.shape()[0],
            "TensorDataset: features和labels的样本数必须一致，得到{}与{}",
            len,
            labels.shape()[0]
        );
        Self {
            features,
            labels,
            len,
        }
    }

    /// 获取样本数量。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 检查数据集是否为空。
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 获取特征张量引用。
    pub fn features(&self) -> &Tensor {
        &self.features
    }

    /// 获取标签张量引用。
    pub fn labels(&self) -> &Tensor {
        &self.labels
    }
}

/// DataLoader——PyTorch风格的数据批量加载器。
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(train_x, train_y);
/// let loader = DataLoader::new(dataset, 32)
///     .shuffle(true)
///     .drop_last(true);
///
/// for (x_batch, y_batch) in loader.iter() {
///     // 每个epoch一次完整的、惰性的、不可重启的批次序列
/// }
/// ```
pub struct DataLoader {
    dataset: TensorDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
}

impl DataLoader {
    /// 创建新的DataLoader。
    ///
    /// # 参数
    /// - `dataset`: 数据集
    /// - `batch_size`: 批大小
    pub fn new(dataset: TensorDataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size必须大于0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
        }
    }

    /// 设置是否打乱数据。
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次。
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于shuffle）。
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 获取批次数量。
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            (n + self.batch_size - 1) / self.batch_size
        }
    }

    /// 获取数据集大小。
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空。
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// 创建迭代器（一次完整的数据遍历）。
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        let n = self.dataset.len();
        let mut indices: Vec<usize> = (0..n).collect();

        if self.shuffle {
            if let Some(seed) = self.seed {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                indices.shuffle(&mut rng);
            } else {
                let mut rng = rand::thread_rng();
                indices.shuffle(&mut rng);
            }
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader迭代器。
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = (Tensor, Tensor);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.loader.dataset.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);
        let actual_batch_size = end - start;

        // drop_last且批次不完整时，到此为止
        if self.loader.drop_last && actual_batch_size < batch_size {
            return None;
        }

        self.current_batch += 1;

        let batch_indices = &self.indices[start..end];
        Some(extract_batch(&self.loader.dataset, batch_indices))
    }
}

/// 从数据集中按索引提取批次。
fn extract_batch(dataset: &TensorDataset, indices: &[usize]) -> (Tensor, Tensor) {
    let features = dataset.features();
    let labels = dataset.labels();

    let batch_size = indices.len();
    let feature_shape = features.shape();
    let label_shape = labels.shape();

    // 每个样本的特征/标签大小
    let feature_sample_size: usize = feature_shape[1..].iter().product();
    let label_sample_size: usize = label_shape[1..].iter().product();

    let flat_features = features.flatten_view();
    let flat_labels = labels.flatten_view();

    let mut feature_data = Vec::with_capacity(batch_size * feature_sample_size);
    for &idx in indices {
        let sample_start = idx * feature_sample_size;
        feature_data.extend_from_slice(&flat_features[sample_start..sample_start + feature_sample_size]);
    }

    let mut label_data = Vec::with_capacity(batch_size * label_sample_size);
    for &idx in indices {
        let sample_start = idx * label_sample_size;
        label_data.extend_from_slice(&flat_labels[sample_start..sample_start + label_sample_size]);
    }

    let mut batch_feature_shape = vec![batch_size];
    batch_feature_shape.extend_from_slice(&feature_shape[1..]);

    let mut batch_label_shape = vec![batch_size];
    batch_label_shape.extend_from_slice(&label_shape[1..]);

    (
        Tensor::new(&feature_data, &batch_feature_shape),
        Tensor::new(&label_data, &batch_label_shape),
    )
}
