//! MNIST手写数字数据集。
//!
//! 支持：
//! - IDX二进制格式解析（支持.gz压缩）
//! - 像素归一化（0-255 → 0-1）
//! - 标签one-hot编码
//! - 可选自动下载

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::data::error::DataError;
use crate::data::transforms::{normalize_pixels, one_hot};
use crate::tensor::Tensor;

/// MNIST下载地址（AWS S3镜像，原官网yann.lecun.com不稳定）。
const MNIST_BASE_URL: &str = "https://ossci-datasets.s3.amazonaws.com/mnist/";

/// MNIST手写数字数据集。
///
/// 包含60,000个训练样本和10,000个测试样本。
/// 每个样本是28x28的灰度图像，标签为0-9。
#[derive(Debug, Clone)]
pub struct MnistDataset {
    /// 图像数据 [N, 784]（像素已归一化到0-1）
    images: Tensor,
    /// 标签数据 [N, 10]（one-hot）
    labels: Tensor,
    /// 样本数量
    len: usize,
}

impl MnistDataset {
    /// 完整加载API。
    ///
    /// # 参数
    /// - `root`: 数据目录，None则使用默认（~/.cache/micro_torch/datasets/mnist）
    /// - `train`: true=训练集(60000)，false=测试集(10000)
    /// - `download`: true=自动下载缺失文件
    ///
    /// # 返回
    /// 加载后的MnistDataset，图像形状[N, 784]，标签形状[N, 10]
    pub fn load(root: Option<&str>, train: bool, download: bool) -> Result<Self, DataError> {
        let data_dir = root
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir().join("mnist"));

        let (images_file, labels_file) = if train {
            ("train-images-idx3-ubyte", "train-labels-idx1-ubyte")
        } else {
            ("t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte")
        };

        let images_path = ensure_file(&data_dir, images_file, download)?;
        let labels_path = ensure_file(&data_dir, labels_file, download)?;

        let images_raw = parse_idx_images(&images_path)?;
        let labels_raw = parse_idx_labels(&labels_path)?;

        let len = labels_raw.shape()[0];
        if images_raw.shape()[0] != len {
            return Err(DataError::FormatError(format!(
                "图像数量({})与标签数量({})不一致",
                images_raw.shape()[0],
                len
            )));
        }

        // 归一化像素值 [0, 255] -> [0, 1]
        let images = normalize_pixels(&images_raw);

        // one-hot编码标签
        let labels = one_hot(&labels_raw, 10);

        Ok(Self {
            images,
            labels,
            len,
        })
    }

    /// 便捷API：加载训练集（默认路径，自动下载）。
    pub fn train() -> Result<Self, DataError> {
        Self::load(None, true, true)
    }

    /// 便捷API：加载测试集（默认路径，自动下载）。
    pub fn test() -> Result<Self, DataError> {
        Self::load(None, false, true)
    }

    /// 返回数据集中的样本数量。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 数据集是否为空。
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 获取第index个样本。
    ///
    /// # 返回
    /// (image, label)元组
    /// - image: [784]
    /// - label: [10]（one-hot）
    pub fn get(&self, index: usize) -> Result<(Tensor, Tensor), DataError> {
        if index >= self.len {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }

        let image_flat = self.images.flatten_view();
        let image = Tensor::new(&image_flat[index * 784..(index + 1) * 784], &[784]);

        let label_flat = self.labels.flatten_view();
        let label = Tensor::new(&label_flat[index * 10..(index + 1) * 10], &[10]);

        Ok((image, label))
    }

    /// 输入的形状（不含batch维度）。
    pub fn input_shape(&self) -> Vec<usize> {
        vec![784]
    }

    /// 标签的形状（不含batch维度）。
    pub fn label_shape(&self) -> Vec<usize> {
        vec![10]
    }

    /// 获取所有图像（[N, 784]，用于批量处理）。
    pub fn images(&self) -> &Tensor {
        &self.images
    }

    /// 获取所有标签（[N, 10]，用于批量处理）。
    pub fn labels(&self) -> &Tensor {
        &self.labels
    }
}

/// 获取默认数据目录。
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("micro_torch")
        .join("datasets")
}

/// 确保文件存在，必要时下载。
fn ensure_file(data_dir: &Path, base_name: &str, download: bool) -> Result<PathBuf, DataError> {
    // 优先检查解压后的文件
    let uncompressed_path = data_dir.join(base_name);
    if uncompressed_path.exists() {
        return Ok(uncompressed_path);
    }

    // 检查.gz文件
    let gz_path = data_dir.join(format!("{base_name}.gz"));
    if gz_path.exists() {
        return Ok(gz_path);
    }

    // 文件不存在，尝试下载
    if download {
        std::fs::create_dir_all(data_dir).map_err(DataError::IoError)?;
        download_file(base_name, &gz_path)?;
        Ok(gz_path)
    } else {
        Err(DataError::FileNotFound(uncompressed_path))
    }
}

/// 下载MNIST文件。
fn download_file(base_name: &str, dest_path: &Path) -> Result<(), DataError> {
    let url = format!("{MNIST_BASE_URL}{base_name}.gz");

    println!("正在下载 {url} ...");

    let response = ureq::get(&url)
        .call()
        .map_err(|e| DataError::DownloadError(format!("HTTP请求失败: {e}")))?;

    if response.status() != 200 {
        return Err(DataError::DownloadError(format!(
            "HTTP状态码: {}",
            response.status()
        )));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DataError::DownloadError(format!("读取响应失败: {e}")))?;

    std::fs::write(dest_path, &bytes).map_err(DataError::IoError)?;

    println!("下载完成: {dest_path:?}");
    Ok(())
}

/// 打开IDX文件，按需透明解压.gz。
fn open_idx_reader(path: &Path) -> Result<Box<dyn Read>, DataError> {
    let file = File::open(path).map_err(|_| DataError::FileNotFound(path.to_path_buf()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// 解析IDX图像文件。
///
/// IDX格式：
/// - [0-3] magic number (0x00000803 = 2051)
/// - [4-7] number of images
/// - [8-11] number of rows
/// - [12-15] number of columns
/// - [16+] pixel data (unsigned byte)
fn parse_idx_images(path: &Path) -> Result<Tensor, DataError> {
    let mut reader = open_idx_reader(path)?;

    let mut header = [0u8; 16];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    // 头部为大端序
    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != 2051 {
        return Err(DataError::FormatError(format!(
            "无效的magic number: {magic}（期望2051）"
        )));
    }

    let num_images = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;
    let num_rows = u32::from_be_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let num_cols = u32::from_be_bytes([header[12], header[13], header[14], header[15]]) as usize;

    if num_rows != 28 || num_cols != 28 {
        return Err(DataError::FormatError(format!(
            "无效的图像尺寸: {num_rows}x{num_cols}（期望28x28）"
        )));
    }

    let pixel_count = num_images * 28 * 28;
    let mut pixels = vec![0u8; pixel_count];
    reader
        .read_exact(&mut pixels)
        .map_err(|e| DataError::FormatError(format!("读取像素数据失败: {e}")))?;

    let data: Vec<f32> = pixels.into_iter().map(f32::from).collect();
    Ok(Tensor::new(&data, &[num_images, 784]))
}

/// 解析IDX标签文件。
///
/// IDX格式：
/// - [0-3] magic number (0x00000801 = 2049)
/// - [4-7] number of labels
/// - [8+] label data (unsigned byte, 0-9)
fn parse_idx_labels(path: &Path) -> Result<Tensor, DataError> {
    let mut reader = open_idx_reader(path)?;

    let mut header = [0u8; 8];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != 2049 {
        return Err(DataError::FormatError(format!(
            "无效的magic number: {magic}（期望2049）"
        )));
    }

    let num_labels = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as usize;

    let mut labels = vec![0u8; num_labels];
    reader
        .read_exact(&mut labels)
        .map_err(|e| DataError::FormatError(format!("读取标签数据失败: {e}")))?;

    let data: Vec<f32> = labels.into_iter().map(f32::from).collect();
    Ok(Tensor::new(&data, &[num_labels]))
}
