//! MNIST数据集单元测试。
//!
//! 不依赖网络：测试用例在临时目录生成小型合成IDX文件，
//! 覆盖解析、归一化、one-hot编码与各类格式错误。

use std::io::Write;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::data::datasets::default_data_dir;
use crate::data::{DataError, MnistDataset};

/// 各测试使用独立的临时目录，互不干扰。
fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("micro_torch_tests")
        .join(format!("{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 写出IDX图像文件：magic 2051 + 数量 + 28x28 + 像素字节。
fn write_idx_images(dir: &PathBuf, file_name: &str, pixels_per_image: &[Vec<u8>]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2051u32.to_be_bytes());
    bytes.extend_from_slice(&(pixels_per_image.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    for pixels in pixels_per_image {
        assert_eq!(pixels.len(), 784);
        bytes.extend_from_slice(pixels);
    }
    std::fs::write(dir.join(file_name), bytes).unwrap();
}

/// 写出IDX标签文件：magic 2049 + 数量 + 标签字节。
fn write_idx_labels(dir: &PathBuf, file_name: &str, labels: &[u8]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2049u32.to_be_bytes());
    bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    bytes.extend_from_slice(labels);
    std::fs::write(dir.join(file_name), bytes).unwrap();
}

fn write_train_pair(dir: &PathBuf, pixels_per_image: &[Vec<u8>], labels: &[u8]) {
    write_idx_images(dir, "train-images-idx3-ubyte", pixels_per_image);
    write_idx_labels(dir, "train-labels-idx1-ubyte", labels);
}

#[test]
fn test_default_data_dir() {
    let dir = default_data_dir();
    assert!(dir.to_string_lossy().contains("micro_torch"));
    assert!(dir.to_string_lossy().contains("datasets"));
}

#[test]
fn test_load_synthetic_idx() {
    let dir = test_dir("load_synthetic");
    let images = vec![vec![0u8; 784], vec![255u8; 784], vec![128u8; 784]];
    write_train_pair(&dir, &images, &[3, 1, 9]);

    let dataset = MnistDataset::load(Some(dir.to_str().unwrap()), true, false).unwrap();

    assert_eq!(dataset.len(), 3);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.images().shape(), &[3, 784]);
    assert_eq!(dataset.labels().shape(), &[3, 10]);
    assert_eq!(dataset.input_shape(), vec![784]);
    assert_eq!(dataset.label_shape(), vec![10]);

    // 像素归一化：0 -> 0.0，255 -> 1.0
    assert_abs_diff_eq!(dataset.images()[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(dataset.images()[[1, 0]], 1.0, epsilon = 1e-6);

    // one-hot标签
    assert_eq!(dataset.labels()[[0, 3]], 1.0);
    assert_eq!(dataset.labels()[[1, 1]], 1.0);
    assert_eq!(dataset.labels()[[2, 9]], 1.0);
}

#[test]
fn test_load_gz_compressed() {
    let dir = test_dir("load_gz");

    let mut raw_images = Vec::new();
    raw_images.extend_from_slice(&2051u32.to_be_bytes());
    raw_images.extend_from_slice(&2u32.to_be_bytes());
    raw_images.extend_from_slice(&28u32.to_be_bytes());
    raw_images.extend_from_slice(&28u32.to_be_bytes());
    raw_images.extend_from_slice(&[7u8; 784 * 2]);

    let mut raw_labels = Vec::new();
    raw_labels.extend_from_slice(&2049u32.to_be_bytes());
    raw_labels.extend_from_slice(&2u32.to_be_bytes());
    raw_labels.extend_from_slice(&[0, 5]);

    for (file_name, raw) in [
        ("train-images-idx3-ubyte.gz", raw_images),
        ("train-labels-idx1-ubyte.gz", raw_labels),
    ] {
        let file = std::fs::File::create(dir.join(file_name)).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(&raw).unwrap();
        encoder.finish().unwrap();
    }

    let dataset = MnistDataset::load(Some(dir.to_str().unwrap()), true, false).unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.labels()[[1, 5]], 1.0);
}

#[test]
fn test_get_sample() {
    let dir = test_dir("get_sample");
    let mut pixels = vec![0u8; 784];
    pixels[0] = 255;
    write_train_pair(&dir, &[pixels, vec![0u8; 784]], &[2, 7]);

    let dataset = MnistDataset::load(Some(dir.to_str().unwrap()), true, false).unwrap();
    let (image, label) = dataset.get(0).unwrap();

    assert_eq!(image.shape(), &[784]);
    assert_eq!(label.shape(), &[10]);
    assert_abs_diff_eq!(image[[0]], 1.0, epsilon = 1e-6);
    assert_eq!(label[[2]], 1.0);

    let label_sum: f32 = (0..10).map(|j| label[[j]]).sum();
    assert_abs_diff_eq!(label_sum, 1.0, epsilon = 1e-6);
}

#[test]
fn test_get_index_out_of_bounds() {
    let dir = test_dir("index_oob");
    write_train_pair(&dir, &[vec![0u8; 784]], &[1]);

    let dataset = MnistDataset::load(Some(dir.to_str().unwrap()), true, false).unwrap();
    let result = dataset.get(1);
    assert!(matches!(
        result,
        Err(DataError::IndexOutOfBounds { index: 1, len: 1 })
    ));
}

#[test]
fn test_missing_file_without_download() {
    let dir = test_dir("missing_file");

    let result = MnistDataset::load(Some(dir.to_str().unwrap()), true, false);
    assert!(matches!(result, Err(DataError::FileNotFound(_))));
}

#[test]
fn test_bad_magic_number() {
    let dir = test_dir("bad_magic");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1234u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 784]);
    std::fs::write(dir.join("train-images-idx3-ubyte"), bytes).unwrap();
    write_idx_labels(&dir, "train-labels-idx1-ubyte", &[0]);

    let result = MnistDataset::load(Some(dir.to_str().unwrap()), true, false);
    assert!(matches!(result, Err(DataError::FormatError(_))));
}

#[test]
fn test_wrong_image_dimensions() {
    let dir = test_dir("wrong_dims");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2051u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&27u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 27 * 28]);
    std::fs::write(dir.join("train-images-idx3-ubyte"), bytes).unwrap();
    write_idx_labels(&dir, "train-labels-idx1-ubyte", &[0]);

    let result = MnistDataset::load(Some(dir.to_str().unwrap()), true, false);
    assert!(matches!(result, Err(DataError::FormatError(_))));
}

#[test]
fn test_image_label_count_mismatch() {
    let dir = test_dir("count_mismatch");
    write_idx_images(&dir, "train-images-idx3-ubyte", &[vec![0u8; 784]]);
    write_idx_labels(&dir, "train-labels-idx1-ubyte", &[0, 1]);

    let result = MnistDataset::load(Some(dir.to_str().unwrap()), true, false);
    assert!(matches!(result, Err(DataError::FormatError(_))));
}

#[test]
fn test_truncated_pixel_data() {
    let dir = test_dir("truncated");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2051u32.to_be_bytes());
    bytes.extend_from_slice(&2u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&28u32.to_be_bytes());
    bytes.extend_from_slice(&[0u8; 784]); // 声明2张图却只有1张的数据
    std::fs::write(dir.join("train-images-idx3-ubyte"), bytes).unwrap();
    write_idx_labels(&dir, "train-labels-idx1-ubyte", &[0, 1]);

    let result = MnistDataset::load(Some(dir.to_str().unwrap()), true, false);
    assert!(matches!(result, Err(DataError::FormatError(_))));
}
