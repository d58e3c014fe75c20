use crate::tensor::Tensor;

#[test]
fn test_reshape() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]);
    assert_eq!(reshaped.shape(), &[3, 2]);
    // 行优先顺序不变
    assert_eq!(reshaped, Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2]));
}

#[test]
#[should_panic(expected = "reshape前后元素个数必须一致")]
fn test_reshape_size_mismatch() {
    let tensor = Tensor::zeros(&[2, 3]);
    let _ = tensor.reshape(&[2, 4]);
}

#[test]
fn test_flatten() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let flat = tensor.flatten();
    assert_eq!(flat.shape(), &[4]);
    assert_eq!(flat[[3]], 4.0);
}

#[test]
fn test_transpose() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let transposed = tensor.transpose();
    assert_eq!(transposed.shape(), &[3, 2]);
    assert_eq!(
        transposed,
        Tensor::new(&[1.0, 4.0, 2.0, 5.0, 3.0, 6.0], &[3, 2])
    );
    // 转置两次回到原张量
    assert_eq!(transposed.transpose(), tensor);
}

#[test]
#[should_panic(expected = "2阶")]
fn test_transpose_requires_2d() {
    let tensor = Tensor::zeros(&[4]);
    let _ = tensor.transpose();
}
