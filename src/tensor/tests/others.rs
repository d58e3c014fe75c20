use crate::tensor::Tensor;

#[test]
fn test_where_with_f32_relu_style() {
    let tensor = Tensor::new(&[-2.0, -0.5, 0.0, 1.5], &[2, 2]);
    let result = tensor.where_with_f32(|x| x > 0.0, |x| x, |_| 0.0);
    assert_eq!(result, Tensor::new(&[0.0, 0.0, 0.0, 1.5], &[2, 2]));
}

#[test]
fn test_where_with_f32_derivative_style() {
    let tensor = Tensor::new(&[-1.0, 2.0], &[1, 2]);
    let result = tensor.where_with_f32(|x| x > 0.0, |_| 1.0, |_| 0.1);
    assert_eq!(result, Tensor::new(&[0.1, 1.0], &[1, 2]));
}

#[test]
fn test_sum_rows() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let summed = tensor.sum_rows();
    assert_eq!(summed.shape(), &[1, 3]);
    assert_eq!(summed, Tensor::new(&[5.0, 7.0, 9.0], &[1, 3]));
}

#[test]
fn test_sum_rows_single_row() {
    let tensor = Tensor::new(&[1.0, 2.0], &[1, 2]);
    assert_eq!(tensor.sum_rows(), tensor);
}

#[test]
#[should_panic(expected = "2阶")]
fn test_sum_rows_requires_2d() {
    let tensor = Tensor::zeros(&[4]);
    let _ = tensor.sum_rows();
}

#[test]
fn test_display_contains_shape() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let text = format!("{tensor}");
    assert!(text.contains("形状: [2, 2]"));
    assert!(text.contains("1.0000"));
}

#[test]
fn test_display_truncates_large_tensor() {
    let tensor = Tensor::zeros(&[10, 10]);
    let text = format!("{tensor}");
    assert!(text.contains(".."));
}
