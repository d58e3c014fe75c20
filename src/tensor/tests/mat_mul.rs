use crate::tensor::Tensor;

#[test]
fn test_mat_mul_basic() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], &[3, 2]);
    let result = a.mat_mul(&b);
    // [1*7+2*9+3*11, 1*8+2*10+3*12; 4*7+5*9+6*11, 4*8+5*10+6*12]
    assert_eq!(result, Tensor::new(&[58.0, 64.0, 139.0, 154.0], &[2, 2]));
}

#[test]
fn test_mat_mul_identity() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let identity = Tensor::new(&[1.0, 0.0, 0.0, 1.0], &[2, 2]);
    assert_eq!(a.mat_mul(&identity), a);
}

#[test]
#[should_panic(expected = "矩阵乘法")]
fn test_mat_mul_incompatible() {
    let a = Tensor::zeros(&[2, 3]);
    let b = Tensor::zeros(&[2, 3]);
    let _ = a.mat_mul(&b);
}

#[test]
#[should_panic(expected = "2阶")]
fn test_mat_mul_requires_2d() {
    let a = Tensor::zeros(&[6]);
    let b = Tensor::zeros(&[6]);
    let _ = a.mat_mul(&b);
}
