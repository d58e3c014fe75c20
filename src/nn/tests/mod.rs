mod graph_basic;
mod node_add;
mod node_mat_mul;
mod node_softmax_cross_entropy;

use crate::tensor::Tensor;

/// 辅助函数：比较两个张量是否近似相等。
pub(in crate::nn) fn assert_tensor_approx_eq(actual: &Tensor, expected: &Tensor, tolerance: f32) {
    assert_eq!(
        actual.shape(),
        expected.shape(),
        "形状不匹配: {:?} vs {:?}",
        actual.shape(),
        expected.shape()
    );
    for (i, (a, e)) in actual
        .flatten_view()
        .iter()
        .zip(expected.flatten_view().iter())
        .enumerate()
    {
        assert!(
            (a - e).abs() < tolerance,
            "索引{}处值不匹配: {}与{}，误差{}超过容差{}",
            i,
            a,
            e,
            (a - e).abs(),
            tolerance
        );
    }
}
