use super::assert_tensor_approx_eq;
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;

#[test]
fn test_mat_mul_forward() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 3], Some("A")).unwrap();
    let b = g.new_parameter_node(&[3, 2], Some("B")).unwrap();
    let mm = g.new_mat_mul_node(a, b, Some("mm")).unwrap();

    g.set_node_value(
        a,
        Some(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])),
    )
    .unwrap();
    g.set_node_value(
        b,
        Some(&Tensor::new(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], &[3, 2])),
    )
    .unwrap();

    g.forward(mm).unwrap();
    let value = g.get_node_value(mm).unwrap().unwrap();
    assert_eq!(value, &Tensor::new(&[58.0, 64.0, 139.0, 154.0], &[2, 2]));
}

#[test]
fn test_mat_mul_grads() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 3], Some("A")).unwrap();
    let b = g.new_parameter_node(&[3, 2], Some("B")).unwrap();
    let mm = g.new_mat_mul_node(a, b, Some("mm")).unwrap();

    g.set_node_value(
        a,
        Some(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])),
    )
    .unwrap();
    g.set_node_value(
        b,
        Some(&Tensor::new(&[1.0, 0.0, 0.0, 1.0, 1.0, 1.0], &[3, 2])),
    )
    .unwrap();
    g.forward(mm).unwrap();

    let upstream = Tensor::ones(&[2, 2]);
    let mm_node = g.get_node(mm).unwrap();

    // dL/dA = G @ Bᵀ
    let grad_a = mm_node
        .calc_grad_to_parent(
            g.get_node(a).unwrap(),
            &upstream,
            Some(g.get_node(b).unwrap()),
        )
        .unwrap();
    assert_tensor_approx_eq(
        &grad_a,
        &Tensor::new(&[1.0, 1.0, 2.0, 1.0, 1.0, 2.0], &[2, 3]),
        1e-6,
    );

    // dL/dB = Aᵀ @ G
    let grad_b = mm_node
        .calc_grad_to_parent(
            g.get_node(b).unwrap(),
            &upstream,
            Some(g.get_node(a).unwrap()),
        )
        .unwrap();
    assert_tensor_approx_eq(
        &grad_b,
        &Tensor::new(&[5.0, 5.0, 7.0, 7.0, 9.0, 9.0], &[3, 2]),
        1e-6,
    );
}

#[test]
fn test_mat_mul_creation_incompatible() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 3], Some("A")).unwrap();
    let b = g.new_parameter_node(&[2, 3], Some("B")).unwrap();

    let result = g.new_mat_mul_node(a, b, None);
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_mat_mul_grad_needs_assistant() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[1, 2], Some("A")).unwrap();
    let b = g.new_parameter_node(&[2, 1], Some("B")).unwrap();
    let mm = g.new_mat_mul_node(a, b, Some("mm")).unwrap();

    g.set_node_value(a, Some(&Tensor::zeros(&[1, 2]))).unwrap();
    g.set_node_value(b, Some(&Tensor::zeros(&[2, 1]))).unwrap();
    g.forward(mm).unwrap();

    let mm_node = g.get_node(mm).unwrap();
    let result =
        mm_node.calc_grad_to_parent(g.get_node(a).unwrap(), &Tensor::ones(&[1, 1]), None);
    assert!(matches!(result, Err(GraphError::ComputationError(_))));
}
