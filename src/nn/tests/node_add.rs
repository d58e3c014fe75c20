use super::assert_tensor_approx_eq;
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;

#[test]
fn test_add_forward_same_shape() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 2], Some("a")).unwrap();
    let b = g.new_parameter_node(&[2, 2], Some("b")).unwrap();
    let add = g.new_add_node(&[a, b], Some("add")).unwrap();

    g.set_node_value(a, Some(&Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2])))
        .unwrap();
    g.set_node_value(b, Some(&Tensor::new(&[10.0, 20.0, 30.0, 40.0], &[2, 2])))
        .unwrap();

    g.forward(add).unwrap();
    let value = g.get_node_value(add).unwrap().unwrap();
    assert_eq!(value, &Tensor::new(&[11.0, 22.0, 33.0, 44.0], &[2, 2]));
}

#[test]
fn test_add_forward_row_broadcast() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let matrix = g.new_parameter_node(&[2, 3], Some("m")).unwrap();
    let bias = g.new_parameter_node(&[1, 3], Some("b")).unwrap();
    let add = g.new_add_node(&[matrix, bias], Some("add")).unwrap();

    g.set_node_value(
        matrix,
        Some(&Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])),
    )
    .unwrap();
    g.set_node_value(bias, Some(&Tensor::new(&[10.0, 20.0, 30.0], &[1, 3])))
        .unwrap();

    g.forward(add).unwrap();
    let value = g.get_node_value(add).unwrap().unwrap();
    assert_eq!(
        value,
        &Tensor::new(&[11.0, 22.0, 33.0, 14.0, 25.0, 36.0], &[2, 3])
    );
}

#[test]
fn test_add_grad_passthrough_and_row_sum() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let matrix = g.new_parameter_node(&[2, 3], Some("m")).unwrap();
    let bias = g.new_parameter_node(&[1, 3], Some("b")).unwrap();
    let add = g.new_add_node(&[matrix, bias], Some("add")).unwrap();

    g.set_node_value(matrix, Some(&Tensor::zeros(&[2, 3]))).unwrap();
    g.set_node_value(bias, Some(&Tensor::zeros(&[1, 3]))).unwrap();
    g.forward(add).unwrap();

    let upstream = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let add_node = g.get_node(add).unwrap();

    // 同形父节点：上游梯度原样传递
    let grad_matrix = add_node
        .calc_grad_to_parent(g.get_node(matrix).unwrap(), &upstream, None)
        .unwrap();
    assert_tensor_approx_eq(&grad_matrix, &upstream, 1e-6);

    // 被广播的行向量父节点：上游梯度按行求和
    let grad_bias = add_node
        .calc_grad_to_parent(g.get_node(bias).unwrap(), &upstream, None)
        .unwrap();
    assert_tensor_approx_eq(&grad_bias, &Tensor::new(&[5.0, 7.0, 9.0], &[1, 3]), 1e-6);
}

#[test]
fn test_add_creation_shape_mismatch() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 3], Some("a")).unwrap();
    let b = g.new_parameter_node(&[2, 4], Some("b")).unwrap();

    let result = g.new_add_node(&[a, b], None);
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_add_needs_two_parents() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_parameter_node(&[2, 2], Some("a")).unwrap();
    let result = g.new_add_node(&[a], None);
    assert!(matches!(result, Err(GraphError::InvalidOperation(_))));
}
