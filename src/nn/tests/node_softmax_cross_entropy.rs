use super::assert_tensor_approx_eq;
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;

#[test]
fn test_softmax_cross_entropy_creation() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    // 损失是标量[1, 1]
    assert_eq!(g.get_node_value_expected_shape(loss).unwrap(), &[1, 1]);
}

#[test]
fn test_softmax_cross_entropy_shape_mismatch() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 4], Some("labels")).unwrap();

    let result = g.new_softmax_cross_entropy_node(logits, labels, None);
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_softmax_cross_entropy_forward_simple() {
    // 闭式参考值：
    // logits = [1, 2, 3], labels = [0, 0, 1]
    // softmax = [0.09003057, 0.24472848, 0.66524094]
    // loss = -ln(0.66524094) = 0.40760597

    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(logits, Some(&Tensor::new(&[1.0, 2.0, 3.0], &[1, 3])))
        .unwrap();
    g.set_node_value(labels, Some(&Tensor::new(&[0.0, 0.0, 1.0], &[1, 3])))
        .unwrap();

    g.forward(loss).unwrap();

    let loss_value = g.get_node_value(loss).unwrap().unwrap();
    assert_tensor_approx_eq(loss_value, &Tensor::new(&[0.40760597], &[1, 1]), 1e-5);
}

#[test]
fn test_softmax_cross_entropy_forward_uniform() {
    // logits全相等时softmax均匀，loss = ln(num_classes)
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[1, 4], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 4], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(logits, Some(&Tensor::new(&[1.0, 1.0, 1.0, 1.0], &[1, 4])))
        .unwrap();
    g.set_node_value(labels, Some(&Tensor::new(&[0.0, 1.0, 0.0, 0.0], &[1, 4])))
        .unwrap();

    g.forward(loss).unwrap();

    let loss_value = g.get_node_value(loss).unwrap().unwrap();
    assert_tensor_approx_eq(loss_value, &Tensor::new(&[1.3862944], &[1, 1]), 1e-5);
}

#[test]
fn test_softmax_cross_entropy_batch_mean() {
    // 两个样本：[1,2,3]/类3 → 0.40760597；[0,0,0]/类1 → ln(3) = 1.0986123
    // batch损失为两者均值
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[2, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[2, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(
        logits,
        Some(&Tensor::new(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0], &[2, 3])),
    )
    .unwrap();
    g.set_node_value(
        labels,
        Some(&Tensor::new(&[0.0, 0.0, 1.0, 1.0, 0.0, 0.0], &[2, 3])),
    )
    .unwrap();

    g.forward(loss).unwrap();

    let expected = (0.40760597 + 1.0986123) / 2.0;
    let loss_value = g.get_node_value(loss).unwrap().unwrap();
    assert_tensor_approx_eq(loss_value, &Tensor::new(&[expected], &[1, 1]), 1e-5);
}

#[test]
fn test_softmax_cross_entropy_numerical_stability() {
    // 大logits直接exp会溢出，log-sum-exp应保持有限
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_input_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(
        logits,
        Some(&Tensor::new(&[1000.0, 1001.0, 1002.0], &[1, 3])),
    )
    .unwrap();
    g.set_node_value(labels, Some(&Tensor::new(&[0.0, 0.0, 1.0], &[1, 3])))
        .unwrap();

    g.forward(loss).unwrap();

    let loss_value = g.get_node_value(loss).unwrap().unwrap();
    assert!(loss_value.number().unwrap().is_finite());
    // 平移不变性：与[0,1,2]的损失相同
    assert_tensor_approx_eq(loss_value, &Tensor::new(&[0.40760597], &[1, 1]), 1e-4);
}

#[test]
fn test_softmax_cross_entropy_grad_to_logits() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    // logits需为参数节点才能参与梯度计算
    let logits = g.new_parameter_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_input_node(&[1, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(logits, Some(&Tensor::new(&[1.0, 2.0, 3.0], &[1, 3])))
        .unwrap();
    g.set_node_value(labels, Some(&Tensor::new(&[0.0, 0.0, 1.0], &[1, 3])))
        .unwrap();
    g.forward(loss).unwrap();

    let loss_node = g.get_node(loss).unwrap();
    let grad = loss_node
        .calc_grad_to_parent(g.get_node(logits).unwrap(), &Tensor::ones(&[1, 1]), None)
        .unwrap();

    // dL/dlogits = softmax - labels（batch=1）
    let expected = Tensor::new(&[0.09003057, 0.24472848, -0.33475906], &[1, 3]);
    assert_tensor_approx_eq(&grad, &expected, 1e-5);
}

#[test]
fn test_softmax_cross_entropy_no_grad_to_labels() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let logits = g.new_parameter_node(&[1, 3], Some("logits")).unwrap();
    let labels = g.new_parameter_node(&[1, 3], Some("labels")).unwrap();
    let loss = g
        .new_softmax_cross_entropy_node(logits, labels, Some("loss"))
        .unwrap();

    g.set_node_value(logits, Some(&Tensor::zeros(&[1, 3]))).unwrap();
    g.set_node_value(labels, Some(&Tensor::new(&[1.0, 0.0, 0.0], &[1, 3])))
        .unwrap();
    g.forward(loss).unwrap();

    let loss_node = g.get_node(loss).unwrap();
    let result = loss_node.calc_grad_to_parent(
        g.get_node(labels).unwrap(),
        &Tensor::ones(&[1, 1]),
        None,
    );
    assert!(matches!(result, Err(GraphError::InvalidOperation(_))));
}
