use crate::nn::{Graph, GraphError, Init};
use crate::tensor::Tensor;

#[test]
fn test_node_ids_and_names() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let a = g.new_input_node(&[1, 2], Some("a")).unwrap();
    let b = g.new_input_node(&[1, 2], None).unwrap();

    assert_eq!(g.get_node_name(a).unwrap(), "a");
    // 未命名节点按类型自动编号
    assert_eq!(g.get_node_name(b).unwrap(), "input_1");
    assert_eq!(g.nodes_count(), 2);
    assert_ne!(a, b);
}

#[test]
fn test_duplicate_node_name() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    g.new_input_node(&[1, 2], Some("x")).unwrap();
    let result = g.new_input_node(&[1, 2], Some("x"));
    assert!(matches!(result, Err(GraphError::DuplicateNodeName(_))));
}

#[test]
fn test_input_requires_2d() {
    let graph = Graph::new();
    let mut g = graph.inner_mut();

    let result = g.new_input_node(&[4], None);
    assert!(matches!(result, Err(GraphError::DimensionMismatch { .. })));
}

#[test]
fn test_forward_unset_input_fails() {
    let graph = Graph::new();
    let x = graph.input_shape(&[2, 3], Some("x")).unwrap();

    // 占位输入未喂数据，前向传播应报错
    assert!(x.forward().is_err());
}

#[test]
fn test_input_dynamic_batch() {
    let graph = Graph::new();
    let x = graph.input_shape(&[4, 3], Some("x")).unwrap();

    // batch维可变
    x.set_value(&Tensor::zeros(&[4, 3])).unwrap();
    x.set_value(&Tensor::zeros(&[2, 3])).unwrap();
    x.set_value(&Tensor::zeros(&[7, 3])).unwrap();
}

#[test]
fn test_input_feature_shape_mismatch() {
    let graph = Graph::new();
    let x = graph.input_shape(&[4, 3], Some("x")).unwrap();

    // 特征维不符，不允许静默截断或填充
    let result = x.set_value(&Tensor::zeros(&[4, 5]));
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));

    let result = x.set_value(&Tensor::zeros(&[12]));
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_input_grad_is_rejected() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::zeros(&[1, 2])).unwrap();

    assert!(x.grad().is_err());
}

#[test]
fn test_parameter_initialized_on_creation() {
    let graph = Graph::new();
    let w = graph.parameter(&[3, 2], Init::Ones, "w").unwrap();

    let value = w.value().unwrap().unwrap();
    assert_eq!(value, Tensor::ones(&[3, 2]));
}

#[test]
fn test_seeded_graph_parameter_deterministic() {
    let graph1 = Graph::new_with_seed(42);
    let graph2 = Graph::new_with_seed(42);

    let w1 = graph1.parameter(&[4, 4], Init::Kaiming, "w").unwrap();
    let w2 = graph2.parameter(&[4, 4], Init::Kaiming, "w").unwrap();

    assert_eq!(w1.value().unwrap().unwrap(), w2.value().unwrap().unwrap());
}

#[test]
fn test_train_eval_mode() {
    let graph = Graph::new();
    assert!(!graph.is_eval());

    graph.eval();
    assert!(graph.is_eval());

    graph.train();
    assert!(!graph.is_eval());

    // no_grad_scope执行完恢复原模式
    graph.no_grad_scope(|g| assert!(g.is_eval()));
    assert!(!graph.is_eval());
}

#[test]
fn test_zeros_and_ones_vars() {
    let graph = Graph::new();
    let zeros = graph.zeros(&[2, 3]).unwrap();
    let ones = graph.ones(&[2, 3]).unwrap();

    assert_eq!(zeros.value().unwrap().unwrap(), Tensor::zeros(&[2, 3]));
    assert_eq!(ones.value().unwrap().unwrap(), Tensor::ones(&[2, 3]));
}

#[test]
fn test_var_item_on_non_scalar_fails() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::zeros(&[2, 2])).unwrap();
    assert!(x.item().is_err());
}
