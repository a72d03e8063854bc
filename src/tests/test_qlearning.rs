use ndarray::{array, Array2};
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{MetisError, Result};
use crate::network::{Activation, Layer, QNetwork, SharedQNetwork};
use crate::optimizer::{OptimizerWrapper, SGD};
use crate::replay_buffer::{Minibatch, MinibatchSource, ReplayBuffer};
use crate::strategy::{LearningStrategy, NoLearnStrategy, QLearningBuilder, QLearningStrategy};

/// Deterministic minibatch source returning the same batch every call.
struct FixedSource {
    batch: Minibatch,
}

impl FixedSource {
    fn shared(batch: Minibatch) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(FixedSource { batch }))
    }
}

impl MinibatchSource for FixedSource {
    fn sample_minibatch(&mut self, _batch_size: usize) -> Result<Minibatch> {
        Ok(self.batch.clone())
    }
}

/// Single linear layer mapping one input to one action value.
fn scalar_network(weight: f32, bias: f32) -> SharedQNetwork {
    let layer = Layer::new(1, 1, Activation::Linear)
        .with_weights(array![[weight]])
        .with_biases(array![bias]);
    QNetwork::new(&[1, 1], &[Activation::Linear])
        .with_layers(vec![layer])
        .into_shared()
}

fn single_transition_batch(prev: f32, action: usize, reward: f32, next: f32) -> Minibatch {
    Minibatch::new(
        array![[prev]],
        array![action],
        array![reward],
        array![[next]],
    )
    .unwrap()
}

#[test]
fn test_no_learn_leaves_parameters_untouched() {
    let q = QNetwork::value_network(&[4, 16, 2]);
    let snapshot: Vec<_> = q.layers.iter().map(|l| (l.weights.clone(), l.biases.clone())).collect();

    let mut strategy = NoLearnStrategy::new();
    for _ in 0..5 {
        strategy.learn().unwrap();
    }

    for (layer, (weights, biases)) in q.layers.iter().zip(snapshot) {
        assert_eq!(layer.weights, weights);
        assert_eq!(layer.biases, biases);
    }
}

#[test]
fn test_gamma_zero_targets_reduce_to_rewards() {
    // Q(prev=2) = 2 and Q(next=5) = 5. With gamma = 0 the target must be the
    // reward alone: grad = (2 - 1), so the weight moves to 1 - 0.1 * 2 * 1.
    let q = scalar_network(1.0, 0.0);
    let replay = FixedSource::shared(single_transition_batch(2.0, 0, 1.0, 5.0));
    let mut strategy = QLearningStrategy::new(
        q.clone(),
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.0,
        1,
        0.1,
    );

    strategy.learn().unwrap();

    let weight = q.borrow().layers[0].weights[[0, 0]];
    let bias = q.borrow().layers[0].biases[0];
    assert!((weight - 0.8).abs() < 1e-6, "weight = {}", weight);
    assert!((bias - (-0.1)).abs() < 1e-6, "bias = {}", bias);
    // MSE over one sample with error 1.0
    assert!((strategy.last_loss().unwrap() - 0.5).abs() < 1e-6);
}

#[test]
fn test_bootstrap_target_uses_discounted_next_max() {
    // target = 1 + 0.9 * 5 = 5.5, grad = (2 - 5.5) = -3.5,
    // weight <- 1 - 0.1 * (2 * -3.5) = 1.7, bias <- 0 - 0.1 * -3.5 = 0.35
    let q = scalar_network(1.0, 0.0);
    let replay = FixedSource::shared(single_transition_batch(2.0, 0, 1.0, 5.0));
    let mut strategy = QLearningStrategy::new(
        q.clone(),
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.9,
        1,
        0.1,
    );

    strategy.learn().unwrap();

    let weight = q.borrow().layers[0].weights[[0, 0]];
    let bias = q.borrow().layers[0].biases[0];
    assert!((weight - 1.7).abs() < 1e-5, "weight = {}", weight);
    assert!((bias - 0.35).abs() < 1e-5, "bias = {}", bias);
}

#[test]
fn test_only_taken_actions_receive_error_signal() {
    // Two actions, both scored from the bias alone. The transition takes
    // action 0, so the action-1 column must not move.
    let layer = Layer::new(1, 2, Activation::Linear)
        .with_weights(array![[0.0, 0.0]])
        .with_biases(array![0.0, 0.25]);
    let q = QNetwork::new(&[1, 2], &[Activation::Linear])
        .with_layers(vec![layer])
        .into_shared();
    let replay = FixedSource::shared(Minibatch::new(
        array![[0.0]],
        array![0],
        array![1.0],
        array![[0.0]],
    ).unwrap());
    let mut strategy = QLearningStrategy::new(
        q.clone(),
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.0,
        1,
        0.1,
    );

    strategy.learn().unwrap();

    let biases = q.borrow().layers[0].biases.clone();
    assert!(biases[0] > 0.0, "taken action must move toward the target");
    assert_eq!(biases[1], 0.25, "untaken action must not move");
}

#[test]
fn test_repeated_learning_decreases_loss() {
    let q = QNetwork::value_network(&[2, 2]).into_shared();
    let batch = Minibatch::new(
        array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.5, 0.5]],
        array![0, 1, 0, 1],
        array![1.0, 2.0, 3.0, 0.5],
        Array2::zeros((4, 2)),
    )
    .unwrap();
    let replay = FixedSource::shared(batch);
    let mut strategy = QLearningStrategy::new(
        q,
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.0,
        4,
        0.1,
    );

    let mut losses = Vec::new();
    for _ in 0..30 {
        strategy.learn().unwrap();
        losses.push(strategy.last_loss().unwrap());
    }

    for window in losses.windows(2) {
        assert!(window[1] <= window[0] + 1e-6, "loss increased: {:?}", window);
    }
    assert!(
        losses[losses.len() - 1] < losses[0] * 0.7,
        "loss barely moved: {} -> {}",
        losses[0],
        losses[losses.len() - 1]
    );
}

#[test]
fn test_train_steps_and_last_loss_tracking() {
    let q = scalar_network(0.0, 0.0);
    let replay = FixedSource::shared(single_transition_batch(1.0, 0, 1.0, 1.0));
    let mut strategy = QLearningStrategy::new(
        q,
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.5,
        1,
        0.01,
    );

    assert_eq!(strategy.train_steps(), 0);
    assert!(strategy.last_loss().is_none());

    strategy.learn().unwrap();
    strategy.learn().unwrap();

    assert_eq!(strategy.train_steps(), 2);
    assert!(strategy.last_loss().is_some());
}

#[test]
fn test_buffer_underflow_propagates() {
    let q = scalar_network(0.0, 0.0);
    let replay = Rc::new(RefCell::new(ReplayBuffer::new(8)));
    let mut strategy = QLearningStrategy::new(
        q,
        replay,
        OptimizerWrapper::SGD(SGD::new()),
        0.9,
        4,
        0.01,
    );

    let result = strategy.learn();

    assert!(matches!(
        result,
        Err(MetisError::NotEnoughTransitions { requested: 4, available: 0 })
    ));
}

#[test]
fn test_builder_requires_network_and_replay() {
    let result = QLearningBuilder::<ReplayBuffer>::new().build();
    assert!(matches!(result, Err(MetisError::InvalidParameter { .. })));

    let replay = Rc::new(RefCell::new(ReplayBuffer::new(8)));
    let result = QLearningBuilder::new().replay(replay).build();
    assert!(matches!(result, Err(MetisError::InvalidParameter { .. })));
}

#[test]
fn test_builder_rejects_zero_batch_size() {
    let q = QNetwork::value_network(&[2, 2]).into_shared();
    let replay = Rc::new(RefCell::new(ReplayBuffer::new(8)));

    let result = QLearningBuilder::new()
        .q_network(q)
        .replay(replay)
        .batch_size(0)
        .build();

    match result {
        Err(MetisError::InvalidParameter { name, .. }) => assert_eq!(name, "batch_size"),
        other => panic!("expected InvalidParameter, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_builder_defaults_to_adam() {
    let q = QNetwork::value_network(&[2, 4, 2]).into_shared();
    let replay = Rc::new(RefCell::new(ReplayBuffer::new(8)));

    let strategy = QLearningBuilder::new()
        .q_network(q)
        .replay(replay)
        .build()
        .unwrap();

    assert_eq!(strategy.train_steps(), 0);
}
