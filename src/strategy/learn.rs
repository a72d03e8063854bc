use log::debug;
use ndarray::{Array1, Array2, Axis};
use std::cell::RefCell;
use std::rc::Rc;

use super::LearningStrategy;
use crate::error::{MetisError, Result};
use crate::loss::{Loss, MSE};
use crate::network::SharedQNetwork;
use crate::optimizer::{Adam, Optimizer, OptimizerWrapper};
use crate::replay_buffer::MinibatchSource;

/// Null learning strategy for inference-only agents.
#[derive(Default)]
pub struct NoLearnStrategy;

impl NoLearnStrategy {
    pub fn new() -> Self {
        NoLearnStrategy
    }
}

impl LearningStrategy for NoLearnStrategy {
    fn learn(&mut self) -> Result<()> {
        Ok(())
    }
}

/// One-step Q-learning via gradient descent on the shared Q-network.
///
/// Each `learn` call samples one minibatch and performs one optimizer step.
/// The bootstrap target `reward + gamma * max_a Q(next_state, a)` is computed
/// numerically and never differentiated through; only the forward pass over
/// the previous states feeds the backward pass. The same network produces
/// both the current estimate and the bootstrap target (no target network).
pub struct QLearningStrategy<B: MinibatchSource> {
    q: SharedQNetwork,
    replay: Rc<RefCell<B>>,
    optimizer: OptimizerWrapper,
    criterion: MSE,
    gamma: f32,
    batch_size: usize,
    learning_rate: f32,
    train_steps: usize,
    last_loss: Option<f32>,
}

impl<B: MinibatchSource> QLearningStrategy<B> {
    /// Create a strategy with an explicit optimizer. `gamma` and
    /// `learning_rate` are not validated; out-of-range values produce a
    /// misbehaving update rather than an error.
    pub fn new(
        q: SharedQNetwork,
        replay: Rc<RefCell<B>>,
        optimizer: OptimizerWrapper,
        gamma: f32,
        batch_size: usize,
        learning_rate: f32,
    ) -> Self {
        QLearningStrategy {
            q,
            replay,
            optimizer,
            criterion: MSE,
            gamma,
            batch_size,
            learning_rate,
            train_steps: 0,
            last_loss: None,
        }
    }

    /// Number of optimizer steps performed so far.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Loss of the most recent step, if any step has run.
    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }
}

impl<B: MinibatchSource> LearningStrategy for QLearningStrategy<B> {
    fn learn(&mut self) -> Result<()> {
        let batch = self.replay.borrow_mut().sample_minibatch(self.batch_size)?;

        let mut q = self.q.borrow_mut();

        // Bootstrap column: best achievable value from each next state,
        // estimated by the same network being trained. Computed before the
        // prev_states pass so the activations cached for backward belong to
        // the differentiable pass.
        let next_values = q.forward_batch(batch.next_states.view());
        let bootstrap = next_values.map_axis(Axis(1), |row| {
            row.fold(f32::NEG_INFINITY, |max, &v| max.max(v))
        });
        let targets = &batch.rewards + &(bootstrap * self.gamma);

        let predictions = q.forward_batch(batch.prev_states.view());
        let predicted = batch
            .actions
            .iter()
            .enumerate()
            .map(|(row, &action)| predictions[[row, action]])
            .collect::<Array1<f32>>();

        let loss = self.criterion.compute(predicted.view(), targets.view());
        let loss_gradient = self.criterion.gradient(predicted.view(), targets.view());

        // Scatter the per-sample loss gradient back to the taken-action
        // entries; all other action columns receive no error signal.
        let mut output_errors = Array2::zeros(predictions.raw_dim());
        for (row, &action) in batch.actions.iter().enumerate() {
            output_errors[[row, action]] = loss_gradient[row];
        }

        let gradients = q.backward_batch(output_errors.view());
        for (index, (layer, (weight_gradients, bias_gradients))) in
            q.layers.iter_mut().zip(gradients).enumerate()
        {
            self.optimizer
                .update_weights(index, &mut layer.weights, &weight_gradients, self.learning_rate);
            self.optimizer
                .update_biases(index, &mut layer.biases, &bias_gradients, self.learning_rate);
        }
        self.optimizer.finish_step();

        self.train_steps += 1;
        self.last_loss = Some(loss);
        debug!("q-learning step {}: loss={:.6}", self.train_steps, loss);

        Ok(())
    }
}

/// Builder for [`QLearningStrategy`].
pub struct QLearningBuilder<B: MinibatchSource> {
    q: Option<SharedQNetwork>,
    replay: Option<Rc<RefCell<B>>>,
    optimizer: Option<OptimizerWrapper>,
    gamma: f32,
    batch_size: usize,
    learning_rate: f32,
}

impl<B: MinibatchSource> QLearningBuilder<B> {
    pub fn new() -> Self {
        QLearningBuilder {
            q: None,
            replay: None,
            optimizer: None,
            gamma: 0.99,
            batch_size: 32,
            learning_rate: 1e-3,
        }
    }

    pub fn q_network(mut self, q: SharedQNetwork) -> Self {
        self.q = Some(q);
        self
    }

    pub fn replay(mut self, replay: Rc<RefCell<B>>) -> Self {
        self.replay = Some(replay);
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerWrapper) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Build the strategy. Defaults to an Adam optimizer with moment buffers
    /// shaped from the bound network's layers.
    pub fn build(self) -> Result<QLearningStrategy<B>> {
        let q = self.q.ok_or_else(|| MetisError::InvalidParameter {
            name: "q_network".to_string(),
            reason: "Q-network must be specified".to_string(),
        })?;
        let replay = self.replay.ok_or_else(|| MetisError::InvalidParameter {
            name: "replay".to_string(),
            reason: "Replay buffer must be specified".to_string(),
        })?;
        if self.batch_size == 0 {
            return Err(MetisError::InvalidParameter {
                name: "batch_size".to_string(),
                reason: "Batch size must be greater than 0".to_string(),
            });
        }

        let optimizer = match self.optimizer {
            Some(optimizer) => optimizer,
            None => OptimizerWrapper::Adam(Adam::default_for(&q.borrow().layers)),
        };

        Ok(QLearningStrategy::new(
            q,
            replay,
            optimizer,
            self.gamma,
            self.batch_size,
            self.learning_rate,
        ))
    }
}

impl<B: MinibatchSource> Default for QLearningBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}
