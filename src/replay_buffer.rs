use ndarray::{Array1, Array2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::VecDeque;

use crate::error::{MetisError, Result};
use crate::types::Action;

/// One transition observed by the training loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub state: Array1<f32>,
    pub action: Action,
    pub reward: f32,
    pub next_state: Array1<f32>,
}

/// A batch of transitions as four parallel columns.
///
/// Index `i` refers to the same transition across all four columns.
#[derive(Clone, Debug)]
pub struct Minibatch {
    pub prev_states: Array2<f32>,
    pub actions: Array1<usize>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
}

impl Minibatch {
    /// Assemble a minibatch, checking that all four columns have the same
    /// leading length.
    pub fn new(
        prev_states: Array2<f32>,
        actions: Array1<usize>,
        rewards: Array1<f32>,
        next_states: Array2<f32>,
    ) -> Result<Self> {
        let len = prev_states.nrows();
        if actions.len() != len || rewards.len() != len || next_states.nrows() != len {
            return Err(MetisError::dimension_mismatch(
                format!("{} rows in every column", len),
                format!(
                    "actions: {}, rewards: {}, next_states: {}",
                    actions.len(),
                    rewards.len(),
                    next_states.nrows()
                ),
            ));
        }
        Ok(Minibatch {
            prev_states,
            actions,
            rewards,
            next_states,
        })
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// Source of sampled minibatches.
///
/// The replay buffer implements this; tests substitute deterministic sources.
pub trait MinibatchSource {
    fn sample_minibatch(&mut self, batch_size: usize) -> Result<Minibatch>;
}

/// Uniform experience replay buffer with a fixed capacity.
///
/// New transitions evict the oldest once the buffer is full. Sampling is
/// uniform without replacement from the stored transitions.
pub struct ReplayBuffer {
    buffer: VecDeque<Experience>,
    capacity: usize,
    rng: SmallRng,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, SmallRng::from_entropy())
    }

    /// Create a buffer with an explicit generator for deterministic sampling.
    pub fn with_rng(capacity: usize, rng: SmallRng) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            rng,
        }
    }

    pub fn push(&mut self, experience: Experience) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(experience);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl MinibatchSource for ReplayBuffer {
    fn sample_minibatch(&mut self, batch_size: usize) -> Result<Minibatch> {
        if batch_size > self.buffer.len() {
            return Err(MetisError::NotEnoughTransitions {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }

        let mut indices = (0..self.buffer.len()).collect::<Vec<usize>>();
        indices.shuffle(&mut self.rng);
        indices.truncate(batch_size);

        let state_size = self.buffer.front().map(|exp| exp.state.len()).unwrap_or(0);
        let mut prev_states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        let mut actions = Array1::zeros(batch_size);
        let mut rewards = Array1::zeros(batch_size);

        for (row, &index) in indices.iter().enumerate() {
            let exp = &self.buffer[index];
            prev_states.row_mut(row).assign(&exp.state);
            next_states.row_mut(row).assign(&exp.next_state);
            actions[row] = exp.action.index;
            rewards[row] = exp.reward;
        }

        Minibatch::new(prev_states, actions, rewards, next_states)
    }
}
