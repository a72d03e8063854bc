use log::trace;
use ndarray::ArrayView1;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::ActionSelection;
use crate::error::{MetisError, Result};
use crate::network::SharedQNetwork;
use crate::schedule::DecaySchedule;
use crate::types::Action;

/// Uniform exploration baseline: ignores the state entirely and draws one
/// action index uniformly from the action space.
pub struct RandomStrategy {
    num_actions: usize,
    rng: SmallRng,
}

impl RandomStrategy {
    pub fn new(num_actions: usize) -> Self {
        Self::with_rng(num_actions, SmallRng::from_entropy())
    }

    /// Create a strategy with an explicit generator for deterministic play.
    pub fn with_rng(num_actions: usize, rng: SmallRng) -> Self {
        RandomStrategy { num_actions, rng }
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }
}

impl ActionSelection for RandomStrategy {
    fn select_action(&mut self, _state: ArrayView1<f32>) -> Result<Action> {
        Ok(Action::new(self.rng.gen_range(0..self.num_actions)))
    }
}

/// Exploitation: pick the action with the highest estimated value.
///
/// Runs a single evaluation-only forward pass; shape mismatches between the
/// state and the network propagate untranslated.
pub struct GreedyStrategy {
    q: SharedQNetwork,
}

impl GreedyStrategy {
    pub fn new(q: SharedQNetwork) -> Self {
        GreedyStrategy { q }
    }
}

impl ActionSelection for GreedyStrategy {
    fn select_action(&mut self, state: ArrayView1<f32>) -> Result<Action> {
        let values = self.q.borrow_mut().forward(state);
        values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(index, _)| Action::new(index))
            .ok_or_else(|| MetisError::NumericalError("No Q-values to select from".to_string()))
    }
}

/// Anneal exploration against exploitation using a decay schedule.
///
/// Each call queries the schedule for the current epsilon, draws `u` in
/// `[0, 1)`, and explores iff `u < epsilon`. The comparison is strict, so an
/// epsilon of zero never explores.
pub struct EpsilonGreedyStrategy<D: DecaySchedule> {
    decay: D,
    random: RandomStrategy,
    greedy: GreedyStrategy,
    rng: SmallRng,
}

impl<D: DecaySchedule> EpsilonGreedyStrategy<D> {
    pub fn new(q: SharedQNetwork, num_actions: usize, decay: D) -> Self {
        Self::with_rng(q, num_actions, decay, SmallRng::from_entropy())
    }

    /// Create a strategy with an explicit generator. The owned random
    /// strategy is seeded from the same generator.
    pub fn with_rng(q: SharedQNetwork, num_actions: usize, decay: D, mut rng: SmallRng) -> Self {
        let random = RandomStrategy::with_rng(num_actions, SmallRng::seed_from_u64(rng.gen()));
        EpsilonGreedyStrategy {
            decay,
            random,
            greedy: GreedyStrategy::new(q),
            rng,
        }
    }
}

impl<D: DecaySchedule> ActionSelection for EpsilonGreedyStrategy<D> {
    fn select_action(&mut self, state: ArrayView1<f32>) -> Result<Action> {
        let epsilon = self.decay.epsilon();
        let draw: f32 = self.rng.gen();

        if draw < epsilon {
            trace!("epsilon-greedy: exploring (epsilon={:.4})", epsilon);
            self.random.select_action(state)
        } else {
            trace!("epsilon-greedy: exploiting (epsilon={:.4})", epsilon);
            self.greedy.select_action(state)
        }
    }
}
