//! Action-selection and learning strategies.
//!
//! An agent composes one [`ActionSelection`] strategy with one
//! [`LearningStrategy`]. Action selection decides which action to take given
//! a state; learning decides how to update the value function from sampled
//! experience. The two sides only meet through the shared Q-network handle.

pub mod action;
pub mod learn;

pub use action::{EpsilonGreedyStrategy, GreedyStrategy, RandomStrategy};
pub use learn::{NoLearnStrategy, QLearningBuilder, QLearningStrategy};

use ndarray::ArrayView1;

use crate::error::Result;
use crate::types::Action;

/// Decides which action to take given a state.
pub trait ActionSelection {
    fn select_action(&mut self, state: ArrayView1<f32>) -> Result<Action>;
}

/// Decides how to update the value function from sampled experience.
pub trait LearningStrategy {
    fn learn(&mut self) -> Result<()>;
}
