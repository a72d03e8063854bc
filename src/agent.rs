use ndarray::ArrayView1;

use crate::error::Result;
use crate::strategy::{ActionSelection, LearningStrategy};
use crate::types::Action;

/// Composition facade binding one action-selection strategy and one learning
/// strategy. Pure delegation: the agent itself holds no other state, and the
/// two strategies are fixed at construction.
pub struct Agent<P, L>
where
    P: ActionSelection,
    L: LearningStrategy,
{
    play_strategy: P,
    learn_strategy: L,
}

impl<P, L> Agent<P, L>
where
    P: ActionSelection,
    L: LearningStrategy,
{
    pub fn new(play_strategy: P, learn_strategy: L) -> Self {
        Agent {
            play_strategy,
            learn_strategy,
        }
    }

    /// Select an action for the given state.
    pub fn select_action(&mut self, state: ArrayView1<f32>) -> Result<Action> {
        self.play_strategy.select_action(state)
    }

    /// Perform one learning update.
    pub fn learn(&mut self) -> Result<()> {
        self.learn_strategy.learn()
    }

    pub fn play_strategy(&self) -> &P {
        &self.play_strategy
    }

    pub fn learn_strategy(&self) -> &L {
        &self.learn_strategy
    }
}
