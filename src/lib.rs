//! # Metis - Composable Q-Learning Agent Core
//!
//! Metis is a small reinforcement-learning scaffold built around one idea:
//! an agent is the composition of an action-selection strategy and a
//! learning strategy. The action side decides how to balance exploration
//! against exploitation; the learning side decides how to update the value
//! function from replayed experience. The dense Q-network, the optimizers,
//! the replay buffer, and the decay schedules exist to make that pair run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use metis::agent::Agent;
//! use metis::network::QNetwork;
//! use metis::replay_buffer::ReplayBuffer;
//! use metis::schedule::LinearDecay;
//! use metis::strategy::{EpsilonGreedyStrategy, QLearningBuilder};
//!
//! // A value network for a 4-dimensional state and 2 actions
//! let q = QNetwork::value_network(&[4, 128, 128, 2]).into_shared();
//! let replay = Rc::new(RefCell::new(ReplayBuffer::new(10_000)));
//!
//! let play = EpsilonGreedyStrategy::new(q.clone(), 2, LinearDecay::new(1.0, 0.01, 50_000));
//! let learn = QLearningBuilder::new()
//!     .q_network(q)
//!     .replay(replay)
//!     .gamma(0.99)
//!     .batch_size(32)
//!     .learning_rate(1e-3)
//!     .build()
//!     .unwrap();
//!
//! let mut agent = Agent::new(play, learn);
//! // The training loop drives agent.select_action(...) and agent.learn().
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The composition facade
//! - [`error`] - Error types and result handling
//! - [`loss`] - Loss criteria for training
//! - [`network`] - The dense Q-network value function
//! - [`optimizer`] - Optimization algorithms
//! - [`replay_buffer`] - Experience replay and minibatch sampling
//! - [`schedule`] - Exploration decay schedules
//! - [`strategy`] - Action-selection and learning strategies
//! - [`types`] - The discrete action type

pub mod agent;
pub mod error;
pub mod loss;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod schedule;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod tests;
