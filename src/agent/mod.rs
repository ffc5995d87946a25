//! # Reinforcement Learning Agent
//!
//! The DQN agent pairs a trainable [`ValueNetwork`](crate::network::ValueNetwork)
//! with a frozen target copy and implements:
//!
//! - **Epsilon-greedy selection**: a uniformly random action with probability
//!   epsilon, otherwise the argmax of the current network
//! - **Bellman updates**: `r + gamma * max_a' Q_target(s', a') * (1 - done)`,
//!   applied only to the column of the action actually taken
//! - **Target synchronization**: an explicit deep copy, never shared storage
//!
//! Both the continuous trainer and the staged trainer drive the same agent.

mod dqn;
pub use dqn::{DqnAgent, EpsilonSchedule};
