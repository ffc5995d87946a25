//! # Quest DQN - Deep Q-Learning on a Quest Progression Simulator
//!
//! A small, dependency-light reinforcement learning stack that trains a
//! value network to play through a fixed guide of quests by choosing among
//! walking, skill training, questing, banking and eating.
//!
//! ## Key Features
//!
//! - **Simulator**: deterministic game-state machine with stochastic training success
//! - **Network**: three-layer MLP with hand-written backpropagation and gradient clipping
//! - **Agent**: DQN with experience replay and a periodically synchronized target network
//! - **Trainers**: a continuous loop and a resumable staged loop with checkpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quest_dqn::config::TrainerConfig;
//! use quest_dqn::trainer::Trainer;
//!
//! let config = TrainerConfig {
//!     total_steps: 5_000,
//!     seed: Some(7),
//!     ..TrainerConfig::default()
//! };
//! let mut trainer = Trainer::new(config)?;
//! let report = trainer.run()?;
//! println!("furthest quest: {}", report.best_quest);
//! # Ok::<(), quest_dqn::error::QuestError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`simulator`] - Game state, actions, quests and the step/reset contract
//! - [`layers`] - Dense layers, activations and weight initialization
//! - [`optimizer`] - SGD updates and gradient clipping
//! - [`network`] - The value network used by the agent
//! - [`checkpoint`] - Named-tensor weight files
//! - [`replay_buffer`] - Fixed-capacity experience replay
//! - [`agent`] - Epsilon-greedy DQN agent
//! - [`metrics`] - Episode and loss tracking
//! - [`config`] - Trainer hyperparameters
//! - [`trainer`] - Continuous and staged training loops
//! - [`error`] - Error types and result handling

pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod layers;
pub mod metrics;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod simulator;
pub mod trainer;

#[cfg(test)]
mod tests;
