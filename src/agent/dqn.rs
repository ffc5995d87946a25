use ndarray::{ArrayView1, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{QuestError, Result};
use crate::network::ValueNetwork;
use crate::optimizer::GradientClipper;
use crate::replay_buffer::{Batch, ReplayBuffer};
use crate::simulator::Action;

/// Multiplicative epsilon decay toward a floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f32,
    pub end: f32,
    pub decay: f32,
}

impl EpsilonSchedule {
    /// A schedule that never changes epsilon.
    pub fn fixed(epsilon: f32) -> Self {
        EpsilonSchedule {
            start: epsilon,
            end: epsilon,
            decay: 1.0,
        }
    }

    /// Epsilon after one more step: `max(end, current * decay)`.
    pub fn next(&self, current: f32) -> f32 {
        (current * self.decay).max(self.end)
    }
}

/// Deep Q-Network agent with a frozen target network.
///
/// The agent owns two independent [`ValueNetwork`]s. `q_network` is trained on
/// every update; `target_network` only changes through [`DqnAgent::sync_target`].
pub struct DqnAgent {
    /// Main network for action selection
    pub q_network: ValueNetwork,

    /// Target network for Bellman targets
    pub target_network: ValueNetwork,

    /// Exploration rate
    pub epsilon: f32,

    pub schedule: EpsilonSchedule,

    /// Discount factor
    pub gamma: f32,

    pub learning_rate: f32,

    /// Number of gradient updates performed
    pub train_steps: usize,
}

impl DqnAgent {
    pub fn new<R: Rng + ?Sized>(
        state_size: usize,
        hidden_size: usize,
        action_size: usize,
        schedule: EpsilonSchedule,
        gamma: f32,
        learning_rate: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let q_network = ValueNetwork::new(state_size, hidden_size, action_size, &mut *rng)?;
        let mut target_network = ValueNetwork::new(state_size, hidden_size, action_size, rng)?;
        target_network.copy_from(&q_network)?;

        Ok(DqnAgent {
            q_network,
            target_network,
            epsilon: schedule.start,
            schedule,
            gamma,
            learning_rate,
            train_steps: 0,
        })
    }

    /// Use `clipper` for both networks
    pub fn with_clipper(mut self, clipper: GradientClipper) -> Self {
        self.q_network = self.q_network.with_clipper(clipper);
        self.target_network = self.target_network.with_clipper(clipper);
        self
    }

    /// Select action using epsilon-greedy policy
    pub fn act<R: Rng + ?Sized>(&mut self, state: ArrayView1<f32>, rng: &mut R) -> Result<Action> {
        if rng.gen::<f32>() < self.epsilon {
            // Exploration: random action
            Action::try_from(rng.gen_range(0..Action::COUNT))
        } else {
            self.greedy_action(state)
        }
    }

    /// Action with the highest estimated value. Ties go to the lowest index.
    pub fn greedy_action(&mut self, state: ArrayView1<f32>) -> Result<Action> {
        let q_values = self.q_network.predict(state)?;
        let mut best: Option<(usize, f32)> = None;
        for (idx, &value) in q_values.iter().enumerate() {
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((idx, value));
            }
        }
        let (idx, _) = best.ok_or_else(|| QuestError::NumericalError("No valid Q-values".to_string()))?;
        Action::try_from(idx)
    }

    /// Decay epsilon by one step of the schedule
    pub fn decay_epsilon(&mut self) {
        self.epsilon = self.schedule.next(self.epsilon);
    }

    /// Copy the current network into the target network
    pub fn sync_target(&mut self) -> Result<()> {
        self.target_network.copy_from(&self.q_network)
    }

    /// One Q-learning update restricted to the taken action of every sample.
    ///
    /// Returns the mean-squared error before the update.
    pub fn train_on_batch(&mut self, batch: &Batch) -> Result<f32> {
        if batch.is_empty() {
            return Err(QuestError::InsufficientSamples {
                requested: 1,
                available: 0,
            });
        }

        let next_q_values = self.target_network.forward(batch.next_states.view())?;
        let max_next_q = next_q_values.fold_axis(Axis(1), f32::NEG_INFINITY, |&max, &val| max.max(val));
        let bellman = &batch.rewards + &(max_next_q * self.gamma * (1.0 - &batch.dones));

        // Untaken actions keep the network's own estimate and get zero gradient
        let mut target_q_values = self.q_network.forward(batch.states.view())?;
        for (i, action) in batch.actions.iter().enumerate() {
            target_q_values[[i, action.index()]] = bellman[i];
        }

        let loss = self
            .q_network
            .backward(batch.states.view(), target_q_values.view(), self.learning_rate)?;
        self.train_steps += 1;
        Ok(loss)
    }

    /// Sample a batch from `buffer` and train on it.
    ///
    /// Returns `None` without touching the RNG while the buffer is still
    /// smaller than `batch_size`.
    pub fn learn_from<R: Rng + ?Sized>(
        &mut self,
        buffer: &ReplayBuffer,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<Option<f32>> {
        if buffer.len() < batch_size {
            return Ok(None);
        }
        let batch = buffer.sample(batch_size, rng)?;
        self.train_on_batch(&batch).map(Some)
    }

    /// Save the current network
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.q_network.save(path)
    }

    /// Load weights into both networks
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.q_network.load(path)?;
        self.sync_target()
    }
}
