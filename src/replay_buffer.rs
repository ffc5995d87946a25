use ndarray::{Array1, Array2};
use rand::seq::index;
use rand::Rng;

use crate::error::{QuestError, Result};
use crate::simulator::{Action, Observation};

/// One environment step as stored for replay.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Observation,
    pub action: Action,
    pub reward: f32,
    pub next_state: Observation,
    pub done: bool,
}

/// Transitions sampled together, stacked into parallel arrays.
#[derive(Clone, Debug)]
pub struct Batch {
    pub states: Array2<f32>,
    pub actions: Vec<Action>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    /// 1.0 for terminal transitions, 0.0 otherwise
    pub dones: Array1<f32>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Fixed-capacity ring buffer of transitions.
///
/// Once full, each insertion overwrites the oldest entry.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    storage: Vec<Transition>,
    capacity: usize,
    cursor: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(QuestError::invalid_parameter("capacity", "must be positive"));
        }
        Ok(ReplayBuffer {
            storage: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        })
    }

    pub fn add(&mut self, transition: Transition) {
        if self.storage.len() < self.capacity {
            self.storage.push(transition);
        } else {
            self.storage[self.cursor] = transition;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.storage.clear();
        self.cursor = 0;
    }

    /// Stored transitions from oldest to newest.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Transition> {
        let split = if self.storage.len() < self.capacity { 0 } else { self.cursor };
        let (newer, older) = self.storage.split_at(split);
        older.iter().chain(newer.iter())
    }

    /// Draw `batch_size` distinct transitions uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Result<Batch> {
        if batch_size > self.storage.len() {
            return Err(QuestError::InsufficientSamples {
                requested: batch_size,
                available: self.storage.len(),
            });
        }
        if batch_size == 0 {
            return Err(QuestError::invalid_parameter("batch_size", "must be positive"));
        }

        let state_size = self.storage[0].state.len();
        let mut states = Array2::zeros((batch_size, state_size));
        let mut next_states = Array2::zeros((batch_size, state_size));
        let mut actions = Vec::with_capacity(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut dones = Array1::zeros(batch_size);

        for (row, i) in index::sample(rng, self.storage.len(), batch_size).into_iter().enumerate() {
            let transition = &self.storage[i];
            states.row_mut(row).assign(&transition.state);
            next_states.row_mut(row).assign(&transition.next_state);
            actions.push(transition.action);
            rewards[row] = transition.reward;
            dones[row] = if transition.done { 1.0 } else { 0.0 };
        }

        Ok(Batch {
            states,
            actions,
            rewards,
            next_states,
            dones,
        })
    }
}
