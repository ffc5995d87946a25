use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;

use crate::simulator::StepInfo;

/// Stores training metrics over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Loss values over time
    pub losses: VecDeque<f32>,

    /// Rewards per episode
    pub episode_rewards: VecDeque<f32>,

    /// Episode lengths
    pub episode_lengths: VecDeque<usize>,

    /// Best episode reward seen
    pub best_reward: Option<f32>,

    /// Best aggregate level seen
    pub best_level: u32,

    /// Furthest quest index reached
    pub best_quest: usize,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            losses: VecDeque::with_capacity(history_size),
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            best_reward: None,
            best_level: 0,
            best_quest: 0,
        }
    }
}

/// Tracks metrics during training
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,

    // Episode tracking
    current_episode_reward: f32,
    current_episode_length: usize,
    episode_count: usize,

    // Step tracking
    total_steps: usize,
    started: Instant,
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, limit: usize) {
    if queue.len() >= limit {
        queue.pop_front();
    }
    queue.push_back(value);
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size: history_size.max(1),
            current_episode_reward: 0.0,
            current_episode_length: 0,
            episode_count: 0,
            total_steps: 0,
            started: Instant::now(),
        }
    }

    /// Record a training loss
    pub fn record_loss(&mut self, loss: f32) {
        push_bounded(&mut self.metrics.losses, loss, self.history_size);
    }

    /// Record a step within an episode
    pub fn step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// Fold the progress reported by a step into the best-so-far values
    pub fn observe_progress(&mut self, info: &StepInfo) {
        self.metrics.best_quest = self.metrics.best_quest.max(info.quest_index);
        self.metrics.best_level = self.metrics.best_level.max(info.total_level);
    }

    /// End the current episode, returning its total reward
    pub fn end_episode(&mut self, info: &StepInfo) -> f32 {
        let reward = self.current_episode_reward;
        push_bounded(&mut self.metrics.episode_rewards, reward, self.history_size);
        push_bounded(
            &mut self.metrics.episode_lengths,
            self.current_episode_length,
            self.history_size,
        );
        self.observe_progress(info);
        self.metrics.best_reward = Some(self.metrics.best_reward.map_or(reward, |best| best.max(reward)));

        self.episode_count += 1;
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        reward
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn current_episode_reward(&self) -> f32 {
        self.current_episode_reward
    }

    /// Get recent average loss
    pub fn avg_loss(&self, window: usize) -> Option<f32> {
        average_tail(&self.metrics.losses, window)
    }

    /// Get recent average episode reward
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        average_tail(&self.metrics.episode_rewards, window)
    }

    /// Environment steps per wall-clock second since the tracker was created
    pub fn steps_per_second(&self) -> f64 {
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_steps as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Save metrics to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

fn average_tail(values: &VecDeque<f32>, window: usize) -> Option<f32> {
    if values.is_empty() || window == 0 {
        return None;
    }
    let n = window.min(values.len());
    let sum: f32 = values.iter().rev().take(n).sum();
    Some(sum / n as f32)
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
