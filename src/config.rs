//! Hyperparameters for the continuous and staged trainers.
//!
//! Both configurations deserialize from JSON with every field optional; missing
//! fields take the defaults below. Call `validate` before building a trainer.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::agent::EpsilonSchedule;
use crate::error::{QuestError, Result};
use crate::network::DEFAULT_MAX_GRAD_NORM;
use crate::optimizer::GradientClipper;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Environment steps to run in total
    pub total_steps: usize,
    /// Step ceiling of one episode
    pub episode_length: usize,
    pub hidden_size: usize,
    pub learning_rate: f32,
    pub gamma: f32,
    pub buffer_capacity: usize,
    pub batch_size: usize,
    pub epsilon_start: f32,
    pub epsilon_end: f32,
    pub epsilon_decay: f32,
    /// Steps between target-network synchronizations
    pub target_update: usize,
    /// Steps between gradient updates
    pub train_freq: usize,
    pub log_interval: usize,
    /// Episodes averaged in the logged reward
    pub reward_window: usize,
    /// Per-matrix gradient norm ceiling; `None` disables clipping
    pub max_grad_norm: Option<f32>,
    pub seed: Option<u64>,
    /// Where the final network is written, if anywhere
    pub model_path: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            total_steps: 100_000,
            episode_length: 1000,
            hidden_size: 64,
            learning_rate: 0.001,
            gamma: 0.99,
            buffer_capacity: 20_000,
            batch_size: 32,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            epsilon_decay: 0.999,
            target_update: 200,
            train_freq: 4,
            log_interval: 500,
            reward_window: 20,
            max_grad_norm: Some(DEFAULT_MAX_GRAD_NORM),
            seed: None,
            model_path: None,
        }
    }
}

impl TrainerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule {
            start: self.epsilon_start,
            end: self.epsilon_end,
            decay: self.epsilon_decay,
        }
    }

    pub fn clipper(&self) -> GradientClipper {
        clipper_for(self.max_grad_norm)
    }

    pub fn validate(&self) -> Result<()> {
        positive("episode_length", self.episode_length)?;
        positive("hidden_size", self.hidden_size)?;
        positive("buffer_capacity", self.buffer_capacity)?;
        positive("batch_size", self.batch_size)?;
        positive("target_update", self.target_update)?;
        positive("train_freq", self.train_freq)?;
        positive("log_interval", self.log_interval)?;
        positive("reward_window", self.reward_window)?;
        check_learning(self.learning_rate, self.gamma, self.max_grad_norm)?;
        probability("epsilon_start", self.epsilon_start)?;
        probability("epsilon_end", self.epsilon_end)?;
        if self.epsilon_end > self.epsilon_start {
            return Err(QuestError::invalid_parameter(
                "epsilon_end",
                "must not exceed epsilon_start",
            ));
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(QuestError::invalid_parameter("epsilon_decay", "must be in (0, 1]"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagedConfig {
    /// Environment steps per stage
    pub stage_steps: usize,
    pub stage_count: usize,
    /// Step ceiling of one episode, long enough to span every stage
    pub episode_length: usize,
    pub hidden_size: usize,
    pub learning_rate: f32,
    pub gamma: f32,
    pub buffer_capacity: usize,
    pub batch_size: usize,
    /// Fixed exploration rate
    pub epsilon: f32,
    pub target_update: usize,
    pub train_freq: usize,
    /// Steps between progress lines within a stage
    pub log_interval: usize,
    pub max_grad_norm: Option<f32>,
    pub seed: Option<u64>,
    pub checkpoint_dir: PathBuf,
}

impl Default for StagedConfig {
    fn default() -> Self {
        StagedConfig {
            stage_steps: 10_000,
            stage_count: 8,
            episode_length: 100_000,
            hidden_size: 64,
            learning_rate: 0.001,
            gamma: 0.99,
            buffer_capacity: 50_000,
            batch_size: 32,
            epsilon: 0.05,
            target_update: 200,
            train_freq: 4,
            log_interval: 1000,
            max_grad_norm: Some(DEFAULT_MAX_GRAD_NORM),
            seed: None,
            checkpoint_dir: PathBuf::from("staged_models"),
        }
    }
}

impl StagedConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule::fixed(self.epsilon)
    }

    pub fn clipper(&self) -> GradientClipper {
        clipper_for(self.max_grad_norm)
    }

    pub fn validate(&self) -> Result<()> {
        positive("stage_steps", self.stage_steps)?;
        positive("stage_count", self.stage_count)?;
        positive("episode_length", self.episode_length)?;
        positive("hidden_size", self.hidden_size)?;
        positive("buffer_capacity", self.buffer_capacity)?;
        positive("batch_size", self.batch_size)?;
        positive("target_update", self.target_update)?;
        positive("train_freq", self.train_freq)?;
        positive("log_interval", self.log_interval)?;
        check_learning(self.learning_rate, self.gamma, self.max_grad_norm)?;
        probability("epsilon", self.epsilon)
    }
}

fn clipper_for(max_grad_norm: Option<f32>) -> GradientClipper {
    match max_grad_norm {
        Some(max_norm) => GradientClipper::ClipByNorm { max_norm },
        None => GradientClipper::None,
    }
}

fn positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(QuestError::invalid_parameter(name, "must be positive"));
    }
    Ok(())
}

fn probability(name: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QuestError::invalid_parameter(name, "must be in [0, 1]"));
    }
    Ok(())
}

fn check_learning(learning_rate: f32, gamma: f32, max_grad_norm: Option<f32>) -> Result<()> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(QuestError::invalid_parameter("learning_rate", "must be a positive number"));
    }
    probability("gamma", gamma)?;
    if let Some(norm) = max_grad_norm {
        if !(norm.is_finite() && norm > 0.0) {
            return Err(QuestError::invalid_parameter("max_grad_norm", "must be a positive number"));
        }
    }
    Ok(())
}
