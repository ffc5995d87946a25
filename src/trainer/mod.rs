//! # Training Loops
//!
//! [`Trainer`] runs the continuous DQN loop over a fixed step budget with a
//! decaying exploration rate. [`staged::StagedTrainer`] splits a long run into
//! checkpointed stages with a fixed exploration rate.
//!
//! Per environment step the continuous trainer:
//!
//! 1. selects an action epsilon-greedily
//! 2. steps the simulator and appends the transition to the replay buffer
//! 3. every `train_freq` steps, trains on a sampled batch once the buffer holds `batch_size` entries
//! 4. every `target_update` steps, synchronizes the target network
//! 5. decays epsilon, and resets the simulator when the episode ends

pub mod staged;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::agent::DqnAgent;
use crate::config::TrainerConfig;
use crate::error::Result;
use crate::metrics::MetricsTracker;
use crate::replay_buffer::{ReplayBuffer, Transition};
use crate::simulator::{Action, Observation, Simulator, StepInfo, OBSERVATION_SIZE};

/// Where a trainer is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainerPhase {
    /// Buffer smaller than a batch: act and store only
    Warming,
    /// Normal loop with scheduled updates
    Training,
    /// Step budget exhausted
    Terminal,
}

/// Summary returned by [`Trainer::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingReport {
    pub steps: usize,
    pub episodes: usize,
    pub updates: usize,
    pub best_reward: Option<f32>,
    pub best_quest: usize,
    pub best_level: u32,
    pub final_epsilon: f32,
}

/// Build the single RNG that drives a run.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Quest name shortened for log lines.
pub(crate) fn short_name(name: &str) -> String {
    name.chars().take(20).collect()
}

pub struct Trainer {
    config: TrainerConfig,
    simulator: Simulator,
    agent: DqnAgent,
    buffer: ReplayBuffer,
    rng: StdRng,
    tracker: MetricsTracker,
    observation: Observation,
    last_info: StepInfo,
    steps: usize,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = make_rng(config.seed);
        let mut simulator = Simulator::new(config.episode_length);
        let agent = DqnAgent::new(
            OBSERVATION_SIZE,
            config.hidden_size,
            Action::COUNT,
            config.schedule(),
            config.gamma,
            config.learning_rate,
            &mut rng,
        )?
        .with_clipper(config.clipper());
        let observation = simulator.reset();
        let last_info = simulator.info();

        Ok(Trainer {
            buffer: ReplayBuffer::new(config.buffer_capacity)?,
            tracker: MetricsTracker::new(config.reward_window.max(100)),
            config,
            simulator,
            agent,
            rng,
            observation,
            last_info,
            steps: 0,
        })
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn agent(&self) -> &DqnAgent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut DqnAgent {
        &mut self.agent
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn tracker(&self) -> &MetricsTracker {
        &self.tracker
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn epsilon(&self) -> f32 {
        self.agent.epsilon
    }

    pub fn phase(&self) -> TrainerPhase {
        if self.steps >= self.config.total_steps {
            TrainerPhase::Terminal
        } else if self.buffer.len() < self.config.batch_size {
            TrainerPhase::Warming
        } else {
            TrainerPhase::Training
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == TrainerPhase::Terminal
    }

    /// Run one environment step and its scheduled updates.
    ///
    /// Returns whether the episode ended on this step.
    pub fn step(&mut self) -> Result<bool> {
        let action = self.agent.act(self.observation.view(), &mut self.rng)?;
        let result = self.simulator.step(action, &mut self.rng);

        let state = std::mem::replace(&mut self.observation, result.observation.clone());
        self.buffer.add(Transition {
            state,
            action,
            reward: result.reward,
            next_state: result.observation,
            done: result.done,
        });
        self.steps += 1;
        self.tracker.step(result.reward);
        self.tracker.observe_progress(&result.info);

        if self.steps % self.config.train_freq == 0 {
            if let Some(loss) = self
                .agent
                .learn_from(&self.buffer, self.config.batch_size, &mut self.rng)?
            {
                self.tracker.record_loss(loss);
            }
        }

        if self.steps % self.config.target_update == 0 {
            self.agent.sync_target()?;
            debug!(step = self.steps, "synchronized target network");
        }

        self.agent.decay_epsilon();

        if result.done {
            let reward = self.tracker.end_episode(&result.info);
            debug!(
                episode = self.tracker.episode_count(),
                reward,
                quest = result.info.quest_index,
                level = result.info.total_level,
                "episode finished"
            );
            self.observation = self.simulator.reset();
        }
        self.last_info = result.info;

        Ok(result.done)
    }

    /// Run until the step budget is exhausted.
    pub fn run(&mut self) -> Result<TrainingReport> {
        info!(
            total_steps = self.config.total_steps,
            actions = Action::COUNT,
            observations = OBSERVATION_SIZE,
            "starting DQN training"
        );

        while !self.is_done() {
            self.step()?;
            if self.steps % self.config.log_interval == 0 {
                self.log_progress();
            }
        }

        let report = self.report();
        info!(
            episodes = report.episodes,
            best_reward = report.best_reward.unwrap_or(0.0),
            best_quest = report.best_quest,
            quests = self.simulator.quests().len(),
            best_level = report.best_level,
            "training complete"
        );

        if let Some(path) = &self.config.model_path {
            self.agent.save(path)?;
            info!(path = %path.display(), "saved model");
        }
        Ok(report)
    }

    pub fn report(&self) -> TrainingReport {
        let metrics = self.tracker.metrics();
        TrainingReport {
            steps: self.steps,
            episodes: self.tracker.episode_count(),
            updates: self.agent.train_steps,
            best_reward: metrics.best_reward,
            best_quest: metrics.best_quest,
            best_level: metrics.best_level,
            final_epsilon: self.agent.epsilon,
        }
    }

    fn log_progress(&self) {
        let metrics = self.tracker.metrics();
        if let Some(loss) = self.tracker.avg_loss(100) {
            debug!(step = self.steps, loss, "average loss over recent updates");
        }
        info!(
            "Step {:>6} | Ep: {:>3} | R: {:>7.1} | Best: {:>7.1} | Lvl: {:>3} | Quest: {:>2}/{} | Eps: {:.3} | {:.0}/s | {}",
            self.steps,
            self.tracker.episode_count(),
            self.tracker.avg_episode_reward(self.config.reward_window).unwrap_or(0.0),
            metrics.best_reward.unwrap_or(f32::NEG_INFINITY),
            metrics.best_level,
            metrics.best_quest,
            self.simulator.quests().len(),
            self.agent.epsilon,
            self.tracker.steps_per_second(),
            short_name(&self.last_info.current_quest),
        );
    }
}
