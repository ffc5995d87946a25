//! Checkpointed training split into fixed-length stages.
//!
//! Stage `n` covers the cumulative step range `[(n-1) * stage_steps, n * stage_steps)`.
//! Every stage starts from a fresh episode, replays the steps before its range
//! with [`Action::AutoProgress`] and no learning, then trains over its own range
//! and writes `stage_<n>_step_<end>.bin` into the checkpoint directory.

use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{make_rng, short_name};
use crate::agent::DqnAgent;
use crate::config::StagedConfig;
use crate::error::{QuestError, Result};
use crate::replay_buffer::{ReplayBuffer, Transition};
use crate::simulator::{Action, Simulator, Skill, OBSERVATION_SIZE};

/// One step range of a staged run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stage {
    /// 1-based stage number
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Stage {
    pub fn steps(&self) -> usize {
        self.end - self.start
    }

    pub fn checkpoint_path<P: AsRef<Path>>(&self, dir: P) -> PathBuf {
        dir.as_ref()
            .join(format!("stage_{}_step_{}.bin", self.index, self.end))
    }
}

/// Result of training one stage.
#[derive(Clone, Debug, PartialEq)]
pub struct StageOutcome {
    pub stage: Stage,
    /// Training steps actually taken, fewer than the stage length on early termination
    pub steps: usize,
    pub quest_index: usize,
    pub total_level: u32,
    pub checkpoint: PathBuf,
    pub guide_complete: bool,
}

pub struct StagedTrainer {
    config: StagedConfig,
    simulator: Simulator,
    agent: DqnAgent,
    buffer: ReplayBuffer,
    rng: StdRng,
    total_steps: usize,
    best_quest: usize,
    best_level: u32,
}

impl StagedTrainer {
    pub fn new(config: StagedConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = make_rng(config.seed);
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

        Ok(StagedTrainer {
            simulator: Simulator::new(config.episode_length),
            buffer: ReplayBuffer::new(config.buffer_capacity)?,
            config,
            agent,
            rng,
            total_steps: 0,
            best_quest: 0,
            best_level: 0,
        })
    }

    pub fn config(&self) -> &StagedConfig {
        &self.config
    }

    pub fn agent(&self) -> &DqnAgent {
        &self.agent
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    /// Training steps taken across every stage run so far
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn best_quest(&self) -> usize {
        self.best_quest
    }

    pub fn best_level(&self) -> u32 {
        self.best_level
    }

    /// The step range of stage `index` (1-based).
    pub fn stage(&self, index: usize) -> Result<Stage> {
        if index == 0 || index > self.config.stage_count {
            return Err(QuestError::invalid_parameter(
                "stage",
                format!("must be in 1..={}", self.config.stage_count),
            ));
        }
        Ok(Stage {
            index,
            start: (index - 1) * self.config.stage_steps,
            end: index * self.config.stage_steps,
        })
    }

    pub fn train_stage(&mut self, stage: Stage) -> Result<StageOutcome> {
        info!(stage = stage.index, start = stage.start, end = stage.end, "starting stage");

        let mut observation = self.simulator.reset();
        if stage.start > 0 {
            info!(steps = stage.start, "fast-forwarding with auto-progress");
            for _ in 0..stage.start {
                let result = self.simulator.step(Action::AutoProgress, &mut self.rng);
                observation = if result.done {
                    self.simulator.reset()
                } else {
                    result.observation
                };
            }
        }

        let mut taken = 0;
        for step in 0..stage.steps() {
            let action = self.agent.act(observation.view(), &mut self.rng)?;
            let result = self.simulator.step(action, &mut self.rng);

            let state = std::mem::replace(&mut observation, result.observation.clone());
            self.buffer.add(Transition {
                state,
                action,
                reward: result.reward,
                next_state: result.observation,
                done: result.done,
            });
            self.total_steps += 1;
            taken += 1;

            if self.total_steps % self.config.train_freq == 0 {
                self.agent
                    .learn_from(&self.buffer, self.config.batch_size, &mut self.rng)?;
            }
            if self.total_steps % self.config.target_update == 0 {
                self.agent.sync_target()?;
            }

            self.best_quest = self.best_quest.max(result.info.quest_index);
            self.best_level = self.best_level.max(result.info.total_level);

            if (step + 1) % self.config.log_interval == 0 || step + 1 == stage.steps() {
                let state = self.simulator.state();
                info!(
                    "  Step {:>6} | Quest: {:>2}/{} | Level: {:>3} | Max Skill: {:>2} | {}",
                    stage.start + step + 1,
                    result.info.quest_index,
                    self.simulator.quests().len(),
                    result.info.total_level,
                    state.levels().iter().max().copied().unwrap_or(1),
                    short_name(&result.info.current_quest),
                );
            }

            if result.done {
                break;
            }
        }

        let checkpoint = self.save_stage(&stage)?;
        let state = self.simulator.state();
        info!(
            stage = stage.index,
            quest = state.quest_index,
            total_level = state.total_level,
            attack = state.level(Skill::Attack),
            strength = state.level(Skill::Strength),
            defence = state.level(Skill::Defence),
            mining = state.level(Skill::Mining),
            fishing = state.level(Skill::Fishing),
            woodcutting = state.level(Skill::Woodcutting),
            "stage complete"
        );

        Ok(StageOutcome {
            stage,
            steps: taken,
            quest_index: state.quest_index,
            total_level: state.total_level,
            checkpoint,
            guide_complete: self.simulator.is_guide_complete(),
        })
    }

    /// Write the current network to the stage's checkpoint path.
    pub fn save_stage(&self, stage: &Stage) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.checkpoint_dir)?;
        let path = stage.checkpoint_path(&self.config.checkpoint_dir);
        self.agent.save(&path)?;
        info!(path = %path.display(), "saved stage checkpoint");
        Ok(path)
    }

    /// Load a checkpoint into both networks.
    pub fn load_stage<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.agent.load(path.as_ref())?;
        info!(path = %path.as_ref().display(), "loaded stage checkpoint");
        Ok(())
    }

    /// Train stage `index` alone, resuming from the previous stage's checkpoint
    /// when one exists.
    pub fn run_single(&mut self, index: usize) -> Result<StageOutcome> {
        let stage = self.stage(index)?;
        if index > 1 {
            let previous = self.stage(index - 1)?;
            let path = previous.checkpoint_path(&self.config.checkpoint_dir);
            if path.exists() {
                self.load_stage(&path)?;
            } else {
                warn!(path = %path.display(), "previous stage checkpoint not found, starting from fresh weights");
            }
        }
        self.train_stage(stage)
    }

    /// Train every stage in order, stopping once the guide is complete.
    pub fn run_all(&mut self) -> Result<Vec<StageOutcome>> {
        info!(
            stages = self.config.stage_count,
            stage_steps = self.config.stage_steps,
            "starting staged training"
        );

        let mut outcomes = Vec::with_capacity(self.config.stage_count);
        for index in 1..=self.config.stage_count {
            let stage = self.stage(index)?;
            let outcome = self.train_stage(stage)?;
            let complete = outcome.guide_complete;
            outcomes.push(outcome);
            if complete {
                info!(stage = index, "quest guide completed");
                break;
            }
        }

        info!(
            best_quest = self.best_quest,
            best_level = self.best_level,
            total_steps = self.total_steps,
            "staged training finished"
        );
        Ok(outcomes)
    }
}
