//! # Quest Progression Simulator
//!
//! A discrete-time game-state machine over skills, inventory, location and a
//! fixed progression guide. The simulator is deterministic apart from the
//! success checks of training actions, which draw from the caller's RNG.
//!
//! ## Contract
//!
//! - [`Simulator::reset`] restores the fixed starting state and returns the first observation
//! - [`Simulator::step`] applies one [`Action`] and returns a [`StepResult`]
//!
//! Observations are 30-component vectors with every entry in `[0, 1]`:
//! 15 skill levels, 5 location flags, 5 inventory counts and 5 progress scalars.

pub mod action;
pub mod quests;
pub mod skills;
pub mod state;

pub use action::{Action, Location};
pub use quests::{QuestStep, QUEST_GUIDE};
pub use skills::Skill;
pub use state::{AgentState, Inventory, Item, INVENTORY_CAPACITY};

use crate::error::Result;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type Observation = Array1<f32>;

/// Length of every observation vector.
pub const OBSERVATION_SIZE: usize = 30;

const IDLE_PENALTY: f32 = -0.5;
const MISPLACED_PENALTY: f32 = -0.1;
const FAILED_ATTEMPT_REWARD: f32 = 0.01;
const UTILITY_REWARD: f32 = 0.1;
const QUEST_ACTION_REWARD: f32 = 200.0;
const AUTO_PROGRESS_BONUS: f32 = 0.3;
const QUEST_ADVANCE_REWARD: f32 = 150.0;
const GUIDE_COMPLETE_BONUS: f32 = 5000.0;

const BANK_FOOD_THRESHOLD: u32 = 10;
const BANK_FOOD_REFILL: u32 = 20;
const EAT_HEAL: u32 = 10;

/// Gathering activity tied to a zone.
struct Gathering {
    skill: Skill,
    zone: Location,
    base_chance: f64,
    base_xp: f64,
    product: Item,
}

const MINING: Gathering = Gathering {
    skill: Skill::Mining,
    zone: Location::Mining,
    base_chance: 0.3,
    base_xp: 17.5,
    product: Item::Ore,
};

const FISHING: Gathering = Gathering {
    skill: Skill::Fishing,
    zone: Location::Fishing,
    base_chance: 0.25,
    base_xp: 10.0,
    product: Item::Fish,
};

const WOODCUTTING: Gathering = Gathering {
    skill: Skill::Woodcutting,
    zone: Location::Woodcutting,
    base_chance: 0.2,
    base_xp: 25.0,
    product: Item::Logs,
};

fn gathering(skill: Skill) -> Option<&'static Gathering> {
    match skill {
        Skill::Mining => Some(&MINING),
        Skill::Fishing => Some(&FISHING),
        Skill::Woodcutting => Some(&WOODCUTTING),
        _ => None,
    }
}

/// Progress snapshot reported alongside every step, for logging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub quest_index: usize,
    pub total_level: u32,
    pub quest_points: u32,
    pub current_quest: String,
}

/// Outcome of [`Simulator::step`].
#[derive(Clone, Debug)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: StepInfo,
}

pub struct Simulator {
    quests: &'static [QuestStep],
    max_steps: usize,
    state: AgentState,
}

impl Simulator {
    /// Create a simulator over the standard progression guide.
    pub fn new(max_steps: usize) -> Self {
        Self::with_quests(&QUEST_GUIDE, max_steps)
    }

    /// Create a simulator over a custom guide. Entry 0 is the prologue.
    pub fn with_quests(quests: &'static [QuestStep], max_steps: usize) -> Self {
        let mut simulator = Simulator {
            quests,
            max_steps,
            state: AgentState::fresh(),
        };
        simulator.reset();
        simulator
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn quests(&self) -> &'static [QuestStep] {
        self.quests
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn is_guide_complete(&self) -> bool {
        self.state.quest_index >= self.quests.len()
    }

    /// Restore the fixed starting state and return its observation.
    pub fn reset(&mut self) -> Observation {
        self.state = AgentState::fresh();
        if let Some(prologue) = self.quests.first() {
            self.state.apply_quest_rewards(prologue);
        }
        self.state.refresh_totals();
        self.observation()
    }

    /// Apply an action given by raw index.
    pub fn step_index<R: Rng + ?Sized>(&mut self, action: usize, rng: &mut R) -> Result<StepResult> {
        let action = Action::try_from(action)?;
        Ok(self.step(action, rng))
    }

    /// Advance the game by one action.
    pub fn step<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> StepResult {
        self.state.steps += 1;
        let was_complete = self.is_guide_complete();

        let mut reward = self.apply_action(action, rng);

        self.state.refresh_totals();
        let advanced = self.check_quests();
        if advanced > 0 {
            reward += QUEST_ADVANCE_REWARD * advanced as f32;
        }

        let complete = self.is_guide_complete();
        if complete && !was_complete {
            reward += GUIDE_COMPLETE_BONUS;
        }
        let done = self.state.steps >= self.max_steps || complete;

        StepResult {
            observation: self.observation(),
            reward,
            done,
            info: self.info(),
        }
    }

    /// Complete every quest whose requirements already hold, in order.
    ///
    /// Returns how many quests were advanced.
    pub fn check_quests(&mut self) -> usize {
        let start = self.state.quest_index;
        while let Some(quest) = self.quests.get(self.state.quest_index) {
            if !self.state.meets_requirements(quest) {
                break;
            }
            self.state.apply_quest_rewards(quest);
            self.state.quest_index += 1;
        }
        self.state.refresh_totals();
        self.state.quest_index - start
    }

    pub fn info(&self) -> StepInfo {
        StepInfo {
            quest_index: self.state.quest_index,
            total_level: self.state.total_level,
            quest_points: self.state.quest_points,
            current_quest: quests::display_name(self.quests, self.state.quest_index).to_string(),
        }
    }

    pub fn observation(&self) -> Observation {
        let state = &self.state;
        let mut obs = Array1::zeros(OBSERVATION_SIZE);

        for (i, skill) in Skill::ALL.iter().enumerate() {
            obs[i] = state.level(*skill) as f32 / skills::MAX_LEVEL as f32;
        }

        for (i, location) in Location::ALL.iter().enumerate() {
            if state.is_at(*location) {
                obs[15 + i] = 1.0;
            }
        }

        for (i, item) in Item::ALL.iter().enumerate() {
            obs[20 + i] = state.inventory.count(*item) as f32 / INVENTORY_CAPACITY as f32;
        }

        let quest_count = self.quests.len().max(1) as f32;
        obs[25] = state.quest_index as f32 / quest_count;
        obs[26] = state.quest_points as f32 / 100.0;
        obs[27] = state.total_level as f32 / 500.0;
        obs[28] = state.health as f32 / state.max_health.max(1) as f32;
        obs[29] = state.steps as f32 / self.max_steps.max(1) as f32;
        for v in obs.slice_mut(ndarray::s![25..]).iter_mut() {
            *v = v.clamp(0.0, 1.0);
        }

        obs
    }

    fn apply_action<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> f32 {
        if let Some(zone) = action.destination() {
            self.state.travel(zone);
            return 0.0;
        }

        if let Some(skill) = action.trained_skill() {
            return self.train_skill(skill, rng);
        }

        match action {
            Action::Idle => IDLE_PENALTY,
            Action::DoQuest => self.try_quest(),
            Action::Bank => self.bank(),
            Action::Eat => self.eat(),
            Action::AutoProgress => self.auto_progress(rng) + AUTO_PROGRESS_BONUS,
            _ => 0.0,
        }
    }

    /// Train actions: zone skills need their zone, processing skills consume an item.
    fn train_skill<R: Rng + ?Sized>(&mut self, skill: Skill, rng: &mut R) -> f32 {
        if let Some(activity) = gathering(skill) {
            return self.train_in_zone(activity, rng);
        }
        match skill {
            skill if skill.is_combat() => self.train_at_combat(skill, rng),
            Skill::Cooking => self.cook().unwrap_or(MISPLACED_PENALTY),
            Skill::Firemaking => self.burn(Item::Logs, Skill::Firemaking, 40.0),
            Skill::Prayer => self.burn(Item::Bones, Skill::Prayer, 4.5),
            _ => MISPLACED_PENALTY,
        }
    }

    fn train_at_combat<R: Rng + ?Sized>(&mut self, focus: Skill, rng: &mut R) -> f32 {
        if !self.state.is_at(Location::Combat) {
            return MISPLACED_PENALTY;
        }
        self.train_combat(focus, rng)
    }

    fn train_combat<R: Rng + ?Sized>(&mut self, focus: Skill, rng: &mut R) -> f32 {
        if !rng.gen_bool(0.7) {
            return FAILED_ATTEMPT_REWARD;
        }
        let combat_mean = (self.state.level(Skill::Attack)
            + self.state.level(Skill::Strength)
            + self.state.level(Skill::Defence)) as f64
            / 3.0;
        let xp = 4.0 + combat_mean * 0.5;

        let mut reward = self.state.grant_xp(focus, xp * 1.5);
        reward += self.state.grant_xp(Skill::Hitpoints, xp * 1.33);
        if rng.gen_bool(0.5) {
            self.state.inventory.add(Item::Bones, 1);
        }
        reward
    }

    fn train_in_zone<R: Rng + ?Sized>(&mut self, activity: &Gathering, rng: &mut R) -> f32 {
        if !self.state.is_at(activity.zone) {
            return MISPLACED_PENALTY;
        }
        self.gather(activity, rng)
    }

    fn gather<R: Rng + ?Sized>(&mut self, activity: &Gathering, rng: &mut R) -> f32 {
        let chance = activity.base_chance + self.state.level(activity.skill) as f64 * 0.01;
        if rng.gen::<f64>() < chance {
            let reward = self.state.grant_xp(activity.skill, activity.base_xp);
            self.state.inventory.add(activity.product, 1);
            reward
        } else {
            FAILED_ATTEMPT_REWARD
        }
    }

    /// Consumes one `item` for `base_xp` in `skill`.
    fn burn(&mut self, item: Item, skill: Skill, base_xp: f64) -> f32 {
        if self.state.inventory.take(item) {
            self.state.grant_xp(skill, base_xp)
        } else {
            MISPLACED_PENALTY
        }
    }

    /// Cooks one fish into food; `None` when no fish is held.
    fn cook(&mut self) -> Option<f32> {
        if !self.state.inventory.take(Item::Fish) {
            return None;
        }
        self.state.inventory.add(Item::Food, 1);
        Some(self.state.grant_xp(Skill::Cooking, 30.0))
    }

    fn bank(&mut self) -> f32 {
        if !self.state.is_at(Location::Bank) {
            return 0.0;
        }
        let inventory = &mut self.state.inventory;
        inventory.set(Item::Ore, 0);
        inventory.set(Item::Fish, 0);
        inventory.set(Item::Logs, 0);
        if inventory.count(Item::Food) < BANK_FOOD_THRESHOLD {
            inventory.set(Item::Food, BANK_FOOD_REFILL);
        }
        UTILITY_REWARD
    }

    fn eat(&mut self) -> f32 {
        if self.state.health >= self.state.max_health || !self.state.inventory.take(Item::Food) {
            return 0.0;
        }
        self.state.health = (self.state.health + EAT_HEAL).min(self.state.max_health);
        UTILITY_REWARD
    }

    fn try_quest(&mut self) -> f32 {
        let Some(quest) = self.quests.get(self.state.quest_index) else {
            return 0.0;
        };
        if !self.state.meets_requirements(quest) {
            return 0.0;
        }
        self.state.apply_quest_rewards(quest);
        self.state.quest_index += 1;
        QUEST_ACTION_REWARD
    }

    /// Travel to or train whatever the current quest is most short of.
    fn auto_progress<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f32 {
        let Some(quest) = self.quests.get(self.state.quest_index) else {
            return 0.0;
        };
        let Some(skill) = self.state.largest_deficit(quest) else {
            return self.try_quest();
        };

        match skill {
            skill if skill.is_combat() => {
                if !self.state.is_at(Location::Combat) {
                    self.state.travel(Location::Combat);
                    return 0.0;
                }
                let focus = if skill == Skill::Hitpoints { Skill::Attack } else { skill };
                self.train_combat(focus, rng)
            }
            Skill::Mining | Skill::Fishing | Skill::Woodcutting => match gathering(skill) {
                Some(activity) => self.walk_or_gather(activity, rng),
                None => 0.0,
            },
            Skill::Cooking => match self.cook() {
                Some(reward) => reward,
                None => self.walk_or_gather(&FISHING, rng),
            },
            Skill::Smithing => self.state.grant_xp(Skill::Smithing, 15.0),
            Skill::Magic => self.state.grant_xp(Skill::Magic, 10.0),
            _ => 0.0,
        }
    }

    fn walk_or_gather<R: Rng + ?Sized>(&mut self, activity: &Gathering, rng: &mut R) -> f32 {
        if !self.state.is_at(activity.zone) {
            self.state.travel(activity.zone);
            return 0.0;
        }
        self.gather(activity, rng)
    }
}
