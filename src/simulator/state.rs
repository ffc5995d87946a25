use serde::{Deserialize, Serialize};

use super::action::Location;
use super::quests::QuestStep;
use super::skills::{self, Skill};

/// Maximum stack size for every inventory item.
pub const INVENTORY_CAPACITY: u32 = 28;

const STARTING_HITPOINTS_XP: f64 = 1154.0;
const STARTING_HITPOINTS_LEVEL: u32 = 10;
const STARTING_FOOD: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Food,
    Ore,
    Fish,
    Logs,
    Bones,
}

impl Item {
    pub const ALL: [Item; 5] = [Item::Food, Item::Ore, Item::Fish, Item::Logs, Item::Bones];
}

/// Item counters, each clamped to [`INVENTORY_CAPACITY`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u32; 5],
}

impl Inventory {
    pub fn count(&self, item: Item) -> u32 {
        self.counts[item as usize]
    }

    pub fn add(&mut self, item: Item, amount: u32) {
        let slot = &mut self.counts[item as usize];
        *slot = slot.saturating_add(amount).min(INVENTORY_CAPACITY);
    }

    /// Removes one `item`; returns false if none was held.
    pub fn take(&mut self, item: Item) -> bool {
        let slot = &mut self.counts[item as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn set(&mut self, item: Item, amount: u32) {
        self.counts[item as usize] = amount.min(INVENTORY_CAPACITY);
    }
}

/// Mutable game state of the agent for one episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    levels: [u32; Skill::COUNT],
    experience: [f64; Skill::COUNT],
    pub location: Option<Location>,
    pub inventory: Inventory,
    pub health: u32,
    pub max_health: u32,
    pub quest_index: usize,
    pub quest_points: u32,
    pub steps: usize,
    pub total_level: u32,
}

impl AgentState {
    /// Starting configuration before the prologue rewards are applied.
    pub fn fresh() -> Self {
        let mut levels = [1; Skill::COUNT];
        let mut experience = [0.0; Skill::COUNT];
        levels[Skill::Hitpoints.index()] = STARTING_HITPOINTS_LEVEL;
        experience[Skill::Hitpoints.index()] = STARTING_HITPOINTS_XP;

        let mut inventory = Inventory::default();
        inventory.set(Item::Food, STARTING_FOOD);

        let mut state = AgentState {
            levels,
            experience,
            location: None,
            inventory,
            health: STARTING_HITPOINTS_LEVEL,
            max_health: STARTING_HITPOINTS_LEVEL,
            quest_index: 1,
            quest_points: 0,
            steps: 0,
            total_level: 0,
        };
        state.refresh_totals();
        state
    }

    pub fn level(&self, skill: Skill) -> u32 {
        self.levels[skill.index()]
    }

    pub fn experience(&self, skill: Skill) -> f64 {
        self.experience[skill.index()]
    }

    pub fn levels(&self) -> &[u32; Skill::COUNT] {
        &self.levels
    }

    pub fn is_at(&self, location: Location) -> bool {
        self.location == Some(location)
    }

    /// Moves to `location`, leaving every other zone.
    pub fn travel(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Credits boosted experience for an action worth `base_xp`.
    ///
    /// Returns the shaped reward: a small fraction of the experience plus a
    /// flat bonus per level crossed.
    pub fn grant_xp(&mut self, skill: Skill, base_xp: f64) -> f32 {
        let old_level = self.level(skill);
        let xp = skills::boosted_xp(base_xp, old_level);
        self.add_raw_xp(skill, xp);

        let mut reward = (xp * 0.01) as f32;
        let gained = self.level(skill) - old_level;
        if gained > 0 {
            reward += 25.0 * gained as f32;
        }
        reward
    }

    /// Adds experience without the level multiplier (quest rewards).
    pub fn add_raw_xp(&mut self, skill: Skill, xp: f64) {
        let idx = skill.index();
        self.experience[idx] += xp.max(0.0);
        self.levels[idx] = skills::level_for_xp(self.experience[idx]).max(self.levels[idx]);
    }

    pub fn meets_requirements(&self, quest: &QuestStep) -> bool {
        quest
            .skill_reqs
            .iter()
            .all(|&(skill, required)| self.level(skill) >= required)
            && self.quest_points >= quest.quest_point_req
    }

    pub fn apply_quest_rewards(&mut self, quest: &QuestStep) {
        for &(skill, xp) in quest.rewards_xp {
            self.add_raw_xp(skill, xp);
        }
        self.quest_points += quest.rewards_qp;
    }

    /// Unmet skill requirement with the largest level deficit. Ties keep the first listed.
    pub fn largest_deficit(&self, quest: &QuestStep) -> Option<Skill> {
        let mut best: Option<(Skill, u32)> = None;
        for &(skill, required) in quest.skill_reqs {
            let current = self.level(skill);
            if current >= required {
                continue;
            }
            let deficit = required - current;
            if best.map_or(true, |(_, d)| deficit > d) {
                best = Some((skill, deficit));
            }
        }
        best.map(|(skill, _)| skill)
    }

    /// Recomputes max health and the aggregate level from the skill levels.
    pub fn refresh_totals(&mut self) {
        self.max_health = self.level(Skill::Hitpoints);
        self.total_level = self.levels.iter().sum();
    }
}
