use crate::error::{QuestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::skills::Skill;

/// Zones the agent can stand in. At most one is occupied at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Combat,
    Mining,
    Fishing,
    Woodcutting,
    Bank,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::Combat,
        Location::Mining,
        Location::Fishing,
        Location::Woodcutting,
        Location::Bank,
    ];
}

/// The closed discrete action space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Idle,
    WalkToCombat,
    WalkToMining,
    WalkToFishing,
    WalkToWoodcutting,
    WalkToBank,
    TrainAttack,
    TrainStrength,
    TrainDefence,
    TrainMining,
    TrainFishing,
    TrainWoodcutting,
    TrainCooking,
    TrainFiremaking,
    TrainPrayer,
    DoQuest,
    Bank,
    Eat,
    AutoProgress,
}

impl Action {
    pub const COUNT: usize = 19;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Idle,
        Action::WalkToCombat,
        Action::WalkToMining,
        Action::WalkToFishing,
        Action::WalkToWoodcutting,
        Action::WalkToBank,
        Action::TrainAttack,
        Action::TrainStrength,
        Action::TrainDefence,
        Action::TrainMining,
        Action::TrainFishing,
        Action::TrainWoodcutting,
        Action::TrainCooking,
        Action::TrainFiremaking,
        Action::TrainPrayer,
        Action::DoQuest,
        Action::Bank,
        Action::Eat,
        Action::AutoProgress,
    ];

    /// Column of this action in the network output.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Zone entered by a travel action.
    pub fn destination(self) -> Option<Location> {
        match self {
            Action::WalkToCombat => Some(Location::Combat),
            Action::WalkToMining => Some(Location::Mining),
            Action::WalkToFishing => Some(Location::Fishing),
            Action::WalkToWoodcutting => Some(Location::Woodcutting),
            Action::WalkToBank => Some(Location::Bank),
            _ => None,
        }
    }

    /// Skill trained by a train action.
    pub fn trained_skill(self) -> Option<Skill> {
        match self {
            Action::TrainAttack => Some(Skill::Attack),
            Action::TrainStrength => Some(Skill::Strength),
            Action::TrainDefence => Some(Skill::Defence),
            Action::TrainMining => Some(Skill::Mining),
            Action::TrainFishing => Some(Skill::Fishing),
            Action::TrainWoodcutting => Some(Skill::Woodcutting),
            Action::TrainCooking => Some(Skill::Cooking),
            Action::TrainFiremaking => Some(Skill::Firemaking),
            Action::TrainPrayer => Some(Skill::Prayer),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::WalkToCombat => "walk_to_combat",
            Action::WalkToMining => "walk_to_mining",
            Action::WalkToFishing => "walk_to_fishing",
            Action::WalkToWoodcutting => "walk_to_woodcutting",
            Action::WalkToBank => "walk_to_bank",
            Action::TrainAttack => "train_attack",
            Action::TrainStrength => "train_strength",
            Action::TrainDefence => "train_defence",
            Action::TrainMining => "train_mining",
            Action::TrainFishing => "train_fishing",
            Action::TrainWoodcutting => "train_woodcutting",
            Action::TrainCooking => "train_cooking",
            Action::TrainFiremaking => "train_firemaking",
            Action::TrainPrayer => "train_prayer",
            Action::DoQuest => "do_quest",
            Action::Bank => "bank",
            Action::Eat => "eat",
            Action::AutoProgress => "auto_progress",
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = QuestError;

    fn try_from(index: usize) -> Result<Self> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(QuestError::InvalidAction {
                action: index,
                max_actions: Action::COUNT,
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
