use super::skills::Skill;

/// One entry of the progression guide.
///
/// Entries are completed strictly in order. Training milestones carry only
/// skill requirements; story quests carry experience and quest-point rewards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestStep {
    pub name: &'static str,
    pub skill_reqs: &'static [(Skill, u32)],
    pub quest_point_req: u32,
    /// Quest points the guide lists as a prerequisite. Informational only;
    /// completion is gated by `quest_point_req`.
    pub listed_quest_points: u32,
    pub rewards_xp: &'static [(Skill, f64)],
    pub rewards_qp: u32,
    pub is_training: bool,
}

impl QuestStep {
    const fn quest(name: &'static str, rewards_xp: &'static [(Skill, f64)], rewards_qp: u32) -> Self {
        QuestStep {
            name,
            skill_reqs: &[],
            quest_point_req: 0,
            listed_quest_points: 0,
            rewards_xp,
            rewards_qp,
            is_training: false,
        }
    }

    const fn gated(
        name: &'static str,
        skill_reqs: &'static [(Skill, u32)],
        rewards_xp: &'static [(Skill, f64)],
        rewards_qp: u32,
    ) -> Self {
        QuestStep {
            name,
            skill_reqs,
            quest_point_req: 0,
            listed_quest_points: 0,
            rewards_xp,
            rewards_qp,
            is_training: false,
        }
    }

    const fn listing_quest_points(mut self, quest_points: u32) -> Self {
        self.listed_quest_points = quest_points;
        self
    }

    const fn milestone(name: &'static str, skill_reqs: &'static [(Skill, u32)]) -> Self {
        QuestStep {
            name,
            skill_reqs,
            quest_point_req: 0,
            listed_quest_points: 0,
            rewards_xp: &[],
            rewards_qp: 0,
            is_training: true,
        }
    }
}

use Skill::{Attack, Cooking, Defence, Fishing, Hitpoints, Magic, Mining, Prayer, Smithing, Strength, Woodcutting};

/// The progression guide, from the mandatory prologue to maxed skills.
pub static QUEST_GUIDE: [QuestStep; 40] = [
    // Tutorial and early quests
    QuestStep::quest(
        "Tutorial Island",
        &[(Attack, 100.0), (Strength, 100.0), (Defence, 100.0), (Mining, 100.0), (Fishing, 100.0), (Woodcutting, 100.0)],
        0,
    ),
    QuestStep::quest("Cook's Assistant", &[(Cooking, 300.0)], 1),
    QuestStep::quest("Sheep Shearer", &[], 1),
    QuestStep::quest("The Restless Ghost", &[(Prayer, 1125.0)], 1),
    QuestStep::quest("Rune Mysteries", &[], 1),
    QuestStep::quest("Imp Catcher", &[(Magic, 875.0)], 1),
    // Early combat
    QuestStep::milestone("Train Combat 10", &[(Attack, 8), (Strength, 8)]),
    QuestStep::quest("Waterfall Quest", &[(Attack, 13_750.0), (Strength, 13_750.0)], 1),
    QuestStep::quest("Tree Gnome Village", &[(Attack, 11_450.0)], 2),
    QuestStep::milestone("Train Combat 20", &[(Attack, 18), (Strength, 18)]),
    // Early gathering
    QuestStep::quest("Doric's Quest", &[(Mining, 1300.0)], 1),
    QuestStep::milestone("Train Mining 15", &[(Mining, 12)]),
    QuestStep::gated("The Knight's Sword", &[(Mining, 10)], &[(Smithing, 12_725.0)], 1),
    QuestStep::milestone("Train Fishing 15", &[(Fishing, 12)]),
    QuestStep::milestone("Train Woodcutting 15", &[(Woodcutting, 12)]),
    // Mid combat
    QuestStep::quest("Witch's House", &[(Hitpoints, 6325.0)], 4),
    QuestStep::quest("Vampire Slayer", &[(Attack, 4825.0)], 3),
    QuestStep::milestone("Train Combat 30", &[(Attack, 28), (Strength, 28)]),
    QuestStep::quest("Dragon Slayer I", &[(Strength, 18_650.0), (Defence, 18_650.0)], 2)
        .listing_quest_points(12),
    QuestStep::milestone("Train Defence 25", &[(Defence, 22)]),
    // Mid gathering
    QuestStep::milestone("Train Mining 25", &[(Mining, 22)]),
    QuestStep::milestone("Train Fishing 25", &[(Fishing, 22)]),
    QuestStep::milestone("Train Woodcutting 25", &[(Woodcutting, 22)]),
    QuestStep::milestone("Train Combat 40", &[(Attack, 38), (Strength, 38), (Defence, 32)]),
    QuestStep::quest("Heroes' Quest", &[(Attack, 3075.0), (Defence, 3075.0)], 1)
        .listing_quest_points(18),
    // High combat
    QuestStep::milestone("Train Combat 50", &[(Attack, 48), (Strength, 48), (Defence, 42)]),
    QuestStep::quest(
        "Monkey Madness I",
        &[(Attack, 35_000.0), (Strength, 35_000.0), (Defence, 35_000.0)],
        3,
    ),
    QuestStep::milestone("Train Skills 40", &[(Mining, 38), (Fishing, 35), (Woodcutting, 35)]),
    QuestStep::milestone("Train Combat 60", &[(Attack, 58), (Strength, 58), (Defence, 52)]),
    QuestStep::quest("Recipe for Disaster", &[(Attack, 20_000.0), (Defence, 20_000.0)], 10)
        .listing_quest_points(25),
    // High level
    QuestStep::milestone("Train Combat 70", &[(Attack, 68), (Strength, 68), (Defence, 62)]),
    QuestStep::milestone("Train Skills 55", &[(Mining, 52), (Fishing, 48), (Woodcutting, 48)]),
    QuestStep::quest("Dragon Slayer II", &[(Mining, 18_000.0)], 5)
        .listing_quest_points(35),
    QuestStep::milestone("Train Combat 80", &[(Attack, 78), (Strength, 78), (Defence, 72)]),
    QuestStep::milestone("Train Skills 70", &[(Mining, 65), (Fishing, 60), (Woodcutting, 60)]),
    // End game
    QuestStep::milestone("Train Combat 90", &[(Attack, 88), (Strength, 88), (Defence, 82)]),
    QuestStep::milestone("Train Skills 80", &[(Mining, 75), (Fishing, 70), (Woodcutting, 70)]),
    QuestStep::milestone("Near Max Combat", &[(Attack, 95), (Strength, 95), (Defence, 90)]),
    QuestStep::milestone("Near Max Skills", &[(Mining, 85), (Fishing, 80), (Woodcutting, 80)]),
    QuestStep::milestone(
        "MAXED!",
        &[(Attack, 99), (Strength, 99), (Defence, 99), (Mining, 99), (Fishing, 99), (Woodcutting, 99)],
    ),
];

/// Name of the quest at `index`, clamped to the last entry once the guide is exhausted.
pub fn display_name(quests: &[QuestStep], index: usize) -> &'static str {
    match quests.len() {
        0 => "N/A",
        len => quests[index.min(len - 1)].name,
    }
}
