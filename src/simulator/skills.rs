use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Highest attainable skill level.
pub const MAX_LEVEL: u32 = 99;

/// Flat multiplier applied on top of the level multiplier for every grant.
const XP_BOOST: f64 = 3.0;

/// The fifteen tracked skills, in observation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Attack,
    Strength,
    Defence,
    Ranged,
    Prayer,
    Magic,
    Hitpoints,
    Runecrafting,
    Crafting,
    Mining,
    Smithing,
    Fishing,
    Cooking,
    Firemaking,
    Woodcutting,
}

impl Skill {
    pub const COUNT: usize = 15;

    pub const ALL: [Skill; Skill::COUNT] = [
        Skill::Attack,
        Skill::Strength,
        Skill::Defence,
        Skill::Ranged,
        Skill::Prayer,
        Skill::Magic,
        Skill::Hitpoints,
        Skill::Runecrafting,
        Skill::Crafting,
        Skill::Mining,
        Skill::Smithing,
        Skill::Fishing,
        Skill::Cooking,
        Skill::Firemaking,
        Skill::Woodcutting,
    ];

    /// Position of the skill in the level/experience vectors.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Skill::Attack => "attack",
            Skill::Strength => "strength",
            Skill::Defence => "defence",
            Skill::Ranged => "ranged",
            Skill::Prayer => "prayer",
            Skill::Magic => "magic",
            Skill::Hitpoints => "hitpoints",
            Skill::Runecrafting => "runecrafting",
            Skill::Crafting => "crafting",
            Skill::Mining => "mining",
            Skill::Smithing => "smithing",
            Skill::Fishing => "fishing",
            Skill::Cooking => "cooking",
            Skill::Firemaking => "firemaking",
            Skill::Woodcutting => "woodcutting",
        }
    }

    pub fn is_combat(self) -> bool {
        matches!(
            self,
            Skill::Attack | Skill::Strength | Skill::Defence | Skill::Hitpoints
        )
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cumulative experience thresholds. Entry `i` is the experience needed for level `i + 2`.
fn threshold_table() -> &'static [f64; MAX_LEVEL as usize] {
    static TABLE: OnceLock<[f64; MAX_LEVEL as usize]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0; MAX_LEVEL as usize];
        let mut total = 0.0_f64;
        for (i, slot) in table.iter_mut().enumerate() {
            let lvl = (i + 1) as f64;
            total += ((lvl + 300.0 * 2f64.powf(lvl / 7.0)).floor() / 4.0).floor();
            *slot = total;
        }
        table
    })
}

/// Level reached with `xp` cumulative experience, in `1..=99`.
pub fn level_for_xp(xp: f64) -> u32 {
    let mut level = 1;
    for (i, &required) in threshold_table().iter().enumerate() {
        if xp >= required {
            level = i as u32 + 2;
        } else {
            break;
        }
    }
    level.min(MAX_LEVEL)
}

/// Cumulative experience required to reach `level`.
pub fn xp_for_level(level: u32) -> f64 {
    if level <= 1 {
        return 0.0;
    }
    let level = level.min(MAX_LEVEL);
    threshold_table()[(level - 2) as usize]
}

/// Experience actually credited for an action worth `base_xp` at `level`.
///
/// Scales faster than the canonical curve so high levels stay reachable within
/// an episode.
pub fn boosted_xp(base_xp: f64, level: u32) -> f64 {
    let level = level as f64;
    let multiplier = 1.0 + level * 0.08 + (level / 40.0).powf(2.5);
    base_xp * multiplier * XP_BOOST
}
