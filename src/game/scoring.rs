use std::fmt;

use crate::game::settings::Settings;

pub const HINT_COUNT: usize = 3;

/// Points earned by a correct answer.
pub fn score(hints_used: usize, answered_via_map: bool, settings: &Settings) -> u32 {
    let hints_used = hints_used.min(HINT_COUNT) as u32;
    let mut penalty = hints_used * settings.hint_penalty;
    if answered_via_map {
        penalty = penalty.saturating_sub(settings.map_bonus);
    }
    settings
        .base_score
        .saturating_sub(penalty)
        .max(settings.min_score)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Beginner,
    Regular,
    Expert,
    Master,
}

impl Tier {
    pub fn from_score(score: u32, max_score: u32) -> Tier {
        if max_score == 0 {
            return Tier::Beginner;
        }
        let percent = score as u64 * 100 / max_score as u64;
        match percent {
            90..=u64::MAX => Tier::Master,
            70..=89 => Tier::Expert,
            40..=69 => Tier::Regular,
            _ => Tier::Beginner,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Master => "Anthem Master",
            Tier::Expert => "Anthem Expert",
            Tier::Regular => "Anthem Regular",
            Tier::Beginner => "Anthem Beginner",
        };
        f.write_str(label)
    }
}
