use serde::Serialize;

/// Number of colour steps before the palette wraps for sparkling tiers.
pub const MASTERY_PALETTE_LEN: u32 = 11;

const SPARKLE_FROM_LEVEL: u32 = 11;
const SPIN_FROM_LEVEL: u32 = 23;

/// Medal colour shown on a game's mastery star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Medal {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Diamond,
    Amethyst,
    Emerald,
    Ruby,
    /// One of three rainbow gradients, numbered 1 to 3.
    Rainbow(u8),
}

impl Medal {
    fn from_index(index: u32) -> Self {
        match index {
            0 => Self::Unranked,
            1 => Self::Bronze,
            2 => Self::Silver,
            3 => Self::Gold,
            4 => Self::Diamond,
            5 => Self::Amethyst,
            6 => Self::Emerald,
            7 => Self::Ruby,
            8 => Self::Rainbow(1),
            9 => Self::Rainbow(2),
            _ => Self::Rainbow(3),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unranked => "Unranked",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
            Self::Amethyst => "Amethyst",
            Self::Emerald => "Emerald",
            Self::Ruby => "Ruby",
            Self::Rainbow(_) => "Rainbow",
        }
    }
}

/// Visual mastery tier derived from a game's level.
///
/// Levels 0-10 pick a medal directly. From level 11 the star sparkles and
/// the palette cycles again from the start; from level 23 it also spins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MasteryTier {
    pub medal: Medal,
    pub sparkling: bool,
    pub spinning: bool,
}

impl MasteryTier {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        let sparkling = level >= SPARKLE_FROM_LEVEL;
        let spinning = level >= SPIN_FROM_LEVEL;
        let index = if sparkling {
            (level - SPARKLE_FROM_LEVEL) % MASTERY_PALETTE_LEN
        } else {
            level.min(MASTERY_PALETTE_LEN - 1)
        };
        Self {
            medal: Medal::from_index(index),
            sparkling,
            spinning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_levels_map_to_medals() {
        assert_eq!(MasteryTier::for_level(0).medal, Medal::Unranked);
        assert_eq!(MasteryTier::for_level(1).medal, Medal::Bronze);
        assert_eq!(MasteryTier::for_level(3).medal, Medal::Gold);
        assert_eq!(MasteryTier::for_level(10).medal, Medal::Rainbow(3));
        assert!(!MasteryTier::for_level(10).sparkling);
    }

    #[test]
    fn sparkling_levels_cycle_palette() {
        let tier = MasteryTier::for_level(11);
        assert!(tier.sparkling);
        assert!(!tier.spinning);
        assert_eq!(tier.medal, Medal::Unranked);
        assert_eq!(MasteryTier::for_level(14).medal, Medal::Gold);
        assert_eq!(MasteryTier::for_level(22).medal, Medal::Unranked);
    }

    #[test]
    fn high_levels_spin() {
        let tier = MasteryTier::for_level(23);
        assert!(tier.sparkling);
        assert!(tier.spinning);
        assert_eq!(tier.medal, Medal::Bronze);
    }
}
