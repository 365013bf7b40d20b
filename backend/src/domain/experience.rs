//! Experience awards and level derivation.
//!
//! Awards are a function of landmark category only and live in one
//! [`ExperienceTable`] owned by the discovery ledger. Levels are a pure
//! function of accumulated experience, so every caller that needs a level
//! goes through [`level_for_xp`].

use super::LandmarkCategory;

/// Experience needed to advance one level.
pub const XP_PER_LEVEL: u64 = 100;

/// Level reached with `total_xp` experience.
///
/// Level 1 covers `0..100`, level 2 covers `100..200`, and so on.
///
/// # Examples
/// ```
/// use explorer::domain::level_for_xp;
///
/// assert_eq!(level_for_xp(0), 1);
/// assert_eq!(level_for_xp(99), 1);
/// assert_eq!(level_for_xp(190), 2);
/// ```
pub fn level_for_xp(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

/// Category to experience mapping.
///
/// # Examples
/// ```
/// use explorer::domain::{ExperienceTable, LandmarkCategory};
///
/// let table = ExperienceTable::default();
/// assert_eq!(table.award_for(&LandmarkCategory::Historic), 100);
/// assert_eq!(table.award_for(&LandmarkCategory::Other("Maritime".into())), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceTable {
    pub historic: u64,
    pub military: u64,
    pub architecture: u64,
    pub culture: u64,
    pub royal: u64,
    /// Award for labels outside the known set.
    pub fallback: u64,
}

impl ExperienceTable {
    /// Experience awarded for discovering a landmark of `category`.
    pub fn award_for(&self, category: &LandmarkCategory) -> u64 {
        match category {
            LandmarkCategory::Historic => self.historic,
            LandmarkCategory::Military => self.military,
            LandmarkCategory::Architecture => self.architecture,
            LandmarkCategory::Culture => self.culture,
            LandmarkCategory::Royal => self.royal,
            LandmarkCategory::Other(_) => self.fallback,
        }
    }
}

impl Default for ExperienceTable {
    fn default() -> Self {
        Self {
            historic: 100,
            military: 90,
            architecture: 80,
            culture: 70,
            royal: 85,
            fallback: 50,
        }
    }
}
