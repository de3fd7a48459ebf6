use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ranking tier of a restaurant, ordered from highest (`Hang`) to lowest (`Trash`).
///
/// The derived `Ord` follows declaration order, so `Tier::Hang < Tier::Trash`
/// and sorting ascending lists the best tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Hang,
    Top,
    RenShangRen,
    #[serde(rename = "NPC")]
    Npc,
    Trash,
}

impl Tier {
    /// All tiers, highest to lowest.
    pub const ALL: [Tier; 5] = [Tier::Hang, Tier::Top, Tier::RenShangRen, Tier::Npc, Tier::Trash];

    /// Base selection weight before dynamic adjustment and recency penalty.
    pub fn base_weight(self) -> u32 {
        match self {
            Tier::Hang => 5,
            Tier::Top => 4,
            Tier::RenShangRen => 3,
            Tier::Npc => 2,
            Tier::Trash => 1,
        }
    }

    /// Position in [`Tier::ALL`] (0 = highest).
    #[inline]
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Next tier up, or the same tier at `Hang`.
    pub fn promote(self) -> Tier {
        match self.rank() {
            0 => self,
            r => Tier::ALL[r - 1],
        }
    }

    /// Next tier down, or the same tier at `Trash`.
    pub fn demote(self) -> Tier {
        Tier::ALL.get(self.rank() + 1).copied().unwrap_or(self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Hang => "Hang",
            Tier::Top => "Top",
            Tier::RenShangRen => "RenShangRen",
            Tier::Npc => "NPC",
            Tier::Trash => "Trash",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown tier '{s}' (expected one of Hang, Top, RenShangRen, NPC, Trash)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_weights_descend() {
        let weights: Vec<u32> = Tier::ALL.iter().map(|t| t.base_weight()).collect();
        assert_eq!(weights, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_promote_demote_adjacent() {
        assert_eq!(Tier::Top.promote(), Tier::Hang);
        assert_eq!(Tier::Npc.promote(), Tier::RenShangRen);
        assert_eq!(Tier::Top.demote(), Tier::RenShangRen);
        assert_eq!(Tier::Npc.demote(), Tier::Trash);
    }

    #[test]
    fn test_boundaries_are_noops() {
        assert_eq!(Tier::Hang.promote(), Tier::Hang);
        assert_eq!(Tier::Trash.demote(), Tier::Trash);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("npc".parse::<Tier>().unwrap(), Tier::Npc);
        assert_eq!("renshangren".parse::<Tier>().unwrap(), Tier::RenShangRen);
        assert!("legendary".parse::<Tier>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Tier::Npc).unwrap(), "\"NPC\"");
        let t: Tier = serde_json::from_str("\"RenShangRen\"").unwrap();
        assert_eq!(t, Tier::RenShangRen);
    }
}
