// ============================================================================
// Enum : Tier
// ============================================================================
// Les quatre paliers du barème : Chocolate < Bronze < Silver < Gold
//
// CONCEPT : Points en dixièmes
// - 0.6 / 1.3 / 1.9 / 2.5 stockés comme 6 / 13 / 19 / 25
// - La somme reste entière, la note finale est exacte (4.8 et 20.0 pile)
// ============================================================================

use std::fmt;

/// Palier de qualité d'une métrique
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Chocolate,
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Palier depuis son index 0..=3 (les index au-delà saturent à Gold)
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Tier::Chocolate,
            1 => Tier::Bronze,
            2 => Tier::Silver,
            _ => Tier::Gold,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tier::Chocolate => 0,
            Tier::Bronze => 1,
            Tier::Silver => 2,
            Tier::Gold => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Chocolate => "Chocolate",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        }
    }

    /// Points en dixièmes
    pub fn points_tenths(self) -> u32 {
        match self {
            Tier::Chocolate => 6,
            Tier::Bronze => 13,
            Tier::Silver => 19,
            Tier::Gold => 25,
        }
    }

    /// Points du palier (0.6, 1.3, 1.9, 2.5)
    pub fn points(self) -> f64 {
        f64::from(self.points_tenths()) / 10.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_table() {
        assert_eq!(Tier::Chocolate.points(), 0.6);
        assert_eq!(Tier::Bronze.points(), 1.3);
        assert_eq!(Tier::Silver.points(), 1.9);
        assert_eq!(Tier::Gold.points(), 2.5);
    }

    #[test]
    fn test_labels_and_order() {
        assert_eq!(Tier::from_index(0).label(), "Chocolate");
        assert_eq!(Tier::from_index(3).label(), "Gold");
        assert!(Tier::Chocolate < Tier::Bronze);
        assert!(Tier::Silver < Tier::Gold);
    }

    #[test]
    fn test_index_roundtrip() {
        for i in 0..4 {
            assert_eq!(Tier::from_index(i).index(), i);
        }
    }
}
