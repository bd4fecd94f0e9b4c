use super::ids::AtomId;
use crate::core::utils::geometry::Offset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A class of grid neighborhood, defined by the largest squared distance it admits.
///
/// As a bond class it is the maximum distance the two endpoints may drift apart; as a movement
/// or chemistry setting its [`offsets`](Neighborhood::offsets) are the candidate directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Neighborhood {
    /// r² ≤ 1: the four orthogonal neighbors. Bonds of this class are rigid.
    VonNeumann,
    /// r² ≤ 2: the eight surrounding cells.
    Moore,
    /// r² ≤ 4.
    #[serde(rename = "von-neumann-2")]
    VonNeumann2,
    /// r² ≤ 5.
    Knight,
    /// r² ≤ 8.
    #[serde(rename = "moore-2")]
    Moore2,
}

impl Default for Neighborhood {
    fn default() -> Self {
        Neighborhood::VonNeumann
    }
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 5] = [
        Neighborhood::VonNeumann,
        Neighborhood::Moore,
        Neighborhood::VonNeumann2,
        Neighborhood::Knight,
        Neighborhood::Moore2,
    ];

    pub const fn max_squared_distance(self) -> i64 {
        match self {
            Self::VonNeumann => 1,
            Self::Moore => 2,
            Self::VonNeumann2 => 4,
            Self::Knight => 5,
            Self::Moore2 => 8,
        }
    }

    pub const fn is_rigid(self) -> bool {
        matches!(self, Self::VonNeumann)
    }

    #[inline]
    pub const fn admits(self, squared_distance: i64) -> bool {
        squared_distance <= self.max_squared_distance()
    }

    /// Every non-zero offset within this neighborhood.
    ///
    /// The von Neumann offsets come in N, E, S, W order; larger classes are listed
    /// row by row.
    pub fn offsets(self) -> Vec<Offset> {
        if self == Self::VonNeumann {
            return vec![
                Offset::new(0, -1),
                Offset::new(1, 0),
                Offset::new(0, 1),
                Offset::new(-1, 0),
            ];
        }
        let limit = self.max_squared_distance();
        let reach = (limit as f64).sqrt().floor() as i32;
        let mut offsets = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let offset = Offset::new(dx, dy);
                if !offset.is_zero() && offset.squared_length() <= limit {
                    offsets.push(offset);
                }
            }
        }
        offsets
    }
}

#[derive(Debug, Error)]
#[error("Invalid neighborhood string")]
pub struct ParseNeighborhoodError;

impl FromStr for Neighborhood {
    type Err = ParseNeighborhoodError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "von-neumann" | "vonneumann" | "vn" => Ok(Self::VonNeumann),
            "moore" => Ok(Self::Moore),
            "von-neumann-2" | "vonneumann2" | "vn2" => Ok(Self::VonNeumann2),
            "knight" => Ok(Self::Knight),
            "moore-2" | "moore2" => Ok(Self::Moore2),
            _ => Err(ParseNeighborhoodError),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::VonNeumann => "von-neumann",
                Self::Moore => "moore",
                Self::VonNeumann2 => "von-neumann-2",
                Self::Knight => "knight",
                Self::Moore2 => "moore-2",
            }
        )
    }
}

/// One entry in an atom's bond list: the partner atom and the class of the bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BondLink {
    pub partner: AtomId,
    pub neighborhood: Neighborhood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId, // ID of the first atom
    pub atom2_id: AtomId, // ID of the second atom
    pub neighborhood: Neighborhood,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, neighborhood: Neighborhood) -> Self {
        Self {
            atom1_id,
            atom2_id,
            neighborhood,
        }
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// The endpoint opposite `atom_id`, if `atom_id` is an endpoint at all.
    pub fn partner_of(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_from_str_parses_valid_strings() {
        assert_eq!(
            "von-neumann".parse::<Neighborhood>().unwrap(),
            Neighborhood::VonNeumann
        );
        assert_eq!(
            "vonNeumann".parse::<Neighborhood>().unwrap(),
            Neighborhood::VonNeumann
        );
        assert_eq!("MOORE".parse::<Neighborhood>().unwrap(), Neighborhood::Moore);
        assert_eq!(
            "von_neumann_2".parse::<Neighborhood>().unwrap(),
            Neighborhood::VonNeumann2
        );
        assert_eq!(
            "knight".parse::<Neighborhood>().unwrap(),
            Neighborhood::Knight
        );
        assert_eq!(
            "moore2".parse::<Neighborhood>().unwrap(),
            Neighborhood::Moore2
        );
    }

    #[test]
    fn neighborhood_from_str_rejects_invalid_strings() {
        assert!("".parse::<Neighborhood>().is_err());
        assert!("hex".parse::<Neighborhood>().is_err());
        assert!("moore-3".parse::<Neighborhood>().is_err());
    }

    #[test]
    fn neighborhood_display_round_trips_through_from_str() {
        for n in Neighborhood::ALL {
            assert_eq!(n.to_string().parse::<Neighborhood>().unwrap(), n);
        }
    }

    #[test]
    fn offset_counts_match_each_class() {
        assert_eq!(Neighborhood::VonNeumann.offsets().len(), 4);
        assert_eq!(Neighborhood::Moore.offsets().len(), 8);
        assert_eq!(Neighborhood::VonNeumann2.offsets().len(), 12);
        assert_eq!(Neighborhood::Knight.offsets().len(), 20);
        assert_eq!(Neighborhood::Moore2.offsets().len(), 24);
    }

    #[test]
    fn offsets_stay_within_the_bound() {
        for n in Neighborhood::ALL {
            assert!(
                n.offsets()
                    .iter()
                    .all(|o| !o.is_zero() && n.admits(o.squared_length()))
            );
        }
    }

    #[test]
    fn only_von_neumann_is_rigid() {
        assert!(Neighborhood::VonNeumann.is_rigid());
        assert!(!Neighborhood::Moore.is_rigid());
        assert_eq!(Neighborhood::default(), Neighborhood::VonNeumann);
    }

    #[test]
    fn bond_contains_returns_true_for_both_atoms() {
        let bond = Bond::new(AtomId::new(10), AtomId::new(20), Neighborhood::Moore);
        assert!(bond.contains(AtomId::new(10)));
        assert!(bond.contains(AtomId::new(20)));
        assert!(!bond.contains(AtomId::new(30)));
    }

    #[test]
    fn bond_partner_of_returns_the_other_endpoint() {
        let bond = Bond::new(AtomId::new(1), AtomId::new(2), Neighborhood::Knight);
        assert_eq!(bond.partner_of(AtomId::new(1)), Some(AtomId::new(2)));
        assert_eq!(bond.partner_of(AtomId::new(2)), Some(AtomId::new(1)));
        assert_eq!(bond.partner_of(AtomId::new(3)), None);
    }
}
