//! Derivation of movable groups from the bond graph.
//!
//! A group is the set of atoms that one movement attempt translates together. Which groups
//! exist depends on the [`MovementStrategy`]: atoms-only and block-space keep the singleton
//! groups created with each atom, all-subgraphs grows the set of unions along every new bond,
//! and molecule-blocks keeps exactly one group per connected component.

use super::config::MovementStrategy;
use crate::core::models::ids::AtomId;
use crate::core::models::topology::Neighborhood;
use std::collections::HashSet;
use tracing::debug;

/// A set of atoms, stored sorted and without duplicates so that equality is set equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group {
    atoms: Vec<AtomId>,
}

impl Group {
    pub fn singleton(atom: AtomId) -> Self {
        Self { atoms: vec![atom] }
    }

    pub fn from_atoms(atoms: impl IntoIterator<Item = AtomId>) -> Self {
        let mut atoms: Vec<AtomId> = atoms.into_iter().collect();
        atoms.sort_unstable();
        atoms.dedup();
        Self { atoms }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn contains(&self, atom: AtomId) -> bool {
        self.atoms.binary_search(&atom).is_ok()
    }

    /// Sorted merge of two groups.
    pub fn union(&self, other: &Group) -> Group {
        let mut atoms = Vec::with_capacity(self.atoms.len() + other.atoms.len());
        let (mut i, mut j) = (0, 0);
        while i < self.atoms.len() && j < other.atoms.len() {
            let (x, y) = (self.atoms[i], other.atoms[j]);
            if x < y {
                atoms.push(x);
                i += 1;
            } else if y < x {
                atoms.push(y);
                j += 1;
            } else {
                atoms.push(x);
                i += 1;
                j += 1;
            }
        }
        atoms.extend_from_slice(&self.atoms[i..]);
        atoms.extend_from_slice(&other.atoms[j..]);
        Group { atoms }
    }

    /// True when the group holds exactly one of `a` and `b`.
    #[inline]
    pub fn splits(&self, a: AtomId, b: AtomId) -> bool {
        self.contains(a) != self.contains(b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<Group>,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub(crate) fn add_singleton(&mut self, atom: AtomId) {
        self.groups.push(Group::singleton(atom));
    }

    /// Updates the groups after the bond `a`–`b` has been recorded in the store.
    pub(crate) fn record_bond(
        &mut self,
        strategy: MovementStrategy,
        a: AtomId,
        b: AtomId,
        neighborhood: Neighborhood,
    ) {
        match strategy {
            MovementStrategy::AtomsOnly | MovementStrategy::BlockSpace => return,
            MovementStrategy::AllSubgraphs => {
                let added = self.add_unions(a, b);
                debug!(%a, %b, added, total = self.groups.len(), "Derived subgraph groups");
            }
            MovementStrategy::MoleculeBlocks => {
                let merged = self.merge_molecules(a, b);
                debug!(%a, %b, merged, total = self.groups.len(), "Merged molecules");
            }
        }
        if neighborhood.is_rigid() {
            let removed = self.remove_split_groups(a, b);
            if removed > 0 {
                debug!(%a, %b, removed, "Removed groups split by a rigid bond");
            }
        }
    }

    /// Appends the union of every group holding `a` but not `b` with every group holding `b`
    /// but not `a`, skipping unions that already exist. Returns how many were added.
    fn add_unions(&mut self, a: AtomId, b: AtomId) -> usize {
        let with_a: Vec<&Group> = self
            .groups
            .iter()
            .filter(|g| g.contains(a) && !g.contains(b))
            .collect();
        let with_b: Vec<&Group> = self
            .groups
            .iter()
            .filter(|g| g.contains(b) && !g.contains(a))
            .collect();

        let existing: HashSet<&Group> = self.groups.iter().collect();
        let mut candidates: Vec<Group> = Vec::new();
        let mut candidate_set: HashSet<Group> = HashSet::new();
        for ga in &with_a {
            for gb in &with_b {
                let union = ga.union(gb);
                if existing.contains(&union) || candidate_set.contains(&union) {
                    continue;
                }
                candidate_set.insert(union.clone());
                candidates.push(union);
            }
        }

        let added = candidates.len();
        self.groups.extend(candidates);
        added
    }

    /// Replaces every group holding `a` or `b` by their union. Returns how many groups were
    /// folded into the new one.
    fn merge_molecules(&mut self, a: AtomId, b: AtomId) -> usize {
        let (touched, kept): (Vec<Group>, Vec<Group>) = std::mem::take(&mut self.groups)
            .into_iter()
            .partition(|g| g.contains(a) || g.contains(b));
        self.groups = kept;

        let merged_count = touched.len();
        let merged = touched
            .iter()
            .fold(Group::from_atoms([a, b]), |acc, g| acc.union(g));
        self.groups.push(merged);
        merged_count
    }

    /// Drops every group that holds exactly one of `a` and `b`.
    fn remove_split_groups(&mut self, a: AtomId, b: AtomId) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| !g.splits(a, b));
        before - self.groups.len()
    }

    /// True when every atom `0..atom_count` belongs to at least one group.
    pub fn covers_all(&self, atom_count: usize) -> bool {
        let mut covered = vec![false; atom_count];
        for atom in self.groups.iter().flat_map(|g| g.atoms.iter()) {
            if let Some(slot) = covered.get_mut(atom.index()) {
                *slot = true;
            }
        }
        covered.into_iter().all(|c| c)
    }

    /// True when every atom `0..atom_count` belongs to exactly one group.
    pub fn is_partition(&self, atom_count: usize) -> bool {
        let mut owners = vec![0usize; atom_count];
        for atom in self.groups.iter().flat_map(|g| g.atoms.iter()) {
            match owners.get_mut(atom.index()) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        owners.into_iter().all(|c| c == 1)
    }
}
