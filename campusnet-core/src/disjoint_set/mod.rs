//! Disjoint-set (union-find) structure over campus users.
//!
//! Tracks connectivity incrementally while cheapest-first passes accept
//! links. `find` compresses paths, `union` merges by rank, and both run in
//! amortised near-constant time. A fresh instance is built for every
//! algorithm run; nothing is shared between computations.
//!
//! Members are registered with [`DisjointSet::make_set`]. When two roots of
//! equal rank merge, the one registered first stays root, so representatives
//! are deterministic for a given registration and union order.

use std::collections::{BTreeMap, BTreeSet, HashMap, hash_map::Entry};

use crate::{error::LookupError, graph::UserId};

/// Union-find over [`UserId`] values.
///
/// # Examples
/// ```
/// use campusnet_core::{DisjointSet, UserId};
///
/// let (a, b, c) = (UserId::new(1), UserId::new(2), UserId::new(3));
/// let mut sets = DisjointSet::with_members([a, b, c]);
/// assert!(sets.union(a, b)?);
/// assert!(!sets.union(b, a)?);
/// assert!(sets.connected(a, b)?);
/// assert!(!sets.connected(a, c)?);
/// assert_eq!(sets.component_count(), 2);
/// # Ok::<(), campusnet_core::LookupError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct DisjointSet {
    slots: HashMap<UserId, usize>,
    members: Vec<UserId>,
    parent: Vec<usize>,
    rank: Vec<u8>,
    components: usize,
}

impl DisjointSet {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a structure with one singleton set per member.
    ///
    /// Repeated members are registered once.
    #[must_use]
    pub fn with_members(members: impl IntoIterator<Item = UserId>) -> Self {
        let mut sets = Self::new();
        for member in members {
            sets.make_set(member);
        }
        sets
    }

    /// Registers `user` as a singleton set.
    ///
    /// Returns `false` and leaves the structure untouched when `user` is
    /// already registered.
    pub fn make_set(&mut self, user: UserId) -> bool {
        let Entry::Vacant(slot) = self.slots.entry(user) else {
            return false;
        };
        let index = self.members.len();
        slot.insert(index);
        self.members.push(user);
        self.parent.push(index);
        self.rank.push(0);
        self.components += 1;
        true
    }

    /// Returns the number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when no member is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` when `user` is registered.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.slots.contains_key(&user)
    }

    /// Returns the current number of disjoint sets.
    #[must_use]
    #[rustfmt::skip]
    pub const fn component_count(&self) -> usize { self.components }

    /// Returns the representative of the set containing `user`.
    ///
    /// # Errors
    /// Returns [`LookupError::Unregistered`] when `user` was never registered.
    pub fn find(&mut self, user: UserId) -> Result<UserId, LookupError> {
        let slot = self.slot(user)?;
        let root = self.find_slot(slot);
        Ok(self.members[root])
    }

    /// Merges the sets containing `left` and `right`.
    ///
    /// Returns `true` when the sets were distinct before the call.
    ///
    /// # Errors
    /// Returns [`LookupError::Unregistered`] when either user was never
    /// registered. The structure is unchanged in that case.
    pub fn union(&mut self, left: UserId, right: UserId) -> Result<bool, LookupError> {
        let left_slot = self.slot(left)?;
        let right_slot = self.slot(right)?;
        let mut left_root = self.find_slot(left_slot);
        let mut right_root = self.find_slot(right_slot);
        if left_root == right_root {
            return Ok(false);
        }

        let left_rank = self.rank[left_root];
        let right_rank = self.rank[right_root];
        let keep_left = match left_rank.cmp(&right_rank) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => left_root < right_root,
        };
        if !keep_left {
            std::mem::swap(&mut left_root, &mut right_root);
        }
        self.parent[right_root] = left_root;
        if left_rank == right_rank {
            self.rank[left_root] = left_rank.saturating_add(1);
        }
        self.components -= 1;
        Ok(true)
    }

    /// Returns `true` when `left` and `right` share a representative.
    ///
    /// # Errors
    /// Returns [`LookupError::Unregistered`] when either user was never
    /// registered.
    pub fn connected(&mut self, left: UserId, right: UserId) -> Result<bool, LookupError> {
        Ok(self.find(left)? == self.find(right)?)
    }

    /// Groups every registered member by representative.
    ///
    /// Components are ordered by their smallest member.
    pub fn components(&mut self) -> Vec<Component> {
        let mut grouped: BTreeMap<usize, BTreeSet<UserId>> = BTreeMap::new();
        for slot in 0..self.members.len() {
            let root = self.find_slot(slot);
            grouped
                .entry(root)
                .or_default()
                .insert(self.members[slot]);
        }

        let mut components: Vec<Component> = grouped
            .into_iter()
            .map(|(root, members)| Component {
                representative: self.members[root],
                members,
            })
            .collect();
        components.sort_unstable_by_key(Component::smallest);
        components
    }

    fn slot(&self, user: UserId) -> Result<usize, LookupError> {
        self.slots
            .get(&user)
            .copied()
            .ok_or(LookupError::Unregistered { user })
    }

    fn find_slot(&mut self, mut slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[slot] != slot {
            let parent = self.parent[slot];
            self.parent[slot] = root;
            slot = parent;
        }

        root
    }
}

/// A maximal group of mutually connected users.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Component {
    representative: UserId,
    members: BTreeSet<UserId>,
}

impl Component {
    /// Returns the disjoint-set root that identifies the component.
    #[must_use]
    #[rustfmt::skip]
    pub const fn representative(&self) -> UserId { self.representative }

    /// Returns the members in ascending identifier order.
    #[must_use]
    #[rustfmt::skip]
    pub const fn members(&self) -> &BTreeSet<UserId> { &self.members }

    /// Returns the number of members.
    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` when `user` belongs to the component.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        self.members.contains(&user)
    }

    /// Returns the smallest member identifier.
    #[must_use]
    pub fn smallest(&self) -> UserId {
        self.members
            .first()
            .copied()
            .unwrap_or(self.representative)
    }
}
