//! Validated campus graph: users and weighted friendship links.
//!
//! Input loaders hand the core loosely checked [`UserRecord`] and
//! [`EdgeRecord`] values. [`Graph::try_new`] rejects malformed records and
//! produces the read-only structure every algorithm consumes.
//!
//! Links are undirected and stored in canonical form (`from < to`). Parallel
//! links between the same pair collapse to the cheapest one; self-links are
//! dropped because they can never join two users.

use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use tracing::{debug, instrument};

use crate::error::{RecordKind, RecordRef, ValidationError};

/// Stable identifier of a campus user.
///
/// # Examples
/// ```
/// use campusnet_core::UserId;
///
/// let id = UserId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated user record in the `{id, name}` interchange shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserRecord {
    /// Identifier, unique within the user set.
    pub id: u64,
    /// Display name.
    pub name: String,
}

impl UserRecord {
    /// Creates a user record.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Unvalidated link record in the `{from_id, to_id, cost}` interchange shape.
///
/// The cost is signed so loaders can pass negative values through to
/// validation instead of failing on their own.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct EdgeRecord {
    /// One endpoint.
    pub from_id: u64,
    /// The other endpoint.
    pub to_id: u64,
    /// Cost of keeping or creating the link.
    pub cost: i64,
}

impl EdgeRecord {
    /// Creates a link record.
    #[must_use]
    pub const fn new(from_id: u64, to_id: u64, cost: i64) -> Self {
        Self {
            from_id,
            to_id,
            cost,
        }
    }
}

/// A validated campus user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Returns the user identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn id(&self) -> UserId { self.id }

    /// Returns the display name.
    #[must_use]
    #[rustfmt::skip]
    pub fn name(&self) -> &str { &self.name }
}

/// An undirected link in canonical form (`from <= to`).
///
/// Edges order by `(cost, from, to)`, which is the deterministic processing
/// order of every cheapest-first pass in this crate.
///
/// # Examples
/// ```
/// use campusnet_core::{Edge, UserId};
///
/// let edge = Edge::new(UserId::new(4), UserId::new(1), 9);
/// assert_eq!(edge.from(), UserId::new(1));
/// assert_eq!(edge.to(), UserId::new(4));
/// assert!(edge.connects(UserId::new(4), UserId::new(1)));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    from: UserId,
    to: UserId,
    cost: u64,
}

impl Edge {
    /// Creates a link between `left` and `right`, canonicalising the endpoints.
    #[must_use]
    pub fn new(left: UserId, right: UserId, cost: u64) -> Self {
        let (from, to) = canonical_pair(left, right);
        Self { from, to, cost }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn from(&self) -> UserId { self.from }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn to(&self) -> UserId { self.to }

    /// Returns the link cost.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cost(&self) -> u64 { self.cost }

    /// Returns both endpoints as `(from, to)`.
    #[must_use]
    pub const fn endpoints(&self) -> (UserId, UserId) {
        (self.from, self.to)
    }

    /// Returns `true` when the link joins `left` and `right` in either order.
    #[must_use]
    pub fn connects(&self, left: UserId, right: UserId) -> bool {
        self.endpoints() == canonical_pair(left, right)
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.from.cmp(&other.from))
            .then_with(|| self.to.cmp(&other.to))
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --({})-- {}", self.from, self.cost, self.to)
    }
}

/// Orders an unordered pair as `(min, max)`.
pub(crate) fn canonical_pair(left: UserId, right: UserId) -> (UserId, UserId) {
    if left <= right {
        (left, right)
    } else {
        (right, left)
    }
}

/// Read-only campus graph built from validated records.
///
/// # Examples
/// ```
/// use campusnet_core::{EdgeRecord, Graph, UserId, UserRecord};
///
/// let graph = Graph::try_new(
///     vec![UserRecord::new(1, "Ana"), UserRecord::new(2, "Bruno")],
///     &[EdgeRecord::new(2, 1, 5), EdgeRecord::new(1, 2, 3)],
/// )?;
/// assert_eq!(graph.user_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.edges()[0].cost(), 3);
/// assert_eq!(graph.collapsed_parallel_edges(), 1);
/// assert_eq!(graph.user(UserId::new(2)).map(|user| user.name()), Some("Bruno"));
/// # Ok::<(), campusnet_core::ValidationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    users: Vec<User>,
    index: HashMap<UserId, usize>,
    edges: Vec<Edge>,
    collapsed_parallel_edges: usize,
    dropped_self_links: usize,
}

impl Graph {
    /// Validates `users` and `edges` and builds the graph.
    ///
    /// Users keep their input order. Edges are canonicalised, parallel edges
    /// keep only the cheapest cost, self-links are dropped, and the survivors
    /// are sorted by `(cost, from, to)`.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyUserSet`] when `users` is empty,
    /// [`ValidationError::DuplicateUser`] when an identifier repeats,
    /// [`ValidationError::UnknownUser`] when an edge references a missing user,
    /// and [`ValidationError::NegativeCost`] when an edge cost is below zero.
    #[instrument(
        name = "core.graph.validate",
        err,
        skip_all,
        fields(users = users.len(), edges = edges.len()),
    )]
    pub fn try_new(users: Vec<UserRecord>, edges: &[EdgeRecord]) -> Result<Self, ValidationError> {
        if users.is_empty() {
            return Err(ValidationError::EmptyUserSet);
        }

        let mut index = HashMap::with_capacity(users.len());
        let mut validated = Vec::with_capacity(users.len());
        for (position, record) in users.into_iter().enumerate() {
            let id = UserId::new(record.id);
            match index.entry(id) {
                Entry::Occupied(_) => {
                    return Err(ValidationError::DuplicateUser {
                        record: RecordRef::new(RecordKind::User, position),
                        user: id,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(validated.len());
                }
            }
            validated.push(User {
                id,
                name: record.name,
            });
        }

        let mut graph = Self {
            users: validated,
            index,
            edges: Vec::new(),
            collapsed_parallel_edges: 0,
            dropped_self_links: 0,
        };

        let links = graph.collect_links(edges, RecordKind::Edge)?;
        graph.edges = links.edges;
        graph.collapsed_parallel_edges = links.collapsed;
        graph.dropped_self_links = links.self_links;

        debug!(
            users = graph.user_count(),
            edges = graph.edge_count(),
            collapsed = graph.collapsed_parallel_edges,
            self_links = graph.dropped_self_links,
            "graph validated"
        );
        Ok(graph)
    }

    /// Validates additional link records (for example a reconnection
    /// candidate pool) against this graph's users.
    ///
    /// The same canonicalisation rules as [`Graph::try_new`] apply: parallel
    /// links keep the cheapest cost, self-links are dropped, and the result is
    /// sorted by `(cost, from, to)`. Errors name records of `kind`.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownUser`] or
    /// [`ValidationError::NegativeCost`] for the first offending record.
    pub fn validate_links(
        &self,
        records: &[EdgeRecord],
        kind: RecordKind,
    ) -> Result<Vec<Edge>, ValidationError> {
        self.collect_links(records, kind).map(|links| links.edges)
    }

    fn collect_links(
        &self,
        records: &[EdgeRecord],
        kind: RecordKind,
    ) -> Result<CollectedLinks, ValidationError> {
        let mut edges = Vec::with_capacity(records.len());
        let mut self_links = 0;
        for (position, record) in records.iter().enumerate() {
            let at = RecordRef::new(kind, position);
            match self.validate_link(record, at)? {
                Some(edge) => edges.push(edge),
                None => self_links += 1,
            }
        }

        // Cheapest first within each pair so `dedup_by_key` keeps the minimum.
        edges.sort_unstable_by_key(|edge| (edge.from, edge.to, edge.cost));
        let before = edges.len();
        edges.dedup_by_key(|edge| edge.endpoints());
        let collapsed = before - edges.len();
        edges.sort_unstable();

        Ok(CollectedLinks {
            edges,
            collapsed,
            self_links,
        })
    }

    fn validate_link(
        &self,
        record: &EdgeRecord,
        at: RecordRef,
    ) -> Result<Option<Edge>, ValidationError> {
        let from = UserId::new(record.from_id);
        let to = UserId::new(record.to_id);
        for user in [from, to] {
            if !self.contains(user) {
                return Err(ValidationError::UnknownUser { record: at, user });
            }
        }
        let cost = u64::try_from(record.cost).map_err(|_| ValidationError::NegativeCost {
            record: at,
            cost: record.cost,
        })?;
        if from == to {
            return Ok(None);
        }
        Ok(Some(Edge::new(from, to, cost)))
    }

    /// Returns the users in input order.
    #[must_use]
    #[rustfmt::skip]
    pub fn users(&self) -> &[User] { &self.users }

    /// Returns an iterator over user identifiers in input order.
    pub fn user_ids(&self) -> impl ExactSizeIterator<Item = UserId> + '_ {
        self.users.iter().map(User::id)
    }

    /// Looks up a user by identifier.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.index
            .get(&id)
            .and_then(|&position| self.users.get(position))
    }

    /// Returns `true` when `id` belongs to the user set.
    #[must_use]
    pub fn contains(&self, id: UserId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns the number of users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Returns the links sorted by `(cost, from, to)`.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the number of distinct links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Finds the link joining `left` and `right`, if any.
    #[must_use]
    pub fn find_edge(&self, left: UserId, right: UserId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.connects(left, right))
    }

    /// Returns the summed cost of every link in the graph.
    #[must_use]
    pub fn total_cost(&self) -> u64 {
        self.edges
            .iter()
            .fold(0_u64, |total, edge| total.saturating_add(edge.cost))
    }

    /// Returns how many parallel link records were folded into a cheaper one.
    #[must_use]
    #[rustfmt::skip]
    pub const fn collapsed_parallel_edges(&self) -> usize { self.collapsed_parallel_edges }

    /// Returns how many self-link records were dropped during validation.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dropped_self_links(&self) -> usize { self.dropped_self_links }
}

struct CollectedLinks {
    edges: Vec<Edge>,
    collapsed: usize,
    self_links: usize,
}
