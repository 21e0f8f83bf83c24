//! Budgeted coverage selection over interest categories.
//!
//! Each category has a cost and a set of users it reaches. Under a budget the
//! selector repeatedly enables the best affordable category until nothing
//! affordable adds new users. This is a greedy heuristic for budgeted maximum
//! coverage, which is NP-hard: the selection is an approximation and is not
//! guaranteed to be optimal, nor is the reached count guaranteed to grow with
//! the budget when categories have different costs.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashSet},
    fmt,
};

use tracing::{debug, info, instrument};

use crate::{
    error::{RecordKind, RecordRef, ValidationError},
    graph::{Graph, UserId},
};

/// Stable identifier of an interest category.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CategoryId(u64);

impl CategoryId {
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

impl From<u64> for CategoryId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated category record in the `{id, name, cost, reached_user_ids}`
/// interchange shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryRecord {
    /// Identifier, unique within the category set.
    pub id: u64,
    /// Optional display name.
    pub name: Option<String>,
    /// Cost of enabling the category.
    pub cost: i64,
    /// Users the category reaches. Repeats are ignored.
    pub reached_user_ids: Vec<u64>,
}

impl CategoryRecord {
    /// Creates an unnamed category record.
    #[must_use]
    pub fn new(id: u64, cost: i64, reached_user_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            id,
            name: None,
            cost,
            reached_user_ids: reached_user_ids.into_iter().collect(),
        }
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A validated interest category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Category {
    id: CategoryId,
    name: Option<String>,
    cost: u64,
    reached: BTreeSet<UserId>,
}

impl Category {
    /// Returns the category identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn id(&self) -> CategoryId { self.id }

    /// Returns the display name, if one was supplied.
    #[must_use]
    #[rustfmt::skip]
    pub fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Returns the cost of enabling the category.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cost(&self) -> u64 { self.cost }

    /// Returns the users the category reaches.
    #[must_use]
    #[rustfmt::skip]
    pub const fn reached(&self) -> &BTreeSet<UserId> { &self.reached }

    fn marginal_reach(&self, covered: &BTreeSet<UserId>) -> usize {
        self.reached.difference(covered).count()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} (#{})", self.id),
            None => write!(f, "category #{}", self.id),
        }
    }
}

/// Validated, read-only list of categories in input order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// Validates `records` against the users of `graph`.
    ///
    /// # Errors
    /// Returns [`ValidationError::DuplicateCategory`] when an identifier
    /// repeats, [`ValidationError::NegativeCost`] for a negative cost,
    /// [`ValidationError::EmptyReach`] when a category reaches nobody, and
    /// [`ValidationError::UnknownUser`] when it reaches a user outside the
    /// graph.
    #[instrument(
        name = "core.categories.validate",
        err,
        skip_all,
        fields(categories = records.len()),
    )]
    pub fn try_new(records: Vec<CategoryRecord>, graph: &Graph) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut categories = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let at = RecordRef::new(RecordKind::Category, position);
            let id = CategoryId::new(record.id);
            if !seen.insert(id) {
                return Err(ValidationError::DuplicateCategory {
                    record: at,
                    category: id,
                });
            }
            let cost = u64::try_from(record.cost).map_err(|_| ValidationError::NegativeCost {
                record: at,
                cost: record.cost,
            })?;
            if record.reached_user_ids.is_empty() {
                return Err(ValidationError::EmptyReach {
                    record: at,
                    category: id,
                });
            }
            let mut reached = BTreeSet::new();
            for raw in record.reached_user_ids {
                let user = UserId::new(raw);
                if !graph.contains(user) {
                    return Err(ValidationError::UnknownUser { record: at, user });
                }
                reached.insert(user);
            }
            categories.push(Category {
                id,
                name: record.name,
                cost,
                reached,
            });
        }
        debug!(categories = categories.len(), "categories validated");
        Ok(Self { categories })
    }

    /// Returns the number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` when there are no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates over the categories in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    /// Looks up a category by identifier.
    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// How the selector ranks affordable categories at each step.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SelectionRule {
    /// Most newly reached users; ties go to the lower cost, then input order.
    #[default]
    MarginalReach,
    /// Highest newly reached users per unit of cost; ties go to more newly
    /// reached users, then lower cost, then input order. A free category that
    /// reaches someone new beats any paid one.
    CostEfficiency,
}

impl SelectionRule {
    /// Returns the stable lowercase name of the rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarginalReach => "marginal-reach",
            Self::CostEfficiency => "cost-efficiency",
        }
    }

    /// Orders two candidates; `Greater` means `left` is preferred. Input
    /// order is the caller's final tie-break.
    fn compare(self, left: Candidate, right: Candidate) -> Ordering {
        let by_cost = right.cost.cmp(&left.cost);
        match self {
            Self::MarginalReach => left.gain.cmp(&right.gain).then(by_cost),
            Self::CostEfficiency => {
                let left_ratio = widen(left.gain) * u128::from(right.cost);
                let right_ratio = widen(right.gain) * u128::from(left.cost);
                left_ratio
                    .cmp(&right_ratio)
                    .then(left.gain.cmp(&right.gain))
                    .then(by_cost)
            }
        }
    }
}

impl fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn widen(gain: usize) -> u128 {
    u128::try_from(gain).unwrap_or(u128::MAX)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    position: usize,
    gain: usize,
    cost: u64,
}

/// Configures and runs a budgeted coverage selection.
///
/// # Examples
/// ```
/// use campusnet_core::{
///     CategoryRecord, CategorySet, CoveragePlanner, Graph, SelectionRule, UserId, UserRecord,
/// };
///
/// let graph = Graph::try_new(
///     vec![UserRecord::new(1, "A"), UserRecord::new(2, "B"), UserRecord::new(3, "C")],
///     &[],
/// )?;
/// let categories = CategorySet::try_new(
///     vec![CategoryRecord::new(1, 10, [1, 2]), CategoryRecord::new(2, 5, [2, 3])],
///     &graph,
/// )?;
/// let selection = CoveragePlanner::new(12)
///     .with_rule(SelectionRule::MarginalReach)
///     .plan(&categories);
/// assert_eq!(selection.total_cost(), 5);
/// assert_eq!(selection.reach(), 2);
/// assert_eq!(selection.remaining_budget(), 7);
/// assert!(selection.reached_users().contains(&UserId::new(3)));
/// # Ok::<(), campusnet_core::ValidationError>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoveragePlanner {
    budget: u64,
    rule: SelectionRule,
    already_reached: BTreeSet<UserId>,
}

impl CoveragePlanner {
    /// Creates a planner for `budget` using [`SelectionRule::MarginalReach`]
    /// and no pre-reached users.
    #[must_use]
    pub const fn new(budget: u64) -> Self {
        Self {
            budget,
            rule: SelectionRule::MarginalReach,
            already_reached: BTreeSet::new(),
        }
    }

    /// Overrides the selection rule.
    #[must_use]
    pub const fn with_rule(mut self, rule: SelectionRule) -> Self {
        self.rule = rule;
        self
    }

    /// Marks `users` as reached before any category is enabled.
    ///
    /// Every identifier must belong to `graph`, so the reach reported by the
    /// selection never exceeds the user count.
    ///
    /// # Errors
    /// Returns [`ValidationError::UnknownUser`] naming the position of the
    /// first identifier missing from `graph`.
    pub fn with_already_reached(
        mut self,
        users: impl IntoIterator<Item = UserId>,
        graph: &Graph,
    ) -> Result<Self, ValidationError> {
        for (position, user) in users.into_iter().enumerate() {
            if !graph.contains(user) {
                return Err(ValidationError::UnknownUser {
                    record: RecordRef::new(RecordKind::User, position),
                    user,
                });
            }
            self.already_reached.insert(user);
        }
        Ok(self)
    }

    /// Returns the configured budget.
    #[must_use]
    #[rustfmt::skip]
    pub const fn budget(&self) -> u64 { self.budget }

    /// Returns the configured selection rule.
    #[must_use]
    #[rustfmt::skip]
    pub const fn rule(&self) -> SelectionRule { self.rule }

    /// Returns the users counted as reached up front.
    #[must_use]
    #[rustfmt::skip]
    pub const fn already_reached(&self) -> &BTreeSet<UserId> { &self.already_reached }

    /// Greedily selects categories from `categories` within the budget.
    ///
    /// Each step considers the unselected categories whose cost fits the
    /// remaining budget and enables the best one by the configured rule.
    /// Selection stops when no affordable category reaches anyone new.
    #[instrument(
        name = "core.coverage",
        skip(self, categories),
        fields(budget = self.budget, rule = %self.rule, categories = categories.len()),
    )]
    pub fn plan(&self, categories: &CategorySet) -> CoverageSelection {
        let mut covered = self.already_reached.clone();
        let mut selected = vec![false; categories.len()];
        let mut remaining = self.budget;
        let mut steps = Vec::new();

        while let Some(best) = self.best_candidate(categories, &selected, &covered, remaining) {
            let Some(category) = categories.categories.get(best.position) else {
                break;
            };
            if let Some(flag) = selected.get_mut(best.position) {
                *flag = true;
            }
            remaining -= best.cost;
            covered.extend(category.reached.iter().copied());
            debug!(
                category = %category.id,
                gain = best.gain,
                cost = best.cost,
                remaining,
                "category selected"
            );
            steps.push(CoverageStep {
                category: category.id,
                cost: best.cost,
                marginal_reach: best.gain,
                cumulative_reach: covered.len(),
                remaining_budget: remaining,
            });
        }

        let selection = CoverageSelection {
            budget: self.budget,
            total_cost: self.budget - remaining,
            remaining_budget: remaining,
            steps,
            reached: covered,
        };
        info!(
            selected = selection.steps.len(),
            reach = selection.reach(),
            total_cost = selection.total_cost,
            "coverage selected"
        );
        selection
    }

    fn best_candidate(
        &self,
        categories: &CategorySet,
        selected: &[bool],
        covered: &BTreeSet<UserId>,
        remaining: u64,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for ((position, category), taken) in categories.iter().enumerate().zip(selected) {
            if *taken || category.cost > remaining {
                continue;
            }
            let candidate = Candidate {
                position,
                gain: category.marginal_reach(covered),
                cost: category.cost,
            };
            if candidate.gain == 0 {
                continue;
            }
            let better = best.is_none_or(|current| {
                self.rule.compare(candidate, current) == Ordering::Greater
            });
            if better {
                best = Some(candidate);
            }
        }
        best
    }
}

impl Default for CoveragePlanner {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Selects categories within `budget` using the default rule.
///
/// Shorthand for `CoveragePlanner::new(budget).plan(categories)`.
#[must_use]
pub fn select_coverage(categories: &CategorySet, budget: u64) -> CoverageSelection {
    CoveragePlanner::new(budget).plan(categories)
}

/// One enabled category and the state right after enabling it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoverageStep {
    category: CategoryId,
    cost: u64,
    marginal_reach: usize,
    cumulative_reach: usize,
    remaining_budget: u64,
}

impl CoverageStep {
    /// Returns the enabled category.
    #[must_use]
    #[rustfmt::skip]
    pub const fn category(&self) -> CategoryId { self.category }

    /// Returns the category cost.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cost(&self) -> u64 { self.cost }

    /// Returns how many users this step reached for the first time.
    #[must_use]
    #[rustfmt::skip]
    pub const fn marginal_reach(&self) -> usize { self.marginal_reach }

    /// Returns the number of reached users after this step.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cumulative_reach(&self) -> usize { self.cumulative_reach }

    /// Returns the budget left after this step.
    #[must_use]
    #[rustfmt::skip]
    pub const fn remaining_budget(&self) -> u64 { self.remaining_budget }
}

/// Outcome of a coverage selection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoverageSelection {
    budget: u64,
    total_cost: u64,
    remaining_budget: u64,
    steps: Vec<CoverageStep>,
    reached: BTreeSet<UserId>,
}

impl CoverageSelection {
    /// Returns the selection steps in the order categories were enabled.
    #[must_use]
    #[rustfmt::skip]
    pub fn steps(&self) -> &[CoverageStep] { &self.steps }

    /// Iterates over the enabled category identifiers in selection order.
    pub fn selected(&self) -> impl ExactSizeIterator<Item = CategoryId> + '_ {
        self.steps.iter().map(CoverageStep::category)
    }

    /// Returns `true` when `id` was enabled.
    #[must_use]
    pub fn is_selected(&self, id: CategoryId) -> bool {
        self.steps.iter().any(|step| step.category == id)
    }

    /// Returns the budget the selection ran with.
    #[must_use]
    #[rustfmt::skip]
    pub const fn budget(&self) -> u64 { self.budget }

    /// Returns the summed cost of the enabled categories.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total_cost(&self) -> u64 { self.total_cost }

    /// Returns the unspent budget.
    #[must_use]
    #[rustfmt::skip]
    pub const fn remaining_budget(&self) -> u64 { self.remaining_budget }

    /// Returns the number of distinct reached users, pre-reached included.
    #[must_use]
    pub fn reach(&self) -> usize {
        self.reached.len()
    }

    /// Returns the reached users, pre-reached included.
    #[must_use]
    #[rustfmt::skip]
    pub const fn reached_users(&self) -> &BTreeSet<UserId> { &self.reached }

    /// Reports how much of `category`'s audience is reached by this
    /// selection, whether or not the category itself was enabled.
    #[must_use]
    pub fn coverage_of(&self, category: &Category) -> CategoryCoverage {
        CategoryCoverage {
            category: category.id,
            reached: category.reached.intersection(&self.reached).count(),
            size: category.reached.len(),
        }
    }
}

/// Reached share of one category's audience.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CategoryCoverage {
    category: CategoryId,
    reached: usize,
    size: usize,
}

impl CategoryCoverage {
    /// Returns the category identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn category(&self) -> CategoryId { self.category }

    /// Returns how many of the category's users are reached.
    #[must_use]
    #[rustfmt::skip]
    pub const fn reached(&self) -> usize { self.reached }

    /// Returns the size of the category's audience.
    #[must_use]
    #[rustfmt::skip]
    pub const fn size(&self) -> usize { self.size }

    /// Returns `true` when every user of the category is reached.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.reached == self.size
    }
}
