//! Constraint satisfaction problems as search problems.
//!
//! A state is a partial assignment of values to variables, and an action
//! binds one more variable. The search tree only ever grows assignments, so no
//! state is reached twice along a branch.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::cost::Cost;
use crate::cost::UNIT_COST;
use crate::error::SearchError;
use crate::problem::Problem;

/// A value that can be assigned to a variable.
pub trait Value: Clone + Debug + Eq + Hash {}
impl<T> Value for T where T: Clone + Debug + Eq + Hash {}

/// Variable bindings, kept sorted by variable name.
pub type Assignment<V> = BTreeMap<String, V>;

/// A (partial) assignment.
///
/// Equality and hashing go over the sorted bindings, so the order in which
/// variables were bound does not matter.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CspState<V: Value> {
    assignment: Assignment<V>,
}

impl<V: Value> CspState<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignment: Assignment::new(),
        }
    }

    pub fn assignment(&self) -> &Assignment<V> {
        &self.assignment
    }
    pub fn into_assignment(self) -> Assignment<V> {
        self.assignment
    }

    pub fn is_assigned(&self, variable: &str) -> bool {
        self.assignment.contains_key(variable)
    }
    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.assignment.len()
    }
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

impl<V: Value> Default for CspState<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> From<Assignment<V>> for CspState<V> {
    fn from(assignment: Assignment<V>) -> Self {
        Self { assignment }
    }
}

impl<V: Value> std::fmt::Debug for CspState<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (variable, value)) in self.assignment.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{variable}={value:?}")?;
        }
        write!(f, "}}")
    }
}

/// Binds `variable` to `value`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CspAction<V: Value> {
    pub variable: String,
    pub value: V,
}

impl<V: Value> CspAction<V> {
    pub fn new(variable: impl Into<String>, value: V) -> Self {
        Self {
            variable: variable.into(),
            value,
        }
    }
}

impl<V: Value> std::fmt::Debug for CspAction<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}={:?}", self.variable, self.value)
    }
}

/// The constraints of a CSP.
pub trait Constraint<V: Value> {
    /// Whether binding `variable` to `value` agrees with every constraint
    /// involving variables already bound in `assignment`.
    ///
    /// `assignment` may already hold `variable` itself, as it does when
    /// checking complete assignments.
    fn is_consistent(&self, variable: &str, value: &V, assignment: &Assignment<V>) -> bool;
}

impl<V, F> Constraint<V> for F
where
    V: Value,
    F: Fn(&str, &V, &Assignment<V>) -> bool,
{
    #[inline(always)]
    fn is_consistent(&self, variable: &str, value: &V, assignment: &Assignment<V>) -> bool {
        self(variable, value, assignment)
    }
}

/// A CSP over an ordered set of variables with finite domains.
///
/// Actions bind the most constrained unassigned variable (the one with the
/// fewest values left, the first declared on ties) to each of its values that
/// is still consistent, in domain order.
pub struct CspProblem<V, C>
where
    V: Value,
    C: Constraint<V>,
{
    variables: Vec<String>,
    domains: FxHashMap<String, Vec<V>>,
    constraint: C,
}

impl<V, C> CspProblem<V, C>
where
    V: Value,
    C: Constraint<V>,
{
    /// Builds a CSP, checking every variable is declared once and has a
    /// domain. Domains of undeclared variables are ignored.
    pub fn new<I, S, D, K>(variables: I, domains: D, constraint: C) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        D: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
    {
        let variables: Vec<String> = variables.into_iter().map(Into::into).collect();
        let domains: FxHashMap<String, Vec<V>> =
            domains.into_iter().map(|(k, d)| (k.into(), d)).collect();

        let mut seen = FxHashSet::<&str>::default();
        for variable in &variables {
            if !seen.insert(variable) {
                return Err(SearchError::DuplicateVariable {
                    variable: variable.clone(),
                });
            }
            if !domains.contains_key(variable) {
                return Err(SearchError::MissingDomain {
                    variable: variable.clone(),
                });
            }
        }

        Ok(Self {
            variables,
            domains,
            constraint,
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }
    pub fn domain(&self, variable: &str) -> Option<&[V]> {
        self.domains.get(variable).map(Vec::as_slice)
    }
    pub fn constraint(&self) -> &C {
        &self.constraint
    }

    /// The empty assignment.
    #[must_use]
    pub fn initial_state(&self) -> CspState<V> {
        CspState::new()
    }

    #[inline(always)]
    pub fn is_consistent(&self, variable: &str, value: &V, assignment: &Assignment<V>) -> bool {
        self.constraint.is_consistent(variable, value, assignment)
    }

    /// Values of `variable` consistent with `state`, in domain order.
    pub fn remaining_values(&self, variable: &str, state: &CspState<V>) -> Vec<V> {
        self.domain(variable)
            .unwrap_or_default()
            .iter()
            .filter(|value| self.is_consistent(variable, value, state.assignment()))
            .cloned()
            .collect()
    }

    /// The order in which values of `variable` are tried.
    pub fn ordered_domain_values(&self, variable: &str, state: &CspState<V>) -> Vec<V> {
        self.remaining_values(variable, state)
    }

    /// The unassigned variable with the fewest remaining values.
    pub fn select_unassigned_variable(&self, state: &CspState<V>) -> Option<&str> {
        self.most_constrained(state).map(|(variable, _)| variable)
    }

    /// Whether `assignment` binds every variable and satisfies every
    /// constraint.
    pub fn is_complete_assignment_consistent(&self, assignment: &Assignment<V>) -> bool {
        self.variables.iter().all(|variable| {
            assignment
                .get(variable)
                .is_some_and(|value| self.is_consistent(variable, value, assignment))
        })
    }

    /// Whether `state` solves the CSP.
    pub fn is_solution(&self, state: &CspState<V>) -> bool {
        state.len() == self.variables.len()
            && self.is_complete_assignment_consistent(state.assignment())
    }

    /// Minimum-remaining-values variable selection, along with the values
    /// left for it.
    fn most_constrained(&self, state: &CspState<V>) -> Option<(&str, Vec<V>)> {
        self.variables
            .iter()
            .filter(|variable| !state.is_assigned(variable))
            .map(|variable| {
                (
                    variable.as_str(),
                    self.ordered_domain_values(variable, state),
                )
            })
            // `min_by_key` keeps the first of equal elements.
            .min_by_key(|(_, values)| values.len())
    }
}

impl<V, C> Problem<CspState<V>, CspAction<V>> for CspProblem<V, C>
where
    V: Value,
    C: Constraint<V>,
{
    fn actions(&self, state: &CspState<V>) -> Vec<CspAction<V>> {
        match self.most_constrained(state) {
            Some((variable, values)) => values
                .into_iter()
                .map(|value| CspAction::new(variable, value))
                .collect(),
            None => vec![],
        }
    }

    fn result(&self, state: &CspState<V>, action: &CspAction<V>) -> CspState<V> {
        let mut assignment = state.assignment.clone();
        assignment.insert(action.variable.clone(), action.value.clone());
        CspState { assignment }
    }

    /// Ignores `goal`. Any complete and consistent assignment will do.
    fn goal_test(&self, state: &CspState<V>, _goal: &CspState<V>) -> bool {
        self.is_solution(state)
    }

    /// One per binding, which makes it the number of bound variables.
    fn path_cost(
        &self,
        cost: Cost,
        _from: &CspState<V>,
        _action: &CspAction<V>,
        _to: &CspState<V>,
    ) -> Cost {
        cost + UNIT_COST
    }

    /// Number of unassigned variables.
    fn heuristic(&self, state: &CspState<V>, _goal: &CspState<V>) -> Cost {
        self.variables.len().saturating_sub(state.len()) as Cost
    }

    fn view_state(&self, state: &CspState<V>) -> Result<String, SearchError> {
        Ok(format!("{state:?}"))
    }
}

impl<V, C> std::fmt::Debug for CspProblem<V, C>
where
    V: Value,
    C: Constraint<V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CspProblem{:?}", self.variables)
    }
}
