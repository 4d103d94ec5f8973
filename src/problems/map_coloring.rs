//! Map colouring, where neighbouring regions must get different colours.

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::csp::Assignment;
use crate::csp::Constraint;
use crate::csp::CspProblem;
use crate::csp::Value;
use crate::error::SearchError;

/// Binary not-equal constraints over a symmetric neighbour relation.
#[derive(Clone, Debug, Default)]
pub struct NotEqualConstraint {
    neighbours: FxHashMap<String, FxHashSet<String>>,
}

impl NotEqualConstraint {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `a` and `b` to differ.
    pub fn add(&mut self, a: &str, b: &str) -> &mut Self {
        self.neighbours
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        self.neighbours
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
        self
    }

    pub fn are_neighbours(&self, a: &str, b: &str) -> bool {
        self.neighbours.get(a).is_some_and(|n| n.contains(b))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for NotEqualConstraint {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut c = Self::new();
        for (a, b) in iter {
            c.add(a, b);
        }
        c
    }
}

impl<V: Value> Constraint<V> for NotEqualConstraint {
    fn is_consistent(&self, variable: &str, value: &V, assignment: &Assignment<V>) -> bool {
        let Some(neighbours) = self.neighbours.get(variable) else {
            return true;
        };
        neighbours
            .iter()
            .all(|n| assignment.get(n).is_none_or(|v| v != value))
    }
}

/// Colours the states and territories of mainland Australia plus Tasmania
/// with `colours`.
pub fn australia<V: Value>(colours: &[V]) -> Result<CspProblem<V, NotEqualConstraint>, SearchError> {
    let regions = ["WA", "NT", "SA", "Q", "NSW", "V", "T"];
    let borders: NotEqualConstraint = [
        ("WA", "NT"),
        ("WA", "SA"),
        ("NT", "SA"),
        ("NT", "Q"),
        ("SA", "Q"),
        ("SA", "NSW"),
        ("SA", "V"),
        ("Q", "NSW"),
        ("NSW", "V"),
    ]
    .into_iter()
    .collect();

    CspProblem::new(
        regions,
        regions.map(|r| (r, colours.to_vec())),
        borders,
    )
}
