use rustc_hash::FxHashMap;

use crate::cost::Cost;
use crate::cost::ZERO_COST;
use crate::problem::Problem;
use crate::space::State;

/// An explicit directed graph with weighted edges.
///
/// States are nodes and actions are the node moved to, so
/// `result(s, a) == a`. Successors are listed in the order their edges were
/// added. Optional per-node estimates serve as the heuristic.
#[derive(Clone)]
pub struct WeightedGraph<N: State> {
    edges: FxHashMap<N, Vec<(N, Cost)>>,
    estimates: FxHashMap<N, Cost>,
}

impl<N: State> WeightedGraph<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: FxHashMap::default(),
            estimates: FxHashMap::default(),
        }
    }

    /// Adds `from -> to` with cost `weight`.
    ///
    /// Re-adding an edge updates its weight but keeps its position.
    pub fn add_edge(&mut self, from: N, to: N, weight: Cost) -> &mut Self {
        debug_assert!(weight >= ZERO_COST, "Negative edge weight {weight}");
        let out = self.edges.entry(from).or_default();
        match out.iter_mut().find(|(n, _)| *n == to) {
            Some(edge) => edge.1 = weight,
            None => out.push((to, weight)),
        }
        self
    }

    /// Adds a node without edges.
    pub fn add_node(&mut self, node: N) -> &mut Self {
        self.edges.entry(node).or_default();
        self
    }

    /// Sets the estimated cost to the goal for some nodes. Nodes left out
    /// estimate 0.
    #[must_use]
    pub fn with_estimates<I>(mut self, estimates: I) -> Self
    where
        I: IntoIterator<Item = (N, Cost)>,
    {
        self.estimates.extend(estimates);
        self
    }

    /// Outgoing edges of `node`, in insertion order.
    pub fn neighbours(&self, node: &N) -> &[(N, Cost)] {
        self.edges.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Cost of `from -> to`, if the edge exists.
    pub fn weight(&self, from: &N, to: &N) -> Option<Cost> {
        self.neighbours(from)
            .iter()
            .find(|(n, _)| n == to)
            .map(|(_, w)| *w)
    }

    /// Number of nodes with outgoing edges or added explicitly.
    pub fn len(&self) -> usize {
        self.edges.len()
    }
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<N: State> Default for WeightedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: State> FromIterator<(N, N, Cost)> for WeightedGraph<N> {
    fn from_iter<I: IntoIterator<Item = (N, N, Cost)>>(iter: I) -> Self {
        let mut g = Self::new();
        for (from, to, weight) in iter {
            g.add_edge(from, to, weight);
        }
        g
    }
}

impl<N: State> Problem<N, N> for WeightedGraph<N> {
    fn actions(&self, state: &N) -> Vec<N> {
        self.neighbours(state).iter().map(|(n, _)| n.clone()).collect()
    }

    #[inline(always)]
    fn result(&self, _state: &N, action: &N) -> N {
        action.clone()
    }

    fn path_cost(&self, cost: Cost, from: &N, _action: &N, to: &N) -> Cost {
        let weight = self.weight(from, to);
        debug_assert!(weight.is_some(), "No edge {from:?} -> {to:?}");
        cost + weight.unwrap_or(Cost::INFINITY)
    }

    fn heuristic(&self, state: &N, _goal: &N) -> Cost {
        self.estimates.get(state).copied().unwrap_or(ZERO_COST)
    }

    fn view_state(&self, state: &N) -> Result<String, crate::error::SearchError> {
        Ok(format!("{state:?} -> {:?}", self.actions(state)))
    }
}

impl<N: State> std::fmt::Debug for WeightedGraph<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let edges: usize = self.edges.values().map(Vec::len).sum();
        write!(f, "WeightedGraph({} nodes, {edges} edges)", self.len())
    }
}
