use std::rc::Rc;
use std::str::FromStr;

use derive_more::Display;
use log::Level;
use log::log;
use thousands::Separable;

use crate::algorithms::best_first::best_first_search;
use crate::algorithms::uninformed::depth_first_search;
use crate::csp::Assignment;
use crate::csp::Constraint;
use crate::csp::CspAction;
use crate::csp::CspProblem;
use crate::csp::CspState;
use crate::csp::Value;
use crate::debug::step_level;
use crate::error::SearchError;
use crate::node::Node;
use crate::problem::Problem;

type CspNode<V> = Node<CspState<V>, CspAction<V>>;

/// Depth-first backtracking over partial assignments.
///
/// Tries the actions of each node in order and returns the first complete
/// consistent assignment found. There's no explored set, assignments only
/// grow along a branch so no state repeats within it.
pub fn backtracking_search<V, C>(problem: &CspProblem<V, C>, verbose: bool) -> Option<Assignment<V>>
where
    V: Value,
    C: Constraint<V>,
{
    #[cfg(feature = "coz_profile")]
    coz::scope!("BacktrackingSearch");

    let mut search = Backtracking::new(problem, verbose);
    let root = Node::root(problem.initial_state());
    let solution = search.recurse(&root);
    log::debug!(
        "Backtracking search {} after visiting {} nodes and backtracking {} times",
        if solution.is_some() {
            "succeeded"
        } else {
            "failed"
        },
        search.visited.separate_with_commas(),
        search.backtracks.separate_with_commas(),
    );
    solution.map(|n| n.state().clone().into_assignment())
}

struct Backtracking<'p, V, C>
where
    V: Value,
    C: Constraint<V>,
{
    problem: &'p CspProblem<V, C>,
    level: Level,
    /// Nodes goal-tested so far.
    visited: usize,
    /// Assignments undone after their subtree failed.
    backtracks: usize,
}

impl<'p, V, C> Backtracking<'p, V, C>
where
    V: Value,
    C: Constraint<V>,
{
    fn new(problem: &'p CspProblem<V, C>, verbose: bool) -> Self {
        Self {
            problem,
            level: step_level(verbose),
            visited: 0,
            backtracks: 0,
        }
    }

    fn recurse(&mut self, node: &Rc<CspNode<V>>) -> Option<Rc<CspNode<V>>> {
        self.visited += 1;
        let level = self.level;
        let indent = 2 * node.depth();
        log!(
            level,
            "{:indent$}Exploring node: {}/{} variables assigned",
            "",
            node.state().len(),
            self.problem.variables().len()
        );

        if self.problem.goal_test(node.state(), node.state()) {
            log!(level, "{:indent$}Solution found: {:?}", "", node.state());
            return Some(Rc::clone(node));
        }

        let actions = self.problem.actions(node.state());
        if actions.is_empty() {
            log!(level, "{:indent$}No actions left", "");
            return None;
        }

        for action in actions {
            log!(level, "{:indent$}Trying {action:?}", "");
            let child = node.child_node(self.problem, action.clone());
            if let Some(solution) = self.recurse(&child) {
                return Some(solution);
            }
            self.backtracks += 1;
            log!(level, "{:indent$}Backtracking from {action:?}", "");
        }

        log!(level, "{:indent$}No solution below {:?}", "", node.state());
        None
    }
}

/// The algorithms [`csp_search`] can dispatch to.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum CspAlgorithm {
    /// [`backtracking_search`].
    #[default]
    #[display("backtracking")]
    Backtracking,
    /// [`depth_first_search`] over the CSP's search space.
    #[display("dfs")]
    Dfs,
    /// [`best_first_search`] ranking nodes by the number of unassigned
    /// variables alone.
    #[display("best_first")]
    BestFirst,
}

impl CspAlgorithm {
    pub const ALL: [CspAlgorithm; 3] = [
        CspAlgorithm::Backtracking,
        CspAlgorithm::Dfs,
        CspAlgorithm::BestFirst,
    ];
}

impl FromStr for CspAlgorithm {
    type Err = SearchError;

    /// ```
    /// use statespace::CspAlgorithm;
    ///
    /// assert_eq!("dfs".parse(), Ok(CspAlgorithm::Dfs));
    /// assert!("simulated_annealing".parse::<CspAlgorithm>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backtracking" => Ok(CspAlgorithm::Backtracking),
            "dfs" => Ok(CspAlgorithm::Dfs),
            "best_first" => Ok(CspAlgorithm::BestFirst),
            _ => Err(SearchError::UnrecognizedAlgorithm(s.to_string())),
        }
    }
}

/// Solves `problem` with `algorithm`.
///
/// The graph-search algorithms get an empty assignment as goal, which the
/// CSP's goal test ignores.
pub fn csp_search<V, C>(
    problem: &CspProblem<V, C>,
    algorithm: CspAlgorithm,
    verbose: bool,
) -> Option<Assignment<V>>
where
    V: Value,
    C: Constraint<V>,
{
    let initial = problem.initial_state();
    let goal = CspState::new();

    let node = match algorithm {
        CspAlgorithm::Backtracking => return backtracking_search(problem, verbose),
        CspAlgorithm::Dfs => depth_first_search(problem, initial, &goal, verbose),
        CspAlgorithm::BestFirst => best_first_search(
            problem,
            initial,
            &goal,
            |n: &CspNode<V>, g: &CspState<V>| problem.heuristic(n.state(), g),
            verbose,
        ),
    };
    node.map(|n| n.state().clone().into_assignment())
}

/// [`csp_search`] with the algorithm given by name.
pub fn csp_search_by_name<V, C>(
    problem: &CspProblem<V, C>,
    algorithm: &str,
    verbose: bool,
) -> Result<Option<Assignment<V>>, SearchError>
where
    V: Value,
    C: Constraint<V>,
{
    let algorithm = algorithm.parse::<CspAlgorithm>()?;
    Ok(csp_search(problem, algorithm, verbose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::map_coloring::NotEqualConstraint;
    use crate::problems::map_coloring::australia;

    type Xy = CspProblem<u8, NotEqualConstraint>;

    /// `X, Y ∈ {1, 2}` with `X != Y`.
    fn x_ne_y() -> Xy {
        let c: NotEqualConstraint = [("X", "Y")].into_iter().collect();
        CspProblem::new(["X", "Y"], [("X", vec![1, 2]), ("Y", vec![1, 2])], c).unwrap()
    }

    fn expected(pairs: &[(&str, u8)]) -> Assignment<u8> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn backtracking_first_solution() {
        let solution = backtracking_search(&x_ne_y(), false).unwrap();
        assert_eq!(solution, expected(&[("X", 1), ("Y", 2)]));
    }

    #[test]
    fn every_algorithm_solves_x_ne_y() {
        let p = x_ne_y();
        for algorithm in CspAlgorithm::ALL {
            let solution = csp_search(&p, algorithm, false).unwrap();
            assert_eq!(solution.len(), 2);
            assert_ne!(solution["X"], solution["Y"]);
            assert!(p.is_complete_assignment_consistent(&solution));
        }
    }

    #[test]
    fn unsatisfiable() {
        let c: NotEqualConstraint = [("X", "Y")].into_iter().collect();
        let p: Xy = CspProblem::new(["X", "Y"], [("X", vec![1]), ("Y", vec![1])], c).unwrap();
        for algorithm in CspAlgorithm::ALL {
            assert_eq!(csp_search(&p, algorithm, true), None);
        }
    }

    #[test]
    fn counts_visits_and_backtracks() {
        let p = x_ne_y();
        let mut search = Backtracking::new(&p, false);
        assert!(search.recurse(&Node::root(p.initial_state())).is_some());
        assert_eq!((search.visited, search.backtracks), (3, 0));

        // `X = 1` leaves `Y` without values and gets undone.
        let c: NotEqualConstraint = [("X", "Y")].into_iter().collect();
        let p: Xy = CspProblem::new(["X", "Y"], [("X", vec![1]), ("Y", vec![1])], c).unwrap();
        let mut search = Backtracking::new(&p, true);
        assert!(search.recurse(&Node::root(p.initial_state())).is_none());
        assert_eq!((search.visited, search.backtracks), (2, 1));
    }

    #[test]
    fn verbosity_does_not_change_the_answer() {
        let p = australia(&["red", "green", "blue"]).unwrap();
        assert_eq!(backtracking_search(&p, false), backtracking_search(&p, true));
        for algorithm in CspAlgorithm::ALL {
            assert_eq!(
                csp_search(&p, algorithm, false),
                csp_search(&p, algorithm, true)
            );
        }
    }

    #[test]
    fn no_variables_is_trivially_solved() {
        let p: Xy = CspProblem::new(
            Vec::<String>::new(),
            Vec::<(String, Vec<u8>)>::new(),
            NotEqualConstraint::new(),
        )
        .unwrap();
        assert_eq!(backtracking_search(&p, false), Some(Assignment::new()));
    }

    #[test]
    fn colours_australia() {
        let p = australia(&["red", "green", "blue"]).unwrap();
        for algorithm in CspAlgorithm::ALL {
            let solution = csp_search(&p, algorithm, false).unwrap();
            assert!(p.is_complete_assignment_consistent(&solution));
            assert_ne!(solution["SA"], solution["NSW"]);
        }
        assert!(backtracking_search(&australia(&["red", "green"]).unwrap(), false).is_none());
    }

    #[test]
    fn dispatch_by_name() {
        let p = x_ne_y();
        for algorithm in CspAlgorithm::ALL {
            let by_name = csp_search_by_name(&p, &algorithm.to_string(), false).unwrap();
            assert_eq!(by_name, csp_search(&p, algorithm, false));
        }
        assert_eq!(
            csp_search_by_name(&p, "simulated_annealing", false),
            Err(SearchError::UnrecognizedAlgorithm(
                "simulated_annealing".to_string()
            ))
        );
    }
}
