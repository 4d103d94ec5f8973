use crate::cost::Cost;
use crate::cost::UNIT_COST;
use crate::cost::ZERO_COST;
use crate::error::SearchError;
use crate::space::Action;
use crate::space::State;

/// A search problem over an implicit graph of states.
///
/// States and transitions are generated lazily through `actions` and `result`,
/// so the space may be infinite. Everything else has a default:
///
/// - `goal_test` compares against the goal state.
/// - `path_cost` adds one per step.
/// - `heuristic` is zero, which is admissible and turns A* into uniform-cost
///   search.
///
/// Step costs must be non-negative, and A* is only optimal with an admissible
/// and consistent heuristic. Neither is checked.
pub trait Problem<St, A>
where
    St: State,
    A: Action,
{
    /// Legal transitions from `state`.
    ///
    /// Drivers explore them in the returned order.
    fn actions(&self, state: &St) -> Vec<A>;

    /// The state reached by applying `action` on `state`.
    fn result(&self, state: &St, action: &A) -> St;

    fn goal_test(&self, state: &St, goal: &St) -> bool {
        state == goal
    }

    /// The cost of reaching `to` from the root, given the cost of reaching
    /// `from` and the `action` taken.
    fn path_cost(&self, cost: Cost, _from: &St, _action: &A, _to: &St) -> Cost {
        cost + UNIT_COST
    }

    /// Estimated remaining cost from `state` to `goal`.
    fn heuristic(&self, _state: &St, _goal: &St) -> Cost {
        ZERO_COST
    }

    /// Renders a state for humans.
    fn view_state(&self, _state: &St) -> Result<String, SearchError> {
        Err(SearchError::Unimplemented {
            capability: "view_state",
        })
    }
}
