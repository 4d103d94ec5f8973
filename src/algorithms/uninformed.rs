use std::rc::Rc;

use log::log;
use rustc_hash::FxHashSet;

use crate::algorithms::log_summary;
use crate::debug::step_level;
use crate::debug::type_name;
use crate::frontier::Frontier;
use crate::frontier::Queue;
use crate::frontier::Stack;
use crate::node::Node;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::State;

/// Graph search whose exploration order is set by `frontier`.
///
/// Nodes are goal-tested when popped. A popped state that was not explored
/// yet is expanded and all of its children are queued, even those whose state
/// is already explored. The explored set only guarantees that no state is
/// expanded twice.
///
/// Returns the goal node, from which `path()` and `solution()` recover the
/// answer, or `None` once the frontier runs dry. On an infinite space without
/// a reachable goal this never returns.
pub fn uninformed_search<P, F, St, A>(
    problem: &P,
    mut frontier: F,
    initial: St,
    goal: &St,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A> + ?Sized,
    F: Frontier<St, A>,
    St: State,
    A: Action,
{
    #[cfg(feature = "coz_profile")]
    coz::scope!("UninformedSearch");

    let level = step_level(verbose);
    let algorithm = format!("Uninformed search ({})", type_name::<F>());
    log::debug!("{algorithm}: {initial:?} -> {goal:?}");

    frontier.put(Node::root(initial));
    let mut explored = FxHashSet::<St>::default();
    let mut popped = 0usize;

    while let Some(node) = frontier.get() {
        #[cfg(feature = "coz_profile")]
        coz::scope!("NodeExpansion");

        popped += 1;
        log!(
            level,
            "{popped}. Current node: {node:?} (g={}, depth={})",
            node.path_cost(),
            node.depth()
        );

        if problem.goal_test(node.state(), goal) {
            #[cfg(feature = "coz_profile")]
            coz::progress!("GoalFound");
            log!(level, "Goal found: {node:?}");
            log_summary(&algorithm, popped, explored.len(), true);
            return Some(node);
        }

        if explored.contains(node.state()) {
            continue;
        }
        explored.insert(node.state().clone());
        log!(level, "  -> Explored {:?}", node.state());

        for child in node.expand(problem) {
            log!(level, "  -> Queued {:?}", child.state());
            frontier.put(child);
        }
        log!(level, " :: {frontier:?}");
    }

    log!(level, "No solution");
    log_summary(&algorithm, popped, explored.len(), false);
    None
}

/// Uninformed search over a FIFO frontier.
///
/// Finds a shallowest goal, which is a cheapest one only when every step
/// costs the same.
pub fn breadth_first_search<P, St, A>(
    problem: &P,
    initial: St,
    goal: &St,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A> + ?Sized,
    St: State,
    A: Action,
{
    uninformed_search(problem, Queue::new(), initial, goal, verbose)
}

/// Uninformed search over a LIFO frontier.
///
/// The last listed action is tried first. No optimality guarantees.
pub fn depth_first_search<P, St, A>(
    problem: &P,
    initial: St,
    goal: &St,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A> + ?Sized,
    St: State,
    A: Action,
{
    uninformed_search(problem, Stack::new(), initial, goal, verbose)
}
