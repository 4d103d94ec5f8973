use std::rc::Rc;

use log::log;
use rustc_hash::FxHashSet;

use crate::algorithms::log_summary;
use crate::cost::Cost;
use crate::debug::step_level;
use crate::frontier::PriorityQueue;
use crate::node::Node;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::State;

/// Graph search expanding the node with the lowest `f(node, goal)` first.
///
/// Nodes are goal-tested when popped. Entries whose state was explored in the
/// meantime are dropped, and children are only queued if their state is not
/// explored yet.
///
/// Queued entries are never re-ranked. Reaching a queued state through a
/// cheaper path adds another entry for it, and whichever copy pops first
/// wins. With a consistent heuristic that is the cheapest one.
pub fn best_first_search<P, St, A, F>(
    problem: &P,
    initial: St,
    goal: &St,
    f: F,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A> + ?Sized,
    St: State,
    A: Action,
    F: Fn(&Node<St, A>, &St) -> Cost,
{
    run("Best-first search", problem, initial, goal, f, verbose)
}

/// Best-first search on `h(n)` alone.
///
/// Ignores the cost paid so far, so it's fast but not optimal.
pub fn greedy_best_first_search<P, St, A>(
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
    run(
        "Greedy best-first search",
        problem,
        initial,
        goal,
        |n: &Node<St, A>, g: &St| problem.heuristic(n.state(), g),
        verbose,
    )
}

/// Best-first search on `g(n)`.
///
/// Optimal with non-negative step costs.
pub fn uniform_cost_search<P, St, A>(
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
    run(
        "Uniform-cost search",
        problem,
        initial,
        goal,
        |n: &Node<St, A>, _g: &St| n.path_cost(),
        verbose,
    )
}

/// Best-first search on `f(n) = g(n) + h(n)`.
///
/// Optimal when the heuristic is admissible and consistent.
pub fn astar_search<P, St, A>(
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
    run(
        "A* search",
        problem,
        initial,
        goal,
        |n: &Node<St, A>, g: &St| n.path_cost() + problem.heuristic(n.state(), g),
        verbose,
    )
}

fn run<P, St, A, F>(
    algorithm: &str,
    problem: &P,
    initial: St,
    goal: &St,
    f: F,
    verbose: bool,
) -> Option<Rc<Node<St, A>>>
where
    P: Problem<St, A> + ?Sized,
    St: State,
    A: Action,
    F: Fn(&Node<St, A>, &St) -> Cost,
{
    #[cfg(feature = "coz_profile")]
    coz::scope!("BestFirstSearch");

    let level = step_level(verbose);
    log::debug!("{algorithm}: {initial:?} -> {goal:?}");

    let root = Node::root(initial);
    let mut frontier = PriorityQueue::<St, A>::new();
    let root_f = f(&root, goal);
    frontier.put_with_priority(root, root_f);
    let mut explored = FxHashSet::<St>::default();
    let mut popped = 0usize;

    while let Some((rank, node)) = frontier.get_ranked() {
        #[cfg(feature = "coz_profile")]
        coz::scope!("NodeExpansion");

        popped += 1;
        log!(
            level,
            "{popped}. Current node: {node:?}, f(n)={} (g={}, depth={})",
            rank.priority(),
            node.path_cost(),
            node.depth()
        );

        if problem.goal_test(node.state(), goal) {
            #[cfg(feature = "coz_profile")]
            coz::progress!("GoalFound");
            log!(level, "Goal found: {node:?}");
            log_summary(algorithm, popped, explored.len(), true);
            return Some(node);
        }

        if explored.contains(node.state()) {
            // A stale entry, the state was reached through a better one.
            continue;
        }
        explored.insert(node.state().clone());

        for child in node.expand(problem) {
            if explored.contains(child.state()) {
                continue;
            }
            let child_f = f(&child, goal);
            log!(level, "  -> Queued {:?} with f(n)={child_f}", child.state());
            frontier.put_with_priority(child, child_f);
        }
        log!(level, " :: {frontier:?}");
    }

    log!(level, "No solution");
    log_summary(algorithm, popped, explored.len(), false);
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::weighted_graph::WeightedGraph;

    /// `s` reaches `t` directly at cost 10 or through `a` at cost 2 + 2.
    ///
    /// Estimates are exact, and so admissible and consistent.
    fn detour() -> WeightedGraph<char> {
        let mut g = WeightedGraph::new();
        g.add_edge('s', 't', 10.0)
            .add_edge('s', 'a', 2.0)
            .add_edge('a', 't', 2.0);
        g.with_estimates([('s', 4.0), ('a', 2.0), ('t', 0.0)])
    }

    fn states(n: &Node<char, char>) -> String {
        n.path().iter().map(|n| *n.state()).collect()
    }

    #[test]
    fn uniform_cost_is_optimal() {
        let n = uniform_cost_search(&detour(), 's', &'t', false).unwrap();
        assert_eq!(n.path_cost(), 4.0);
        assert_eq!(states(&n), "sat");
    }

    #[test]
    fn astar_is_optimal() {
        let n = astar_search(&detour(), 's', &'t', false).unwrap();
        assert_eq!(n.path_cost(), 4.0);
        assert_eq!(n.solution(), vec!['a', 't']);
    }

    #[test]
    fn greedy_follows_the_heuristic() {
        let mut g = WeightedGraph::new();
        g.add_edge('s', 't', 10.0)
            .add_edge('s', 'a', 2.0)
            .add_edge('a', 't', 2.0);
        // Overestimates `a`, so greedy goes straight for `t`.
        let g = g.with_estimates([('s', 4.0), ('a', 9.0), ('t', 0.0)]);
        let n = greedy_best_first_search(&g, 's', &'t', false).unwrap();
        assert_eq!(states(&n), "st");
        assert_eq!(n.path_cost(), 10.0);
    }

    #[test]
    fn ties_break_in_insertion_order() {
        // Two equally cheap routes, the one listed first wins.
        let mut g = WeightedGraph::new();
        g.add_edge('s', 'x', 1.0)
            .add_edge('s', 'y', 1.0)
            .add_edge('x', 't', 1.0)
            .add_edge('y', 't', 1.0);
        for _ in 0..8 {
            let n = uniform_cost_search(&g, 's', &'t', false).unwrap();
            assert_eq!(states(&n), "sxt");
        }
    }

    #[test]
    fn generic_form_takes_any_scoring() {
        let g = detour();
        let ucs = uniform_cost_search(&g, 's', &'t', false).unwrap();
        let custom =
            best_first_search(&g, 's', &'t', |n: &Node<char, char>, _| n.path_cost(), false)
                .unwrap();
        assert_eq!(ucs.solution(), custom.solution());

        // Most expensive first, the direct edge is listed first and wins.
        let worst =
            best_first_search(&g, 's', &'t', |n: &Node<char, char>, _| -n.path_cost(), false)
                .unwrap();
        assert_eq!(states(&worst), "st");
        assert_eq!(worst.path_cost(), 10.0);
    }

    #[test]
    fn exhausted_frontier() {
        let g = detour();
        assert!(uniform_cost_search(&g, 't', &'s', false).is_none());
        assert!(astar_search(&g, 'a', &'s', true).is_none());
        assert!(greedy_best_first_search(&g, 's', &'z', false).is_none());
    }

    #[test]
    fn verbosity_does_not_change_the_answer() {
        let g = detour();
        let quiet = astar_search(&g, 's', &'t', false).unwrap();
        let loud = astar_search(&g, 's', &'t', true).unwrap();
        assert_eq!(quiet.solution(), loud.solution());
        assert_eq!(quiet.path_cost(), loud.path_cost());

        let quiet = greedy_best_first_search(&g, 's', &'t', false).unwrap();
        let loud = greedy_best_first_search(&g, 's', &'t', true).unwrap();
        assert_eq!(quiet.solution(), loud.solution());
    }

    #[test]
    fn stale_entries_are_skipped() {
        // `b` is queued at cost 5 from `s`, then again at cost 2 via `a`.
        let mut g = WeightedGraph::new();
        g.add_edge('s', 'b', 5.0)
            .add_edge('s', 'a', 1.0)
            .add_edge('a', 'b', 1.0)
            .add_edge('b', 't', 1.0);
        let n = uniform_cost_search(&g, 's', &'t', false).unwrap();
        assert_eq!(n.path_cost(), 3.0);
        assert_eq!(states(&n), "sabt");
    }
}
