use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use statespace::CspAlgorithm;
use statespace::astar_search;
use statespace::backtracking_search;
use statespace::best_first_search;
use statespace::breadth_first_search;
use statespace::csp::Assignment;
use statespace::csp::CspProblem;
use statespace::csp_search;
use statespace::csp_search_by_name;
use statespace::depth_first_search;
use statespace::problems::maze_2d::Maze2DProblem;
use statespace::problems::weighted_graph::WeightedGraph;
use statespace::uniform_cost_search;
use statespace::Node;
use statespace::Problem;
use statespace::SearchError;

const INSTANCES: u64 = 64;

fn sample_graph() -> WeightedGraph<&'static str> {
    let mut g: WeightedGraph<&str> = [
        ("A", "B", 1.0),
        ("A", "C", 4.0),
        ("B", "C", 2.0),
        ("B", "D", 5.0),
        ("C", "D", 1.0),
    ]
    .into_iter()
    .collect();
    g.add_node("D");
    g
}

fn states<'a>(n: &Node<&'a str, &'a str>) -> Vec<&'a str> {
    n.path().iter().map(|n| *n.state()).collect()
}

#[test]
fn weighted_graph_end_to_end() {
    let g = sample_graph();

    for n in [
        astar_search(&g, "A", &"D", false).unwrap(),
        uniform_cost_search(&g, "A", &"D", false).unwrap(),
    ] {
        assert_eq!(n.path_cost(), 4.0);
        assert_eq!(states(&n), vec!["A", "B", "C", "D"]);
        assert_eq!(n.solution(), vec!["B", "C", "D"]);
    }

    let bfs = breadth_first_search(&g, "A", &"D", false).unwrap();
    assert_eq!(bfs.depth(), 2);
    assert_eq!(*bfs.state(), "D");

    let dfs = depth_first_search(&g, "A", &"D", true).unwrap();
    assert_eq!(*dfs.state(), "D");

    // Default unit costs, so the answer depends only on depth.
    let hops = best_first_search(&g, "A", &"D", |n: &Node<&str, &str>, _| n.depth() as f64, false)
        .unwrap();
    assert_eq!(hops.depth(), 2);
}

#[test]
fn x_ne_y_scenario() {
    let p = CspProblem::new(
        ["X", "Y"],
        [("X", vec![1, 2]), ("Y", vec![1, 2])],
        |variable: &str, value: &i32, assignment: &Assignment<i32>| {
            let other = if variable == "X" { "Y" } else { "X" };
            assignment.get(other) != Some(value)
        },
    )
    .unwrap();

    let solution = backtracking_search(&p, false).unwrap();
    assert_eq!(solution["X"], 1);
    assert_eq!(solution["Y"], 2);

    for algorithm in ["backtracking", "dfs", "best_first"] {
        let solution = csp_search_by_name(&p, algorithm, true).unwrap().unwrap();
        assert_ne!(solution["X"], solution["Y"]);
    }
    assert!(matches!(
        csp_search_by_name(&p, "hill_climbing", false),
        Err(SearchError::UnrecognizedAlgorithm(name)) if name == "hill_climbing"
    ));
}

#[test]
fn csp_rejects_missing_domains() {
    let r = CspProblem::new(
        ["X", "Y"],
        [("X", vec![1])],
        |_: &str, _: &i32, _: &Assignment<i32>| true,
    );
    assert!(matches!(r, Err(SearchError::MissingDomain { .. })));
}

/// Queens on an `n`×`n` board, one variable per column holding its row.
fn queens(n: i32) -> CspProblem<i32, impl Fn(&str, &i32, &Assignment<i32>) -> bool> {
    let variables: Vec<String> = (0..n).map(|c| c.to_string()).collect();
    let domains: Vec<(String, Vec<i32>)> =
        variables.iter().map(|v| (v.clone(), (0..n).collect())).collect();
    CspProblem::new(
        variables,
        domains,
        |column: &str, row: &i32, assignment: &Assignment<i32>| {
            let Ok(column) = column.parse::<i32>() else {
                return false;
            };
            assignment.iter().all(|(other, other_row)| {
                let Ok(other) = other.parse::<i32>() else {
                    return false;
                };
                other == column
                    || (other_row != row && (other_row - row).abs() != (other - column).abs())
            })
        },
    )
    .unwrap()
}

#[test]
fn queens_are_solved_by_every_algorithm() {
    let p = queens(6);
    for algorithm in [
        CspAlgorithm::Backtracking,
        CspAlgorithm::Dfs,
        CspAlgorithm::BestFirst,
    ] {
        let solution = csp_search(&p, algorithm, false).unwrap();
        assert_eq!(solution.len(), 6);
        assert!(p.is_complete_assignment_consistent(&solution));
    }
    assert!(backtracking_search(&queens(3), false).is_none());
}

/// A random directed graph on `0..n` with integer weights, so that path costs
/// add up exactly.
fn random_graph(rng: &mut ChaCha8Rng) -> (WeightedGraph<u32>, u32) {
    let n = rng.random_range(2..24u32);
    let mut g = WeightedGraph::new();
    for from in 0..n {
        g.add_node(from);
        for to in 0..n {
            if from != to && rng.random_bool(0.15) {
                g.add_edge(from, to, f64::from(rng.random_range(1..10u32)));
            }
        }
    }
    (g, n)
}

fn reference_hops(g: &WeightedGraph<u32>, n: u32, from: u32, to: u32) -> Option<usize> {
    let mut hops = vec![None; n as usize];
    hops[from as usize] = Some(0);
    let mut queue = VecDeque::from([from]);
    while let Some(u) = queue.pop_front() {
        let h = hops[u as usize]?;
        for (v, _) in g.neighbours(&u) {
            if hops[*v as usize].is_none() {
                hops[*v as usize] = Some(h + 1);
                queue.push_back(*v);
            }
        }
    }
    hops[to as usize]
}

/// Costs from every node to `to`.
fn reference_costs_to(g: &WeightedGraph<u32>, n: u32, to: u32) -> Vec<f64> {
    let mut cost = vec![f64::INFINITY; n as usize];
    cost[to as usize] = 0.0;
    // Bellman-Ford, small graphs only.
    for _ in 0..n {
        for u in 0..n {
            for (v, w) in g.neighbours(&u) {
                let through = w + cost[*v as usize];
                if through < cost[u as usize] {
                    cost[u as usize] = through;
                }
            }
        }
    }
    cost
}

#[test]
fn bfs_finds_the_fewest_steps() {
    for instance in 0..INSTANCES {
        let mut rng = ChaCha8Rng::seed_from_u64(instance);
        let (g, n) = random_graph(&mut rng);
        let goal = n - 1;

        let found = breadth_first_search(&g, 0, &goal, false).map(|n| n.depth());
        assert_eq!(found, reference_hops(&g, n, 0, goal), "instance {instance}");

        // DFS is not optimal, but finds a goal exactly when one is reachable.
        let dfs = depth_first_search(&g, 0, &goal, false);
        assert_eq!(dfs.is_some(), found.is_some(), "instance {instance}");
    }
}

#[test]
fn ucs_and_astar_find_the_cheapest_path() {
    for instance in 0..INSTANCES {
        let mut rng = ChaCha8Rng::seed_from_u64(instance);
        let (g, n) = random_graph(&mut rng);
        let goal = n - 1;
        let costs = reference_costs_to(&g, n, goal);
        let expected = costs[0].is_finite().then_some(costs[0]);

        let ucs = uniform_cost_search(&g, 0, &goal, false);
        assert_eq!(ucs.as_ref().map(|n| n.path_cost()), expected, "instance {instance}");

        // Without estimates A* is uniform-cost search.
        let blind = astar_search(&g, 0, &goal, false);
        assert_eq!(
            blind.as_ref().map(|n| n.solution()),
            ucs.as_ref().map(|n| n.solution()),
            "instance {instance}"
        );

        // Exact estimates are consistent.
        let informed = g.clone().with_estimates(
            costs
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_finite())
                .map(|(u, c)| (u as u32, *c)),
        );
        let astar = astar_search(&informed, 0, &goal, false);
        assert_eq!(astar.as_ref().map(|n| n.path_cost()), expected, "instance {instance}");

        if let Some(node) = &astar {
            // The solution replays to the goal with the reported cost.
            let mut state = 0;
            let mut cost = 0.0;
            for a in node.solution() {
                let next = informed.result(&state, &a);
                cost = informed.path_cost(cost, &state, &a, &next);
                state = next;
            }
            assert_eq!(state, goal);
            assert_eq!(cost, node.path_cost());
        }
    }
}

#[test]
fn astar_matches_ucs_on_random_mazes() {
    for instance in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(instance);
        let Some(p) = Maze2DProblem::random(&mut rng, 24, 16, 0.3) else {
            continue;
        };
        let ucs = uniform_cost_search(&p, p.start(), &p.goal(), false);
        let astar = astar_search(&p, p.start(), &p.goal(), false);
        match (ucs, astar) {
            (Some(u), Some(a)) => {
                assert!(
                    (u.path_cost() - a.path_cost()).abs() < 1e-9,
                    "instance {instance}: {} != {}",
                    u.path_cost(),
                    a.path_cost()
                );
                assert_eq!(*a.state(), p.goal());
            }
            (None, None) => {}
            (u, a) => panic!("instance {instance}: UCS {u:?} vs A* {a:?}"),
        }
    }
}

/// Counts up to `end`, one step at a time.
struct Line {
    end: u64,
}

impl Problem<u64, u64> for Line {
    fn actions(&self, state: &u64) -> Vec<u64> {
        if *state < self.end { vec![1] } else { vec![] }
    }
    fn result(&self, state: &u64, action: &u64) -> u64 {
        state + action
    }
}

#[test]
fn deep_paths_are_released() {
    const DEPTH: u64 = 1_000_000;
    let line = Line { end: DEPTH };

    let n = breadth_first_search(&line, 0, &DEPTH, false).unwrap();
    assert_eq!(n.depth() as u64, DEPTH);
    drop(n);

    // Fails once the line is exhausted, dropping the whole chain on the way.
    assert!(depth_first_search(&line, 0, &(DEPTH + 1), false).is_none());
}
