//! Ready-made problems.
//!
//! These implement [`Problem`](crate::problem::Problem) for common kinds of
//! search spaces, and serve as demos and benchmarks for the algorithms.

pub mod map_coloring;
pub mod maze_2d;
pub mod weighted_graph;
