use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod debug;
pub mod error;
pub mod rank;

// Search space and problems
// -------------------------
pub mod cost;
pub mod csp;
pub mod node;
pub mod problem;
pub mod space;

// Data structures
// ---------------
pub mod frontier;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

pub use algorithms::backtracking::CspAlgorithm;
pub use algorithms::backtracking::backtracking_search;
pub use algorithms::backtracking::csp_search;
pub use algorithms::backtracking::csp_search_by_name;
pub use algorithms::best_first::astar_search;
pub use algorithms::best_first::best_first_search;
pub use algorithms::best_first::greedy_best_first_search;
pub use algorithms::best_first::uniform_cost_search;
pub use algorithms::uninformed::breadth_first_search;
pub use algorithms::uninformed::depth_first_search;
pub use algorithms::uninformed::uninformed_search;
pub use error::SearchError;
pub use node::Node;
pub use problem::Problem;
