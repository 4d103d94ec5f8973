/// Cumulative (`g`) and estimated (`h`) path costs.
///
/// Costs must be non-negative. Uniform-cost search and A* rely on it for
/// optimality but never check it.
pub type Cost = f64;

/// The cost of the empty path.
pub const ZERO_COST: Cost = 0.0;
/// The default cost of a single step.
pub const UNIT_COST: Cost = 1.0;
