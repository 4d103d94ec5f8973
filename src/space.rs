use std::fmt::Debug;
use std::hash::Hash;

/// A configuration of a search space.
///
/// States are values. Drivers clone and compare them, and use them as keys of
/// the explored set, but never mutate them in place.
pub trait State: Clone + Debug + Eq + Hash {}
impl<T> State for T where T: Clone + Debug + Eq + Hash {}

/// A transition between two states.
pub trait Action: Clone + Debug {}
impl<T> Action for T where T: Clone + Debug {}
