//! Frontiers (open lists) holding nodes waiting to be expanded.
//!
//! The order in which a frontier hands nodes back is what turns the same
//! search loop into depth-first, breadth-first or best-first search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::cost::Cost;
use crate::node::Node;
use crate::rank::Rank;
use crate::space::Action;
use crate::space::State;

pub trait Frontier<St, A>: std::fmt::Debug
where
    St: State,
    A: Action,
{
    fn put(&mut self, node: Rc<Node<St, A>>);
    /// Removes the next node to expand.
    fn get(&mut self) -> Option<Rc<Node<St, A>>>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Last-in-first-out frontier. Drives depth-first search.
pub struct Stack<St, A>
where
    St: State,
    A: Action,
{
    items: Vec<Rc<Node<St, A>>>,
}

impl<St, A> Stack<St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self { items: vec![] }
    }
}

impl<St, A> Default for Stack<St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> Frontier<St, A> for Stack<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn put(&mut self, node: Rc<Node<St, A>>) {
        self.items.push(node);
    }
    #[inline(always)]
    fn get(&mut self) -> Option<Rc<Node<St, A>>> {
        self.items.pop()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<St, A> std::fmt::Debug for Stack<St, A>
where
    St: State,
    A: Action,
{
    /// Lists states in the order they would be popped.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Stack")?;
        f.debug_list()
            .entries(self.items.iter().rev().map(|n| n.state()))
            .finish()
    }
}

/// First-in-first-out frontier. Drives breadth-first search.
pub struct Queue<St, A>
where
    St: State,
    A: Action,
{
    items: VecDeque<Rc<Node<St, A>>>,
}

impl<St, A> Queue<St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<St, A> Default for Queue<St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> Frontier<St, A> for Queue<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn put(&mut self, node: Rc<Node<St, A>>) {
        self.items.push_back(node);
    }
    #[inline(always)]
    fn get(&mut self) -> Option<Rc<Node<St, A>>> {
        self.items.pop_front()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<St, A> std::fmt::Debug for Queue<St, A>
where
    St: State,
    A: Action,
{
    /// Lists states in the order they would be popped.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Queue")?;
        f.debug_list()
            .entries(self.items.iter().map(|n| n.state()))
            .finish()
    }
}

/// A heap entry. Only the rank takes part in the ordering.
struct PriorityQueueEntry<St, A>
where
    St: State,
    A: Action,
{
    rank: Reverse<Rank>,
    node: Rc<Node<St, A>>,
}

impl<St: State, A: Action> PartialEq for PriorityQueueEntry<St, A> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<St: State, A: Action> Eq for PriorityQueueEntry<St, A> {}

impl<St: State, A: Action> PartialOrd for PriorityQueueEntry<St, A> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<St: State, A: Action> Ord for PriorityQueueEntry<St, A> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// Lowest-priority-first frontier. Drives best-first search.
///
/// Entries are ranked by `(priority, insertion order)`, so nodes sharing a
/// priority come out in the order they were put.
///
/// There is no decrease-key. Finding a cheaper path to a queued state adds a
/// second entry and the stale one is skipped by the driver once popped.
pub struct PriorityQueue<St, A>
where
    St: State,
    A: Action,
{
    /// `BinaryHeap` is a max-heap, `Reverse` makes it pop the lowest rank.
    heap: BinaryHeap<PriorityQueueEntry<St, A>>,
    /// The sequence number for the next entry.
    next_sequence: u64,
}

impl<St, A> PriorityQueue<St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn put_with_priority(&mut self, node: Rc<Node<St, A>>, priority: Cost) {
        let rank = Rank::new(priority, self.next_sequence);
        self.next_sequence += 1;
        self.heap.push(PriorityQueueEntry {
            rank: Reverse(rank),
            node,
        });
    }

    /// The rank of the next node to be popped.
    #[must_use]
    pub fn peek_rank(&self) -> Option<Rank> {
        self.heap.peek().map(|e| e.rank.0)
    }

    /// Removes the next node along with its rank.
    pub fn get_ranked(&mut self) -> Option<(Rank, Rc<Node<St, A>>)> {
        self.heap.pop().map(|e| (e.rank.0, e.node))
    }
}

impl<St, A> Default for PriorityQueue<St, A>
where
    St: State,
    A: Action,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A> Frontier<St, A> for PriorityQueue<St, A>
where
    St: State,
    A: Action,
{
    /// Queues `node` using its path cost as priority.
    #[inline(always)]
    fn put(&mut self, node: Rc<Node<St, A>>) {
        let priority = node.path_cost();
        self.put_with_priority(node, priority);
    }
    #[inline(always)]
    fn get(&mut self) -> Option<Rc<Node<St, A>>> {
        self.heap.pop().map(|e| e.node)
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<St, A> std::fmt::Debug for PriorityQueue<St, A>
where
    St: State,
    A: Action,
{
    /// Lists `rank: state` entries in the order they would be popped.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut entries: Vec<&PriorityQueueEntry<St, A>> = self.heap.iter().collect();
        // Descending on `Reverse<Rank>` is ascending on `Rank`.
        entries.sort_by(|l, r| r.cmp(l));
        write!(f, "PriorityQueue")?;
        f.debug_list()
            .entries(
                entries
                    .iter()
                    .map(|e| format!("{}: {:?}", e.rank.0, e.node.state())),
            )
            .finish()
    }
}
