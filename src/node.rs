use std::hash::Hash;
use std::hash::Hasher;
use std::rc::Rc;

use crate::cost::Cost;
use crate::cost::ZERO_COST;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::State;

/// A node of the search tree.
///
/// Nodes only point up to their parent, which they share through an `Rc`.
/// Siblings and frontier entries reuse the same ancestor chain instead of
/// copying it, and a chain is freed once no frontier entry or returned
/// solution references it.
///
/// Nodes are compared and hashed by their state alone. Two nodes reaching the
/// same state through different paths are the same node as far as the
/// explored set is concerned.
pub struct Node<St, A>
where
    St: State,
    A: Action,
{
    state: St,
    /// The parent node and the action that led from it to this node.
    ///
    /// `None` only for the root.
    parent: Option<(Rc<Node<St, A>>, A)>,
    /// Cost of the path from the root (`g`).
    path_cost: Cost,
    depth: usize,
}

impl<St, A> Node<St, A>
where
    St: State,
    A: Action,
{
    #[must_use]
    pub fn root(state: St) -> Rc<Self> {
        Rc::new(Self {
            state,
            parent: None,
            path_cost: ZERO_COST,
            depth: 0,
        })
    }

    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn parent(&self) -> Option<&Rc<Node<St, A>>> {
        self.parent.as_ref().map(|(p, _)| p)
    }
    /// The action that produced this node, `None` for the root.
    pub fn action(&self) -> Option<&A> {
        self.parent.as_ref().map(|(_, a)| a)
    }
    pub fn path_cost(&self) -> Cost {
        self.path_cost
    }
    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Nodes reachable in one step, in the order the problem lists actions.
    #[must_use]
    pub fn expand<P>(self: &Rc<Self>, problem: &P) -> Vec<Rc<Self>>
    where
        P: Problem<St, A> + ?Sized,
    {
        problem
            .actions(&self.state)
            .into_iter()
            .map(|a| self.child_node(problem, a))
            .collect()
    }

    /// The node reached by taking `action` from this node.
    #[must_use]
    pub fn child_node<P>(self: &Rc<Self>, problem: &P, action: A) -> Rc<Self>
    where
        P: Problem<St, A> + ?Sized,
    {
        let next_state = problem.result(&self.state, &action);
        let path_cost = problem.path_cost(self.path_cost, &self.state, &action, &next_state);
        let child = Self {
            state: next_state,
            parent: Some((Rc::clone(self), action)),
            path_cost,
            depth: self.depth + 1,
        };
        child.verify();
        Rc::new(child)
    }

    /// Nodes from the root down to this one.
    #[must_use]
    pub fn path(&self) -> Vec<&Self> {
        let mut path = vec![self];
        let mut node = self;
        while let Some((parent, _)) = &node.parent {
            debug_assert_eq!(parent.depth + 1, node.depth);
            node = &**parent;
            path.push(node);
        }
        path.reverse();
        path
    }

    /// Actions leading from the root to this node.
    #[must_use]
    pub fn solution(&self) -> Vec<A> {
        let mut actions = Vec::with_capacity(self.depth);
        let mut node = self;
        while let Some((parent, a)) = &node.parent {
            actions.push(a.clone());
            node = &**parent;
        }
        actions.reverse();
        actions
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify(&self) {
        if let Some((parent, _)) = &self.parent {
            debug_assert_eq!(parent.depth + 1, self.depth);
            debug_assert!(
                parent.path_cost <= self.path_cost,
                "Path cost decreased from {} to {} reaching {:?}. Negative step costs are not supported",
                parent.path_cost,
                self.path_cost,
                self.state,
            );
        } else {
            debug_assert_eq!(self.depth, 0);
        }
    }
}

impl<St, A> PartialEq for Node<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.state.eq(&other.state)
    }
}
impl<St, A> Eq for Node<St, A>
where
    St: State,
    A: Action,
{
}

impl<St, A> Hash for Node<St, A>
where
    St: State,
    A: Action,
{
    fn hash<H: Hasher>(&self, h: &mut H) {
        self.state.hash(h)
    }
}

impl<St, A> Drop for Node<St, A>
where
    St: State,
    A: Action,
{
    /// Releases the ancestors this node held last, iteratively.
    ///
    /// The derived drop would recurse once per ancestor and overflow the stack
    /// on deep paths.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some((node, _action)) = parent {
            parent = Rc::into_inner(node).and_then(|mut node| node.parent.take());
        }
    }
}

impl<St, A> std::fmt::Debug for Node<St, A>
where
    St: State,
    A: Action,
{
    // Ancestors are left out, they are reachable through `path()`.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "<Node {:?}>", self.state)
    }
}
