//! Generic binary tree container.

use std::fmt;

/// A binary tree node owning its payload and both subtrees.
///
/// Children are exclusively owned; there are no parent links. The tree is
/// never rebalanced, so its depth follows the input geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BspTree<T> {
    data: T,
    left: Option<Box<BspTree<T>>>,
    right: Option<Box<BspTree<T>>>,
}

impl<T> BspTree<T> {
    /// Creates a single node holding `data`.
    pub fn new(data: T) -> Self {
        Self {
            data,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Consumes the node and returns its payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Left (front) child.
    #[inline]
    pub fn left(&self) -> Option<&BspTree<T>> {
        self.left.as_deref()
    }

    /// Right (back) child.
    #[inline]
    pub fn right(&self) -> Option<&BspTree<T>> {
        self.right.as_deref()
    }

    #[inline]
    pub fn left_mut(&mut self) -> Option<&mut BspTree<T>> {
        self.left.as_deref_mut()
    }

    #[inline]
    pub fn right_mut(&mut self) -> Option<&mut BspTree<T>> {
        self.right.as_deref_mut()
    }

    /// Replaces the left child with a new leaf holding `data`, discarding
    /// any previous left subtree.
    pub fn add_left(&mut self, data: T) -> &mut BspTree<T> {
        self.left.insert(Box::new(BspTree::new(data)))
    }

    /// Replaces the right child with a new leaf holding `data`, discarding
    /// any previous right subtree.
    pub fn add_right(&mut self, data: T) -> &mut BspTree<T> {
        self.right.insert(Box::new(BspTree::new(data)))
    }

    /// Sets the left subtree.
    #[inline]
    pub fn set_left(&mut self, node: Option<BspTree<T>>) {
        self.left = node.map(Box::new);
    }

    /// Sets the right subtree.
    #[inline]
    pub fn set_right(&mut self, node: Option<BspTree<T>>) {
        self.right = node.map(Box::new);
    }

    /// Detaches and returns the left subtree.
    pub fn remove_left(&mut self) -> Option<BspTree<T>> {
        self.left.take().map(|node| *node)
    }

    /// Detaches and returns the right subtree.
    pub fn remove_right(&mut self) -> Option<BspTree<T>> {
        self.right.take().map(|node| *node)
    }

    /// Checks if this node has any children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.depth());
        let right = self.right.as_ref().map_or(0, |n| n.depth());
        1 + left.max(right)
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.node_count())
            + self.right.as_ref().map_or(0, |n| n.node_count())
    }

    /// Pre-order iterator over payloads (node, left subtree, right subtree).
    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder { stack: vec![self] }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result
    where
        T: fmt::Debug,
    {
        const INDENT: &str = "    ";
        writeln!(f, "{}[", INDENT.repeat(depth))?;
        if let Some(left) = self.left() {
            left.fmt_indented(f, depth + 1)?;
        }
        writeln!(f, "{}{:?}", INDENT.repeat(depth + 1), self.data)?;
        if let Some(right) = self.right() {
            right.fmt_indented(f, depth + 1)?;
        }
        writeln!(f, "{}]", INDENT.repeat(depth))
    }
}

/// Indented dump: each node is a bracketed block containing its left
/// subtree, its payload, then its right subtree.
impl<T: fmt::Debug> fmt::Display for BspTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Iterator returned by [`BspTree::iter`].
pub struct PreOrder<'a, T> {
    stack: Vec<&'a BspTree<T>>,
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        Some(&node.data)
    }
}

impl<'a, T> IntoIterator for &'a BspTree<T> {
    type Item = &'a T;
    type IntoIter = PreOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
