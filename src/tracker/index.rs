//! BlockIndex - ordered map from block number to access counter.
//!
//! A red-black tree whose nodes live in a single arena (`Vec<Node>`) and link
//! to each other by slot index. The index owns every counter; nodes are never
//! removed one at a time, only all at once by [`BlockIndex::clear`].
//!
//! # Layout
//! ```text
//!            nodes: Vec<Node>
//!   ┌────────┬────────┬────────┬────────┐
//!   │ 0: 200 │ 1: 100 │ 2: 300 │ 3: 250 │   (insertion order)
//!   └────────┴────────┴────────┴────────┘
//!
//!   root ─▶ 0 (200, black)
//!          ╱            ╲
//!   1 (100, black)   2 (300, black)
//!                      ╱
//!               3 (250, red)
//! ```
//!
//! # Complexity
//! - `get` / `get_mut` / `insert`: O(log n)
//! - `iter`: O(n), ascending block number

use std::cmp::Ordering;

use crate::common::{BlockNumber, Error, Result};
use crate::tracker::alloc::EntryAllocator;
use crate::tracker::BlockCounter;

/// Slot of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct Node {
    counter: BlockCounter,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Arena-backed red-black tree keyed by [`BlockNumber`].
#[derive(Debug, Default)]
pub struct BlockIndex {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl BlockIndex {
    /// Create an empty index with no reserved slots.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create an empty index with `capacity` slots reserved up front.
    ///
    /// # Errors
    /// `Error::OutOfMemory` if the reservation fails.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory {
                context: "creating the hot-block index",
            })?;
        Ok(Self { nodes, root: None })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of entries that fit before the arena must grow.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn get(&self, block: BlockNumber) -> Option<&BlockCounter> {
        self.find(block).map(|id| &self.node(id).counter)
    }

    pub fn get_mut(&mut self, block: BlockNumber) -> Option<&mut BlockCounter> {
        let id = self.find(block)?;
        Some(&mut self.node_mut(id).counter)
    }

    fn find(&self, block: BlockNumber) -> Option<NodeId> {
        let mut link = self.root;
        while let Some(id) = link {
            let node = self.node(id);
            link = match block.cmp(&node.counter.block()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Make room for one more entry through `allocator`.
    ///
    /// Called before [`insert`](Self::insert) on the record path so the push
    /// inside `insert` never allocates.
    pub fn reserve_entry<A: EntryAllocator>(&mut self, allocator: &A) -> Result<()> {
        allocator.try_reserve(&mut self.nodes, 1)
    }

    /// Insert a counter for a block not yet in the index.
    ///
    /// # Errors
    /// `Error::DuplicateKey` if the block is already present. The index is
    /// left untouched.
    pub fn insert(&mut self, counter: BlockCounter) -> Result<()> {
        let block = counter.block();
        let mut parent = None;
        let mut link = self.root;
        let mut is_left = false;

        while let Some(id) = link {
            let node = self.node(id);
            parent = Some(id);
            match block.cmp(&node.counter.block()) {
                Ordering::Less => {
                    is_left = true;
                    link = node.left;
                }
                Ordering::Greater => {
                    is_left = false;
                    link = node.right;
                }
                Ordering::Equal => return Err(Error::DuplicateKey(block)),
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            counter,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });

        match parent {
            None => self.root = Some(id),
            Some(p) if is_left => self.node_mut(p).left = Some(id),
            Some(p) => self.node_mut(p).right = Some(id),
        }

        self.insert_fixup(id);
        Ok(())
    }

    /// Restore red-black properties after linking a red node.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(parent) = self.node(node).parent {
            if self.node(parent).color == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.node(parent).parent else {
                break;
            };

            if self.node(grand).left == Some(parent) {
                let uncle = self.node(grand).right.filter(|&u| self.is_red(u));
                if let Some(uncle) = uncle {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    node = grand;
                    continue;
                }
                if self.node(parent).right == Some(node) {
                    self.rotate_left(parent);
                    node = parent;
                }
                let Some(parent) = self.node(node).parent else {
                    break;
                };
                self.node_mut(parent).color = Color::Black;
                self.node_mut(grand).color = Color::Red;
                self.rotate_right(grand);
            } else {
                let uncle = self.node(grand).left.filter(|&u| self.is_red(u));
                if let Some(uncle) = uncle {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    node = grand;
                    continue;
                }
                if self.node(parent).left == Some(node) {
                    self.rotate_right(parent);
                    node = parent;
                }
                let Some(parent) = self.node(node).parent else {
                    break;
                };
                self.node_mut(parent).color = Color::Black;
                self.node_mut(grand).color = Color::Red;
                self.rotate_left(grand);
            }
        }

        if let Some(root) = self.root {
            self.node_mut(root).color = Color::Black;
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let Some(y) = self.node(x).right else {
            return;
        };
        let y_left = self.node(y).left;

        self.node_mut(x).right = y_left;
        if let Some(child) = y_left {
            self.node_mut(child).parent = Some(x);
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        self.replace_child(x_parent, x, y);

        self.node_mut(y).left = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let Some(y) = self.node(x).left else {
            return;
        };
        let y_right = self.node(y).right;

        self.node_mut(x).left = y_right;
        if let Some(child) = y_right {
            self.node_mut(child).parent = Some(x);
        }

        let x_parent = self.node(x).parent;
        self.node_mut(y).parent = x_parent;
        self.replace_child(x_parent, x, y);

        self.node_mut(y).right = Some(x);
        self.node_mut(x).parent = Some(y);
    }

    /// Point `parent`'s link to `old` (or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                let node = self.node_mut(p);
                if node.left == Some(old) {
                    node.left = Some(new);
                } else {
                    node.right = Some(new);
                }
            }
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Iterate counters in ascending block order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            index: self,
            next: self.root.map(|root| self.leftmost(root)),
            remaining: self.len(),
        }
    }

    /// Mutable access to every counter, in no particular order.
    pub fn counters_mut(&mut self) -> impl Iterator<Item = &mut BlockCounter> + '_ {
        self.nodes.iter_mut().map(|node| &mut node.counter)
    }

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.node(id).right {
            return Some(self.leftmost(right));
        }

        let mut child = id;
        let mut parent = self.node(id).parent;
        while let Some(p) = parent {
            if self.node(p).left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.node(p).parent;
        }
        None
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Remove every entry, releasing the arena. Returns how many were freed.
    pub fn clear(&mut self) -> usize {
        let freed = self.nodes.len();
        self.root = None;
        self.nodes = Vec::new();
        freed
    }

    // ========================================================================
    // Node access
    // ========================================================================

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    fn is_red(&self, id: NodeId) -> bool {
        self.node(id).color == Color::Red
    }
}

/// In-order iterator over a [`BlockIndex`].
pub struct Iter<'a> {
    index: &'a BlockIndex,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a BlockCounter;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.index.successor(id);
        self.remaining -= 1;
        Some(&self.index.node(id).counter)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BlockIndex {
    type Item = &'a BlockCounter;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
