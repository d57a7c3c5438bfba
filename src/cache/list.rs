//! Recency List Module
//!
//! Doubly linked recency order for LRU eviction, backed by a slot arena.
//!
//! Nodes live in a `Vec` of slots and link to each other through slot
//! indices instead of owned pointers, so the list has no ownership cycles.
//! Freed slots are recycled through a free list, which keeps `push_front`
//! allocation-free once the cache has reached capacity. Front = most
//! recently used, back = least recently used.

// == Node Handle ==
/// Stable handle to a node in the list: the index of its arena slot.
///
/// Handles are internal to the cache; a handle is only valid until the
/// node it names is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

// == Node ==
#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency List ==
/// Intrusive-style doubly linked list over an arena of slots.
#[derive(Debug)]
pub struct RecencyList<T> {
    /// Arena; `None` marks a vacant slot awaiting reuse
    slots: Vec<Option<Node<T>>>,
    /// Indices of vacant slots
    free: Vec<usize>,
    /// Most recently used node
    head: Option<usize>,
    /// Least recently used node
    tail: Option<usize>,
    len: usize,
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates a new empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts a value at the front (most recently used position) and
    /// returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let node = Node {
            value,
            prev: None,
            next: self.head,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        match self.head {
            Some(old_head) => {
                if let Some(n) = self.slots[old_head].as_mut() {
                    n.prev = Some(idx);
                }
            }
            // First node is both head and tail
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
        self.len += 1;
        NodeId(idx)
    }

    // == Move To Front ==
    /// Promotes a node to the front.
    ///
    /// Handles every linkage case explicitly: the node may already be the
    /// head (no-op, also covers a single-element list), the tail of a
    /// longer list, or an interior node.
    pub fn move_to_front(&mut self, id: NodeId) {
        let NodeId(idx) = id;

        // Already at the front; in a one-element list the only node is the head.
        let old_head = match self.head {
            Some(h) if h != idx => h,
            _ => return,
        };

        let (prev, next) = match self.slots[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        // Unlink from the current position. `prev` is always present here
        // because the node is not the head.
        if let Some(p) = prev {
            if let Some(n) = self.slots[p].as_mut() {
                n.next = next;
            }
        }
        match next {
            Some(nx) => {
                if let Some(n) = self.slots[nx].as_mut() {
                    n.prev = prev;
                }
            }
            // Node was the tail; its predecessor becomes the new tail
            None => self.tail = prev,
        }

        // Relink at the front.
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = Some(old_head);
        }
        if let Some(n) = self.slots[old_head].as_mut() {
            n.prev = Some(idx);
        }
        self.head = Some(idx);
    }

    // == Remove ==
    /// Unlinks a node and returns its value, recycling the slot.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let NodeId(idx) = id;
        let node = self.slots.get_mut(idx)?.take()?;

        match node.prev {
            Some(p) => {
                if let Some(n) = self.slots[p].as_mut() {
                    n.next = node.next;
                }
            }
            None => self.head = node.next,
        }
        match node.next {
            Some(nx) => {
                if let Some(n) = self.slots[nx].as_mut() {
                    n.prev = node.prev;
                }
            }
            None => self.tail = node.prev,
        }

        self.free.push(idx);
        self.len -= 1;
        Some(node.value)
    }

    // == Back ==
    /// Returns the handle of the least recently used node.
    pub fn back(&self) -> Option<NodeId> {
        self.tail.map(NodeId)
    }

    // == Access ==
    /// Returns a reference to the value behind a handle.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref().map(|n| &n.value)
    }

    // == Length ==
    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iteration ==
    /// Iterates front to back (most to least recently used).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Consistency Check ==
    /// Verifies structural invariants, for use by tests only: forward and
    /// backward traversals visit exactly `len` nodes, end links are `None`,
    /// and neighbor links agree in both directions.
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        // Forward walk
        let mut seen = 0usize;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            assert!(seen < self.len, "cycle detected in forward traversal");
            let node = self.slots[idx]
                .as_ref()
                .unwrap_or_else(|| panic!("linked slot {idx} is vacant"));
            assert_eq!(node.prev, prev, "prev link mismatch at slot {idx}");
            prev = Some(idx);
            cursor = node.next;
            seen += 1;
        }
        assert_eq!(seen, self.len, "forward traversal length mismatch");
        assert_eq!(self.tail, prev, "tail does not match last forward node");

        // Free list must only name vacant slots
        for &idx in &self.free {
            assert!(self.slots[idx].is_none(), "free slot {idx} is occupied");
        }
        assert_eq!(
            self.len + self.free.len(),
            self.slots.len(),
            "slot accounting mismatch"
        );
    }
}

// == Iterator ==
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.slots[idx].as_ref()?;
        self.cursor = node.next;
        Some((NodeId(idx), &node.value))
    }
}
