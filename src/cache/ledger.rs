//! Access-Order Ledger Module
//!
//! Tracks key recency for LRU eviction.
//!
//! Keys form a doubly-linked list held in an arena, with a hash index from
//! key to node handle, so `touch`, `remove` and `evict_oldest` are all O(1)
//! rather than a linear scan of the order:
//! - Head = least recently used (next eviction victim)
//! - Tail = most recently used

use std::collections::HashMap;

use generational_arena::{Arena, Index};

// == Ledger Node ==
#[derive(Debug)]
struct Node {
    key: String,
    prev: Option<Index>,
    next: Option<Index>,
}

// == Access Ledger ==
/// Ordered sequence of keys, oldest-accessed first, newest-accessed last.
///
/// Every key appears at most once; touching an existing key moves it to the
/// tail. The cache store keeps this ledger in bijection with its entry map.
#[derive(Debug, Default)]
pub struct AccessLedger {
    /// Arena holding all list nodes
    nodes: Arena<Node>,
    /// Key to node handle, for O(1) touch/remove
    lookup: HashMap<String, Index>,
    /// Oldest-accessed key
    head: Option<Index>,
    /// Newest-accessed key
    tail: Option<Index>,
}

impl AccessLedger {
    // == Constructor ==
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used (moves to tail).
    ///
    /// If the key is already tracked it is unlinked first, so no key ever
    /// appears twice. New keys are appended at the tail.
    pub fn touch(&mut self, key: &str) {
        if let Some(&index) = self.lookup.get(key) {
            if self.tail != Some(index) {
                self.unlink(index);
                self.push_tail_node(index);
            }
        } else {
            let index = self.nodes.insert(Node {
                key: key.to_string(),
                prev: None,
                next: None,
            });
            self.lookup.insert(key.to_string(), index);
            self.push_tail_node(index);
        }
    }

    // == Remove ==
    /// Removes a key from the ledger.
    ///
    /// Returns false (and does nothing) if the key is not tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.lookup.remove(key) {
            Some(index) => {
                self.unlink(index);
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    ///
    /// Returns None if the ledger is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let index = self.head?;
        self.unlink(index);
        let node = self.nodes.remove(index)?;
        self.lookup.remove(&node.key);
        Some(node.key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.head.map(|index| self.nodes[index].key.as_str())
    }

    // == Peek Newest ==
    /// Returns the most recently used key without removing it.
    pub fn peek_newest(&self) -> Option<&str> {
        self.tail.map(|index| self.nodes[index].key.as_str())
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup.contains_key(key)
    }

    // == Clear ==
    /// Drops every tracked key.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.lookup.clear();
        self.head = None;
        self.tail = None;
    }

    // == List Plumbing ==
    /// Detaches a node from the list without touching the arena or index.
    fn unlink(&mut self, index: Index) {
        let (prev, next) = {
            let node = &self.nodes[index];
            (node.prev, node.next)
        };

        match prev {
            Some(prev_idx) => self.nodes[prev_idx].next = next,
            None => self.head = next,
        }
        match next {
            Some(next_idx) => self.nodes[next_idx].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Appends an already-allocated node at the tail.
    fn push_tail_node(&mut self, index: Index) {
        let old_tail = self.tail;
        {
            let node = &mut self.nodes[index];
            node.prev = old_tail;
            node.next = None;
        }
        if let Some(old_tail_idx) = old_tail {
            self.nodes[old_tail_idx].next = Some(index);
        }
        self.tail = Some(index);
        if self.head.is_none() {
            self.head = Some(index);
        }
    }
}
