// Bounded undo/redo over erase-mask snapshots.
// One snapshot per gesture (taken at contact-down) or per clear, so a single
// undo reverts a whole stroke rather than one dab.

use std::collections::VecDeque;

use crate::types::EraseMask;

/// Default number of steps kept on each stack.
pub const DEFAULT_CAPACITY: usize = 20;

/// LIFO stack with a fixed capacity that drops its oldest entry when full.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedStack<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { items: VecDeque::with_capacity(capacity), capacity }
    }

    /// Push on top. Returns the evicted bottom entry if the stack was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.evict_oldest() } else { None };
        self.items.push_back(item);
        evicted
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    pub fn evict_oldest(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Undo and redo stacks for the erase mask.
#[derive(Debug, Clone)]
pub struct History {
    undo: BoundedStack<Vec<u8>>,
    redo: BoundedStack<Vec<u8>>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self { undo: BoundedStack::new(capacity), redo: BoundedStack::new(capacity) }
    }

    /// Record `current` before an edit. Any new edit invalidates forward history.
    pub fn snapshot(&mut self, current: &EraseMask) {
        self.undo.push(current.alpha.clone());
        self.redo.clear();
    }

    /// Step back one edit. Returns false (and leaves `current` alone) if there is nothing to undo.
    pub fn undo(&mut self, current: &mut EraseMask) -> bool {
        let Some(prev) = self.undo.pop() else { return false };
        let now = std::mem::replace(&mut current.alpha, prev);
        self.redo.push(now);
        true
    }

    /// Step forward one undone edit. Returns false if there is nothing to redo.
    pub fn redo(&mut self, current: &mut EraseMask) -> bool {
        let Some(next) = self.redo.pop() else { return false };
        let now = std::mem::replace(&mut current.alpha, next);
        self.undo.push(now);
        true
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}
