use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Generational handle used by constraints to refer to bodies they do not own.
///
/// A handle stays valid until the slot it points at is removed; reusing the slot
/// bumps the generation so stale handles stop resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct EntityId {
    index: usize,
    generation: u32,
}

impl EntityId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Slot storage handing out [`EntityId`]s.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    items: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: VecDeque<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            generations: Vec::new(),
            free_list: VecDeque::new(),
        }
    }

    pub fn insert(&mut self, item: T) -> EntityId {
        if let Some(index) = self.free_list.pop_front() {
            self.items[index] = Some(item);
            return EntityId::new(index, self.generations[index]);
        }

        let index = self.items.len();
        self.items.push(Some(item));
        self.generations.push(0);
        EntityId::new(index, 0)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        if !self.is_current(id) {
            return None;
        }
        self.items.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.is_current(id) {
            return None;
        }
        self.items.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Borrows two distinct slots mutably, returned in the order requested.
    pub fn get2_mut(&mut self, id_a: EntityId, id_b: EntityId) -> Option<(&mut T, &mut T)> {
        if id_a.index() == id_b.index() || !self.is_current(id_a) || !self.is_current(id_b) {
            return None;
        }

        let flipped = id_a.index() > id_b.index();
        let (low, high) = if flipped {
            (id_b.index(), id_a.index())
        } else {
            (id_a.index(), id_b.index())
        };
        if high >= self.items.len() {
            return None;
        }

        let (left, right) = self.items.split_at_mut(high);
        let low_slot = left[low].as_mut()?;
        let high_slot = right[0].as_mut()?;

        if flipped {
            Some((high_slot, low_slot))
        } else {
            Some((low_slot, high_slot))
        }
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        if !self.is_current(id) {
            return None;
        }
        let index = id.index();
        let taken = self.items[index].take();
        if taken.is_some() {
            self.generations[index] = self.generations[index].wrapping_add(1);
            self.free_list.push_back(index);
        }
        taken
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter_map(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_current(&self, id: EntityId) -> bool {
        self.generations
            .get(id.index())
            .is_some_and(|&generation| generation == id.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_ids_do_not_resolve_after_slot_reuse() {
        let mut arena = Arena::new();
        let first = arena.insert(1);
        arena.remove(first);
        let second = arena.insert(2);

        assert_eq!(first.index(), second.index());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&2));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn get2_mut_preserves_requested_order() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        let (first, second) = arena.get2_mut(b, a).unwrap();
        assert_eq!((*first, *second), ("b", "a"));
        assert!(arena.get2_mut(a, a).is_none());
    }
}
