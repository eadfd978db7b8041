//! Generational slot storage shared by the linked containers.
//!
//! Every node of a [`Tree`](crate::associative::Tree) or a
//! [`List`](crate::sequential::List) lives in an [`Arena`] slot and is linked to
//! its neighbours by slot index. A slot keeps a generation counter that is
//! bumped whenever its occupant is removed, so a handle carrying the index and
//! the generation it was issued with can tell whether it still refers to the
//! same element.
//!
//! Each arena also carries an id drawn from a global counter the first time
//! it stores something, and again after every [`Arena::clear`]. Handles carry
//! that id too, so a handle issued by one container is never accepted by
//! another.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of arena ids. Zero is reserved for an arena that has not stored
/// anything since it was created or cleared.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

fn next_arena_id() -> u64 {
    NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed)
}

// =============================================================================
// Slot Definition
// =============================================================================

#[derive(Clone, Debug)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<usize> },
}

impl<T> Slot<T> {
    const fn generation(&self) -> u32 {
        match self {
            Self::Occupied { generation, .. } | Self::Vacant { generation, .. } => *generation,
        }
    }
}

// =============================================================================
// Arena Definition
// =============================================================================

/// Index-addressed storage with slot reuse and per-slot generations.
///
/// Not `Clone`: two arenas sharing an id would accept each
/// other's handles.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    id: u64,
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    length: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            id: 0,
            slots: Vec::new(),
            free_head: None,
            length: 0,
        }
    }

    /// Id stamped on handles issued by this arena.
    pub(crate) const fn id(&self) -> u64 {
        self.id
    }

    pub(crate) const fn len(&self) -> usize {
        self.length
    }

    /// Stores `value` and returns its slot index.
    pub(crate) fn insert(&mut self, value: T) -> usize {
        if self.id == 0 {
            self.id = next_arena_id();
        }
        self.length += 1;
        match self.free_head {
            Some(index) => {
                let generation = self.slots[index].generation();
                if let Slot::Vacant { next_free, .. } = self.slots[index] {
                    self.free_head = next_free;
                }
                self.slots[index] = Slot::Occupied { generation, value };
                index
            }
            None => {
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    value,
                });
                self.slots.len() - 1
            }
        }
    }

    /// Removes the occupant of `index`, retiring its generation.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant. Linked containers only remove slots they
    /// reached through their own links.
    pub(crate) fn remove(&mut self, index: usize) -> T {
        match self.try_remove(index) {
            Some(value) => value,
            None => panic!("arena slot {index} is vacant"),
        }
    }

    /// Removes the occupant of `index`, returning `None` if the slot is vacant.
    pub(crate) fn try_remove(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let generation = slot.generation().wrapping_add(1);
        let previous = std::mem::replace(
            slot,
            Slot::Vacant {
                generation,
                next_free: self.free_head,
            },
        );
        self.free_head = Some(index);
        self.length -= 1;
        match previous {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Generation stamped on slot `index`, occupied or not.
    pub(crate) fn slot_generation(&self, index: usize) -> u32 {
        self.slots[index].generation()
    }

    /// Generation of the occupant of `index`, if any.
    pub(crate) fn generation(&self, index: usize) -> Option<u32> {
        match self.slots.get(index)? {
            Slot::Occupied { generation, .. } => Some(*generation),
            Slot::Vacant { .. } => None,
        }
    }

    /// Returns `true` if this arena issued `id`, and `index` is still occupied
    /// by the element issued with `generation`.
    pub(crate) fn is_live(&self, id: u64, index: usize, generation: u32) -> bool {
        id != 0 && id == self.id && self.generation(index) == Some(generation)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Drops every occupant and releases the slots.
    ///
    /// The arena takes a fresh id on its next insert, so handles issued before
    /// the call stay stale even though slot indices start over.
    pub(crate) fn clear(&mut self) {
        self.slots = Vec::new();
        self.free_head = None;
        self.length = 0;
        self.id = 0;
    }

    /// Mutable references to every occupant, indexed by slot.
    ///
    /// Vacant slots yield `None`. Callers that need occupants in a link order
    /// take them out of the returned vector by index.
    pub(crate) fn occupants_mut(&mut self) -> Vec<Option<&mut T>> {
        self.slots
            .iter_mut()
            .map(|slot| match slot {
                Slot::Occupied { value, .. } => Some(value),
                Slot::Vacant { .. } => None,
            })
            .collect()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Some(value) => value,
            None => panic!("arena slot {index} is vacant"),
        }
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("arena slot {index} is vacant"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
