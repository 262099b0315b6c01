//! Hash set backing `distinct`, `union`, `intersect` and `except`.
//!
//! The table is a bucket array pointing into a slot array. Each bucket holds
//! a 1-based slot index (0 means empty) and slots chain through `next`.
//! Removed slots go onto a free list and are reused before the slot array
//! grows.

use tracing::trace;

use crate::comparer::{masked_hash, DefaultEq, EqualityComparer};

const INITIAL_CAPACITY: usize = 7;

#[derive(Debug, Clone)]
struct Slot<T> {
    hash: u32,
    value: Option<T>,
    next: Option<usize>,
}

/// Hash set with chained buckets and a free list.
#[derive(Debug, Clone)]
pub struct Set<T, C = DefaultEq> {
    buckets: Vec<usize>,
    slots: Vec<Slot<T>>,
    free_list: Option<usize>,
    len: usize,
    comparer: C,
}

impl<T, C> Set<T, C>
where
    C: EqualityComparer<T>,
{
    /// Creates an empty set using `comparer`.
    pub fn new(comparer: C) -> Self {
        Set {
            buckets: vec![0; INITIAL_CAPACITY],
            slots: Vec::with_capacity(INITIAL_CAPACITY),
            free_list: None,
            len: 0,
            comparer,
        }
    }

    /// Number of values in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value`; returns `false` if an equal value was already present.
    pub fn add(&mut self, value: T) -> bool {
        let hash = masked_hash(&self.comparer, &value);
        if self.find(&value, hash).is_some() {
            return false;
        }

        let index = match self.free_list {
            Some(free) => {
                self.free_list = self.slots[free].next;
                free
            }
            None => {
                if self.slots.len() == self.buckets.len() {
                    self.resize();
                }
                self.slots.push(Slot {
                    hash,
                    value: None,
                    next: None,
                });
                self.slots.len() - 1
            }
        };

        let bucket = self.bucket_of(hash);
        self.slots[index] = Slot {
            hash,
            value: Some(value),
            next: Self::slot_index(self.buckets[bucket]),
        };
        self.buckets[bucket] = index + 1;
        self.len += 1;
        true
    }

    /// Returns `true` if an equal value is present.
    pub fn contains(&self, value: &T) -> bool {
        let hash = masked_hash(&self.comparer, value);
        self.find(value, hash).is_some()
    }

    /// Removes the value equal to `value`; returns `true` if one was present.
    pub fn remove(&mut self, value: &T) -> bool {
        let hash = masked_hash(&self.comparer, value);
        let bucket = self.bucket_of(hash);
        let mut previous: Option<usize> = None;
        let mut current = Self::slot_index(self.buckets[bucket]);

        while let Some(index) = current {
            let slot = &self.slots[index];
            let matches = slot.hash == hash
                && slot
                    .value
                    .as_ref()
                    .is_some_and(|stored| self.comparer.equals(stored, value));
            if matches {
                let next = slot.next;
                match previous {
                    None => self.buckets[bucket] = next.map_or(0, |n| n + 1),
                    Some(prev) => self.slots[prev].next = next,
                }
                let slot = &mut self.slots[index];
                slot.value = None;
                slot.next = self.free_list;
                self.free_list = Some(index);
                self.len -= 1;
                return true;
            }
            previous = Some(index);
            current = slot.next;
        }
        false
    }

    fn find(&self, value: &T, hash: u32) -> Option<usize> {
        let mut current = Self::slot_index(self.buckets[self.bucket_of(hash)]);
        while let Some(index) = current {
            let slot = &self.slots[index];
            if slot.hash == hash {
                if let Some(stored) = &slot.value {
                    if self.comparer.equals(stored, value) {
                        return Some(index);
                    }
                }
            }
            current = slot.next;
        }
        None
    }

    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    fn slot_index(bucket_entry: usize) -> Option<usize> {
        bucket_entry.checked_sub(1)
    }

    fn resize(&mut self) {
        let new_size = self.slots.len() * 2 + 1;
        trace!(from = self.buckets.len(), to = new_size, "resizing set");
        let mut buckets = vec![0; new_size];
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let bucket = slot.hash as usize % new_size;
            slot.next = Self::slot_index(buckets[bucket]);
            buckets[bucket] = index + 1;
        }
        self.buckets = buckets;
        self.slots.reserve(new_size - self.slots.len());
    }
}

impl<T, C> Default for Set<T, C>
where
    C: EqualityComparer<T> + Default,
{
    fn default() -> Self {
        Set::new(C::default())
    }
}
