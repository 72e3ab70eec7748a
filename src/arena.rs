//! Chunked slab allocator that hands out stable handles.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to a value stored in a `TypedArena<T>`.
///
/// A handle stays valid until the value it refers to is freed. After that the slot may be
/// recycled for another value, so a stale handle must not be used.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
}

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<Entry>),
}

/// An allocator for values of a single type, addressed by `Entry` handles.
///
/// Values are stored in fixed-capacity chunks. When every chunk is full a new one is appended,
/// so values already in the arena are never moved and their handles never change. Freed slots
/// are threaded onto a free list and reused before any new slot is handed out.
///
/// # Examples
///
/// ```
/// use avl_set::arena::TypedArena;
///
/// let mut arena = TypedArena::new(16);
///
/// let a = arena.allocate("a");
/// let b = arena.allocate("b");
/// assert_eq!(arena[a], "a");
/// assert_eq!(arena.len(), 2);
///
/// assert_eq!(arena.free(&b), "b");
/// assert_eq!(arena.get(&b), None);
///
/// // freed slots are handed out again
/// assert_eq!(arena.allocate("c"), b);
/// ```
#[derive(Clone)]
pub struct TypedArena<T> {
    free_head: Option<Entry>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    /// Constructs a new, empty `TypedArena<T>` that grows `chunk_size` slots at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(64);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Error: chunk size must be non-zero.");
        TypedArena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    fn is_valid_entry(&self, entry: &Entry) -> bool {
        self.chunks
            .get(entry.chunk_index)
            .map_or(false, |chunk| entry.block_index < chunk.len())
    }

    /// Moves `value` into the arena and returns the handle that addresses it.
    pub fn allocate(&mut self, value: T) -> Entry {
        self.len += 1;

        if let Some(entry) = self.free_head.take() {
            let slot = &mut self.chunks[entry.chunk_index][entry.block_index];
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => unreachable!(),
            }
            return entry;
        }

        if self.len > self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Slot::Occupied(value));
        Entry {
            chunk_index,
            block_index: chunk.len() - 1,
        }
    }

    /// Removes the value addressed by `entry` from the arena and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `entry` does not address an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_set::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(8);
    /// let x = arena.allocate(7);
    /// assert_eq!(arena.free(&x), 7);
    /// assert!(arena.is_empty());
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        if !self.is_valid_entry(entry) {
            panic!("Error: attempting to free invalid slot.");
        }
        let slot = &mut self.chunks[entry.chunk_index][entry.block_index];
        if let Slot::Vacant(_) = slot {
            panic!("Error: attempting to free vacant slot.");
        }
        match mem::replace(slot, Slot::Vacant(self.free_head.take())) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(*entry);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns a reference to the value addressed by `entry`, or `None` if the slot is vacant or
    /// does not exist.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Slot::Occupied(ref value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the value addressed by `entry`, or `None` if the slot is
    /// vacant or does not exist.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Slot::Occupied(ref mut value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    /// Returns the number of values currently stored in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena stores no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value in the arena and releases its chunks. All outstanding handles become
    /// invalid.
    pub fn clear(&mut self) {
        self.free_head = None;
        self.chunks.clear();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry does not address a value.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry does not address a value.")
    }
}
