use crate::arena::{Entry, TypedArena};
use crate::avl_tree::error::{Error, Result};
use crate::avl_tree::node::Node;
use crate::avl_tree::tree::{self, Arena, Tree};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::result;

const DEFAULT_CHUNK_SIZE: usize = 64;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Insertion, removal and
/// membership tests take `O(log N)` time.
///
/// Nodes are stored in a `TypedArena` owned by the set. Every node also records its parent so
/// that iterators can walk the tree without an auxiliary stack.
///
/// # Examples
/// ```
/// use avl_set::avl_tree::{AvlSet, Error};
///
/// let mut set = AvlSet::new();
/// set.add(0);
/// set.add(3);
/// set.add(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Ok(&0));
/// assert_eq!(set.max(), Ok(&3));
///
/// assert!(set.discard(&0));
/// assert!(!set.discard(&1));
///
/// set.clear();
/// assert_eq!(set.min(), Err(Error::EmptyTree));
/// ```
#[derive(Clone)]
pub struct AvlSet<T> {
    arena: Arena<T>,
    root: Tree,
    len: usize,
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlSet<T>` whose node storage grows by `chunk_size` nodes at a
    /// time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::with_chunk_size(1024);
    /// assert!(set.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        AvlSet {
            arena: TypedArena::new(chunk_size),
            root: None,
            len: 0,
        }
    }

    /// Inserts a value into the set. Returns `false` and leaves the set unchanged if an equal
    /// value is already present.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.add(1));
    /// assert!(!set.add(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn add(&mut self, value: T) -> bool {
        let (root, inserted) = tree::insert(&mut self.arena, self.root, value);
        self.arena[root].parent = None;
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a value from the set. Returns `false` if the value was not present.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// assert!(set.discard(&1));
    /// assert!(!set.discard(&1));
    /// assert!(set.is_empty());
    /// ```
    pub fn discard<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes a value from the set and returns it. Returns `None` if the value was not present.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(String::from("a"));
    /// assert_eq!(set.take("a"), Some(String::from("a")));
    /// assert_eq!(set.take("a"), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = tree::remove(&mut self.arena, self.root, value);
        if let Some(root) = root {
            self.arena[root].parent = None;
        }
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Checks if a value exists in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::get(&self.arena, self.root, value).is_some()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// set.add(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the minimum value of the set, or `Error::EmptyTree` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::{AvlSet, Error};
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.min(), Err(Error::EmptyTree));
    /// set.add(1);
    /// set.add(3);
    /// assert_eq!(set.min(), Ok(&1));
    /// ```
    pub fn min(&self) -> Result<&T> {
        self.root
            .map(|root| &self.arena[tree::leftmost(&self.arena, root)].value)
            .ok_or(Error::EmptyTree)
    }

    /// Returns the maximum value of the set, or `Error::EmptyTree` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::{AvlSet, Error};
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.max(), Err(Error::EmptyTree));
    /// set.add(1);
    /// set.add(3);
    /// assert_eq!(set.max(), Ok(&3));
    /// ```
    pub fn max(&self) -> Result<&T> {
        self.root
            .map(|root| &self.arena[tree::rightmost(&self.arena, root)].value)
            .ok_or(Error::EmptyTree)
    }

    /// Returns the value stored at the root of the tree, or `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![10, 20, 30].into_iter().collect();
    /// assert_eq!(set.root(), Some(&20));
    /// ```
    pub fn root(&self) -> Option<&T> {
        self.root.map(|root| &self.arena[root].value)
    }

    /// Returns the height of the tree, or `None` if the set is empty. A tree with a single node
    /// has height zero.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.height(), None);
    /// set.add(1);
    /// assert_eq!(set.height(), Some(0));
    /// set.add(2);
    /// assert_eq!(set.height(), Some(1));
    /// ```
    pub fn height(&self) -> Option<usize> {
        self.root.map(|root| self.arena[root].height as usize)
    }

    /// Returns an iterator over the set. The iterator will yield values using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.add(1);
    /// set.add(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            arena: &self.arena,
            front: self.root.map(|root| tree::leftmost(&self.arena, root)),
            back: self.root.map(|root| tree::rightmost(&self.arena, root)),
            remaining: self.len,
        }
    }

    /// Panics if any structural invariant of the tree does not hold: ascending order, balance
    /// factors within one, cached heights, parent links, and the element count.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = (0..100).collect();
    /// set.assert_invariants();
    /// ```
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.arena[root].parent, None, "root has a parent");
        }
        let count = tree::check(&self.arena, self.root, None, None, None);
        assert_eq!(count, self.len, "element count does not match the tree");
        assert_eq!(self.arena.len(), self.len, "arena holds unlinked nodes");
    }
}

impl<T> AvlSet<T>
where
    T: Ord + fmt::Debug,
{
    /// Returns an indented pre-order dump of the tree, one line per node with its value, height
    /// and parent value. Each level is indented by three spaces.
    ///
    /// # Examples
    /// ```
    /// use avl_set::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = vec![1, 2, 3].into_iter().collect();
    /// assert_eq!(
    ///     set.to_debug_string(),
    ///     "2(height: 1), parent:None\n   1(height: 0), parent:2\n   3(height: 0), parent:2\n",
    /// );
    /// ```
    pub fn to_debug_string(&self) -> String {
        let mut ret = String::new();
        tree::write_tree(&self.arena, self.root, 0, &mut ret)
            .expect("Expected writing to a `String` to succeed.");
        ret
    }
}

impl<T> IntoIterator for AvlSet<T>
where
    T: Ord,
{
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let AvlSet { arena, root, len } = self;
        let mut ret = AvlSetIntoIter {
            arena,
            stack: Vec::new(),
            remaining: len,
        };
        ret.push_left_spine(root);
        ret
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a + Ord,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned values.
pub struct AvlSetIntoIter<T> {
    arena: Arena<T>,
    stack: Vec<Entry>,
    remaining: usize,
}

impl<T> AvlSetIntoIter<T> {
    fn push_left_spine(&mut self, mut tree: Tree) {
        while let Some(entry) = tree {
            self.stack.push(entry);
            tree = self.arena[entry].left;
        }
    }
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        let Node { value, right, .. } = self.arena.free(&entry);
        self.push_left_spine(right);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for AvlSetIntoIter<T> {}

impl<T> FusedIterator for AvlSetIntoIter<T> {}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references. It
/// follows parent links between nodes, so creating it is `O(log N)` and it allocates nothing.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    arena: &'a Arena<T>,
    front: Tree,
    back: Tree,
    remaining: usize,
}

impl<'a, T> Clone for AvlSetIter<'a, T> {
    fn clone(&self) -> Self {
        AvlSetIter {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.front?;
        self.front = tree::successor(self.arena, entry);
        self.remaining -= 1;
        Some(&self.arena[entry].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.back?;
        self.back = tree::predecessor(self.arena, entry);
        self.remaining -= 1;
        Some(&self.arena[entry].value)
    }
}

impl<'a, T> ExactSizeIterator for AvlSetIter<'a, T> where T: 'a {}

impl<'a, T> FusedIterator for AvlSetIter<'a, T> where T: 'a {}

impl<T> Default for AvlSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AvlSet<T>
where
    T: Ord + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: Ord,
{
    fn eq(&self, other: &AvlSet<T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Ord {}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T> Serialize for AvlSet<T>
where
    T: Ord + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T> Deserialize<'de> for AvlSet<T>
where
    T: Ord + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AvlSetVisitor<T> {
            marker: PhantomData<T>,
        }

        impl<'de, T> Visitor<'de> for AvlSetVisitor<T>
        where
            T: Ord + Deserialize<'de>,
        {
            type Value = AvlSet<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence")
            }

            fn visit_seq<A>(self, mut seq: A) -> result::Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = AvlSet::new();
                while let Some(value) = seq.next_element()? {
                    set.add(value);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(AvlSetVisitor {
            marker: PhantomData,
        })
    }
}
