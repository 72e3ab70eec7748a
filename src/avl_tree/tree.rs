use crate::arena::{Entry, TypedArena};
use crate::avl_tree::node::Node;
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

pub type Arena<T> = TypedArena<Node<T>>;
pub type Tree = Option<Entry>;

pub fn height<T>(arena: &Arena<T>, tree: Tree) -> i32 {
    match tree {
        None => -1,
        Some(entry) => arena[entry].height,
    }
}

// precondition: the heights of both children are correct
fn update<T>(arena: &mut Arena<T>, entry: Entry) {
    let node = &arena[entry];
    let new_height = cmp::max(height(arena, node.left), height(arena, node.right)) + 1;
    arena[entry].height = new_height;
}

fn set_parent<T>(arena: &mut Arena<T>, tree: Tree, parent: Tree) {
    if let Some(entry) = tree {
        arena[entry].parent = parent;
    }
}

//      x              y
//     / \            / \
//    T1  y    =>    x  T3
//       / \        / \
//      T2 T3      T1 T2
fn rotate_left<T>(arena: &mut Arena<T>, x: Entry) -> Entry {
    let y = match arena[x].right {
        Some(y) => y,
        None => unreachable!(),
    };
    let t2 = arena[y].left;

    arena[x].right = t2;
    set_parent(arena, t2, Some(x));

    arena[y].parent = arena[x].parent;
    arena[y].left = Some(x);
    arena[x].parent = Some(y);

    update(arena, x);
    update(arena, y);
    y
}

fn rotate_right<T>(arena: &mut Arena<T>, y: Entry) -> Entry {
    let x = match arena[y].left {
        Some(x) => x,
        None => unreachable!(),
    };
    let t2 = arena[x].right;

    arena[y].left = t2;
    set_parent(arena, t2, Some(y));

    arena[x].parent = arena[y].parent;
    arena[x].right = Some(y);
    arena[y].parent = Some(x);

    update(arena, y);
    update(arena, x);
    x
}

// Restores balance at `z` when its left subtree is two levels taller than its right subtree.
fn rebalance_left<T>(arena: &mut Arena<T>, z: Entry) -> Entry {
    let (left, right) = (arena[z].left, arena[z].right);
    if height(arena, left) - height(arena, right) <= 1 {
        return z;
    }

    let y = match left {
        Some(y) => y,
        None => unreachable!(),
    };
    if height(arena, arena[y].left) >= height(arena, arena[y].right) {
        trace!("rebalancing left-left case");
        rotate_right(arena, z)
    } else {
        trace!("rebalancing left-right case");
        let new_left = rotate_left(arena, y);
        arena[z].left = Some(new_left);
        rotate_right(arena, z)
    }
}

// Restores balance at `z` when its right subtree is two levels taller than its left subtree.
// A height tie between the grandchildren takes the single rotation.
fn rebalance_right<T>(arena: &mut Arena<T>, z: Entry) -> Entry {
    let (left, right) = (arena[z].left, arena[z].right);
    if height(arena, right) - height(arena, left) <= 1 {
        return z;
    }

    let y = match right {
        Some(y) => y,
        None => unreachable!(),
    };
    if height(arena, arena[y].right) >= height(arena, arena[y].left) {
        trace!("rebalancing right-right case");
        rotate_left(arena, z)
    } else {
        trace!("rebalancing right-left case");
        let new_right = rotate_right(arena, y);
        arena[z].right = Some(new_right);
        rotate_left(arena, z)
    }
}

/// Inserts `value` into the subtree rooted at `tree` and returns the new root of that subtree,
/// along with whether a node was created. An equal value already in the subtree is kept and
/// `value` is dropped.
pub fn insert<T>(arena: &mut Arena<T>, tree: Tree, value: T) -> (Entry, bool)
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return (arena.allocate(Node::new(value)), true),
    };

    match value.cmp(&arena[entry].value) {
        Ordering::Less => {
            let left = arena[entry].left;
            let (child, inserted) = insert(arena, left, value);
            if !inserted {
                return (entry, false);
            }
            arena[entry].left = Some(child);
            arena[child].parent = Some(entry);
            update(arena, entry);
            (rebalance_left(arena, entry), true)
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let (child, inserted) = insert(arena, right, value);
            if !inserted {
                return (entry, false);
            }
            arena[entry].right = Some(child);
            arena[child].parent = Some(entry);
            update(arena, entry);
            (rebalance_right(arena, entry), true)
        },
        Ordering::Equal => (entry, false),
    }
}

// Unlinks the rightmost node of the subtree rooted at `entry` and returns the new root of the
// subtree together with the unlinked value.
fn remove_max<T>(arena: &mut Arena<T>, entry: Entry) -> (Tree, T) {
    match arena[entry].right {
        Some(right) => {
            let (child, value) = remove_max(arena, right);
            arena[entry].right = child;
            set_parent(arena, child, Some(entry));
            update(arena, entry);
            (Some(rebalance_left(arena, entry)), value)
        },
        None => {
            let Node { value, left, .. } = arena.free(&entry);
            (left, value)
        },
    }
}

/// Removes the value equal to `key` from the subtree rooted at `tree` and returns the new root
/// of that subtree, along with the removed value if there was one.
pub fn remove<T, Q>(arena: &mut Arena<T>, tree: Tree, key: &Q) -> (Tree, Option<T>)
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return (None, None),
    };

    match key.cmp(arena[entry].value.borrow()) {
        Ordering::Less => {
            let left = arena[entry].left;
            let (child, removed) = remove(arena, left, key);
            if removed.is_none() {
                return (tree, None);
            }
            arena[entry].left = child;
            set_parent(arena, child, tree);
            update(arena, entry);
            (Some(rebalance_right(arena, entry)), removed)
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let (child, removed) = remove(arena, right, key);
            if removed.is_none() {
                return (tree, None);
            }
            arena[entry].right = child;
            set_parent(arena, child, tree);
            update(arena, entry);
            (Some(rebalance_left(arena, entry)), removed)
        },
        Ordering::Equal => match (arena[entry].left, arena[entry].right) {
            (None, None) => {
                let Node { value, .. } = arena.free(&entry);
                (None, Some(value))
            },
            (Some(child), None) | (None, Some(child)) => {
                let Node { value, .. } = arena.free(&entry);
                (Some(child), Some(value))
            },
            (Some(left), Some(_)) => {
                let (child, predecessor) = remove_max(arena, left);
                let value = mem::replace(&mut arena[entry].value, predecessor);
                arena[entry].left = child;
                set_parent(arena, child, tree);
                update(arena, entry);
                (Some(rebalance_right(arena, entry)), Some(value))
            },
        },
    }
}

pub fn get<'a, T, Q>(arena: &'a Arena<T>, tree: Tree, key: &Q) -> Option<&'a T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        match key.cmp(node.value.borrow()) {
            Ordering::Less => get(arena, node.left, key),
            Ordering::Greater => get(arena, node.right, key),
            Ordering::Equal => Some(&node.value),
        }
    })
}

pub fn leftmost<T>(arena: &Arena<T>, mut entry: Entry) -> Entry {
    while let Some(left) = arena[entry].left {
        entry = left;
    }
    entry
}

pub fn rightmost<T>(arena: &Arena<T>, mut entry: Entry) -> Entry {
    while let Some(right) = arena[entry].right {
        entry = right;
    }
    entry
}

/// Returns the in-order successor of `entry`, walking up through parent links when `entry` has
/// no right subtree.
pub fn successor<T>(arena: &Arena<T>, entry: Entry) -> Tree {
    if let Some(right) = arena[entry].right {
        return Some(leftmost(arena, right));
    }

    let mut child = entry;
    let mut parent = arena[entry].parent;
    while let Some(curr) = parent {
        if arena[curr].left == Some(child) {
            return Some(curr);
        }
        child = curr;
        parent = arena[curr].parent;
    }
    None
}

/// Returns the in-order predecessor of `entry`, walking up through parent links when `entry`
/// has no left subtree.
pub fn predecessor<T>(arena: &Arena<T>, entry: Entry) -> Tree {
    if let Some(left) = arena[entry].left {
        return Some(rightmost(arena, left));
    }

    let mut child = entry;
    let mut parent = arena[entry].parent;
    while let Some(curr) = parent {
        if arena[curr].right == Some(child) {
            return Some(curr);
        }
        child = curr;
        parent = arena[curr].parent;
    }
    None
}

/// Checks every structural invariant of the subtree rooted at `tree` and returns the number of
/// nodes in it. Values in the subtree must lie strictly between `lower` and `upper`.
pub fn check<'a, T>(
    arena: &'a Arena<T>,
    tree: Tree,
    parent: Tree,
    lower: Option<&'a T>,
    upper: Option<&'a T>,
) -> usize
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return 0,
    };
    let node = &arena[entry];

    assert_eq!(node.parent, parent, "parent link does not point at the linking node");
    if let Some(lower) = lower {
        assert!(*lower < node.value, "values are not in strictly ascending order");
    }
    if let Some(upper) = upper {
        assert!(node.value < *upper, "values are not in strictly ascending order");
    }

    let left_height = height(arena, node.left);
    let right_height = height(arena, node.right);
    assert_eq!(
        node.height,
        cmp::max(left_height, right_height) + 1,
        "cached height is stale",
    );
    assert!(
        (left_height - right_height).abs() <= 1,
        "balance factor {} is out of range",
        left_height - right_height,
    );

    1 + check(arena, node.left, tree, lower, Some(&node.value))
        + check(arena, node.right, tree, Some(&node.value), upper)
}

pub fn write_tree<T, W>(arena: &Arena<T>, tree: Tree, level: usize, w: &mut W) -> fmt::Result
where
    T: fmt::Debug,
    W: fmt::Write,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return Ok(()),
    };
    let node = &arena[entry];

    write!(
        w,
        "{:indent$}{:?}(height: {}), parent:",
        "",
        node.value,
        node.height,
        indent = level * 3,
    )?;
    match node.parent {
        Some(parent) => writeln!(w, "{:?}", arena[parent].value)?,
        None => writeln!(w, "None")?,
    }

    write_tree(arena, node.left, level + 1, w)?;
    write_tree(arena, node.right, level + 1, w)
}
